use std::fmt;
use wasm_bindgen::JsValue;

/// Everything that can stop the starfield or page glue from starting.
///
/// All variants are fatal at initialization; nothing is retried.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigurationError {
    MissingWindow,
    MissingDocument,
    MissingElement(String),
    WrongElementType { id: String, expected: &'static str },
    MissingContext,
    InvalidDimensions { width: f64, height: f64 },
    InvalidConfig(String),
    MalformedConfig(String),
    ListenerRejected(&'static str),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::MissingWindow => write!(f, "no global window"),
            ConfigurationError::MissingDocument => write!(f, "window has no document"),
            ConfigurationError::MissingElement(id) => write!(f, "no element with id `{}`", id),
            ConfigurationError::WrongElementType { id, expected } => {
                write!(f, "element `{}` is not a {}", id, expected)
            }
            ConfigurationError::MissingContext => write!(f, "canvas has no 2d context"),
            ConfigurationError::InvalidDimensions { width, height } => {
                write!(f, "invalid surface dimensions {}x{}", width, height)
            }
            ConfigurationError::InvalidConfig(reason) => write!(f, "invalid config: {}", reason),
            ConfigurationError::MalformedConfig(msg) => write!(f, "malformed config json: {}", msg),
            ConfigurationError::ListenerRejected(event) => {
                write!(f, "could not listen for `{}` events", event)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

impl From<ConfigurationError> for JsValue {
    fn from(err: ConfigurationError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(err: serde_json::Error) -> Self {
        ConfigurationError::MalformedConfig(err.to_string())
    }
}

pub fn check_dimensions(width: f64, height: f64) -> Result<(), ConfigurationError> {
    let valid = |v: f64| v.is_finite() && v >= 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidDimensions { width, height })
    }
}
