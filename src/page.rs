use crate::error::ConfigurationError;
use crate::links::{
    is_search_shortcut, matches_query, scroll_button_visible, HIDDEN_CLASS, SCROLL_THRESHOLD,
    SPIN_RESET_MS,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, EventTarget, HtmlElement, HtmlInputElement, KeyboardEvent,
    ScrollBehavior, ScrollToOptions, Window,
};

pub(crate) fn window_and_document() -> Result<(Window, Document), ConfigurationError> {
    let window = web_sys::window().ok_or(ConfigurationError::MissingWindow)?;
    let document = window
        .document()
        .ok_or(ConfigurationError::MissingDocument)?;
    Ok((window, document))
}

pub(crate) fn element<T: JsCast>(
    document: &Document,
    id: &str,
    expected: &'static str,
) -> Result<T, ConfigurationError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| ConfigurationError::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| ConfigurationError::WrongElementType {
            id: id.to_string(),
            expected,
        })
}

pub(crate) fn listen(
    target: &EventTarget,
    event: &'static str,
    callback: &JsValue,
) -> Result<(), ConfigurationError> {
    target
        .add_event_listener_with_callback(event, callback.unchecked_ref())
        .map_err(|_| ConfigurationError::ListenerRejected(event))
}

/// Wires the back-to-top button, the link search box and the `/` shortcut.
/// The listeners live as long as the page.
pub fn install(
    button_id: &str,
    search_id: &str,
    item_selector: &str,
) -> Result<(), ConfigurationError> {
    let (window, document) = window_and_document()?;
    let button: HtmlElement = element(&document, button_id, "html element")?;
    let search: HtmlInputElement = element(&document, search_id, "input")?;

    install_scroll_button(&window, button)?;
    install_search(&document, search.clone(), item_selector.to_string())?;
    install_shortcut(&document, search)?;
    Ok(())
}

fn install_scroll_button(window: &Window, button: HtmlElement) -> Result<(), ConfigurationError> {
    let scroll_window = window.clone();
    let scroll_button = button.clone();
    let on_scroll = Closure::<dyn FnMut()>::new(move || {
        let offset = scroll_window.scroll_y().unwrap_or(0.0);
        let display = if scroll_button_visible(offset, SCROLL_THRESHOLD) {
            "block"
        } else {
            "none"
        };
        let _ = scroll_button.style().set_property("display", display);
    });
    listen(window, "scroll", on_scroll.as_ref())?;
    on_scroll.forget();

    let click_window = window.clone();
    let spin_button = button.clone();
    let on_click = Closure::<dyn FnMut()>::new(move || {
        let mut options = ScrollToOptions::new();
        options.top(0.0).behavior(ScrollBehavior::Smooth);
        click_window.scroll_to_with_scroll_to_options(&options);

        let _ = spin_button.style().set_property("transform", "rotate(360deg)");
        let reset_button = spin_button.clone();
        let reset = Closure::once_into_js(move || {
            let _ = reset_button.style().set_property("transform", "rotate(0deg)");
        });
        let _ = click_window.set_timeout_with_callback_and_timeout_and_arguments_0(
            reset.unchecked_ref(),
            SPIN_RESET_MS,
        );
    });
    listen(&button, "click", on_click.as_ref())?;
    on_click.forget();
    Ok(())
}

fn install_search(
    document: &Document,
    search: HtmlInputElement,
    item_selector: String,
) -> Result<(), ConfigurationError> {
    let doc = document.clone();
    let input = search.clone();
    let on_input = Closure::<dyn FnMut()>::new(move || {
        let query = input.value();
        let Ok(items) = doc.query_selector_all(&item_selector) else {
            return;
        };
        for i in 0..items.length() {
            let Some(item) = items.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let text = item.text_content().unwrap_or_default();
            let classes = item.class_list();
            let _ = if matches_query(&text, &query) {
                classes.remove_1(HIDDEN_CLASS)
            } else {
                classes.add_1(HIDDEN_CLASS)
            };
        }
    });
    listen(&search, "input", on_input.as_ref())?;
    on_input.forget();
    Ok(())
}

fn install_shortcut(document: &Document, search: HtmlInputElement) -> Result<(), ConfigurationError> {
    let doc = document.clone();
    let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        let search_el: &Element = search.as_ref();
        let focused = doc
            .active_element()
            .map_or(false, |active| &active == search_el);
        if is_search_shortcut(&event.key(), focused) {
            event.prevent_default();
            let _ = search.focus();
        }
    });
    listen(document, "keydown", on_key.as_ref())?;
    on_key.forget();
    Ok(())
}
