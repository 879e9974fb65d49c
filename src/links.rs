use serde::{Deserialize, Serialize};

/// Scroll offset past which the "back to top" button shows.
pub const SCROLL_THRESHOLD: f64 = 150.0;
pub const SEARCH_SHORTCUT: &str = "/";
pub const HIDDEN_CLASS: &str = "hidden";
pub const SPIN_RESET_MS: i32 = 600;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub href: String,
    pub label: String,
}

/// Case-insensitive substring match. An empty query matches everything.
pub fn matches_query(text: &str, query: &str) -> bool {
    text.to_lowercase().contains(&query.to_lowercase())
}

pub fn filter_links<'a>(entries: &'a [LinkEntry], query: &str) -> Vec<&'a LinkEntry> {
    entries
        .iter()
        .filter(|entry| matches_query(&entry.label, query))
        .collect()
}

pub fn filter_links_json(links_json: &str, query: &str) -> String {
    let entries: Vec<LinkEntry> = match serde_json::from_str(links_json) {
        Ok(entries) => entries,
        Err(_) => return "[]".to_string(),
    };
    serde_json::to_string(&filter_links(&entries, query)).unwrap_or_else(|_| "[]".to_string())
}

pub fn scroll_button_visible(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

pub fn is_search_shortcut(key: &str, search_focused: bool) -> bool {
    key == SEARCH_SHORTCUT && !search_focused
}
