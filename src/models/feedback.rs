use serde::{Deserialize, Serialize};

pub const ANONYMOUS: &str = "Anonymous";
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One record on the feedback board. Older files may miss fields, so every
/// field has the default the board would display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    #[serde(default = "anonymous")]
    pub name: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub date: String,
}

fn anonymous() -> String {
    ANONYMOUS.to_string()
}

fn default_rating() -> u8 {
    5
}
