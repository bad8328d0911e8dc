//! Chat configuration.

use serde::{Deserialize, Serialize};

/// Chat settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of most-recent messages fetched when opening a conversation.
    #[serde(default = "default_history_page_size")]
    pub history_page_size: u32,
    /// Maximum message content length in characters.
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_page_size: default_history_page_size(),
            max_content_length: default_max_content_length(),
        }
    }
}

fn default_history_page_size() -> u32 {
    50
}

fn default_max_content_length() -> usize {
    4000
}
