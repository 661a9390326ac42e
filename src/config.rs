// SPDX-License-Identifier: MPL-2.0

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Listing server URL (e.g., http://localhost:8000)
    pub server_url: String,
    /// Authentication token sent with every request
    pub auth_token: String,
    /// Authentication header type: "authorization" (Bearer) or a custom header name
    pub auth_header_type: String,
    /// Idle time after the last keystroke before a search fetch fires
    pub debounce_ms: u64,
    /// Records requested per page
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: String::from("http://localhost:8000"),
            auth_token: String::new(),
            auth_header_type: String::from("authorization"),
            debounce_ms: 500,
            page_size: 50,
        }
    }
}

impl Config {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
