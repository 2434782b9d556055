//! Response formatting.

use ceiling_executor::Response;

/// How responses are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One compact JSON object per line
    Json,
    /// Status line followed by a pretty body
    Human,
}

/// Format a response.
pub fn format_response(response: &Response, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string(response)
            .unwrap_or_else(|e| format!("{{\"status\":500,\"body\":\"{}\"}}", e)),
        OutputMode::Human => {
            let label = if response.is_success() { "ok" } else { "error" };
            if response.body.is_null() {
                format!("({} {})", response.status, label)
            } else {
                let body = serde_json::to_string_pretty(&response.body)
                    .unwrap_or_else(|_| response.body.to_string());
                format!("({} {}) {}", response.status, label, body)
            }
        }
    }
}
