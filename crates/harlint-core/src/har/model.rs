//! Lenient data model for browser network-capture (HAR) documents.
//!
//! Real-world captures are full of entries this tool cannot use: redirects
//! without bodies, 204 responses, opaque cross-origin responses, truncated
//! exports. Every field the qualifying check consults is therefore optional
//! or defaulted, so a malformed entry deserializes cleanly and is skipped
//! downstream instead of failing the whole document.

use serde::Deserialize;

/// One capture document, with or without the standard `log` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureRecord {
    pub log: Option<CaptureLog>,
    #[serde(default)]
    pub entries: Vec<CaptureEntry>,
}

impl CaptureRecord {
    /// The entry list, unwrapping the `log` envelope when present.
    pub fn entries(&self) -> &[CaptureEntry] {
        match &self.log {
            Some(log) => &log.entries,
            None => &self.entries,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureLog {
    #[serde(default)]
    pub entries: Vec<CaptureEntry>,
}

/// One request/response pair in capture order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureEntry {
    pub request: Option<RequestInfo>,
    pub response: Option<ResponseInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestInfo {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseInfo {
    /// HTTP status. Aborted or synthetic entries carry 0.
    #[serde(default)]
    pub status: u16,
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseContent {
    pub text: Option<String>,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
    /// Body size in bytes. Exporters write -1 when the size is unknown.
    #[serde(default)]
    pub size: i64,
}
