use serde::{Deserialize, Serialize};

/// One piece of JavaScript delivered during a page load.
///
/// Records are immutable value objects: the extractor creates them and the
/// owning inventory or report never mutates them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRecord {
    /// URL of the response the script came from. Inline scripts inherit the
    /// URL of their host document.
    pub url: String,
    pub content: String,
    /// 1-based ordinal of the originating entry, counted over qualifying
    /// entries only.
    pub index: usize,
}

/// One qualifying HTML response body, kept as extraction input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlRecord {
    pub url: String,
    pub content: String,
    pub index: usize,
}

/// Normalized script inventory for one capture event.
///
/// `all_scripts` is the union of `script_files` and `script_elements`:
/// file scripts first in capture order, then element scripts grouped by
/// their host document in document-appearance order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptInventory {
    pub url: String,
    pub htmls: Vec<HtmlRecord>,
    pub all_scripts: Vec<ScriptRecord>,
    pub script_elements: Vec<ScriptRecord>,
    pub script_files: Vec<ScriptRecord>,
}

impl ScriptInventory {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}
