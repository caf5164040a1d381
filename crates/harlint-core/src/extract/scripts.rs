//! Turns one capture record into a normalized script inventory.
//!
//! This stage is a pure structural extraction: no linting, no severity, no
//! policy. It owns the lenient edge handling for real-world captures, so a
//! malformed entry or an unparsable HTML fragment can never abort extraction
//! of the remaining entries.

use scraper::{Html, Selector};

use crate::extract::model::{HtmlRecord, ScriptInventory, ScriptRecord};
use crate::har::model::{CaptureEntry, CaptureRecord};

/// Extract every script delivered in `capture`.
///
/// Walks entries in capture order with a 1-based qualifying-index counter:
/// entries that fail the qualifying check are skipped without consuming an
/// index slot, while qualifying entries of uninteresting mime types consume
/// a slot but are recorded nowhere. HTML bodies are parsed afterwards and
/// each non-blank `<script>` element becomes an element script carrying the
/// host document's url and index.
pub fn extract(capture: &CaptureRecord, url: &str) -> ScriptInventory {
    let mut inventory = ScriptInventory::new(url);
    let mut index = 1usize;

    for entry in capture.entries() {
        let Some(body) = qualify(entry) else {
            tracing::debug!(page = url, "skipping non-qualifying capture entry");
            continue;
        };

        if body.mime_type.contains("html") {
            inventory.htmls.push(HtmlRecord {
                url: body.url.to_string(),
                content: body.text.to_string(),
                index,
            });
        } else if body.mime_type.contains("javascript") {
            let record = ScriptRecord {
                url: body.url.to_string(),
                content: body.text.to_string(),
                index,
            };
            inventory.all_scripts.push(record.clone());
            inventory.script_files.push(record);
        }

        index += 1;
    }

    let mut elements = Vec::new();
    for html in &inventory.htmls {
        elements.extend(inline_scripts(html));
    }
    for record in elements {
        inventory.all_scripts.push(record.clone());
        inventory.script_elements.push(record);
    }

    inventory
}

struct QualifiedBody<'a> {
    url: &'a str,
    text: &'a str,
    mime_type: &'a str,
}

/// The qualifying check: an entry is usable only with a request URL, a
/// non-empty body, a mime type, a positive size, and a status code.
/// Anything else (redirects, 204s, opaque responses) is skipped silently.
fn qualify(entry: &CaptureEntry) -> Option<QualifiedBody<'_>> {
    let url = entry.request.as_ref()?.url.as_deref()?;
    let response = entry.response.as_ref()?;
    let content = response.content.as_ref()?;
    let text = content.text.as_deref().filter(|t| !t.is_empty())?;
    let mime_type = content.mime_type.as_deref().filter(|m| !m.is_empty())?;

    if content.size <= 0 || response.status == 0 {
        return None;
    }

    Some(QualifiedBody {
        url,
        text,
        mime_type,
    })
}

/// Collect the text of every `<script>` element in document order,
/// dropping blank bodies. A fragment that cannot be processed contributes
/// zero scripts; it never fails extraction.
fn inline_scripts(html: &HtmlRecord) -> Vec<ScriptRecord> {
    let selector = match Selector::parse("script") {
        Ok(selector) => selector,
        Err(err) => {
            tracing::warn!(url = %html.url, error = %err, "script selector unavailable");
            return Vec::new();
        }
    };

    Html::parse_document(&html.content)
        .select(&selector)
        .filter_map(|element| {
            let text: String = element.text().collect();
            if text.trim().is_empty() {
                return None;
            }
            Some(ScriptRecord {
                url: html.url.clone(),
                content: text,
                index: html.index,
            })
        })
        .collect()
}
