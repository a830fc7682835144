//! Executive-summary text for arbitrary client data.
//!
//! No model is called; the summary is a deterministic function of the input
//! so identical payloads always produce identical text.

use serde_json::{Map, Value};

const SUMMARY_PREFIX: &str = "AI Summary for your data: ";
const PROMPT_PREFIX: &str = "Generate an executive summary based on this data: ";

/// Produce the summary text for `data`.
///
/// # Examples
/// ```
/// use darpan_backend::domain::generate_summary;
/// use serde_json::json;
///
/// let data = json!({"b": 1, "a": [true, null]});
/// let data = data.as_object().expect("object literal");
/// assert_eq!(
///     generate_summary(data),
///     concat!(
///         "AI Summary for your data: ",
///         "Generate an executive summary based on this data: ",
///         "{\"a\":[true,null],\"b\":1}",
///     ),
/// );
/// ```
pub fn generate_summary(data: &Map<String, Value>) -> String {
    // `Map` is key-ordered at every depth, so the compact rendering is canonical.
    let rendered = Value::Object(data.clone()).to_string();
    format!("{SUMMARY_PREFIX}{PROMPT_PREFIX}{rendered}")
}
