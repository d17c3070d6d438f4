//! Moderation label mapping (`com.atproto.label.queryLabels`)

use crate::error::CoreError;
use crate::fields::{as_object, bool_field, collect_raw_data, require_array, string_field, RawData};
use crate::list::cursor_of;
use crate::paging::Page;
use serde::Serialize;
use serde_json::Value;

const MAPPED_KEYS: &[&str] = &["src", "uri", "cid", "val", "neg", "cts"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    /// DID of the labeler.
    pub src: String,
    /// Subject of the label (record URI or DID).
    pub uri: String,
    pub cid: String,
    pub val: String,
    /// Whether this label negates an earlier one.
    pub neg: bool,
    pub cts: String,
    raw_data: RawData,
}

impl Label {
    pub fn from_json(value: &Value) -> Self {
        let data = as_object(value);
        Self {
            src: string_field(data, "src"),
            uri: string_field(data, "uri"),
            cid: string_field(data, "cid"),
            val: string_field(data, "val"),
            neg: bool_field(data, "neg"),
            cts: string_field(data, "cts"),
            raw_data: collect_raw_data(data, MAPPED_KEYS),
        }
    }

    pub fn raw_data(&self) -> &RawData {
        &self.raw_data
    }
}

/// Map a `{labels: [...], cursor}` response.
pub fn parse_labels_page(response: &Value) -> Result<Page<Label>, CoreError> {
    let labels = require_array(response, "labels")?
        .iter()
        .map(Label::from_json)
        .collect();
    Ok(Page::new(labels, cursor_of(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_label_mapping() {
        let label = Label::from_json(&json!({
            "ver": 1,
            "src": "did:plc:labeler",
            "uri": "at://did:plc:abc/app.bsky.feed.post/1",
            "val": "spam",
            "cts": "2024-03-03T00:00:00.000Z",
            "sig": {"$bytes": "..."}
        }));
        assert_eq!(label.val, "spam");
        assert!(!label.neg);
        assert_eq!(label.cid, "");
        let keys: Vec<&str> = label.raw_data().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ver", "sig"]);
    }

    #[test]
    fn test_parse_labels_page() {
        let page = parse_labels_page(&json!({"labels": [{"val": "a", "neg": true}]})).unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.items[0].neg);
        assert!(parse_labels_page(&json!({"cursor": "x"})).is_err());
    }
}
