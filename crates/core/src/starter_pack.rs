//! Starter pack mapping

use crate::error::CoreError;
use crate::fields::{
    array_field, as_object, collect_raw_data, count_field, object_field, require_array,
    string_field, RawData,
};
use crate::list::{cursor_of, List};
use crate::paging::Page;
use crate::profile::Profile;
use crate::uri::{self, RecordKind};
use serde::Serialize;
use serde_json::{Map, Value};

const MAPPED_KEYS: &[&str] = &[
    "uri",
    "cid",
    "creator",
    "record",
    "list",
    "listItemsSample",
    "feeds",
    "joinedWeekCount",
    "joinedAllTimeCount",
    "indexedAt",
    "labels",
];

/// A starter pack: a curated list plus recommended feeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarterPack {
    pub uri: String,
    pub cid: String,
    pub creator: Profile,
    /// Free-form record (`name`, `description`, `createdAt`, `updatedAt`, `list`).
    pub record: Map<String, Value>,
    pub list: Option<List>,
    pub list_items_sample: Vec<Value>,
    pub feeds: Vec<Value>,
    pub joined_week_count: u64,
    pub joined_all_time_count: u64,
    pub labels: Vec<Value>,
    pub indexed_at: String,
    raw_data: RawData,
}

impl StarterPack {
    pub fn from_json(value: &Value) -> Self {
        let data = as_object(value);
        Self {
            uri: string_field(data, "uri"),
            cid: string_field(data, "cid"),
            creator: Profile::from_json(data.get("creator").unwrap_or(&Value::Null)),
            record: object_field(data, "record").clone(),
            list: data
                .get("list")
                .filter(|v| v.is_object())
                .map(List::from_json),
            list_items_sample: array_field(data, "listItemsSample"),
            feeds: array_field(data, "feeds"),
            joined_week_count: count_field(data, "joinedWeekCount"),
            joined_all_time_count: count_field(data, "joinedAllTimeCount"),
            labels: array_field(data, "labels"),
            indexed_at: string_field(data, "indexedAt"),
            raw_data: collect_raw_data(data, MAPPED_KEYS),
        }
    }

    pub fn raw_data(&self) -> &RawData {
        &self.raw_data
    }

    /// String value of a record key, empty when absent.
    pub fn record_str(&self, key: &str) -> String {
        string_field(&self.record, key)
    }

    pub fn name(&self) -> String {
        self.record_str("name")
    }

    pub fn creator_handle(&self) -> Option<&str> {
        self.creator.handle()
    }

    pub fn public_url(&self) -> Result<String, CoreError> {
        uri::public_url(RecordKind::StarterPack, &self.uri, self.creator_handle())
    }

    pub fn api_url(&self) -> String {
        uri::api_url(RecordKind::StarterPack, &self.uri)
    }
}

/// Map a `{starterPacks: [...], cursor}` response.
pub fn parse_starter_packs_page(response: &Value) -> Result<Page<StarterPack>, CoreError> {
    let packs = require_array(response, "starterPacks")?
        .iter()
        .map(StarterPack::from_json)
        .collect();
    Ok(Page::new(packs, cursor_of(response)))
}
