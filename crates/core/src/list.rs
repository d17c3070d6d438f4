//! List mapping (`app.bsky.graph.getList` / `getLists`)

use crate::error::CoreError;
use crate::fields::{
    as_object, collect_raw_data, count_field, optional_array, optional_field,
    require_array, string_field, RawData,
};
use crate::paging::Page;
use crate::profile::Profile;
use crate::uri::{self, RecordKind};
use serde::Serialize;
use serde_json::Value;

const MAPPED_KEYS: &[&str] = &[
    "uri",
    "cid",
    "name",
    "creator",
    "avatar",
    "purpose",
    "indexedAt",
    "description",
    "descriptionFacets",
    "listItemCount",
    "viewer",
    "labels",
];

/// A curated or moderation list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub uri: String,
    pub cid: String,
    pub creator: Profile,
    pub name: String,
    pub purpose: String,
    pub description: String,
    pub description_facets: Option<Vec<Value>>,
    pub avatar: String,
    pub indexed_at: String,
    pub list_item_count: u64,
    pub labels: Option<Vec<Value>>,
    pub viewer: Option<Value>,
    raw_data: RawData,
}

impl List {
    pub fn from_json(value: &Value) -> Self {
        let data = as_object(value);
        Self {
            uri: string_field(data, "uri"),
            cid: string_field(data, "cid"),
            creator: Profile::from_json(data.get("creator").unwrap_or(&Value::Null)),
            name: string_field(data, "name"),
            purpose: string_field(data, "purpose"),
            description: string_field(data, "description"),
            description_facets: optional_array(data, "descriptionFacets"),
            avatar: string_field(data, "avatar"),
            indexed_at: string_field(data, "indexedAt"),
            list_item_count: count_field(data, "listItemCount"),
            labels: optional_array(data, "labels"),
            viewer: optional_field(data, "viewer"),
            raw_data: collect_raw_data(data, MAPPED_KEYS),
        }
    }

    pub fn raw_data(&self) -> &RawData {
        &self.raw_data
    }

    pub fn creator_handle(&self) -> Option<&str> {
        self.creator.handle()
    }

    pub fn public_url(&self) -> Result<String, CoreError> {
        uri::public_url(RecordKind::List, &self.uri, self.creator_handle())
    }

    pub fn api_url(&self) -> String {
        uri::api_url(RecordKind::List, &self.uri)
    }
}

/// One member of a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListItem {
    pub uri: String,
    pub subject: Profile,
}

impl ListItem {
    pub fn from_json(value: &Value) -> Self {
        let data = as_object(value);
        Self {
            uri: string_field(data, "uri"),
            subject: Profile::from_json(data.get("subject").unwrap_or(&Value::Null)),
        }
    }
}

/// A list with every member collected across pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListDetail {
    pub list: List,
    pub items: Vec<ListItem>,
}

/// Map one page of `app.bsky.graph.getList`.
///
/// The `items` key is required; a missing `list` header maps to a default list.
pub fn parse_list_page(response: &Value) -> Result<(List, Page<ListItem>), CoreError> {
    let items = require_array(response, "items")?
        .iter()
        .map(ListItem::from_json)
        .collect();
    let list = List::from_json(response.get("list").unwrap_or(&Value::Null));
    Ok((list, Page::new(items, cursor_of(response))))
}

/// Map one page of `app.bsky.graph.getLists`.
pub fn parse_lists_page(response: &Value) -> Result<Page<List>, CoreError> {
    let lists = require_array(response, "lists")?
        .iter()
        .map(List::from_json)
        .collect();
    Ok(Page::new(lists, cursor_of(response)))
}

pub(crate) fn cursor_of(response: &Value) -> String {
    string_field(as_object(response), "cursor")
}
