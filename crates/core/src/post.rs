//! Post mapping and derived post data (tags, links, URLs)

use crate::error::CoreError;
use crate::fields::{
    array_field, as_object, collect_raw_data, count_field, first_string_field, object_field,
    optional_array, optional_field, require_array, string_field, string_list_field, RawData,
};
use crate::profile::Profile;
use crate::uri::{self, RecordKind};
use serde::Serialize;
use serde_json::{Map, Value};

const MAPPED_KEYS: &[&str] = &[
    "uri",
    "cid",
    "author",
    "record",
    "text",
    "createdAt",
    "indexedAt",
    "likeCount",
    "repostCount",
    "replyCount",
    "quoteCount",
    "embed",
    "embeds",
    "facets",
    "langs",
    "viewer",
    "labels",
];

const MAPPED_RECORD_KEYS: &[&str] = &["text", "createdAt", "facets", "langs", "embed"];

/// A post view.
///
/// Content fields (`text`, `createdAt`, `facets`, `langs`) are read from the
/// nested `record` when present and from the top level otherwise, so both the
/// API shape and flattened fixtures map the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub uri: String,
    pub cid: String,
    pub text: String,
    pub created_at: String,
    pub indexed_at: String,
    pub author: Profile,
    pub like_count: u64,
    pub repost_count: u64,
    pub reply_count: u64,
    pub quote_count: u64,
    pub embeds: Option<Value>,
    pub facets: Vec<Value>,
    pub langs: Vec<String>,
    pub viewer: Option<Value>,
    pub labels: Option<Vec<Value>>,
    raw_data: RawData,
}

impl Post {
    pub fn from_json(value: &Value) -> Self {
        let data = as_object(value);
        let record = object_field(data, "record");
        let sources = [record, data];

        let facets = if record.contains_key("facets") {
            array_field(record, "facets")
        } else {
            array_field(data, "facets")
        };
        let langs = if record.contains_key("langs") {
            string_list_field(record, "langs")
        } else {
            string_list_field(data, "langs")
        };
        let embeds = optional_field(data, "embed")
            .or_else(|| optional_field(data, "embeds"))
            .or_else(|| optional_field(record, "embed"));

        let mut raw_data = collect_raw_data(data, MAPPED_KEYS);
        let record_rest = collect_raw_data(record, MAPPED_RECORD_KEYS);
        if !record_rest.is_empty() {
            raw_data.insert("record".to_string(), Value::Object(record_rest));
        }

        Self {
            uri: string_field(data, "uri"),
            cid: string_field(data, "cid"),
            text: first_string_field(&sources, "text"),
            created_at: first_string_field(&sources, "createdAt"),
            indexed_at: string_field(data, "indexedAt"),
            author: Profile::from_json(data.get("author").unwrap_or(&Value::Null)),
            like_count: count_field(data, "likeCount"),
            repost_count: count_field(data, "repostCount"),
            reply_count: count_field(data, "replyCount"),
            quote_count: count_field(data, "quoteCount"),
            embeds,
            facets,
            langs,
            viewer: optional_field(data, "viewer"),
            labels: optional_array(data, "labels"),
            raw_data,
        }
    }

    pub fn raw_data(&self) -> &RawData {
        &self.raw_data
    }

    pub fn author_handle(&self) -> Option<&str> {
        self.author.handle()
    }

    /// Hashtags carried by the rich-text facets, `#`-prefixed, in source order.
    pub fn tags(&self) -> Vec<String> {
        self.facet_features()
            .filter_map(|feature| feature.get("tag").and_then(Value::as_str))
            .map(|tag| format!("#{tag}"))
            .collect()
    }

    /// Link targets carried by the rich-text facets, in source order.
    pub fn links(&self) -> Vec<String> {
        self.facet_features()
            .filter_map(|feature| feature.get("uri").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }

    fn facet_features(&self) -> impl Iterator<Item = &Map<String, Value>> {
        self.facets
            .iter()
            .filter_map(|facet| facet.get("features").and_then(Value::as_array))
            .flatten()
            .filter_map(Value::as_object)
    }

    /// Public web URL, using the author handle when known.
    pub fn public_url(&self) -> Result<String, CoreError> {
        uri::public_url(RecordKind::Post, &self.uri, self.author_handle())
    }

    pub fn api_url(&self) -> String {
        uri::api_url(RecordKind::Post, &self.uri)
    }
}

/// Map a `{posts: [...]}` response, as returned by `app.bsky.feed.getPosts`.
pub fn parse_posts_response(response: &Value) -> Result<Vec<Post>, CoreError> {
    Ok(require_array(response, "posts")?
        .iter()
        .map(Post::from_json)
        .collect())
}
