//! Actor profile mapping

use crate::error::CoreError;
use crate::fields::{
    as_object, collect_raw_data, count_field, optional_array, optional_field, string_field,
    RawData,
};
use crate::uri::{self, RecordKind};
use serde::Serialize;
use serde_json::Value;

const MAPPED_KEYS: &[&str] = &[
    "did",
    "handle",
    "displayName",
    "description",
    "avatar",
    "banner",
    "createdAt",
    "indexedAt",
    "followersCount",
    "followsCount",
    "postsCount",
    "labels",
    "pinnedPost",
];

/// Account profile, as returned by `app.bsky.actor.getProfile` or embedded
/// in posts, lists and starter packs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub did: String,
    pub handle: String,
    pub display_name: String,
    pub description: String,
    pub avatar: String,
    pub banner: String,
    pub created_at: String,
    pub indexed_at: String,
    pub followers_count: u64,
    pub follows_count: u64,
    pub posts_count: u64,
    pub labels: Option<Vec<Value>>,
    pub pinned_post: Option<Value>,
    raw_data: RawData,
}

impl Profile {
    /// Build a profile from a raw payload. Anything that is not an object
    /// yields a profile with every field defaulted.
    pub fn from_json(value: &Value) -> Self {
        let data = as_object(value);
        Self {
            did: string_field(data, "did"),
            handle: string_field(data, "handle"),
            display_name: string_field(data, "displayName"),
            description: string_field(data, "description"),
            avatar: string_field(data, "avatar"),
            banner: string_field(data, "banner"),
            created_at: string_field(data, "createdAt"),
            indexed_at: string_field(data, "indexedAt"),
            followers_count: count_field(data, "followersCount"),
            follows_count: count_field(data, "followsCount"),
            posts_count: count_field(data, "postsCount"),
            labels: optional_array(data, "labels"),
            pinned_post: optional_field(data, "pinnedPost"),
            raw_data: collect_raw_data(data, MAPPED_KEYS),
        }
    }

    /// Keys of the source payload that no field claimed.
    pub fn raw_data(&self) -> &RawData {
        &self.raw_data
    }

    /// Handle if known, otherwise `None`.
    pub fn handle(&self) -> Option<&str> {
        Some(self.handle.as_str()).filter(|h| !h.is_empty())
    }

    pub fn public_url(&self) -> Result<String, CoreError> {
        uri::public_url(RecordKind::Profile, &self.did, self.handle())
    }

    pub fn api_url(&self) -> String {
        let actor = if self.did.is_empty() {
            &self.handle
        } else {
            &self.did
        };
        uri::api_url(RecordKind::Profile, actor)
    }
}
