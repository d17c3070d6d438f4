//! Feed entry mapping (`getTimeline`, `getAuthorFeed`)

use crate::error::CoreError;
use crate::fields::{as_object, collect_raw_data, optional_field, require_array, string_field, RawData};
use crate::filter::{FilterCounts, PostFilter};
use crate::list::cursor_of;
use crate::post::Post;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

const MAPPED_KEYS: &[&str] = &["post", "reply", "reason", "feedContext"];

/// One entry of a feed: the post plus why it appears.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub post: Post,
    pub reply: Option<Value>,
    pub reason: Option<Value>,
    pub feed_context: String,
    raw_data: RawData,
}

impl FeedEntry {
    pub fn from_json(value: &Value) -> Self {
        let data = as_object(value);
        Self {
            post: Post::from_json(data.get("post").unwrap_or(&Value::Null)),
            reply: optional_field(data, "reply"),
            reason: optional_field(data, "reason"),
            feed_context: string_field(data, "feedContext"),
            raw_data: collect_raw_data(data, MAPPED_KEYS),
        }
    }

    pub fn raw_data(&self) -> &RawData {
        &self.raw_data
    }

    /// Short description of why the entry is in the feed.
    ///
    /// `None` for plain posts by the feed's subject.
    pub fn reason_summary(&self) -> Option<String> {
        let reason = self.reason.as_ref()?;
        let kind = reason.get("$type").and_then(Value::as_str).unwrap_or("");
        let by = reason
            .get("by")
            .and_then(|by| by.get("handle"))
            .and_then(Value::as_str);

        match (kind.rsplit('#').next().unwrap_or(""), by) {
            ("reasonRepost", Some(handle)) => Some(format!("Repost by @{handle}")),
            ("reasonRepost", None) => Some("Repost".to_string()),
            ("reasonPin", _) => Some("Pinned".to_string()),
            ("", _) => None,
            (other, _) => Some(other.to_string()),
        }
    }

    /// Handle of the author of the post this entry replies to.
    pub fn reply_parent_handle(&self) -> Option<&str> {
        self.reply
            .as_ref()?
            .get("parent")?
            .get("author")?
            .get("handle")?
            .as_str()
    }
}

/// A page of feed entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Feed {
    pub entries: Vec<FeedEntry>,
    pub cursor: String,
}

impl Feed {
    pub fn posts(&self) -> Vec<Post> {
        self.entries.iter().map(|e| e.post.clone()).collect()
    }
}

/// Map a `{feed: [...], cursor}` response.
pub fn parse_feed_response(response: &Value) -> Result<Feed, CoreError> {
    let entries = require_array(response, "feed")?
        .iter()
        .map(FeedEntry::from_json)
        .collect();
    Ok(Feed {
        entries,
        cursor: cursor_of(response),
    })
}

/// Run `filter` over the feed's posts and keep the entries whose post
/// survived. Entry order and the cursor are preserved.
pub fn filter_feed(feed: Feed, filter: &PostFilter) -> (Feed, FilterCounts) {
    let outcome = filter.apply(&feed.posts());
    let kept: HashSet<&str> = outcome.posts.iter().map(|p| p.uri.as_str()).collect();

    let entries = feed
        .entries
        .into_iter()
        .filter(|e| kept.contains(e.post.uri.as_str()))
        .collect();

    (
        Feed {
            entries,
            cursor: feed.cursor,
        },
        outcome.counts,
    )
}
