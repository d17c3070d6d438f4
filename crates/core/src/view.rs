//! Human-readable views of entities
//!
//! Each entity provides a default template and the values for its
//! placeholders; [`render`] does the substitution. Formatting is a pure
//! function of (entity, options, template). Missing strings render as `N/A`.

use crate::config::{Config, DEFAULT_EXCERPT_LENGTH};
use crate::feed::FeedEntry;
use crate::label::Label;
use crate::list::{List, ListItem};
use crate::post::Post;
use crate::profile::Profile;
use crate::starter_pack::StarterPack;
use crate::template::render_template;
use chrono::{DateTime, Utc};

const NOT_AVAILABLE: &str = "N/A";

/// Rendering options derived from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Maximum characters in `#textexcerpt#`.
    pub excerpt_length: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
        }
    }
}

impl ViewOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            excerpt_length: config.excerpt_length(),
        }
    }
}

/// An entity that can be rendered through a template.
pub trait View {
    const DEFAULT_TEMPLATE: &'static str;

    /// Placeholder tokens (with both `#`) and their values.
    fn placeholders(&self, options: &ViewOptions) -> Vec<(&'static str, String)>;
}

/// Render `entity` with `template`, or its default template when none (or an
/// empty one) is given.
pub fn render<V: View>(entity: &V, options: &ViewOptions, template: Option<&str>) -> String {
    let template = template
        .filter(|t| !t.is_empty())
        .unwrap_or(V::DEFAULT_TEMPLATE);
    render_template(template, &entity.placeholders(options))
}

/// Single-line excerpt: CR and LF become spaces, then the text is cut to
/// `max_chars` characters.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    text.replace(['\r', '\n'], " ").chars().take(max_chars).collect()
}

/// Format an RFC 3339 timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// Unparsable input is returned unchanged.
pub fn format_timestamp(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        })
        .unwrap_or_else(|_| timestamp.to_string())
}

fn or_na(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

fn timestamp_or_na(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        format_timestamp(value)
    }
}

fn url_or_na<E>(url: Result<String, E>) -> String {
    url.unwrap_or_else(|_| NOT_AVAILABLE.to_string())
}

impl View for Post {
    const DEFAULT_TEMPLATE: &'static str = "\
Text (ex.) : #textexcerpt#
Tags       : #tags#
Author     : #autor#
Created at : #created#
Stats      : #likes# Likes #reposts# Reposts, #replys# Replys
Bluesky URL: #blueskyurl#
XRPC URL   : #xrpcurl#
";

    fn placeholders(&self, options: &ViewOptions) -> Vec<(&'static str, String)> {
        let excerpt = if self.text.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            excerpt(&self.text, options.excerpt_length)
        };
        let author = or_na(&self.author.handle);

        vec![
            ("#autor#", author.clone()),
            ("#author#", author),
            ("#authorname#", or_na(&self.author.display_name)),
            ("#text#", or_na(&self.text)),
            ("#textexcerpt#", excerpt),
            ("#created#", timestamp_or_na(&self.created_at)),
            ("#indexedat#", timestamp_or_na(&self.indexed_at)),
            ("#id#", or_na(&self.uri)),
            ("#uri#", or_na(&self.uri)),
            ("#cid#", or_na(&self.cid)),
            ("#tags#", self.tags().join(", ")),
            ("#links#", self.links().join(", ")),
            ("#langs#", self.langs.join(", ")),
            ("#reposts#", self.repost_count.to_string()),
            ("#replys#", self.reply_count.to_string()),
            ("#quotes#", self.quote_count.to_string()),
            ("#likes#", self.like_count.to_string()),
            ("#blueskyurl#", url_or_na(self.public_url())),
            ("#xrpcurl#", api_url_or_na(&self.uri, || self.api_url())),
        ]
    }
}

fn api_url_or_na(id: &str, url: impl FnOnce() -> String) -> String {
    if id.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        url()
    }
}

impl View for FeedEntry {
    const DEFAULT_TEMPLATE: &'static str = "\
Text (ex.) : #textexcerpt#
Tags       : #tags#
Author     : #autor#
Created at : #created#
Reason     : #reason#
Stats      : #likes# Likes #reposts# Reposts, #replys# Replys
Bluesky URL: #blueskyurl#
";

    fn placeholders(&self, options: &ViewOptions) -> Vec<(&'static str, String)> {
        let mut values = vec![
            ("#reason#", self.reason_summary().unwrap_or_else(|| NOT_AVAILABLE.to_string())),
            ("#replyto#", or_na(self.reply_parent_handle().unwrap_or(""))),
            ("#feedcontext#", or_na(&self.feed_context)),
        ];
        values.extend(self.post.placeholders(options));
        values
    }
}

impl View for Profile {
    const DEFAULT_TEMPLATE: &'static str = "\
Handle       : #handle#
Name         : #displayname#
DID          : #did#
Stats        : #followers# Followers, #follows# Follows, #posts# Posts
Created at   : #created#
Bluesky URL  : #blueskyurl#
XRPC URL     : #xrpcurl#
Description  : #description#
";

    fn placeholders(&self, _options: &ViewOptions) -> Vec<(&'static str, String)> {
        let actor = if self.did.is_empty() { &self.handle } else { &self.did };
        vec![
            ("#handle#", or_na(&self.handle)),
            ("#displayname#", or_na(&self.display_name)),
            ("#did#", or_na(&self.did)),
            ("#description#", or_na(&self.description)),
            ("#avatar#", or_na(&self.avatar)),
            ("#banner#", or_na(&self.banner)),
            ("#followers#", self.followers_count.to_string()),
            ("#follows#", self.follows_count.to_string()),
            ("#posts#", self.posts_count.to_string()),
            ("#created#", timestamp_or_na(&self.created_at)),
            ("#indexedat#", timestamp_or_na(&self.indexed_at)),
            ("#blueskyurl#", url_or_na(self.public_url())),
            ("#xrpcurl#", api_url_or_na(actor, || self.api_url())),
        ]
    }
}

impl View for List {
    const DEFAULT_TEMPLATE: &'static str = "\
Name         : #name#
Creator      : #creator#
URI          : #uri#
CID          : #cid#
Avatar       : #avatar#
ListItemCount: #listItemCount#
Bluesky URL  : #blueskyurl#
XRPC URL     : #xrpcurl#
Description  : #description#
";

    fn placeholders(&self, _options: &ViewOptions) -> Vec<(&'static str, String)> {
        vec![
            ("#name#", or_na(&self.name)),
            ("#creator#", or_na(&self.creator.handle)),
            ("#uri#", or_na(&self.uri)),
            ("#cid#", or_na(&self.cid)),
            ("#purpose#", or_na(&self.purpose)),
            ("#indexedat#", timestamp_or_na(&self.indexed_at)),
            ("#description#", or_na(&self.description)),
            ("#listItemCount#", self.list_item_count.to_string()),
            ("#avatar#", or_na(&self.avatar)),
            ("#blueskyurl#", url_or_na(self.public_url())),
            ("#xrpcurl#", api_url_or_na(&self.uri, || self.api_url())),
        ]
    }
}

impl View for ListItem {
    const DEFAULT_TEMPLATE: &'static str = "#handle# (#displayname#) #did#\n";

    fn placeholders(&self, options: &ViewOptions) -> Vec<(&'static str, String)> {
        let mut values = vec![("#uri#", or_na(&self.uri))];
        values.extend(self.subject.placeholders(options));
        values
    }
}

impl View for StarterPack {
    const DEFAULT_TEMPLATE: &'static str = "\
Name         : #recordname#
Description  : #recorddescription#
Created At   : #recordcreatedAt#
Updated At   : #recordupdatedAt#
List AT URI  : #recordlist#
Creator      : #creator#
URI          : #uri#
CID          : #cid#
Bluesky URL  : #blueskyurl#
XRPC URL     : #xrpcurl#
";

    fn placeholders(&self, _options: &ViewOptions) -> Vec<(&'static str, String)> {
        vec![
            ("#creator#", or_na(&self.creator.handle)),
            ("#uri#", or_na(&self.uri)),
            ("#cid#", or_na(&self.cid)),
            ("#recordname#", or_na(&self.record_str("name"))),
            ("#recorddescription#", or_na(&self.record_str("description"))),
            ("#recordcreatedAt#", or_na(&self.record_str("createdAt"))),
            ("#recordupdatedAt#", or_na(&self.record_str("updatedAt"))),
            ("#recordlist#", or_na(&self.record_str("list"))),
            ("#indexedat#", timestamp_or_na(&self.indexed_at)),
            ("#joinedweek#", self.joined_week_count.to_string()),
            ("#joinedalltime#", self.joined_all_time_count.to_string()),
            ("#blueskyurl#", url_or_na(self.public_url())),
            ("#xrpcurl#", api_url_or_na(&self.uri, || self.api_url())),
        ]
    }
}

impl View for Label {
    const DEFAULT_TEMPLATE: &'static str = "\
Label        : #val#
Subject      : #uri#
Source       : #src#
Negated      : #neg#
Created at   : #created#
";

    fn placeholders(&self, _options: &ViewOptions) -> Vec<(&'static str, String)> {
        vec![
            ("#val#", or_na(&self.val)),
            ("#uri#", or_na(&self.uri)),
            ("#cid#", or_na(&self.cid)),
            ("#src#", or_na(&self.src)),
            ("#neg#", self.neg.to_string()),
            ("#created#", timestamp_or_na(&self.cts)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post() -> Post {
        Post::from_json(&json!({
            "uri": "at://did:plc:abc/app.bsky.feed.post/3kpost",
            "author": {"did": "did:plc:abc", "handle": "alice.test"},
            "record": {
                "text": "Line one\r\nLine two #rust",
                "createdAt": "2024-05-01T12:00:00.000Z",
                "facets": [
                    {"features": [{"tag": "rust"}]},
                    {"features": [{"tag": "cli"}]}
                ]
            },
            "likeCount": 5
        }))
    }

    #[test]
    fn test_excerpt_strips_newlines_before_truncating() {
        assert_eq!(excerpt("Hello\nWorld", 5), "Hello");
        assert_eq!(excerpt("a\r\nb", 10), "a  b");
        assert_eq!(excerpt("short", 80), "short");
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        assert_eq!(excerpt("Grüße aus Köln", 5), "Grüße");
    }

    #[test]
    fn test_excerpt_placeholder_respects_options() {
        let rendered = render(
            &Post::from_json(&json!({"record": {"text": "Hello\nWorld"}})),
            &ViewOptions { excerpt_length: 5 },
            Some("[#textexcerpt#]"),
        );
        assert_eq!(rendered, "[Hello]");
    }

    #[test]
    fn test_post_default_template() {
        let rendered = render(&post(), &ViewOptions::default(), None);
        let expected = "\
Text (ex.) : Line one  Line two #rust
Tags       : #rust, #cli
Author     : alice.test
Created at : 2024-05-01 12:00:00 UTC
Stats      : 5 Likes 0 Reposts, 0 Replys
Bluesky URL: https://bsky.app/profile/alice.test/post/3kpost
XRPC URL   : https://public.api.bsky.app/xrpc/app.bsky.feed.getPosts?uris=at%3A%2F%2Fdid%3Aplc%3Aabc%2Fapp.bsky.feed.post%2F3kpost
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_empty_template_uses_default() {
        let options = ViewOptions::default();
        assert_eq!(render(&post(), &options, Some("")), render(&post(), &options, None));
    }

    #[test]
    fn test_missing_values_render_as_fallbacks() {
        let rendered = render(
            &Post::default(),
            &ViewOptions::default(),
            Some("#autor#|#text#|#textexcerpt#|#likes#|#tags#|#blueskyurl#|#xrpcurl#|#nope#"),
        );
        assert_eq!(rendered, "N/A|N/A|N/A|0||N/A|N/A|#nope#");
    }

    #[test]
    fn test_post_text_is_not_rescanned_for_tokens() {
        let post = Post::from_json(&json!({"record": {"text": "I got #likes# today"}, "likeCount": 9}));
        assert_eq!(
            render(&post, &ViewOptions::default(), Some("#text# (#likes#)")),
            "I got #likes# today (9)"
        );
    }

    #[test]
    fn test_profile_view() {
        let profile = Profile::from_json(&json!({
            "did": "did:plc:abc",
            "handle": "alice.test",
            "followersCount": 7
        }));
        let rendered = render(
            &profile,
            &ViewOptions::default(),
            Some("#handle# #displayname# #followers# #blueskyurl#"),
        );
        assert_eq!(rendered, "alice.test N/A 7 https://bsky.app/profile/alice.test");
    }

    #[test]
    fn test_list_default_view() {
        let list = List::from_json(&json!({
            "uri": "at://did:plc:abc/app.bsky.graph.list/3klist",
            "name": "Rustaceans",
            "creator": {"handle": "alice.test"},
            "listItemCount": 3
        }));
        let rendered = render(&list, &ViewOptions::default(), None);
        assert!(rendered.starts_with("Name         : Rustaceans\nCreator      : alice.test\n"));
        assert!(rendered.contains("ListItemCount: 3\n"));
        assert!(rendered.contains("Bluesky URL  : https://bsky.app/profile/alice.test/lists/3klist\n"));
        assert!(rendered.ends_with("Description  : N/A\n"));
    }

    #[test]
    fn test_starter_pack_view() {
        let pack = StarterPack::from_json(&json!({
            "uri": "at://did:plc:abc/app.bsky.graph.starterpack/3ksp",
            "creator": {"handle": "alice.test"},
            "record": {"name": "Rust folks"},
            "joinedAllTimeCount": 12
        }));
        let rendered = render(
            &pack,
            &ViewOptions::default(),
            Some("#recordname# / #recorddescription# / #joinedalltime# / #blueskyurl#"),
        );
        assert_eq!(
            rendered,
            "Rust folks / N/A / 12 / https://bsky.app/starter-pack/alice.test/3ksp"
        );
    }

    #[test]
    fn test_feed_entry_view_adds_reason() {
        let entry = FeedEntry::from_json(&json!({
            "post": {"author": {"handle": "alice.test"}, "record": {"text": "hi"}},
            "reason": {"$type": "app.bsky.feed.defs#reasonRepost", "by": {"handle": "bob.test"}}
        }));
        assert_eq!(
            render(&entry, &ViewOptions::default(), Some("#autor#: #text# (#reason#)")),
            "alice.test: hi (Repost by @bob.test)"
        );
    }

    #[test]
    fn test_list_item_view() {
        let item = ListItem::from_json(&json!({
            "uri": "at://x",
            "subject": {"did": "did:plc:bob", "handle": "bob.test", "displayName": "Bob"}
        }));
        assert_eq!(
            render(&item, &ViewOptions::default(), None),
            "bob.test (Bob) did:plc:bob\n"
        );
    }

    #[test]
    fn test_label_view() {
        let label = Label::from_json(&json!({"val": "spam", "uri": "at://x", "src": "did:plc:l"}));
        assert_eq!(
            render(&label, &ViewOptions::default(), Some("#val# on #uri# by #src# (#neg#)")),
            "spam on at://x by did:plc:l (false)"
        );
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2024-05-01T14:00:00+02:00"),
            "2024-05-01 12:00:00 UTC"
        );
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_view_options_from_config() {
        let config = Config::from_json_str(r#"{"excerpt-length": 20}"#).unwrap();
        assert_eq!(ViewOptions::from_config(&config).excerpt_length, 20);
    }
}
