//! Client-side post filtering
//!
//! Three stages run in order, each on the survivors of the previous one:
//!
//! 1. **User block**: author handle is listed in `block-user` (exact,
//!    case-sensitive).
//! 2. **Pattern block**: text matches any `block-patterns` entry. Patterns
//!    are compiled once: a valid regular expression is used as one, anything
//!    else is matched as a literal substring.
//! 3. **Hashtag cloud** (when `rules.hashtagcloud` is set): text is nothing
//!    but `#tags` around at most one URL.
//!
//! Filtering never fails and never touches its input.

use crate::error::CoreError;
use crate::post::Post;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#\w+$").unwrap());
// Full URLs, or the shortened `host.tld/path...` text the web client inserts.
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://\S+|(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,}(?:/\S*)?)$").unwrap()
});

/// Filter specification as stored in the filter file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(rename = "block-user", default)]
    pub block_user: Vec<String>,
    #[serde(rename = "block-patterns", default)]
    pub block_patterns: Vec<String>,
    #[serde(default)]
    pub rules: FilterRules,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRules {
    #[serde(default)]
    pub hashtagcloud: bool,
}

impl FilterSpec {
    pub fn from_json_str(input: &str) -> Result<Self, CoreError> {
        serde_json::from_str(input).map_err(|e| CoreError::Config(format!("invalid filter spec: {e}")))
    }

    pub fn is_empty(&self) -> bool {
        self.block_user.is_empty() && self.block_patterns.is_empty() && !self.rules.hashtagcloud
    }
}

/// A block pattern, decided once at load time.
#[derive(Debug, Clone)]
pub enum BlockPattern {
    Regex(Regex),
    Literal(String),
}

impl BlockPattern {
    /// Compile `pattern` as a regular expression, or keep it as a literal
    /// substring when it does not compile. Flags go inline (`(?i)giveaway`).
    pub fn parse(pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(re) => BlockPattern::Regex(re),
            Err(_) => BlockPattern::Literal(pattern.to_string()),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            BlockPattern::Regex(re) => re.is_match(text),
            BlockPattern::Literal(needle) => text.contains(needle.as_str()),
        }
    }
}

/// Whether `text` consists only of hashtags around at most one URL.
///
/// Grammar, over whitespace-separated tokens of the trimmed text:
/// `#tag* url? #tag*`. Blank text is not a cloud.
pub fn is_hashtag_cloud(text: &str) -> bool {
    let mut tokens = text.split_whitespace().peekable();
    if tokens.peek().is_none() {
        return false;
    }

    let mut seen_url = false;
    for token in tokens {
        if HASHTAG.is_match(token) {
            continue;
        }
        if !seen_url && URL.is_match(token) {
            seen_url = true;
            continue;
        }
        return false;
    }
    true
}

/// Number of posts dropped per stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    #[serde(rename = "blockeduserposts")]
    pub blocked_user_posts: usize,
    #[serde(rename = "blockedpatterns")]
    pub blocked_patterns: usize,
    #[serde(rename = "blockedhashcloud")]
    pub blocked_hash_cloud: usize,
    /// Sum of all stages.
    pub blocked: usize,
}

/// Kept posts plus per-stage counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOutcome {
    pub posts: Vec<Post>,
    pub counts: FilterCounts,
}

/// A compiled [`FilterSpec`].
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    blocked_users: HashSet<String>,
    patterns: Vec<BlockPattern>,
    hashtag_cloud: bool,
}

impl PostFilter {
    /// Compile a spec. Blank handles and patterns are ignored.
    pub fn new(spec: &FilterSpec) -> Self {
        Self {
            blocked_users: spec
                .block_user
                .iter()
                .filter(|h| !h.is_empty())
                .cloned()
                .collect(),
            patterns: spec
                .block_patterns
                .iter()
                .filter(|p| !p.is_empty())
                .map(|p| BlockPattern::parse(p))
                .collect(),
            hashtag_cloud: spec.rules.hashtagcloud,
        }
    }

    pub fn patterns(&self) -> &[BlockPattern] {
        &self.patterns
    }

    fn is_blocked_user(&self, post: &Post) -> bool {
        self.blocked_users.contains(post.author.handle.as_str())
    }

    fn matches_pattern(&self, post: &Post) -> bool {
        self.patterns.iter().any(|p| p.is_match(&post.text))
    }

    fn is_cloud(&self, post: &Post) -> bool {
        self.hashtag_cloud && is_hashtag_cloud(&post.text)
    }

    /// Run the three stages over `posts`.
    pub fn apply(&self, posts: &[Post]) -> FilterOutcome {
        let mut kept: Vec<&Post> = posts.iter().collect();
        let mut counts = FilterCounts::default();

        counts.blocked_user_posts = run_stage(&mut kept, |p| self.is_blocked_user(p));
        counts.blocked_patterns = run_stage(&mut kept, |p| self.matches_pattern(p));
        counts.blocked_hash_cloud = run_stage(&mut kept, |p| self.is_cloud(p));
        counts.blocked =
            counts.blocked_user_posts + counts.blocked_patterns + counts.blocked_hash_cloud;

        FilterOutcome {
            posts: kept.into_iter().cloned().collect(),
            counts,
        }
    }
}

/// Drop every post matching `blocked`; returns how many were dropped.
fn run_stage(kept: &mut Vec<&Post>, blocked: impl Fn(&Post) -> bool) -> usize {
    let before = kept.len();
    kept.retain(|post| !blocked(*post));
    before - kept.len()
}

/// Filter `posts` with `spec`.
pub fn filter_posts(posts: &[Post], spec: &FilterSpec) -> FilterOutcome {
    PostFilter::new(spec).apply(posts)
}
