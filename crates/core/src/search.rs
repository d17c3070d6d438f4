//! Full-text post search: query building and response validation

use crate::config::{merge_query_defaults, QueryParams};
use crate::error::CoreError;
use crate::fields::{as_object, coerce_count, require_array, string_field};
use crate::post::Post;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied search parameters. Only `q` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<u32>,
    pub lang: Option<String>,
    #[serde(default)]
    pub tag: Vec<String>,
    pub cursor: Option<String>,
    pub sort: Option<String>,
    pub author: Option<String>,
}

/// Result of one search call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Opaque pagination token, empty when the server sent none.
    pub cursor: String,
    pub hits_total: u64,
    pub posts: Vec<Post>,
}

/// Build the wire parameters for `app.bsky.feed.searchPosts`.
///
/// Fails with [`CoreError::InvalidArgument`] when `q` is missing or blank.
/// Defaults only fill keys the caller left unset.
pub fn build_search_params(
    query: &SearchQuery,
    defaults: &Map<String, Value>,
) -> Result<QueryParams, CoreError> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| CoreError::InvalidArgument("search query `q` is required".to_string()))?;

    let mut params: QueryParams = vec![("q".to_string(), q.to_string())];

    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    if let Some(lang) = query.lang.as_deref().filter(|l| !l.is_empty()) {
        params.push(("lang".to_string(), lang.to_string()));
    }
    for tag in query.tag.iter().filter(|t| !t.is_empty()) {
        params.push(("tag".to_string(), tag.trim_start_matches('#').to_string()));
    }
    if let Some(cursor) = query.cursor.as_deref().filter(|c| !c.is_empty()) {
        params.push(("cursor".to_string(), cursor.to_string()));
    }
    if let Some(sort) = query.sort.as_deref().filter(|s| !s.is_empty()) {
        params.push(("sort".to_string(), sort.to_string()));
    }
    if let Some(author) = query.author.as_deref().filter(|a| !a.is_empty()) {
        params.push(("author".to_string(), author.to_string()));
    }

    Ok(merge_query_defaults(params, defaults))
}

/// Validate and map a search response.
///
/// A missing `posts` list is a shape violation; an empty one is a normal,
/// empty result. `hitsTotal` falls back to the number of returned posts.
pub fn parse_search_response(response: &Value) -> Result<SearchResult, CoreError> {
    let posts: Vec<Post> = require_array(response, "posts")?
        .iter()
        .map(Post::from_json)
        .collect();

    let data = as_object(response);
    let hits_total = data
        .get("hitsTotal")
        .filter(|v| !v.is_null())
        .map(coerce_count)
        .unwrap_or(posts.len() as u64);

    Ok(SearchResult {
        cursor: string_field(data, "cursor"),
        hits_total,
        posts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(q: &str) -> SearchQuery {
        SearchQuery {
            q: Some(q.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_query_is_invalid_argument() {
        let defaults = Map::new();
        for q in [None, Some(""), Some("   ")] {
            let search = SearchQuery {
                q: q.map(str::to_string),
                ..Default::default()
            };
            assert!(matches!(
                build_search_params(&search, &defaults),
                Err(CoreError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_caller_values_override_defaults() {
        let defaults = json!({"limit": 25, "lang": "de", "sort": "latest"});
        let search = SearchQuery {
            limit: Some(10),
            tag: vec!["#rust".to_string(), "".to_string(), "cli".to_string()],
            ..query("ferris")
        };

        let params = build_search_params(&search, defaults.as_object().unwrap()).unwrap();
        assert_eq!(
            params,
            vec![
                ("q".to_string(), "ferris".to_string()),
                ("limit".to_string(), "10".to_string()),
                ("tag".to_string(), "rust".to_string()),
                ("tag".to_string(), "cli".to_string()),
                ("lang".to_string(), "de".to_string()),
                ("sort".to_string(), "latest".to_string()),
            ]
        );
    }

    #[test]
    fn test_zero_results_is_not_an_error() {
        let result = parse_search_response(&json!({"posts": []})).unwrap();
        assert_eq!(result.hits_total, 0);
        assert!(result.posts.is_empty());
        assert_eq!(result.cursor, "");
    }

    #[test]
    fn test_missing_posts_is_invalid_shape() {
        assert!(matches!(
            parse_search_response(&json!({"hitsTotal": 3})),
            Err(CoreError::InvalidResponseShape(_))
        ));
        assert!(parse_search_response(&Value::Null).is_err());
    }

    #[test]
    fn test_hits_total_falls_back_to_post_count() {
        let result = parse_search_response(&json!({
            "posts": [{"record": {"text": "a"}}, {"record": {"text": "b"}}],
            "cursor": "25"
        }))
        .unwrap();
        assert_eq!(result.hits_total, 2);
        assert_eq!(result.cursor, "25");
        assert_eq!(result.posts[1].text, "b");
    }

    #[test]
    fn test_hits_total_from_server() {
        let result = parse_search_response(&json!({"posts": [], "hitsTotal": "1500"})).unwrap();
        assert_eq!(result.hits_total, 1500);
    }
}
