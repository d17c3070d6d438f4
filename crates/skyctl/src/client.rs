//! Bluesky operations over a [`Transport`].
//!
//! Each operation validates its input, merges `query-defaults` from the
//! configuration, performs the call and hands the response to the core
//! mappers. Shape violations and transport failures are returned as errors,
//! except inside the list cursor loop, where they end the loop and keep what
//! was already collected.

use crate::prelude::*;
use crate::transport::Transport;
use log::{debug, info, warn};
use serde_json::{json, Value};
use skyctl_core::config::{merge_query_defaults, Config, QueryParams};
use skyctl_core::feed::{parse_feed_response, Feed};
use skyctl_core::label::{parse_labels_page, Label};
use skyctl_core::list::{parse_list_page, parse_lists_page, List, ListDetail};
use skyctl_core::paging::{CursorLoop, StopReason};
use skyctl_core::post::{parse_posts_response, Post};
use skyctl_core::profile::Profile;
use skyctl_core::search::{build_search_params, parse_search_response, SearchQuery, SearchResult};
use skyctl_core::starter_pack::{parse_starter_packs_page, StarterPack};
use skyctl_core::CoreError;

/// Maximum number of URIs the AppView accepts per `getPosts`/`getStarterPacks` call.
const MAX_URIS_PER_CALL: usize = 25;

pub struct BskyClient<T> {
    transport: T,
    config: Config,
    token: Option<String>,
}

impl<T: Transport> BskyClient<T> {
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            transport,
            config,
            token: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Open a session with `com.atproto.server.createSession`.
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<()> {
        if identifier.trim().is_empty() || password.is_empty() {
            return Err(CoreError::InvalidArgument(
                "identifier and password are required to log in".to_string(),
            )
            .into());
        }

        let body = json!({"identifier": identifier, "password": password});
        let response = self
            .transport
            .post("com.atproto.server.createSession", &body, None)
            .await?;

        let token = response
            .get("accessJwt")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::LoginFailed(f!("no access token returned for {identifier}")))?;

        info!("logged in as {identifier}");
        self.token = Some(token.to_string());
        Ok(())
    }

    fn session(&self, operation: &str) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| {
            Error::AuthenticationRequired(f!(
                "{operation} needs a session; set BSKY_USERNAME and BSKY_PASSWORD"
            ))
            .into()
        })
    }

    async fn get(&self, method: &str, params: QueryParams) -> Result<Value> {
        debug!("{method} {params:?}");
        Ok(self
            .transport
            .get(method, &params, self.token.as_deref())
            .await?)
    }

    fn params_with_defaults(&self, operation: &str, params: QueryParams) -> QueryParams {
        merge_query_defaults(params, &self.config.query_defaults(operation))
    }

    /// Home timeline of the logged-in account.
    pub async fn timeline(&self, limit: Option<u32>, cursor: Option<String>) -> Result<Feed> {
        self.session("getTimeline")?;

        let params = self.params_with_defaults("getTimeline", paging_params(limit, cursor));
        let response = self.get("app.bsky.feed.getTimeline", params).await?;
        Ok(parse_feed_response(&response)?)
    }

    /// Posts and reposts by `actor` (a DID or handle).
    pub async fn author_feed(
        &self,
        actor: &str,
        limit: Option<u32>,
        cursor: Option<String>,
    ) -> Result<Feed> {
        let actor = required("actor", actor)?;
        self.session("getAuthorFeed")?;

        let mut params = vec![("actor".to_string(), actor.to_string())];
        params.extend(paging_params(limit, cursor));
        let params = self.params_with_defaults("getAuthorFeed", params);

        let response = self.get("app.bsky.feed.getAuthorFeed", params).await?;
        Ok(parse_feed_response(&response)?)
    }

    /// Hydrate posts by AT-URI, in batches the AppView accepts.
    pub async fn get_posts(&self, uris: &[String]) -> Result<Vec<Post>> {
        let uris = required_list("uri", uris)?;

        let mut posts = Vec::with_capacity(uris.len());
        for batch in uris.chunks(MAX_URIS_PER_CALL) {
            let params = batch
                .iter()
                .map(|uri| ("uris".to_string(), uri.clone()))
                .collect();
            let response = self.get("app.bsky.feed.getPosts", params).await?;
            posts.extend(parse_posts_response(&response)?);
        }
        Ok(posts)
    }

    /// Full-text post search.
    ///
    /// A missing `q` fails before anything is sent.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let params = build_search_params(query, &self.config.query_defaults("searchPosts"))?;
        self.session("searchPosts")?;

        let response = self.get("app.bsky.feed.searchPosts", params).await?;
        Ok(parse_search_response(&response)?)
    }

    /// Profile of `actor` (a DID or handle). `None` when the response is not
    /// a profile object.
    pub async fn get_profile(&self, actor: &str) -> Result<Option<Profile>> {
        let actor = required("actor", actor)?;

        let params = vec![("actor".to_string(), actor.to_string())];
        let response = self.get("app.bsky.actor.getProfile", params).await?;
        if !response.is_object() || response.get("did").is_none() {
            return Ok(None);
        }
        Ok(Some(Profile::from_json(&response)))
    }

    /// A list and all of its members, following cursors.
    ///
    /// The first page must succeed. A failure on a later page ends the loop
    /// and the members collected so far are returned.
    pub async fn get_list(&self, uri: &str, limit: Option<u32>) -> Result<ListDetail> {
        let uri = required("list", uri)?;

        let mut header: Option<List> = None;
        let mut pages = CursorLoop::new(None);

        while let Some(cursor) = pages.next_request() {
            let mut params = vec![("list".to_string(), uri.to_string())];
            params.extend(paging_params(limit, cursor.map(str::to_string)));
            let params = self.params_with_defaults("getList", params);

            let page: Result<_> = match self.get("app.bsky.graph.getList", params).await {
                Ok(response) => parse_list_page(&response).map_err(Into::into),
                Err(err) => Err(err),
            };

            match page {
                Ok((list, page)) => {
                    header.get_or_insert(list);
                    pages.accept(page);
                }
                Err(err) if header.is_none() => return Err(err),
                Err(err) => {
                    warn!("getList stopped after {} pages: {err}", pages.pages());
                    pages.fail();
                }
            }
        }

        match pages.stop_reason() {
            Some(StopReason::RepeatedCursor) => warn!("getList: server repeated its cursor"),
            Some(StopReason::PageCap) => warn!("getList: page cap reached, list truncated"),
            _ => {}
        }
        debug!("getList fetched {} pages", pages.pages());

        Ok(ListDetail {
            list: header.unwrap_or_default(),
            items: pages.into_items(),
        })
    }

    /// Lists created by `actor`.
    pub async fn get_lists(&self, actor: &str, limit: Option<u32>) -> Result<Vec<List>> {
        let actor = required("actor", actor)?;

        let mut params = vec![("actor".to_string(), actor.to_string())];
        params.extend(paging_params(limit, None));
        let params = self.params_with_defaults("getLists", params);

        let response = self.get("app.bsky.graph.getLists", params).await?;
        Ok(parse_lists_page(&response)?.items)
    }

    /// Starter packs created by `actor`.
    pub async fn actor_starter_packs(
        &self,
        actor: &str,
        limit: Option<u32>,
    ) -> Result<Vec<StarterPack>> {
        let actor = required("actor", actor)?;

        let mut params = vec![("actor".to_string(), actor.to_string())];
        params.extend(paging_params(limit, None));
        let params = self.params_with_defaults("getActorStarterPacks", params);

        let response = self.get("app.bsky.graph.getActorStarterPacks", params).await?;
        Ok(parse_starter_packs_page(&response)?.items)
    }

    /// Hydrate starter packs by AT-URI.
    pub async fn starter_packs(&self, uris: &[String]) -> Result<Vec<StarterPack>> {
        let uris = required_list("uri", uris)?;

        let mut packs = Vec::with_capacity(uris.len());
        for batch in uris.chunks(MAX_URIS_PER_CALL) {
            let params = batch
                .iter()
                .map(|uri| ("uris".to_string(), uri.clone()))
                .collect();
            let response = self.get("app.bsky.graph.getStarterPacks", params).await?;
            packs.extend(parse_starter_packs_page(&response)?.items);
        }
        Ok(packs)
    }

    /// Labels on subjects matching `uri_patterns` (`*` when empty), optionally
    /// restricted to the labelers in `sources`.
    pub async fn query_labels(
        &self,
        uri_patterns: &[String],
        sources: &[String],
        limit: Option<u32>,
    ) -> Result<Vec<Label>> {
        let mut params: QueryParams = uri_patterns
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| ("uriPatterns".to_string(), p.clone()))
            .collect();
        if params.is_empty() {
            params.push(("uriPatterns".to_string(), "*".to_string()));
        }
        params.extend(
            sources
                .iter()
                .filter(|s| !s.trim().is_empty())
                .map(|s| ("sources".to_string(), s.clone())),
        );
        params.extend(paging_params(limit, None));

        let response = self.get("com.atproto.label.queryLabels", params).await?;
        Ok(parse_labels_page(&response)?.items)
    }
}

fn paging_params(limit: Option<u32>, cursor: Option<String>) -> QueryParams {
    let mut params = QueryParams::new();
    if let Some(limit) = limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
        params.push(("cursor".to_string(), cursor));
    }
    params
}

fn required<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::InvalidArgument(f!("`{name}` is required")).into());
    }
    Ok(value)
}

fn required_list<'a>(name: &str, values: &'a [String]) -> Result<&'a [String]> {
    if values.iter().all(|v| v.trim().is_empty()) {
        return Err(CoreError::InvalidArgument(f!("at least one `{name}` is required")).into());
    }
    Ok(values)
}
