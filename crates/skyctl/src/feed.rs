//! Commands that print posts: timelines, author feeds, single posts and search.

use crate::output::{print_entities, print_json};
use crate::prelude::{println, *};
use crate::session::{FilterArgs, Session};
use serde::Serialize;
use skyctl_core::feed::Feed;
use skyctl_core::search::{build_search_params, SearchQuery};

#[derive(Debug, Clone, clap::Args)]
#[command(after_help = "EXAMPLES:
  # Home timeline of the logged-in account:
  skyctl timeline --limit 20

  # Hide blocked users and hashtag spam:
  skyctl timeline --filter --filter-file ~/.config/skyctl/filter.json")]
pub struct TimelineOptions {
    /// Maximum number of entries to fetch
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Cursor returned by a previous call
    #[arg(long)]
    pub cursor: Option<String>,

    #[clap(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, Clone, clap::Args)]
#[command(after_help = "EXAMPLES:
  # Feed of an account by handle or DID:
  skyctl getFeed --did alice.bsky.social

  # Feed of the account configured as `timeline-did`:
  skyctl autorfeed")]
pub struct AuthorFeedOptions {
    /// Actor DID or handle; defaults to the `timeline-did` config key
    #[arg(long)]
    pub did: Option<String>,

    /// Maximum number of entries to fetch
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Cursor returned by a previous call
    #[arg(long)]
    pub cursor: Option<String>,

    #[clap(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct GetPostOptions {
    /// AT-URI of the post (repeatable)
    #[arg(long, required = true)]
    pub uri: Vec<String>,

    #[clap(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, Clone, clap::Args)]
#[command(after_help = "EXAMPLES:
  # Posts mentioning rust, in German:
  skyctl search --q rust --lang de

  # Posts tagged #rustlang, newest first:
  skyctl searchPosts --q rust --tag rustlang --sort latest

NOTES:
  - Unset options fall back to `query-defaults.searchPosts` in the config file
  - Search needs a session (BSKY_USERNAME / BSKY_PASSWORD)")]
pub struct SearchOptions {
    /// Search string
    #[arg(long)]
    pub q: Option<String>,

    /// Maximum number of posts to return
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Restrict to posts in this language (ISO 639 code)
    #[arg(long)]
    pub lang: Option<String>,

    /// Restrict to posts with this hashtag (repeatable, `#` optional)
    #[arg(long)]
    pub tag: Vec<String>,

    /// `top` or `latest`
    #[arg(long)]
    pub sort: Option<String>,

    /// Restrict to posts by this actor
    #[arg(long)]
    pub author: Option<String>,

    /// Cursor returned by a previous call
    #[arg(long)]
    pub cursor: Option<String>,

    #[clap(flatten)]
    pub filter: FilterArgs,
}

impl From<&SearchOptions> for SearchQuery {
    fn from(options: &SearchOptions) -> Self {
        Self {
            q: options.q.clone(),
            limit: options.limit,
            lang: options.lang.clone(),
            tag: options.tag.clone(),
            cursor: options.cursor.clone(),
            sort: options.sort.clone(),
            author: options.author.clone(),
        }
    }
}

fn print_feed(session: &Session, title: &str, feed: &Feed) -> Result<()> {
    if session.output.json {
        return print_json(feed);
    }
    print_entities(title, &feed.entries, &session.output)?;
    if !feed.cursor.is_empty() {
        println!("Next page: --cursor {}", feed.cursor);
    }
    Ok(())
}

pub async fn timeline(options: TimelineOptions, global: crate::Global) -> Result<()> {
    let session = Session::open(&global, true).await?;
    let feed = session.client.timeline(options.limit, options.cursor).await?;
    let feed = session.filter_feed(feed, &options.filter)?;
    print_feed(&session, "Timeline", &feed)
}

pub async fn author_feed(options: AuthorFeedOptions, global: crate::Global) -> Result<()> {
    let session = Session::open(&global, true).await?;

    let actor = options
        .did
        .clone()
        .or_else(|| session.client.config().timeline_did().map(str::to_string))
        .ok_or_eyre("No actor given: pass --did or set `timeline-did` in the config file")?;

    let feed = session
        .client
        .author_feed(&actor, options.limit, options.cursor)
        .await?;
    let feed = session.filter_feed(feed, &options.filter)?;
    print_feed(&session, &f!("Feed of {actor}"), &feed)
}

pub async fn get_post(options: GetPostOptions, global: crate::Global) -> Result<()> {
    let session = Session::open(&global, false).await?;
    let posts = session.client.get_posts(&options.uri).await?;
    let posts = session.filter_posts(posts, &options.filter)?;
    print_entities("Posts", &posts, &session.output)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchOutput<'a> {
    q: &'a str,
    hits_total: u64,
    cursor: &'a str,
    posts: &'a [skyctl_core::post::Post],
}

pub async fn search(options: SearchOptions, global: crate::Global) -> Result<()> {
    let query = SearchQuery::from(&options);
    // Reject a missing `q` before logging in.
    build_search_params(&query, &Default::default())?;

    let session = Session::open(&global, true).await?;
    let result = session.client.search(&query).await?;
    let posts = session.filter_posts(result.posts, &options.filter)?;

    if session.output.json {
        return print_json(&SearchOutput {
            q: query.q.as_deref().unwrap_or_default(),
            hits_total: result.hits_total,
            cursor: &result.cursor,
            posts: &posts,
        });
    }

    print_entities(
        &f!("Search results ({} hits)", result.hits_total),
        &posts,
        &session.output,
    )?;
    if !result.cursor.is_empty() {
        println!("Next page: --cursor {}", result.cursor);
    }
    Ok(())
}
