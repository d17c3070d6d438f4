use crate::client::BskyClient;
use crate::config::{load_config, load_filter_spec, Credentials};
use crate::output::{print_filter_counts, OutputOptions};
use crate::prelude::*;
use crate::transport::HttpTransport;
use log::{debug, info};
use skyctl_core::feed::{filter_feed, Feed};
use skyctl_core::filter::{FilterCounts, FilterOutcome, PostFilter};
use skyctl_core::post::Post;
use skyctl_core::view::ViewOptions;
use std::path::PathBuf;

/// Filtering flags shared by every command that prints posts.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FilterArgs {
    /// Drop posts matching the filter spec (blocked users, patterns, hashtag clouds)
    #[arg(long)]
    pub filter: bool,

    /// Filter spec file, overrides the `filter-file` config key
    #[arg(long, env = "SKYCTL_FILTER_FILE")]
    pub filter_file: Option<PathBuf>,
}

/// A configured client plus output settings for one invocation.
pub struct Session {
    pub client: BskyClient<HttpTransport>,
    pub output: OutputOptions,
}

impl Session {
    /// Load configuration and build the client. With `login`, a session is
    /// opened when credentials are available.
    pub async fn open(global: &crate::Global, login: bool) -> Result<Self> {
        let config = load_config(global.config.as_deref())?;
        let transport = HttpTransport::new(config.service_base_url(), global.verbose)?;

        let output = OutputOptions {
            json: global.json,
            rawdata: global.rawdata,
            template: global.template.clone(),
            view: ViewOptions::from_config(&config),
        };

        let credentials =
            Credentials::resolve(global.username.clone(), global.password.clone(), &config);
        let mut client = BskyClient::new(transport, config);

        match credentials {
            Some(credentials) if login => {
                client
                    .login(&credentials.identifier, &credentials.password)
                    .await?;
            }
            None if login => info!("no credentials configured, continuing without a session"),
            _ => {}
        }

        Ok(Self { client, output })
    }

    /// Compile the filter spec when `--filter` is set.
    pub fn load_filter(&self, args: &FilterArgs) -> Result<Option<PostFilter>> {
        if !args.filter {
            return Ok(None);
        }

        let path = args
            .filter_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.client.config().filter_file()));
        let spec = load_filter_spec(&path)?;
        Ok(Some(PostFilter::new(&spec)))
    }

    /// Log the filter counts, and print them unless the output is JSON.
    pub fn report_filter_counts(&self, counts: &FilterCounts) {
        debug!(
            "filter dropped {} posts (users: {}, patterns: {}, hashtag clouds: {})",
            counts.blocked,
            counts.blocked_user_posts,
            counts.blocked_patterns,
            counts.blocked_hash_cloud
        );
        if !self.output.json {
            print_filter_counts(counts);
        }
    }

    /// Apply the filter spec to `posts` when `--filter` is set.
    pub fn filter_posts(&self, posts: Vec<Post>, args: &FilterArgs) -> Result<Vec<Post>> {
        let Some(filter) = self.load_filter(args)? else {
            return Ok(posts);
        };

        let FilterOutcome { posts, counts } = filter.apply(&posts);
        self.report_filter_counts(&counts);
        Ok(posts)
    }

    /// Apply the filter spec to a feed's entries when `--filter` is set.
    pub fn filter_feed(&self, feed: Feed, args: &FilterArgs) -> Result<Feed> {
        let Some(filter) = self.load_filter(args)? else {
            return Ok(feed);
        };

        let (feed, counts) = filter_feed(feed, &filter);
        self.report_filter_counts(&counts);
        Ok(feed)
    }
}
