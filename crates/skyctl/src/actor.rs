//! Profile and label lookups.

use crate::output::{print_entities, print_entity};
use crate::prelude::{println, *};
use crate::session::Session;
use colored::Colorize;

#[derive(Debug, Clone, clap::Args)]
pub struct ProfileOptions {
    /// Actor DID or handle
    #[arg(long)]
    pub did: String,
}

#[derive(Debug, Clone, clap::Args)]
#[command(after_help = "EXAMPLES:
  # Every label a labeler emitted:
  skyctl getByLabel --did did:plc:labeler

  # Labels on the posts of one account:
  skyctl getByLabel --uri 'at://did:plc:abc/*'")]
pub struct LabelOptions {
    /// Subject URI pattern, `*` as a trailing wildcard (repeatable, default `*`)
    #[arg(long)]
    pub uri: Vec<String>,

    /// Labeler DID to restrict to (repeatable)
    #[arg(long)]
    pub did: Vec<String>,

    /// Maximum number of labels to fetch
    #[arg(short, long)]
    pub limit: Option<u32>,
}

pub async fn profile(options: ProfileOptions, global: crate::Global) -> Result<()> {
    let session = Session::open(&global, false).await?;

    match session.client.get_profile(&options.did).await? {
        Some(profile) => print_entity(&profile, &session.output),
        None => {
            println!("{}", f!("Profile {} not found.", options.did).yellow());
            Ok(())
        }
    }
}

pub async fn labels(options: LabelOptions, global: crate::Global) -> Result<()> {
    let session = Session::open(&global, false).await?;
    let labels = session
        .client
        .query_labels(&options.uri, &options.did, options.limit)
        .await?;
    print_entities("Labels", &labels, &session.output)
}
