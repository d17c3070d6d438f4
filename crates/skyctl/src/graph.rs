//! List and starter pack commands.

use crate::output::{
    print_entities, print_entity, print_header, print_json, print_list_index, render_entity,
};
use crate::prelude::{println, *};
use crate::session::Session;

#[derive(Debug, Clone, clap::Args)]
#[command(after_help = "EXAMPLES:
  # A list and every member, following pagination:
  skyctl list --uri at://did:plc:abc/app.bsky.graph.list/3kxyz

NOTES:
  - Members are fetched page by page until the server stops returning a cursor
  - If a later page fails, the members collected so far are still printed")]
pub struct ListOptions {
    /// AT-URI of the list
    #[arg(long)]
    pub uri: String,

    /// Page size for member requests
    #[arg(short, long)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ListIndexOptions {
    /// Creator DID or handle
    #[arg(long)]
    pub did: String,

    /// Maximum number of lists to fetch
    #[arg(short, long)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ActorStarterPacksOptions {
    /// Creator DID or handle
    #[arg(long)]
    pub did: String,

    /// Maximum number of starter packs to fetch
    #[arg(short, long)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct StarterPacksOptions {
    /// AT-URI of the starter pack (repeatable)
    #[arg(long, required = true)]
    pub uri: Vec<String>,
}

pub async fn list(options: ListOptions, global: crate::Global) -> Result<()> {
    let session = Session::open(&global, false).await?;
    let detail = session.client.get_list(&options.uri, options.limit).await?;

    if session.output.json {
        return print_json(&detail);
    }

    print_entity(&detail.list, &session.output)?;
    print_header(&f!("Members ({})", detail.items.len()));
    for item in &detail.items {
        println!("{}", render_entity(item, &session.output)?.trim_end());
    }
    Ok(())
}

pub async fn list_index(options: ListIndexOptions, global: crate::Global) -> Result<()> {
    let session = Session::open(&global, false).await?;
    let lists = session.client.get_lists(&options.did, options.limit).await?;
    print_list_index(&lists, &session.output)
}

pub async fn actor_starter_packs(
    options: ActorStarterPacksOptions,
    global: crate::Global,
) -> Result<()> {
    let session = Session::open(&global, false).await?;
    let packs = session
        .client
        .actor_starter_packs(&options.did, options.limit)
        .await?;
    print_entities(
        &f!("Starter packs by {}", options.did),
        &packs,
        &session.output,
    )
}

pub async fn starter_packs(options: StarterPacksOptions, global: crate::Global) -> Result<()> {
    let session = Session::open(&global, false).await?;
    let packs = session.client.starter_packs(&options.uri).await?;
    print_entities("Starter packs", &packs, &session.output)
}
