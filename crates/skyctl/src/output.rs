use crate::prelude::{println, *};
use colored::Colorize;
use serde::Serialize;
use skyctl_core::feed::FeedEntry;
use skyctl_core::fields::RawData;
use skyctl_core::filter::FilterCounts;
use skyctl_core::label::Label;
use skyctl_core::list::{List, ListItem};
use skyctl_core::post::Post;
use skyctl_core::profile::Profile;
use skyctl_core::starter_pack::StarterPack;
use skyctl_core::view::{render, View, ViewOptions};

/// How results are printed.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub json: bool,
    pub rawdata: bool,
    pub template: Option<String>,
    pub view: ViewOptions,
}

/// Anything the CLI prints: rendered through a template, serialized with
/// `--json`, and its unmapped fields shown with `--rawdata`.
pub trait Printable: View + Serialize {
    fn raw(&self) -> &RawData;
}

impl Printable for Post {
    fn raw(&self) -> &RawData {
        self.raw_data()
    }
}

impl Printable for FeedEntry {
    fn raw(&self) -> &RawData {
        self.raw_data()
    }
}

impl Printable for Profile {
    fn raw(&self) -> &RawData {
        self.raw_data()
    }
}

impl Printable for List {
    fn raw(&self) -> &RawData {
        self.raw_data()
    }
}

impl Printable for ListItem {
    fn raw(&self) -> &RawData {
        self.subject.raw_data()
    }
}

impl Printable for StarterPack {
    fn raw(&self) -> &RawData {
        self.raw_data()
    }
}

impl Printable for Label {
    fn raw(&self) -> &RawData {
        self.raw_data()
    }
}

pub fn print_json<S: Serialize + ?Sized>(value: &S) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_header(title: &str) {
    println!("{}", title.bold().cyan());
    println!();
}

/// Text rendering of one entity, raw data included when asked for.
pub fn render_entity<P: Printable>(item: &P, options: &OutputOptions) -> Result<String> {
    let mut out = render(item, &options.view, options.template.as_deref());
    if options.rawdata && !item.raw().is_empty() {
        out.push_str(&f!(
            "{}\n{}\n",
            "Raw data:".dimmed(),
            serde_json::to_string_pretty(item.raw())?
        ));
    }
    Ok(out)
}

pub fn print_entity<P: Printable>(item: &P, options: &OutputOptions) -> Result<()> {
    if options.json {
        return print_json(item);
    }
    println!("{}", render_entity(item, options)?);
    Ok(())
}

pub fn print_entities<P: Printable>(title: &str, items: &[P], options: &OutputOptions) -> Result<()> {
    if options.json {
        return print_json(items);
    }

    print_header(&f!("{title} ({})", items.len()));
    if items.is_empty() {
        println!("{}", "Nothing found.".yellow());
        return Ok(());
    }
    for item in items {
        println!("{}", render_entity(item, options)?);
    }
    Ok(())
}

pub fn print_filter_counts(counts: &FilterCounts) {
    if counts.blocked == 0 {
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Filter".bold().cyan(), "Blocked".bold().cyan()]);
    table.add_row(prettytable::row!["Blocked users", counts.blocked_user_posts]);
    table.add_row(prettytable::row!["Blocked patterns", counts.blocked_patterns]);
    table.add_row(prettytable::row!["Hashtag clouds", counts.blocked_hash_cloud]);
    table.add_row(prettytable::row!["Total".bold(), counts.blocked.to_string().bold()]);
    table.printstd();
    println!();
}

/// Compact table of lists for `listindex`.
pub fn print_list_index(lists: &[List], options: &OutputOptions) -> Result<()> {
    if options.json {
        return print_json(lists);
    }

    print_header(&f!("Lists ({})", lists.len()));
    let mut table = new_table();
    table.add_row(prettytable::row![
        "Name".bold().cyan(),
        "Members".bold().cyan(),
        "Purpose".bold().cyan(),
        "URI".bold().cyan()
    ]);
    for list in lists {
        let purpose = list.purpose.rsplit('#').next().unwrap_or_default();
        table.add_row(prettytable::row![
            list.name.green(),
            list.list_item_count,
            purpose,
            list.uri
        ]);
    }
    table.printstd();
    Ok(())
}
