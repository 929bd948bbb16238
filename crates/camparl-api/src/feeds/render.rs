//! Renders a scope-agnostic item list into RSS 2.0 or Atom 1.0 XML.
//!
//! Both builders walk the same `FeedItem` slice so the two formats never
//! drift from each other - there is exactly one place event text is composed.

use atom_syndication::{Entry, EntryBuilder, Feed, FeedBuilder, Link};
use chrono::Utc;
use rss::{Channel, ChannelBuilder, Guid, Item, ItemBuilder};

use super::FeedItem;

#[must_use]
pub fn render_rss(title: &str, link: &str, description: &str, items: &[FeedItem]) -> String {
    let items: Vec<Item> = items
        .iter()
        .map(|it| {
            ItemBuilder::default()
                .title(Some(it.title.clone()))
                .link(Some(it.link.clone()))
                .description(Some(it.description.clone()))
                .guid(Some(Guid { value: it.guid.clone(), permalink: false }))
                .pub_date(Some(it.pub_date.to_rfc2822()))
                .build()
        })
        .collect();

    let channel: Channel = ChannelBuilder::default()
        .title(title.to_string())
        .link(link.to_string())
        .description(description.to_string())
        .items(items)
        .build();
    channel.to_string()
}

#[must_use]
pub fn render_atom(title: &str, link: &str, items: &[FeedItem]) -> String {
    let updated = items.iter().map(|it| it.pub_date).max().unwrap_or_else(Utc::now);

    let entries: Vec<Entry> = items
        .iter()
        .map(|it| {
            EntryBuilder::default()
                .title(it.title.clone())
                .id(it.guid.clone())
                .updated(it.pub_date.fixed_offset())
                .links(vec![Link { href: it.link.clone(), ..Default::default() }])
                .summary(Some(it.description.clone().into()))
                .build()
        })
        .collect();

    let feed: Feed = FeedBuilder::default()
        .title(title.to_string())
        .id(link.to_string())
        .updated(updated.fixed_offset())
        .links(vec![Link { href: link.to_string(), ..Default::default() }])
        .entries(entries)
        .build();
    feed.to_string()
}
