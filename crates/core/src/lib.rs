//! Core library for skyctl
//!
//! This crate implements the **Functional Core** of the skyctl Bluesky client,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`skyctl_core`** (this crate): entity mapping, views, URL derivation,
//!   query building, paging and filtering, with zero I/O
//! - **`skyctl`**: HTTP transport, configuration files and the CLI (the
//!   Imperative Shell)
//!
//! Every function here takes already-decoded JSON (or plain values) and
//! returns plain values, so it can be tested with fixture data and no mocking.
//!
//! # Module Organization
//!
//! - [`profile`], [`post`], [`list`], [`starter_pack`], [`feed`], [`label`]:
//!   entity mappers over XRPC response objects
//! - [`uri`]: AT-URI parsing and public/API URL derivation
//! - [`template`], [`view`]: `#placeholder#` rendering of entities
//! - [`search`]: `searchPosts` parameter building and response validation
//! - [`paging`]: cursor-driven page accumulation
//! - [`filter`]: the post filter pipeline
//! - [`config`]: read-only configuration lookups
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use skyctl_core::post::Post;
//! use skyctl_core::view::{render, ViewOptions};
//!
//! let post = Post::from_json(&serde_json::json!({
//!     "uri": "at://did:plc:abc/app.bsky.feed.post/3kpost",
//!     "author": {"handle": "alice.test"},
//!     "record": {"text": "Hello"}
//! }));
//!
//! let line = render(&post, &ViewOptions::default(), Some("#autor#: #text#"));
//! assert_eq!(line, "alice.test: Hello");
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod fields;
pub mod filter;
pub mod label;
pub mod list;
pub mod paging;
pub mod post;
pub mod profile;
pub mod search;
pub mod starter_pack;
pub mod template;
pub mod uri;
pub mod view;

pub use error::CoreError;
