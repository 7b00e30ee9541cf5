//! Terminal client for a civic platform's feeds, listings and events.
//!
//! The crate is split into a network-free core and the TUI built on it:
//!
//! - [`api`] - REST client, wire types and the paged envelope
//! - [`catalog`] - category registry (labels, accents, contextual links)
//! - [`query`] / [`pagination`] - filter state and page window arithmetic
//! - [`media`] / [`normalize`] - turning raw items into display-ready ones
//! - [`controller`] - per-view state machines with stale-result protection
//! - [`app`] / [`ui`] - terminal state and rendering

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod media;
pub mod normalize;
pub mod pagination;
pub mod query;
pub mod theme;
pub mod ui;
pub mod util;
