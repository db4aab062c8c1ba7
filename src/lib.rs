//! toon-episodes - Episode list retrieval for webtoon series.
//!
//! This crate fetches a series' paginated episode list from a content
//! provider, merges in locally tracked read and favorite state and publishes
//! the result through observable channels:
//! - Providers (Kakao Page) behind the [`feed::EpisodeProvider`] trait
//! - Local read/favorite state behind the [`library::Library`] trait
//! - Presentation state in [`service::EpisodeService`]

pub mod config;
pub mod error;
pub mod event;
pub mod feed;
pub mod library;
pub mod logging;
pub mod model;
pub mod service;
