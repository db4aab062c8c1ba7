pub mod episode_service;
pub mod error;

pub use episode_service::EpisodeService;
