pub mod bdl_fetch;
pub mod config;
pub mod error;
pub mod feed;
pub mod http_cache;
pub mod http_client;
pub mod logging;
pub mod presentation;
pub mod scoring;
pub mod selection;
pub mod snapshot_fetch;
pub mod stat_normalizer;
pub mod state;
pub mod trend;
