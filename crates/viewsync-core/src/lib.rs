//! viewsync core: rate-limited, quota-aware synchronization of video view
//! counts into a local store.

pub mod chunker;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod quota;
pub mod retry;
pub mod runner;
pub mod service;
pub mod store;

