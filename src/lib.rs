//! Win rate, KDA, MVP share and rank progress for a locally stored match
//! history.

pub mod analysis;
pub mod config;
pub mod display;
pub mod error;
pub mod hub;
pub mod refresh;
pub mod store;
pub mod watch;
