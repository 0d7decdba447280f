pub mod aggregator;
pub mod rank;
pub mod sanitize;
pub mod season_filter;
