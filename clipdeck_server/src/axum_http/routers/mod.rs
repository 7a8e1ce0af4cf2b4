pub mod account_sets;
pub mod dashboard;
pub mod posts;
pub mod videos;
