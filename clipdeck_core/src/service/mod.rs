pub mod account_sets;
pub mod posts;
pub mod videos;
