//! Akihabara
//!
//! Akihabara is the shopping cart behind the Akihabara Manga Store: a persisted, observable cart of
//! manga volumes bought from a paginated catalog, with stock-limited quantities and a simulated checkout.

pub mod cart;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod observability;
pub mod prelude;
pub mod prices;
pub mod receipt;
pub mod storage;
pub mod store;
