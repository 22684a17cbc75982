pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod line_item_dedup;
pub mod order;
pub mod order_dedup;
pub mod pipeline;
pub mod service;
pub mod snapshot;
pub mod utils;

pub use pipeline::{Resolver, get_filtered_collector_editions};
