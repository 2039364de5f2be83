//! Client surface: queue actions, run the batch, collect outcomes.

mod builder;
mod core;

pub use builder::ClientBuilder;
pub use core::Client;
