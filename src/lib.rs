pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod output;
pub mod pipeline;
pub mod server;
pub mod tool;

pub use error::{Error, Result};
