mod cache;
mod types;

pub use cache::PipelineCache;
pub use types::PipelineConfig;
