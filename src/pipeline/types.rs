/// A fully specified, loadable inference configuration.
///
/// Equality is structural over all four fields and is the cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub assets_location: String,
    pub height: u32,
    pub width: u32,
    pub mode: i64,
}
