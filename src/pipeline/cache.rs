use super::PipelineConfig;
use crate::{
    Error, Result,
    engine::{LoadedPipeline, PipelineLoader},
};
use tracing::{debug, info};

/// Single-slot cache holding at most one loaded pipeline.
///
/// A configuration change tears the old pipeline down before the new one is
/// built, so two pipelines never coexist.
pub struct PipelineCache {
    loader: Box<dyn PipelineLoader>,
    slot: Option<LoadedPipeline>,
    loads: u64,
}

impl PipelineCache {
    pub fn new(loader: Box<dyn PipelineLoader>) -> Self {
        Self {
            loader,
            slot: None,
            loads: 0,
        }
    }

    /// Returns the pipeline for `config`, loading it if the slot holds a
    /// different configuration or nothing at all.
    ///
    /// On failure the slot is left empty; a later call retries the load.
    pub fn ensure(&mut self, config: &PipelineConfig) -> Result<&LoadedPipeline> {
        let hit = self
            .slot
            .as_ref()
            .is_some_and(|loaded| loaded.config() == config);

        if hit {
            debug!("Pipeline cache hit for {:?}", config);
        } else {
            if let Some(previous) = self.slot.take() {
                info!("Unloading pipeline {:?}", previous.config());
                drop(previous);
            }
            let loaded = self.loader.load(config)?;
            self.loads += 1;
            info!("Pipeline loaded for {:?} (load #{})", config, self.loads);
            self.slot = Some(loaded);
        }

        self.slot
            .as_ref()
            .ok_or_else(|| Error::internal("pipeline slot empty after load"))
    }

    pub fn current(&self) -> Option<&LoadedPipeline> {
        self.slot.as_ref()
    }

    /// Drops the cached pipeline, forcing the next `ensure` to reload.
    pub fn invalidate(&mut self) {
        if self.slot.take().is_some() {
            debug!("Pipeline cache invalidated");
        }
    }

    /// Number of successful loads since construction.
    pub fn load_count(&self) -> u64 {
        self.loads
    }
}
