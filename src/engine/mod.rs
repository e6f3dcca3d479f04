//! Inference collaborators consumed by the generation pipeline.
//!
//! The text encoder, sampler, and decoder are opaque numeric transforms. A
//! [`PipelineLoader`] builds all three for one [`PipelineConfig`]; the
//! [`PreviewEngine`] is the loader the binary ships with.

mod preview;

pub use preview::PreviewEngine;

use crate::{Result, pipeline::PipelineConfig};

/// Numeric embedding of a text prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditioning(pub Vec<f32>);

/// Sampler output in channel-major layout (`channels * height * width`).
#[derive(Debug, Clone, PartialEq)]
pub struct Latent {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
    pub data: Vec<f32>,
}

impl Latent {
    pub fn zeros(channels: usize, height: usize, width: usize) -> Self {
        Self {
            channels,
            height,
            width,
            data: vec![0.0; channels * height * width],
        }
    }

    #[inline]
    pub fn at(&self, c: usize, y: usize, x: usize) -> f32 {
        self.data[(c * self.height + y) * self.width + x]
    }
}

pub trait ConditioningEncoder: Send {
    fn encode(&self, text: &str) -> Result<Conditioning>;
}

pub trait Sampler: Send {
    fn sample(
        &self,
        seed: i64,
        steps: i64,
        conditioning: &Conditioning,
        unconditioning: &Conditioning,
    ) -> Result<Latent>;
}

pub trait Decoder: Send {
    /// Returns `height * width * 3` bytes, RGB interleaved.
    fn decode(&self, latent: &Latent) -> Result<Vec<u8>>;
}

/// Construction contract of an inference engine.
pub trait PipelineLoader: Send {
    fn load(&self, config: &PipelineConfig) -> Result<LoadedPipeline>;
}

/// The three live collaborators plus the configuration that produced them.
pub struct LoadedPipeline {
    config: PipelineConfig,
    encoder: Box<dyn ConditioningEncoder>,
    sampler: Box<dyn Sampler>,
    decoder: Box<dyn Decoder>,
}

impl LoadedPipeline {
    pub fn new(
        config: PipelineConfig,
        encoder: Box<dyn ConditioningEncoder>,
        sampler: Box<dyn Sampler>,
        decoder: Box<dyn Decoder>,
    ) -> Self {
        Self {
            config,
            encoder,
            sampler,
            decoder,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn encoder(&self) -> &dyn ConditioningEncoder {
        self.encoder.as_ref()
    }

    pub fn sampler(&self) -> &dyn Sampler {
        self.sampler.as_ref()
    }

    pub fn decoder(&self) -> &dyn Decoder {
        self.decoder.as_ref()
    }
}

impl std::fmt::Debug for LoadedPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
