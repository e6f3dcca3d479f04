use super::{Conditioning, ConditioningEncoder, Decoder, Latent, LoadedPipeline, PipelineLoader, Sampler};
use crate::{Error, Result, pipeline::PipelineConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info};

const LATENT_CHANNELS: usize = 4;
const LATENT_SCALE: u32 = 8;
const EMBEDDING_DIM: usize = 64;
const GUIDANCE_SCALE: f32 = 7.5;
/// Share of the guided target in the final latent; the rest is seed noise.
const TARGET_MIX: f32 = 0.6;
const SUPPORTED_MODES: [i64; 2] = [0, 1];

/// Deterministic engine that runs without native model weights.
///
/// Prompts are hashed into embeddings, sampling relaxes seeded noise toward a
/// guided target, and decoding upsamples the latent to RGB. Output depends
/// only on the prompt pair, seed, steps, and configuration.
#[derive(Debug, Clone, Default)]
pub struct PreviewEngine {
    num_threads: usize,
}

impl PreviewEngine {
    /// `num_threads == 0` uses the available parallelism.
    pub fn new(num_threads: usize) -> Self {
        Self { num_threads }
    }
}

impl PipelineLoader for PreviewEngine {
    fn load(&self, config: &PipelineConfig) -> Result<LoadedPipeline> {
        let assets = Path::new(&config.assets_location);
        if !assets.is_dir() {
            return Err(Error::config(format!(
                "assets directory not found: {}",
                assets.display()
            )));
        }
        if !SUPPORTED_MODES.contains(&config.mode) {
            return Err(Error::config(format!("unsupported mode: {}", config.mode)));
        }
        if config.width % LATENT_SCALE != 0 || config.height % LATENT_SCALE != 0 {
            return Err(Error::config(format!(
                "size {}x{} is not a multiple of {}",
                config.width, config.height, LATENT_SCALE
            )));
        }

        info!(
            "Loading preview pipeline from {} ({}x{}, mode {})",
            assets.display(),
            config.width,
            config.height,
            config.mode
        );

        let latent_height = (config.height / LATENT_SCALE) as usize;
        let latent_width = (config.width / LATENT_SCALE) as usize;

        Ok(LoadedPipeline::new(
            config.clone(),
            Box::new(HashEncoder),
            Box::new(NoiseSampler {
                height: latent_height,
                width: latent_width,
                mode: config.mode,
            }),
            Box::new(UpsampleDecoder {
                height: config.height as usize,
                width: config.width as usize,
                num_threads: self.num_threads,
            }),
        ))
    }
}

struct HashEncoder;

impl ConditioningEncoder for HashEncoder {
    fn encode(&self, text: &str) -> Result<Conditioning> {
        let first = Sha256::digest(text.as_bytes());
        let second = Sha256::digest(first.as_slice());
        let values = first
            .iter()
            .chain(second.iter())
            .take(EMBEDDING_DIM)
            .map(|&b| b as f32 / 127.5 - 1.0)
            .collect();
        Ok(Conditioning(values))
    }
}

struct NoiseSampler {
    height: usize,
    width: usize,
    mode: i64,
}

impl Sampler for NoiseSampler {
    fn sample(
        &self,
        seed: i64,
        steps: i64,
        conditioning: &Conditioning,
        unconditioning: &Conditioning,
    ) -> Result<Latent> {
        if conditioning.0.is_empty() || conditioning.0.len() != unconditioning.0.len() {
            return Err(Error::inference(format!(
                "conditioning size mismatch: {} vs {}",
                conditioning.0.len(),
                unconditioning.0.len()
            )));
        }

        let guided: Vec<f32> = conditioning
            .0
            .iter()
            .zip(&unconditioning.0)
            .map(|(c, u)| (u + GUIDANCE_SCALE * (c - u)).clamp(-1.0, 1.0))
            .collect();

        let mut rng = StdRng::seed_from_u64((seed as u64) ^ ((self.mode as u64) << 32));
        let mut latent = Latent::zeros(LATENT_CHANNELS, self.height, self.width);
        let noise: Vec<f32> = (0..latent.data.len())
            .map(|_| rng.gen_range(-1.0f32..=1.0))
            .collect();
        latent.data.copy_from_slice(&noise);

        let steps = steps.max(1) as usize;
        for step in 0..steps {
            let weight = 1.0 / (steps - step + 1) as f32;
            for (i, value) in latent.data.iter_mut().enumerate() {
                let target = TARGET_MIX * guided[i % guided.len()] + (1.0 - TARGET_MIX) * noise[i];
                *value += (target - *value) * weight;
            }
        }

        debug!("Sampled {} steps with seed {}", steps, seed);
        Ok(latent)
    }
}

struct UpsampleDecoder {
    height: usize,
    width: usize,
    num_threads: usize,
}

impl UpsampleDecoder {
    fn worker_count(&self) -> usize {
        let wanted = if self.num_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.num_threads
        };
        wanted.clamp(1, self.height.max(1))
    }

    fn fill_rows(&self, latent: &Latent, rows: &mut [u8], first_row: usize) {
        let row_bytes = self.width * 3;
        for (offset, row) in rows.chunks_mut(row_bytes).enumerate() {
            let ly = ((first_row + offset) / LATENT_SCALE as usize).min(latent.height - 1);
            for (x, pixel) in row.chunks_mut(3).enumerate() {
                let lx = (x / LATENT_SCALE as usize).min(latent.width - 1);
                for (ch, byte) in pixel.iter_mut().enumerate() {
                    let v = latent.at(ch, ly, lx) * 0.5 + 0.5;
                    *byte = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                }
            }
        }
    }
}

impl Decoder for UpsampleDecoder {
    fn decode(&self, latent: &Latent) -> Result<Vec<u8>> {
        if latent.channels < 3
            || latent.height * LATENT_SCALE as usize != self.height
            || latent.width * LATENT_SCALE as usize != self.width
        {
            return Err(Error::inference(format!(
                "latent {}x{}x{} does not match {}x{} output",
                latent.channels, latent.height, latent.width, self.width, self.height
            )));
        }

        let row_bytes = self.width * 3;
        let rows_per_worker = self.height.div_ceil(self.worker_count());
        let mut pixels = vec![0u8; self.height * row_bytes];

        std::thread::scope(|scope| {
            for (index, chunk) in pixels.chunks_mut(rows_per_worker * row_bytes).enumerate() {
                scope.spawn(move || self.fill_rows(latent, chunk, index * rows_per_worker));
            }
        });

        Ok(pixels)
    }
}
