use sd_mcp::{
    Error, Result,
    engine::{Conditioning, ConditioningEncoder, Decoder, Latent, LoadedPipeline, PipelineLoader, Sampler},
    pipeline::PipelineConfig,
};
use std::sync::{Arc, Mutex};

/// Everything the mock engine was asked to do.
#[derive(Debug, Default)]
pub struct EngineLog {
    pub loads: Vec<PipelineConfig>,
    pub encoded: Vec<String>,
    pub samples: Vec<(i64, i64)>,
    pub decodes: usize,
}

#[derive(Debug, Default)]
pub struct EngineFaults {
    pub fail_load: Option<String>,
    pub fail_sample: Option<String>,
    pub panic_on_sample: bool,
    pub short_decode: bool,
}

/// Mock inference engine that records calls and can inject failures.
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    pub log: Arc<Mutex<EngineLog>>,
    pub faults: Arc<Mutex<EngineFaults>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_load_error(self, error: &str) -> Self {
        self.faults.lock().unwrap().fail_load = Some(error.to_string());
        self
    }

    pub fn with_sample_error(self, error: &str) -> Self {
        self.faults.lock().unwrap().fail_sample = Some(error.to_string());
        self
    }

    pub fn with_sample_panic(self) -> Self {
        self.faults.lock().unwrap().panic_on_sample = true;
        self
    }

    pub fn with_short_decode(self) -> Self {
        self.faults.lock().unwrap().short_decode = true;
        self
    }

    pub fn clear_faults(&self) {
        *self.faults.lock().unwrap() = EngineFaults::default();
    }

    pub fn load_count(&self) -> usize {
        self.log.lock().unwrap().loads.len()
    }

    pub fn loads(&self) -> Vec<PipelineConfig> {
        self.log.lock().unwrap().loads.clone()
    }

    pub fn encoded(&self) -> Vec<String> {
        self.log.lock().unwrap().encoded.clone()
    }

    pub fn samples(&self) -> Vec<(i64, i64)> {
        self.log.lock().unwrap().samples.clone()
    }

    /// True if any collaborator was touched (load or inference).
    pub fn was_invoked(&self) -> bool {
        let log = self.log.lock().unwrap();
        !log.loads.is_empty() || !log.encoded.is_empty() || !log.samples.is_empty() || log.decodes > 0
    }
}

impl PipelineLoader for MockEngine {
    fn load(&self, config: &PipelineConfig) -> Result<LoadedPipeline> {
        self.log.lock().unwrap().loads.push(config.clone());
        if let Some(ref error) = self.faults.lock().unwrap().fail_load {
            return Err(Error::config(error.clone()));
        }

        let part = MockPart {
            engine: self.clone(),
            width: config.width as usize,
            height: config.height as usize,
        };
        Ok(LoadedPipeline::new(
            config.clone(),
            Box::new(part.clone()),
            Box::new(part.clone()),
            Box::new(part),
        ))
    }
}

#[derive(Clone)]
struct MockPart {
    engine: MockEngine,
    width: usize,
    height: usize,
}

impl ConditioningEncoder for MockPart {
    fn encode(&self, text: &str) -> Result<Conditioning> {
        self.engine.log.lock().unwrap().encoded.push(text.to_string());
        Ok(Conditioning(vec![text.len() as f32; 8]))
    }
}

impl Sampler for MockPart {
    fn sample(
        &self,
        seed: i64,
        steps: i64,
        _conditioning: &Conditioning,
        _unconditioning: &Conditioning,
    ) -> Result<Latent> {
        self.engine.log.lock().unwrap().samples.push((seed, steps));
        let faults = self.engine.faults.lock().unwrap();
        if faults.panic_on_sample {
            drop(faults);
            panic!("sampler exploded");
        }
        if let Some(ref error) = faults.fail_sample {
            return Err(Error::inference(error.clone()));
        }
        Ok(Latent::zeros(4, self.height / 8, self.width / 8))
    }
}

impl Decoder for MockPart {
    fn decode(&self, _latent: &Latent) -> Result<Vec<u8>> {
        self.engine.log.lock().unwrap().decodes += 1;
        let mut len = self.width * self.height * 3;
        if self.engine.faults.lock().unwrap().short_decode {
            len -= 3;
        }
        Ok((0..len).map(|i| (i % 251) as u8).collect())
    }
}
