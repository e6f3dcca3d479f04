use crate::{
    Error, Result, codec,
    pipeline::PipelineCache,
    tool::ToolArguments,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Encoded image plus the seed the sampler actually ran with.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub png: Vec<u8>,
    pub seed: i64,
}

/// Runs conditioning, sampling, decoding and PNG encoding for one request.
///
/// A panic inside the inference engine is reported as [`Error::Inference`]
/// and empties the cache so the next request reloads from scratch.
pub fn generate(cache: &mut PipelineCache, args: &ToolArguments) -> Result<GenerationResult> {
    match panic::catch_unwind(AssertUnwindSafe(|| run(cache, args))) {
        Ok(result) => result,
        Err(payload) => {
            cache.invalidate();
            let message = panic_message(payload.as_ref());
            warn!("Inference engine panicked: {}", message);
            Err(Error::inference(format!("inference engine panicked: {message}")))
        }
    }
}

fn run(cache: &mut PipelineCache, args: &ToolArguments) -> Result<GenerationResult> {
    let config = args.pipeline_config();
    let pipeline = cache.ensure(&config)?;

    let cond = pipeline.encoder().encode(&args.prompt)?;
    let uncond = pipeline.encoder().encode(&args.negative_prompt)?;
    let latent = pipeline
        .sampler()
        .sample(args.seed, args.steps, &cond, &uncond)?;
    let rgb = pipeline.decoder().decode(&latent)?;

    let expected = args.width as usize * args.height as usize * 3;
    if rgb.len() != expected {
        return Err(Error::inference(format!(
            "decoder returned {} bytes, expected {}",
            rgb.len(),
            expected
        )));
    }

    let png = codec::encode_png(&rgb, args.width, args.height)?;
    debug!(
        "Generated {}x{} image ({} bytes) with seed {}",
        args.width,
        args.height,
        png.len(),
        args.seed
    );

    Ok(GenerationResult {
        png,
        seed: args.seed,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
