use super::types::{OutputMode, ToolArguments};
use crate::{Error, Result};
use chrono::Utc;
use serde_json::{Map, Value};

pub const DEFAULT_SIZE: i64 = 256;
pub const DEFAULT_STEPS: i64 = 15;
pub const SUPPORTED_SIZES: [i64; 2] = [256, 512];

/// Validates `arguments`, resolving a zero seed from the current clock.
pub fn validate(arguments: &Value, default_assets: &str) -> Result<ToolArguments> {
    validate_at(arguments, default_assets, Utc::now().timestamp())
}

/// Same as [`validate`] with the clock reading supplied by the caller.
pub fn validate_at(arguments: &Value, default_assets: &str, now: i64) -> Result<ToolArguments> {
    let args = arguments
        .as_object()
        .ok_or_else(|| Error::invalid_params("arguments must be an object"))?;

    let prompt = string_or(args, "prompt", "");
    if prompt.is_empty() {
        return Err(Error::invalid_params("prompt is required"));
    }

    let output = OutputMode::parse(&string_or(args, "output", OutputMode::default().as_str()))
        .ok_or_else(|| Error::invalid_params("output must be one of: base64, file, both"))?;

    let height = int_or(args, "height", DEFAULT_SIZE);
    let width = int_or(args, "width", DEFAULT_SIZE);
    if !SUPPORTED_SIZES.contains(&height) || !SUPPORTED_SIZES.contains(&width) {
        return Err(Error::invalid_params(
            "height/width only support 256 or 512 currently",
        ));
    }

    let assets_location = args
        .get("assets_location")
        .and_then(Value::as_str)
        .or_else(|| args.get("assets_dir").and_then(Value::as_str))
        .unwrap_or(default_assets)
        .to_string();

    let seed = match int_or(args, "seed", 0) {
        0 => now,
        seed => seed,
    };

    let out_path = Some(string_or(args, "out_path", "")).filter(|p| !p.is_empty());

    Ok(ToolArguments {
        prompt,
        negative_prompt: string_or(args, "negative_prompt", ""),
        width: width as u32,
        height: height as u32,
        steps: int_or(args, "steps", DEFAULT_STEPS),
        seed,
        mode: int_or(args, "mode", 0),
        assets_location,
        output,
        out_path,
    })
}

fn string_or(args: &Map<String, Value>, key: &str, default: &str) -> String {
    args.get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// Integers are taken as-is, floats are truncated, anything else is `default`.
fn int_or(args: &Map<String, Value>, key: &str, default: i64) -> i64 {
    match args.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(default),
        _ => default,
    }
}
