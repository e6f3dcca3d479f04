use crate::{
    Error, Result, codec,
    generation::GenerationResult,
    server::types::{McpContent, ToolCallResult},
    tool::ToolArguments,
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

/// `<dir>/result_<seed>_<W>x<H>_<timestamp>.png`
pub fn default_output_path(dir: &Path, seed: i64, width: u32, height: u32, timestamp: i64) -> PathBuf {
    dir.join(format!("result_{seed}_{width}x{height}_{timestamp}.png"))
}

/// Writes `bytes` to `path`, creating parent directories as needed.
pub async fn write_png(path: &Path, bytes: &[u8]) -> Result<()> {
    let to_err = |source| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(to_err)?;
    }
    tokio::fs::write(path, bytes).await.map_err(to_err)
}

/// Builds the `tools/call` result for the requested output mode.
///
/// For `both` the file is written first; a write failure fails the whole
/// call.
pub async fn deliver(
    generated: &GenerationResult,
    args: &ToolArguments,
    output_dir: &Path,
) -> Result<ToolCallResult> {
    let mut result = ToolCallResult::default();

    if args.output.wants_file() {
        let path = match &args.out_path {
            Some(p) => PathBuf::from(p),
            None => default_output_path(
                output_dir,
                generated.seed,
                args.width,
                args.height,
                Utc::now().timestamp(),
            ),
        };
        write_png(&path, &generated.png).await?;

        let text = path.to_string_lossy().to_string();
        info!("Saved {} bytes to {}", generated.png.len(), text);
        result.content.push(McpContent::text(text.clone()));
        result.output_path = Some(text);
    }

    if args.output.wants_base64() {
        result
            .content
            .push(McpContent::png(codec::base64_encode(&generated.png)));
    }

    Ok(result)
}
