//! JSON-RPC protocol engine over line-delimited stdio.
//!
//! One message per line is read, handled to completion, and answered with
//! exactly one line before the next line is read. Requests always get a
//! response carrying their `id`; notifications never do, and the `exit`
//! notification ends the loop.

pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::{self, Config},
    engine::{PipelineLoader, PreviewEngine},
    pipeline::PipelineCache,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};
use types::{JsonRpcResponse, RpcMessage};

/// State threaded through every handler.
pub struct ServerContext {
    pub cache: PipelineCache,
    pub default_assets: String,
    pub output_dir: PathBuf,
    pub protocol_version: String,
}

impl ServerContext {
    pub fn new(config: &Config, loader: Box<dyn PipelineLoader>) -> Self {
        Self {
            cache: PipelineCache::new(loader),
            default_assets: config.server.assets_dir.clone(),
            output_dir: config.server.output_dir.clone(),
            protocol_version: config.server.protocol_version.clone(),
        }
    }
}

pub struct McpServer {
    ctx: ServerContext,
}

impl McpServer {
    pub fn new(ctx: ServerContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ServerContext {
        &self.ctx
    }

    /// Serves until end of input or an `exit` notification.
    ///
    /// Only transport failures (reading input, writing output) end the loop
    /// with an error.
    pub async fn serve<R, W>(&mut self, mut reader: R, writer: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                info!("Input closed, shutting down");
                break;
            }

            let Ok(line) = std::str::from_utf8(&buf) else {
                debug!("Skipping line with invalid UTF-8 ({} bytes)", buf.len());
                continue;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some(message) = RpcMessage::parse(line) else {
                debug!("Failed to parse message: {}", line);
                continue;
            };

            let Some(id) = message.id.clone() else {
                if message.method == "exit" {
                    info!("Received exit notification");
                    break;
                }
                debug!("Ignoring notification: {}", message.method);
                continue;
            };

            debug!("Handling request {} ({})", id, message.method);
            let response =
                match handlers::dispatch(&mut self.ctx, &message.method, &message.params).await {
                    Ok(result) => JsonRpcResponse::success(id, result),
                    Err(e) => {
                        warn!("Request {} ({}) failed: {}", id, message.method, e);
                        JsonRpcResponse::from_error(id, &e)
                    }
                };
            write_response(writer, &response).await?;
        }

        Ok(())
    }
}

/// Runs the server on stdin/stdout with the built-in preview engine.
pub async fn run(config: Config) -> Result<()> {
    let num_threads = config::resolve_num_threads(&config.engine);
    let ctx = ServerContext::new(&config, Box::new(PreviewEngine::new(num_threads)));
    let mut server = McpServer::new(ctx);

    info!(
        "sd-mcp serving on stdio (assets: {}, outputs: {})",
        config.server.assets_dir,
        config.server.output_dir.display()
    );

    let reader = BufReader::new(tokio::io::stdin());
    let mut writer = tokio::io::stdout();
    server.serve(reader, &mut writer).await
}

/// Writes one response line and flushes it.
async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> Result<()> {
    let mut line = serde_json::to_string(response)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
