use super::ServerContext;
use crate::{
    Error, Result, generation, output,
    tool::{self, TOOL_NAME},
};
use serde_json::{Value, json};
use tracing::info;

pub const SERVER_NAME: &str = "sd-mcp";

/// Routes a request (a message with an `id`) to its handler.
pub async fn dispatch(ctx: &mut ServerContext, method: &str, params: &Value) -> Result<Value> {
    match method {
        "initialize" => Ok(handle_initialize(ctx, params)),
        "tools/list" => Ok(handle_tools_list(ctx)),
        "tools/call" => handle_tools_call(ctx, params).await,
        "shutdown" => Ok(Value::Null),
        other => Err(Error::MethodNotFound(other.to_string())),
    }
}

/// Adopts the client's protocol version when it sends one.
pub fn handle_initialize(ctx: &mut ServerContext, params: &Value) -> Value {
    if let Some(version) = params.get("protocolVersion").and_then(Value::as_str) {
        ctx.protocol_version = version.to_string();
    }

    json!({
        "protocolVersion": ctx.protocol_version,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

pub fn handle_tools_list(ctx: &ServerContext) -> Value {
    json!({ "tools": [tool::txt2img_tool(&ctx.default_assets)] })
}

pub async fn handle_tools_call(ctx: &mut ServerContext, params: &Value) -> Result<Value> {
    let params = params
        .as_object()
        .ok_or_else(|| Error::invalid_params("params must be an object"))?;

    let name = params.get("name").and_then(Value::as_str).unwrap_or_default();
    if name != TOOL_NAME {
        return Err(Error::ToolNotFound {
            tool_name: name.to_string(),
        });
    }

    let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
    let args = tool::validate(&arguments, &ctx.default_assets)?;

    info!(
        "sd_txt2img: {}x{} steps={} seed={} mode={} output={}",
        args.width,
        args.height,
        args.steps,
        args.seed,
        args.mode,
        args.output.as_str()
    );

    let generated = generation::generate(&mut ctx.cache, &args)?;
    let result = output::deliver(&generated, &args, &ctx.output_dir).await?;
    Ok(serde_json::to_value(result)?)
}
