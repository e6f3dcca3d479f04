use super::TOOL_NAME;
use super::validate::{DEFAULT_SIZE, DEFAULT_STEPS, SUPPORTED_SIZES};
use crate::server::types::McpTool;
use serde_json::json;

/// Descriptor advertised by `tools/list`.
pub fn txt2img_tool(default_assets: &str) -> McpTool {
    McpTool {
        name: TOOL_NAME.to_string(),
        description: "Stable Diffusion text-to-image. Returns image/png as base64.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "prompt": {"type": "string", "description": "Positive prompt"},
                "negative_prompt": {"type": "string", "description": "Negative prompt", "default": ""},
                "width": {"type": "integer", "enum": SUPPORTED_SIZES, "default": DEFAULT_SIZE},
                "height": {"type": "integer", "enum": SUPPORTED_SIZES, "default": DEFAULT_SIZE},
                "steps": {"type": "integer", "minimum": 1, "maximum": 50, "default": DEFAULT_STEPS},
                "seed": {"type": "integer", "description": "0 picks a seed from the current time", "default": 0},
                "mode": {"type": "integer", "enum": [0, 1], "default": 0},
                "assets_location": {"type": "string", "default": default_assets},
                "output": {"type": "string", "enum": ["base64", "file", "both"], "default": "base64"},
                "out_path": {
                    "type": "string",
                    "description": "When output includes file: write png to this path (optional)"
                }
            },
            "required": ["prompt"]
        }),
    }
}
