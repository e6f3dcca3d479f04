//! The `sd_txt2img` tool: argument types, validation, and schema.

mod schema;
mod types;
mod validate;

pub use schema::txt2img_tool;
pub use types::{OutputMode, ToolArguments};
pub use validate::{DEFAULT_SIZE, DEFAULT_STEPS, SUPPORTED_SIZES, validate, validate_at};

pub const TOOL_NAME: &str = "sd_txt2img";
