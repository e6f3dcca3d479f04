use crate::pipeline::PipelineConfig;

/// Where a generated image is delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Base64,
    File,
    Both,
}

impl OutputMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "base64" => Some(Self::Base64),
            "file" => Some(Self::File),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::File => "file",
            Self::Both => "both",
        }
    }

    pub fn wants_file(&self) -> bool {
        matches!(self, Self::File | Self::Both)
    }

    pub fn wants_base64(&self) -> bool {
        matches!(self, Self::Base64 | Self::Both)
    }
}

/// Fully defaulted `sd_txt2img` arguments.
///
/// `seed` is already resolved: a requested seed of 0 has been replaced by the
/// clock value taken when the request was validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArguments {
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub steps: i64,
    pub seed: i64,
    pub mode: i64,
    pub assets_location: String,
    pub output: OutputMode,
    pub out_path: Option<String>,
}

impl ToolArguments {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            assets_location: self.assets_location.clone(),
            height: self.height,
            width: self.width,
            mode: self.mode,
        }
    }
}
