use serde::Serialize;
use serde_json::{Map, Value};

/// Incoming JSON-RPC message.
///
/// `id` is `Some` whenever the key is present, including an explicit `null`;
/// `None` marks a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcMessage {
    pub id: Option<Value>,
    pub method: String,
    pub params: Value,
}

impl RpcMessage {
    /// Parses one line. Returns `None` unless it is a JSON object.
    pub fn parse(line: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(line).ok()? {
            Value::Object(object) => Some(Self::from_object(object)),
            _ => None,
        }
    }

    fn from_object(mut object: Map<String, Value>) -> Self {
        let method = object
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self {
            id: object.remove("id"),
            method,
            params: object
                .remove("params")
                .unwrap_or_else(|| Value::Object(Map::new())),
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Outgoing JSON-RPC response; exactly one of `result`/`error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    pub fn from_error(id: Value, err: &crate::Error) -> Self {
        Self::error(id, err.rpc_code(), err.rpc_message())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McpTool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum McpContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image", rename_all = "camelCase")]
    Image { mime_type: String, data: String },
}

impl McpContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn png(data: impl Into<String>) -> Self {
        Self::Image {
            mime_type: "image/png".to_string(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolCallResult {
    pub content: Vec<McpContent>,
    #[serde(rename = "outputPath", skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}
