use sd_mcp::{
    config::Config,
    engine::PipelineLoader,
    server::{McpServer, ServerContext},
};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Scratch directories for assets and generated outputs.
pub struct TestDirs {
    pub assets: TempDir,
    pub outputs: TempDir,
}

impl TestDirs {
    pub fn new() -> Self {
        Self {
            assets: tempfile::tempdir().expect("Failed to create assets dir"),
            outputs: tempfile::tempdir().expect("Failed to create outputs dir"),
        }
    }

    pub fn assets_path(&self) -> String {
        self.assets.path().to_string_lossy().to_string()
    }
}

/// Create a test configuration pointing at the scratch directories
pub fn create_test_config(dirs: &TestDirs) -> Config {
    let mut config = Config::default();
    config.server.assets_dir = dirs.assets_path();
    config.server.output_dir = dirs.outputs.path().to_path_buf();
    config
}

pub fn create_server(dirs: &TestDirs, loader: Box<dyn PipelineLoader>) -> McpServer {
    McpServer::new(ServerContext::new(&create_test_config(dirs), loader))
}

/// Feeds `input` to the server and returns every response line, parsed.
pub async fn run_session(server: &mut McpServer, input: &str) -> Vec<Value> {
    run_raw_session(server, input.as_bytes()).await
}

/// Like `run_session`, for input that is not valid UTF-8.
pub async fn run_raw_session(server: &mut McpServer, input: &[u8]) -> Vec<Value> {
    let mut output: Vec<u8> = Vec::new();
    server
        .serve(input, &mut output)
        .await
        .expect("serve failed");

    String::from_utf8(output)
        .expect("output is not utf-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("response line is not JSON"))
        .collect()
}

/// Builds one `tools/call` line for `sd_txt2img`.
pub fn tool_call(id: Value, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": "sd_txt2img", "arguments": arguments}
    })
    .to_string()
}

pub fn request(id: Value, method: &str, params: Value) -> String {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}).to_string()
}

pub fn notification(method: &str) -> String {
    json!({"jsonrpc": "2.0", "method": method}).to_string()
}

pub fn lines(messages: &[String]) -> String {
    let mut input = messages.join("\n");
    input.push('\n');
    input
}

pub fn error_code(response: &Value) -> i64 {
    response["error"]["code"]
        .as_i64()
        .unwrap_or_else(|| panic!("expected error response, got {response}"))
}
