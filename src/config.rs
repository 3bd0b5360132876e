use crate::api::TokenSource;
use anyhow::Result;
use clap::Parser;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TOOL_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_HTTP_TIMEOUT_MS: u64 = 20_000;
const DEFAULT_MAX_RESPONSE_BYTES: u64 = 1_000_000;
const DEFAULT_DOCS_API_BASE: &str = "https://docs.googleapis.com";
const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
const DEFAULT_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// When set, only tools named here are served.
    pub enabled_tools: Option<HashSet<String>>,
    pub tool_timeout_ms: Option<u64>,
    pub max_response_bytes: Option<u64>,
    pub http_timeout_ms: u64,
    pub docs_api_base: String,
    pub sheets_api_base: String,
    /// Env var holding the bearer token; ignored when `token_file` is set.
    pub token_env: String,
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Parser)]
#[command(name = "workspace-mcp", version, about)]
pub struct CliArgs {
    /// Comma-separated allowlist of tool names to serve.
    #[arg(long, env = "WORKSPACE_MCP_ENABLED_TOOLS", value_delimiter = ',')]
    pub enabled_tools: Option<Vec<String>>,

    /// Per-tool timeout in milliseconds; 0 disables the timeout.
    #[arg(long, env = "WORKSPACE_MCP_TOOL_TIMEOUT_MS", default_value_t = DEFAULT_TOOL_TIMEOUT_MS)]
    pub tool_timeout_ms: u64,

    /// Response size cap in bytes; 0 disables the cap.
    #[arg(long, env = "WORKSPACE_MCP_MAX_RESPONSE_BYTES", default_value_t = DEFAULT_MAX_RESPONSE_BYTES)]
    pub max_response_bytes: u64,

    /// HTTP request timeout for remote API calls, in milliseconds.
    #[arg(long, env = "WORKSPACE_MCP_HTTP_TIMEOUT_MS", default_value_t = DEFAULT_HTTP_TIMEOUT_MS)]
    pub http_timeout_ms: u64,

    /// Base URL for the Docs API (override for testing).
    #[arg(long, env = "WORKSPACE_MCP_DOCS_API_BASE", default_value = DEFAULT_DOCS_API_BASE)]
    pub docs_api_base: String,

    /// Base URL for the Sheets API (override for testing).
    #[arg(long, env = "WORKSPACE_MCP_SHEETS_API_BASE", default_value = DEFAULT_SHEETS_API_BASE)]
    pub sheets_api_base: String,

    /// Env var to read the OAuth bearer token from.
    #[arg(long, env = "WORKSPACE_MCP_TOKEN_ENV", default_value = DEFAULT_TOKEN_ENV)]
    pub token_env: String,

    /// File to read the OAuth bearer token from instead of the env var.
    /// An external refresher may rewrite it at any time; it is re-read on
    /// every request.
    #[arg(long, env = "WORKSPACE_MCP_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let enabled_tools = args.enabled_tools.map(|tools| {
            tools
                .into_iter()
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect::<HashSet<_>>()
        });

        anyhow::ensure!(
            !args.docs_api_base.trim().is_empty() && !args.sheets_api_base.trim().is_empty(),
            "API base URLs must not be empty"
        );

        Ok(Self {
            enabled_tools,
            tool_timeout_ms: (args.tool_timeout_ms > 0).then_some(args.tool_timeout_ms),
            max_response_bytes: (args.max_response_bytes > 0).then_some(args.max_response_bytes),
            http_timeout_ms: args.http_timeout_ms.max(1),
            docs_api_base: args.docs_api_base,
            sheets_api_base: args.sheets_api_base,
            token_env: args.token_env,
            token_file: args.token_file,
        })
    }

    pub fn is_tool_enabled(&self, tool: &str) -> bool {
        match &self.enabled_tools {
            Some(enabled) => enabled.contains(&tool.to_ascii_lowercase()),
            None => true,
        }
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_ms.map(Duration::from_millis)
    }

    pub fn max_response_bytes(&self) -> Option<usize> {
        self.max_response_bytes.map(|v| v as usize)
    }

    pub fn token_source(&self) -> TokenSource {
        match &self.token_file {
            Some(path) => TokenSource::File(path.clone()),
            None => TokenSource::Env(self.token_env.clone()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled_tools: None,
            tool_timeout_ms: Some(DEFAULT_TOOL_TIMEOUT_MS),
            max_response_bytes: Some(DEFAULT_MAX_RESPONSE_BYTES),
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            docs_api_base: DEFAULT_DOCS_API_BASE.to_string(),
            sheets_api_base: DEFAULT_SHEETS_API_BASE.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            token_file: None,
        }
    }
}
