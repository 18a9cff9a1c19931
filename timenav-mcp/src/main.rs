//! Timenav MCP Server
//!
//! Line-delimited JSON-RPC 2.0 over stdio, driving a time-interval picker.
//!
//! Tools:
//! - sizes: List the interval sizes
//! - interval: Describe one interval (or the last completed one)
//! - navigate: Step, jump, zoom out or return to the latest interval
//! - down: List the elapsed finer intervals inside an interval
//! - contains: Check whether an instant falls inside an interval
//!
//! Configuration comes from the environment (see `config`). Logs go to
//! stderr; stdout carries only protocol messages.

mod config;
mod tools;

use std::io::{self, BufRead, Write};
use std::process;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use timenav_core::Clock;
use tracing::{debug, error, info, warn};

use config::ServerConfig;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "timenav";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
pub(crate) struct McpError {
    pub(crate) code: i32,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) data: Option<JsonValue>,
}

impl McpError {
    const PARSE_ERROR: i32 = -32700;
    const METHOD_NOT_FOUND: i32 = -32601;
    const INVALID_PARAMS: i32 = -32602;

    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub(crate) fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_PARAMS, message)
    }
}

impl McpResponse {
    fn reply(id: Option<JsonValue>, result: Result<JsonValue, McpError>) -> Self {
        let (result, error) = match result {
            Ok(r) => (Some(r), None),
            Err(e) => (None, Some(e)),
        };
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result,
            error,
        }
    }
}

fn main() {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("timenav-mcp: {}", e);
            process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(io::stderr)
        .init();

    let clock = config.clock();
    info!(
        version = SERVER_VERSION,
        protocol = PROTOCOL_VERSION,
        pinned_now = ?config.now,
        "Timenav MCP server started"
    );

    let stdin = io::stdin();
    if let Err(e) = serve(stdin.lock(), io::stdout(), clock.as_ref()) {
        error!(error = %e, "I/O failure, stopping");
    }

    info!("Server shutting down");
}

/// Answer one request per input line until EOF
fn serve<R: BufRead, W: Write>(mut reader: R, mut writer: W, clock: &dyn Clock) -> io::Result<()> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            debug!("Client disconnected (EOF)");
            return Ok(());
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: McpRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Unparseable request");
                let error = McpError::new(McpError::PARSE_ERROR, format!("Parse error: {}", e));
                write_response(&mut writer, &McpResponse::reply(None, Err(error)))?;
                continue;
            }
        };

        debug!(method = %request.method, "Processing");
        let response = handle_request(clock, &request);

        // Notifications (no id) get no response
        if request.id.is_none() {
            debug!(method = %request.method, "Notification processed");
            continue;
        }
        write_response(&mut writer, &response)?;
    }
}

fn write_response<W: Write>(writer: &mut W, response: &McpResponse) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writeln!(writer)?;
    writer.flush()
}

fn handle_request(clock: &dyn Clock, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => Ok(handle_initialize(&request.params)),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => Ok(tools::tools_list()),
        "tools/call" => handle_tool_call(clock, &request.params),

        _ => Err(McpError::new(
            McpError::METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        )),
    };

    if let Err(e) = &result {
        debug!(method = %request.method, code = e.code, message = %e.message, "Request failed");
    }
    McpResponse::reply(request.id.clone(), result)
}

fn handle_initialize(params: &Option<JsonValue>) -> JsonValue {
    let client_info = params
        .as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "Client connected");

    json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Navigate fixed-size time intervals for time-series graphs"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Intervals are identified by a rank (0=year, 1=month, 2=week, 3=day, 4=hour, 5=five minutes) and an anchor instant inside them. Start with 'interval' to get the last completed interval, then use 'navigate' and 'down' to move around. Only fully elapsed intervals report has_been=true."
    })
}

fn handle_tool_call(clock: &dyn Clock, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params
        .as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    tools::call(clock, name, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use timenav_core::{FixedClock, Time};

    fn run(input: &str) -> Vec<JsonValue> {
        let clock = FixedClock::new(Time::from_ymd_hm(2009, 5, 1, 12, 0).unwrap());
        let mut output = Vec::new();
        serve(Cursor::new(input.as_bytes()), &mut output, &clock).unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_initialize_echoes_protocol() {
        let responses = run(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","clientInfo":{"name":"test"}}}"#);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(responses[0]["result"]["serverInfo"]["name"], SERVER_NAME);
    }

    #[test]
    fn test_notifications_get_no_response() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":"a","method":"ping"}"#,
            "\n"
        );
        let responses = run(input);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], "a");
    }

    #[test]
    fn test_tool_call_round_trip() {
        let responses = run(r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"navigate","arguments":{"rank":1,"anchor":"2009-03-15","step":"next"}}}"#);
        assert_eq!(responses[0]["result"]["interval"]["label"], "2009-04");
        assert!(responses[0].get("error").is_none());
    }

    #[test]
    fn test_errors() {
        let input = concat!(
            "not json\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"interval","arguments":{"rank":9}}}"#,
            "\n"
        );
        let responses = run(input);
        let codes: Vec<i64> = responses
            .iter()
            .map(|r| r["error"]["code"].as_i64().unwrap())
            .collect();
        assert_eq!(codes, [-32700, -32601, -32602, -32602]);
        assert!(responses[0]["id"].is_null());
    }
}
