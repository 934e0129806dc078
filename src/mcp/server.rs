/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests, one per line
/// 2. Processes tool calls against the habit tracker
/// 3. Writes JSON-RPC responses, one per line

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::storage::HabitStorage;
use crate::tools::{self, ToolError};
use crate::{HabitTrackerServer, ServerError};

/// Names of the tools this server exposes
pub const TOOL_NAMES: [&str; 5] = [
    "habit_list",
    "habit_create",
    "habit_update",
    "habit_delete",
    "habit_toggle",
];

/// MCP server that handles communication with a client
pub struct McpServer<S: HabitStorage> {
    /// The underlying habit tracker server
    habit_tracker: HabitTrackerServer<S>,
    /// Whether the client has completed the initialize handshake
    initialized: bool,
}

impl<S: HabitStorage> McpServer<S> {
    /// Create a new MCP server
    pub fn new(habit_tracker: HabitTrackerServer<S>) -> Self {
        Self {
            habit_tracker,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve requests read from `reader` until it is exhausted
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let raw: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        let id = raw.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected malformed request: {}", e);
                return Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                    None,
                ));
            }
        };

        if request.is_notification() {
            self.handle_notification(&request.method);
            return None;
        }

        Some(self.handle_request(request))
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("MCP client initialized");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    /// Handle a JSON-RPC request
    fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.unwrap_or(Value::Null);

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, json!({}))
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");
        self.initialized = true;

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Strike Habit Tracker".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, &result)
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let definitions = [
            ToolDefinition::new::<tools::ListHabitsParams>(
                "habit_list",
                "List all habits with today's progress, current streak and completed history dates",
            ),
            ToolDefinition::new::<tools::CreateHabitParams>(
                "habit_create",
                "Create a new regular, quantifiable or inverse habit",
            ),
            ToolDefinition::new::<tools::UpdateHabitParams>(
                "habit_update",
                "Update fields of an existing habit",
            ),
            ToolDefinition::new::<tools::DeleteHabitParams>(
                "habit_delete",
                "Delete a habit and all of its logs",
            ),
            ToolDefinition::new::<tools::ToggleHabitParams>(
                "habit_toggle",
                "Toggle today's progress: count up, add an amount, or mark an inverse habit as slipped",
            ),
        ];

        match definitions.into_iter().collect::<Result<Vec<_>, _>>() {
            Ok(tools) => JsonRpcResponse::success(id, json!({ "tools": tools })),
            Err(e) => internal_error(id, e),
        }
    }

    /// Handle tools/call request
    fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let call: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(call)) => call,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        if !self.initialized {
            warn!("Tool '{}' called before initialization", call.name);
        }

        let arguments = call.arguments.unwrap_or_else(|| json!({}));
        let outcome = match call.name.as_str() {
            "habit_list" => parse_arguments(&call.name, arguments).map(|p| self.call_habit_list(p)),
            "habit_create" => parse_arguments(&call.name, arguments).map(|p| self.call_habit_create(p)),
            "habit_update" => parse_arguments(&call.name, arguments).map(|p| self.call_habit_update(p)),
            "habit_delete" => parse_arguments(&call.name, arguments).map(|p| self.call_habit_delete(p)),
            "habit_toggle" => parse_arguments(&call.name, arguments).map(|p| self.call_habit_toggle(p)),
            other => Err(format!("Unknown tool: {}", other)),
        };

        let result = match outcome {
            Ok(Ok(text)) => ToolCallResult::success(text),
            Ok(Err(e)) => {
                error!(
                    "Tool '{}' failed (code {}): {}",
                    call.name,
                    tool_error_code(&e),
                    e
                );
                ToolCallResult::error(e.to_string())
            }
            Err(message) => {
                return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, message, None);
            }
        };

        respond(id, &result)
    }

    /// Call the habit_list tool
    fn call_habit_list(&self, params: tools::ListHabitsParams) -> Result<String, ToolError> {
        let tracker = &self.habit_tracker;
        let response = tools::list_habits(tracker.storage(), tracker.engine(), params, tracker.today())?;

        let message = if response.habits.is_empty() {
            "No habits found. Create your first habit to get started!".to_string()
        } else {
            format!(
                "📋 {} habits, {} completed today, longest streak {} days",
                response.summary.total_habits,
                response.summary.completed_today,
                response.summary.longest_current_streak
            )
        };
        render(&message, &response.habits)
    }

    /// Call the habit_create tool
    fn call_habit_create(&self, params: tools::CreateHabitParams) -> Result<String, ToolError> {
        let tracker = &self.habit_tracker;
        let response = tools::create_habit(tracker.storage(), params, tracker.now())?;
        render(&format!("{}\nHabit ID: {}", response.message, response.habit_id), &response.habit)
    }

    /// Call the habit_update tool
    fn call_habit_update(&self, params: tools::UpdateHabitParams) -> Result<String, ToolError> {
        let response = tools::update_habit(self.habit_tracker.storage(), params)?;
        render(&response.message, &response.habit)
    }

    /// Call the habit_delete tool
    fn call_habit_delete(&self, params: tools::DeleteHabitParams) -> Result<String, ToolError> {
        let response = tools::delete_habit(self.habit_tracker.storage(), params)?;
        Ok(response.message)
    }

    /// Call the habit_toggle tool
    fn call_habit_toggle(&self, params: tools::ToggleHabitParams) -> Result<String, ToolError> {
        let tracker = &self.habit_tracker;
        let response = tools::toggle_habit(tracker.storage(), tracker.engine(), params, tracker.today())?;
        render(&response.message, &response)
    }
}

fn parse_arguments<P: DeserializeOwned>(tool: &str, arguments: Value) -> Result<P, String> {
    serde_json::from_value(arguments).map_err(|e| format!("Invalid arguments for {}: {}", tool, e))
}

/// Human readable message followed by the JSON payload
fn render<T: Serialize>(message: &str, payload: &T) -> Result<String, ToolError> {
    Ok(format!("{}\n\n{}", message, serde_json::to_string_pretty(payload)?))
}

fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => internal_error(id, e),
    }
}

fn internal_error(id: Value, e: serde_json::Error) -> JsonRpcResponse {
    error!("Failed to encode response: {}", e);
    JsonRpcResponse::error(
        id,
        error_codes::INTERNAL_ERROR,
        format!("Failed to encode response: {}", e),
        None,
    )
}
