/// Integration test harness
///
/// Drives the tools and the MCP server against real storage adapters.

mod basic_integration;
mod mcp_session;
