//! Dispatch tables for tool and resource handlers.
//!
//! Handlers are plain function pointers that clone what they need out of the server and return a
//! boxed future, so the tables stay `Send + Sync` without any locking.

use std::{collections::HashMap, future::Future, pin::Pin};

use rmcp::ErrorData as McpError;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, ReadResourceRequestParam, ReadResourceResult,
};

use super::server::PaperDigestMcpServer;

/// Boxed future returned by resource handlers.
pub type ResourceFuture =
    Pin<Box<dyn Future<Output = Result<ReadResourceResult, McpError>> + Send>>;
/// Boxed future returned by tool handlers.
pub type ToolFuture = Pin<Box<dyn Future<Output = Result<CallToolResult, McpError>> + Send>>;

pub type ResourceHandler = fn(&PaperDigestMcpServer, ReadResourceRequestParam) -> ResourceFuture;
pub type ToolHandler = fn(&PaperDigestMcpServer, CallToolRequestParam) -> ToolFuture;

/// Resource URIs and tool names mapped to their handlers.
#[derive(Default)]
pub struct Registry {
    resources: HashMap<&'static str, ResourceHandler>,
    tools: HashMap<&'static str, ToolHandler>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_resource(&mut self, uri: &'static str, handler: ResourceHandler) {
        if self.resources.insert(uri, handler).is_some() {
            tracing::warn!(uri, "Resource handler registered twice; keeping the latest");
        }
    }

    pub fn register_tool(&mut self, name: &'static str, handler: ToolHandler) {
        if self.tools.insert(name, handler).is_some() {
            tracing::warn!(tool = name, "Tool handler registered twice; keeping the latest");
        }
    }

    pub fn resource(&self, uri: &str) -> Option<ResourceHandler> {
        self.resources.get(uri).copied()
    }

    pub fn tool(&self, name: &str) -> Option<ToolHandler> {
        self.tools.get(name).copied()
    }

    #[cfg(test)]
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}
