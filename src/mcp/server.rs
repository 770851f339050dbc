//! MCP server bootstrap and request dispatch.

use std::{borrow::Cow, sync::Arc};

use crate::{
    config::CONFIG,
    mcp::{
        format::{
            MetricsPayload, ProgressPayload, health_payload, json_resource_contents,
            serialize_json,
        },
        handlers::{
            ask::handle_ask, ingest::handle_ingest, metrics::handle_metrics,
            progress::handle_progress, summarize::handle_summarize,
        },
        registry, schemas,
    },
    pipeline::DigestService,
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, ListResourcesResult, ListToolsResult,
        RawResource, ReadResourceRequestParam, ReadResourceResult, Resource, ServerCapabilities,
        ServerInfo, Tool, ToolAnnotations,
    },
};

const HEALTH_URI: &str = "mcp://health";
const USAGE_URI: &str = "mcp://usage";

/// MCP server implementation exposing Paper Digest operations.
#[derive(Clone)]
pub struct PaperDigestMcpServer {
    service: Arc<DigestService>,
    registry: Arc<registry::Registry>,
}

impl PaperDigestMcpServer {
    /// Create a new MCP server using the supplied digest service.
    pub fn new(service: Arc<DigestService>) -> Self {
        let mut registry = registry::Registry::new();
        registry.register_resource(HEALTH_URI, resource_health);
        registry.register_resource(USAGE_URI, resource_usage);

        registry.register_tool("ingest-document", tool_ingest);
        registry.register_tool("summarize-paper", tool_summarize);
        registry.register_tool("summary-progress", tool_progress);
        registry.register_tool("ask-paper", tool_ask);
        registry.register_tool("metrics", tool_metrics);

        Self {
            service,
            registry: Arc::new(registry),
        }
    }

    fn describe_tools(&self) -> Vec<Tool> {
        let doc_id_schema = Arc::new(schemas::doc_id_input_schema());
        vec![
            Tool {
                name: Cow::Borrowed("ingest-document"),
                title: Some("Ingest Document".to_string()),
                description: Some(Cow::Borrowed(
                    "Register extracted paper text for an owner and get back a doc_id; identical text is deduplicated.",
                )),
                input_schema: Arc::new(schemas::ingest_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Ingest Document")
                        .destructive(false)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("summarize-paper"),
                title: Some("Summarize Paper".to_string()),
                description: Some(Cow::Borrowed(
                    "Generate a summary plus three distinct advantages and three distinct limitations for an ingested paper.",
                )),
                input_schema: doc_id_schema.clone(),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Summarize Paper")
                        .destructive(false)
                        .idempotent(false)
                        .open_world(false),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("summary-progress"),
                title: Some("Summary Progress".to_string()),
                description: Some(Cow::Borrowed(
                    "Poll the status and percentage of a running or finished digest.",
                )),
                input_schema: doc_id_schema,
                output_schema: Some(Arc::new(schemas::output_schema::<ProgressPayload>())),
                annotations: Some(
                    ToolAnnotations::with_title("Summary Progress")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("ask-paper"),
                title: Some("Ask Paper".to_string()),
                description: Some(Cow::Borrowed(
                    "Answer a question using the opening of an ingested paper.",
                )),
                input_schema: Arc::new(schemas::ask_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Ask Paper")
                        .read_only(true)
                        .idempotent(false)
                        .open_world(false),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("metrics"),
                title: Some("Metrics Snapshot".to_string()),
                description: Some(Cow::Borrowed(
                    "Check ingestion volume, run outcomes and fallback usage at a glance.",
                )),
                input_schema: Arc::new(schemas::empty_object_schema()),
                output_schema: Some(Arc::new(schemas::output_schema::<MetricsPayload>())),
                annotations: Some(
                    ToolAnnotations::with_title("Metrics Snapshot")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
        ]
    }

    fn describe_resources(&self) -> Vec<Resource> {
        let mut health = RawResource::new(HEALTH_URI, "health");
        health.description = Some("Generator configuration and pipeline counters".into());

        let mut usage = RawResource::new(USAGE_URI, "usage");
        usage.description = Some(
            "Recommended tool flow: ingest-document→summarize-paper, poll summary-progress from another client."
                .into(),
        );

        vec![health.no_annotation(), usage.no_annotation()]
    }
}

fn resource_health(
    server: &PaperDigestMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    let service = server.service.clone();
    Box::pin(async move {
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                HEALTH_URI,
                health_payload(CONFIG.get(), service.metrics_snapshot()),
            )],
        })
    })
}

fn resource_usage(
    _server: &PaperDigestMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    Box::pin(async move {
        let usage = serde_json::json!({
            "title": "Paper Digest MCP Usage",
            "policy": [
                "Send text that has already been extracted from the PDF or DOCX.",
                "Ingest once per paper; identical text from the same owner reuses the doc_id.",
                "summarize-paper runs to completion; use summary-progress from another client to watch it.",
                "A failed run keeps its progress and reports the error; call summarize-paper again to retry.",
            ],
            "flows": [
                {
                    "name": "Digest",
                    "steps": [
                        "ingest-document({ text, filename?, owner_id })",
                        "summarize-paper({ doc_id })",
                        "summary-progress({ doc_id })"
                    ]
                },
                {
                    "name": "Question",
                    "steps": [
                        "ask-paper({ doc_id, question })"
                    ]
                }
            ]
        });
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                USAGE_URI,
                serialize_json(&usage, USAGE_URI),
            )],
        })
    })
}

fn tool_ingest(server: &PaperDigestMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let service = server.service.clone();
    Box::pin(async move { handle_ingest(&service, request.arguments).await })
}

fn tool_summarize(
    server: &PaperDigestMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let service = server.service.clone();
    Box::pin(async move { handle_summarize(&service, request.arguments).await })
}

fn tool_progress(
    server: &PaperDigestMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let service = server.service.clone();
    Box::pin(async move { handle_progress(&service, request.arguments).await })
}

fn tool_ask(server: &PaperDigestMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let service = server.service.clone();
    Box::pin(async move { handle_ask(&service, request.arguments).await })
}

fn tool_metrics(
    server: &PaperDigestMcpServer,
    _request: CallToolRequestParam,
) -> registry::ToolFuture {
    let service = server.service.clone();
    Box::pin(async move { handle_metrics(&service).await })
}

impl ServerHandler for PaperDigestMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = rmcp::model::Implementation::from_build_env();
        implementation.name = "paper-digest".to_string();
        implementation.title = Some("Paper Digest MCP".to_string());
        implementation.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: implementation,
            instructions: Some(
                "Use this server to digest research papers: ingest extracted text, then request a summary with three advantages and three limitations, or ask focused questions about the paper.".into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let resources = self.describe_resources();
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources)))
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = self.describe_tools();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.resource(request.uri.as_str()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown resource URI: {}", request.uri),
                None,
            ))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.tool(request.name.as_ref()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{GenerationError, GenerationParams, Generator};
    use crate::pipeline::DigestSettings;
    use crate::store::{InMemoryDocumentStore, InMemoryRecordStore};
    use async_trait::async_trait;

    struct SilentGenerator;

    #[async_trait]
    impl Generator for SilentGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _params: &GenerationParams,
        ) -> Result<String, GenerationError> {
            Ok(String::new())
        }
    }

    fn server() -> PaperDigestMcpServer {
        PaperDigestMcpServer::new(Arc::new(DigestService::with_components(
            Arc::new(SilentGenerator),
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(InMemoryRecordStore::new()),
            DigestSettings::default(),
        )))
    }

    #[test]
    fn every_described_tool_is_registered() {
        let server = server();
        let tools = server.describe_tools();
        assert_eq!(tools.len(), server.registry.tool_count());
        for tool in tools {
            assert!(
                server.registry.tool(tool.name.as_ref()).is_some(),
                "{} has no handler",
                tool.name
            );
        }
    }

    #[test]
    fn every_described_resource_is_registered() {
        let server = server();
        for resource in server.describe_resources() {
            assert!(server.registry.resource(resource.raw.uri.as_str()).is_some());
        }
    }
}
