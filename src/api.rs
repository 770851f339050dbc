//! HTTP surface for Paper Digest.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /` – Health check plus the list of endpoints.
//! - `POST /documents` – Register already extracted text for an owner. Returns `doc_id`.
//! - `GET /documents/:doc_id?owner_id=` – Fetch one processing record scoped to its owner.
//! - `GET /history?owner_id=` – List an owner's records, newest upload first.
//! - `POST /summaries` – Run the digest pipeline synchronously for `doc_id`.
//! - `GET /summary-progress/:doc_id` – Poll status and progress while a run is in flight.
//! - `POST /ask` – Answer a question from the opening of a document.
//! - `GET /metrics` – Pipeline counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! The HTTP surface shares the same service with the MCP server, so behavior is identical
//! across interfaces. Errors are returned as `{ "error": message }`.

use crate::metrics::MetricsSnapshot;
use crate::pipeline::{DigestApi, DigestError, IngestOutcome, IngestRequest, RunOutcome};
use crate::store::{ProcessingRecord, ProgressSnapshot};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the digest API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: DigestApi + 'static,
{
    Router::new()
        .route("/", get(health))
        .route("/documents", post(ingest_document::<S>))
        .route("/documents/:doc_id", get(get_document::<S>))
        .route("/history", get(get_history::<S>))
        .route("/summaries", post(run_summary::<S>))
        .route("/summary-progress/:doc_id", get(get_progress::<S>))
        .route("/ask", post(ask_question::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Report liveness and the available endpoints.
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "paper-digest",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/documents",
            "/documents/:doc_id",
            "/history",
            "/summaries",
            "/summary-progress/:doc_id",
            "/ask",
            "/metrics",
            "/commands"
        ],
    }))
}

/// Request body for `POST /documents`.
#[derive(Deserialize)]
struct IngestBody {
    /// Already extracted plain text.
    text: String,
    /// Original filename; sanitized before storage.
    #[serde(default)]
    filename: Option<String>,
    /// Uploading user.
    owner_id: String,
}

/// Register a document and its `uploaded` record.
async fn ingest_document<S>(
    State(service): State<Arc<S>>,
    Json(body): Json<IngestBody>,
) -> Result<Json<IngestOutcome>, AppError>
where
    S: DigestApi,
{
    let IngestBody {
        text,
        filename,
        owner_id,
    } = body;
    let outcome = service
        .ingest(IngestRequest {
            text,
            filename,
            owner_id,
        })
        .await?;
    tracing::info!(
        doc_id = %outcome.doc_id,
        deduplicated = outcome.deduplicated,
        "Ingest request completed"
    );
    Ok(Json(outcome))
}

/// Query string carrying the caller's owner id.
#[derive(Deserialize)]
struct OwnerQuery {
    owner_id: String,
}

async fn get_document<S>(
    State(service): State<Arc<S>>,
    Path(doc_id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<ProcessingRecord>, AppError>
where
    S: DigestApi,
{
    let record = service.document(&doc_id, &query.owner_id).await?;
    Ok(Json(record))
}

/// Response body for `GET /history`.
#[derive(Serialize)]
struct HistoryResponse {
    documents: Vec<ProcessingRecord>,
}

async fn get_history<S>(
    State(service): State<Arc<S>>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<HistoryResponse>, AppError>
where
    S: DigestApi,
{
    let documents = service.history(&query.owner_id).await?;
    Ok(Json(HistoryResponse { documents }))
}

/// Request body for `POST /summaries`.
#[derive(Deserialize)]
struct SummaryRequest {
    doc_id: String,
}

/// Run the pipeline to completion and return the final record.
///
/// A failed run answers 500 with both the failure reason and the failed record.
async fn run_summary<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<SummaryRequest>,
) -> Result<Response, AppError>
where
    S: DigestApi,
{
    match service.run(&request.doc_id).await? {
        RunOutcome::Completed(record) => Ok(Json(record).into_response()),
        RunOutcome::Failed { reason, record } => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": reason, "record": record })),
        )
            .into_response()),
    }
}

async fn get_progress<S>(
    State(service): State<Arc<S>>,
    Path(doc_id): Path<String>,
) -> Result<Json<ProgressSnapshot>, AppError>
where
    S: DigestApi,
{
    Ok(Json(service.get_progress(&doc_id).await?))
}

/// Request body for `POST /ask`.
#[derive(Deserialize)]
struct AskRequest {
    doc_id: String,
    question: String,
}

/// Response body for `POST /ask`.
#[derive(Serialize)]
struct AskResponse {
    answer: String,
}

async fn ask_question<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError>
where
    S: DigestApi,
{
    let answer = service.ask(&request.doc_id, &request.question).await?;
    Ok(Json(AskResponse { answer }))
}

/// Return the pipeline counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: DigestApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "ingest",
                method: "POST",
                path: "/documents",
                description: "Register extracted document text for an owner. Identical text from the same owner reuses the existing doc_id.",
                request_example: Some(json!({
                    "text": "Extracted paper text",
                    "filename": "paper.pdf",
                    "owner_id": "user-123"
                })),
            },
            CommandDescriptor {
                name: "document",
                method: "GET",
                path: "/documents/:doc_id?owner_id=",
                description: "Return the processing record of one document owned by the caller.",
                request_example: None,
            },
            CommandDescriptor {
                name: "history",
                method: "GET",
                path: "/history?owner_id=",
                description: "List the caller's documents, newest upload first.",
                request_example: None,
            },
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summaries",
                description: "Generate the summary, three advantages and three limitations for a document. Returns the final record.",
                request_example: Some(json!({ "doc_id": "3f6c..." })),
            },
            CommandDescriptor {
                name: "summary_progress",
                method: "GET",
                path: "/summary-progress/:doc_id",
                description: "Return { \"status\", \"progress\" } for a document.",
                request_example: None,
            },
            CommandDescriptor {
                name: "ask",
                method: "POST",
                path: "/ask",
                description: "Answer a question using the opening of the document.",
                request_example: Some(json!({
                    "doc_id": "3f6c...",
                    "question": "What dataset was used?"
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return pipeline counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

struct AppError(DigestError);

impl AppError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            DigestError::NotFound(_) => StatusCode::NOT_FOUND,
            DigestError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<DigestError> for AppError {
    fn from(inner: DigestError) -> Self {
        Self(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::{create_router, get_commands};
    use crate::metrics::MetricsSnapshot;
    use crate::pipeline::{DigestApi, DigestError, IngestOutcome, IngestRequest, RunOutcome};
    use crate::store::{ProcessingRecord, ProcessingStatus, ProgressSnapshot};
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    #[tokio::test]
    async fn commands_catalog_exposes_summarize_endpoint() {
        let response = get_commands().await;
        let commands = response.0.commands;
        let summarize = commands
            .iter()
            .find(|cmd| cmd.name == "summarize")
            .expect("summarize command present");

        assert_eq!(summarize.method, "POST");
        assert_eq!(summarize.path, "/summaries");
        assert!(summarize.description.contains("advantages"));
        assert!(commands.len() >= 5);
    }

    #[tokio::test]
    async fn ingest_route_forwards_payload() {
        let service = Arc::new(StubDigestService::default());
        let app = create_router(service.clone());

        let response = send(
            app,
            Method::POST,
            "/documents",
            Some(json!({
                "text": "Paper body",
                "filename": "paper.pdf",
                "owner_id": "alice"
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["doc_id"], "doc-1");
        assert_eq!(json["deduplicated"], false);

        let calls = service.ingested.lock().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].text, "Paper body");
        assert_eq!(calls[0].filename.as_deref(), Some("paper.pdf"));
        assert_eq!(calls[0].owner_id, "alice");
    }

    #[tokio::test]
    async fn completed_run_returns_record() {
        let app = create_router(Arc::new(StubDigestService::default()));
        let response = send(app, Method::POST, "/summaries", Some(json!({ "doc_id": "doc-1" }))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "completed");
        assert_eq!(json["progress"], 100);
        assert_eq!(json["advantages"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn failed_run_returns_error_and_record() {
        let app = create_router(Arc::new(StubDigestService::default()));
        let response = send(
            app,
            Method::POST,
            "/summaries",
            Some(json!({ "doc_id": "doc-fail" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "generator offline");
        assert_eq!(json["record"]["status"], "failed");
    }

    #[tokio::test]
    async fn errors_map_to_status_codes() {
        let service = Arc::new(StubDigestService::default());

        let response = send(
            create_router(service.clone()),
            Method::GET,
            "/summary-progress/missing",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("missing"));

        let response = send(
            create_router(service),
            Method::POST,
            "/ask",
            Some(json!({ "doc_id": "doc-1", "question": " " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn progress_and_history_routes_serialize_records() {
        let service = Arc::new(StubDigestService::default());

        let response = send(
            create_router(service.clone()),
            Method::GET,
            "/summary-progress/doc-1",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json, json!({ "status": "processing", "progress": 50 }));

        let response = send(
            create_router(service.clone()),
            Method::GET,
            "/history?owner_id=alice",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["documents"][0]["doc_id"], "doc-1");

        let response = send(
            create_router(service),
            Method::GET,
            "/documents/doc-1?owner_id=bob",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_and_metrics_respond() {
        let service = Arc::new(StubDigestService::default());
        let response = send(create_router(service.clone()), Method::GET, "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");

        let response = send(create_router(service), Method::GET, "/metrics", None).await;
        assert_eq!(body_json(response).await["runs_completed"], 4);
    }

    async fn send(app: axum::Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(payload) => builder
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        app.oneshot(request).await.expect("router response")
    }

    async fn body_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json body")
    }

    fn record(doc_id: &str, status: ProcessingStatus) -> ProcessingRecord {
        let mut record = ProcessingRecord::new(doc_id);
        record.owner_id = Some("alice".into());
        record.status = status;
        record
    }

    #[derive(Default)]
    struct StubDigestService {
        ingested: Mutex<Vec<IngestRequest>>,
    }

    #[async_trait]
    impl DigestApi for StubDigestService {
        async fn ingest(&self, request: IngestRequest) -> Result<IngestOutcome, DigestError> {
            let filename = request.filename.clone().unwrap_or_default();
            self.ingested.lock().await.push(request);
            Ok(IngestOutcome {
                doc_id: "doc-1".into(),
                filename,
                deduplicated: false,
            })
        }

        async fn run(&self, doc_id: &str) -> Result<RunOutcome, DigestError> {
            if doc_id == "doc-fail" {
                let mut failed = record(doc_id, ProcessingStatus::Failed);
                failed.progress = 20;
                failed.error = Some("generator offline".into());
                return Ok(RunOutcome::Failed {
                    reason: "generator offline".into(),
                    record: failed,
                });
            }
            let mut completed = record(doc_id, ProcessingStatus::Completed);
            completed.progress = 100;
            completed.summary = Some("Summary".into());
            completed.advantages = vec!["a".into(), "b".into(), "c".into()];
            completed.disadvantages = vec!["d".into(), "e".into(), "f".into()];
            Ok(RunOutcome::Completed(completed))
        }

        async fn get_progress(&self, doc_id: &str) -> Result<ProgressSnapshot, DigestError> {
            if doc_id != "doc-1" {
                return Err(DigestError::NotFound(doc_id.into()));
            }
            Ok(ProgressSnapshot {
                status: ProcessingStatus::Processing,
                progress: 50,
            })
        }

        async fn ask(&self, _doc_id: &str, question: &str) -> Result<String, DigestError> {
            if question.trim().is_empty() {
                return Err(DigestError::InvalidRequest("question is required".into()));
            }
            Ok("An answer".into())
        }

        async fn history(&self, _owner_id: &str) -> Result<Vec<ProcessingRecord>, DigestError> {
            Ok(vec![record("doc-1", ProcessingStatus::Uploaded)])
        }

        async fn document(
            &self,
            doc_id: &str,
            owner_id: &str,
        ) -> Result<ProcessingRecord, DigestError> {
            if owner_id != "alice" {
                return Err(DigestError::NotFound(doc_id.into()));
            }
            Ok(record(doc_id, ProcessingStatus::Uploaded))
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot {
                runs_completed: 4,
                ..MetricsSnapshot::default()
            }
        }
    }
}
