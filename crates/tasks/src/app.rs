use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use micro_bridge::app::Application;
use micro_bridge::connection::ResponseSender;
use micro_bridge::protocol::body::RequestBody;
use micro_bridge::protocol::{HttpError, Scope};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::store::TaskStore;

/// Request bodies above this size are refused with 413
pub const MAX_BODY_SIZE: u64 = 1024 * 1024;

const TASK_ID: &str = "task_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Tasks,
    Task,
}

/// The task API.
///
/// | method   | path          | answer                                 |
/// |----------|---------------|----------------------------------------|
/// | `GET`    | `/`           | 200, object of all tasks keyed by id   |
/// | `POST`   | `/`           | 201, `{"id": .., "value": ..}`         |
/// | `GET`    | `/{task_id}`  | 200, the task value                    |
/// | `PATCH`  | `/{task_id}`  | 200, the new value                     |
/// | `DELETE` | `/{task_id}`  | 200, the removed value                 |
///
/// Values are read from the query string (`val` on create, `new_val` on update)
/// and, if missing there, from an urlencoded request body.
pub struct TasksApp {
    store: Arc<TaskStore>,
    router: matchit::Router<Route>,
}

/// A rendered JSON answer
#[derive(Debug)]
struct Reply {
    status: StatusCode,
    body: Vec<u8>,
    allow: Option<&'static str>,
}

impl Reply {
    fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Self, ApiError> {
        Ok(Self { status, body: serde_json::to_vec(value)?, allow: None })
    }

    fn error(e: &ApiError) -> Result<Self, serde_json::Error> {
        #[derive(Serialize)]
        struct Detail {
            detail: String,
        }

        let allow = match e {
            ApiError::MethodNotAllowed { allow } => Some(*allow),
            _ => None,
        };
        Ok(Self { status: e.status_code(), body: serde_json::to_vec(&Detail { detail: e.to_string() })?, allow })
    }

    fn headers(&self) -> Vec<(Bytes, Bytes)> {
        let mut headers = vec![
            (Bytes::from_static(b"content-type"), Bytes::from_static(b"application/json")),
            (Bytes::from_static(b"content-length"), Bytes::from(self.body.len().to_string())),
        ];
        if let Some(allow) = self.allow {
            headers.push((Bytes::from_static(b"allow"), Bytes::from_static(allow.as_bytes())));
        }
        headers
    }
}

impl TasksApp {
    pub fn new(store: Arc<TaskStore>) -> Result<Self, matchit::InsertError> {
        let mut router = matchit::Router::new();
        router.insert("/", Route::Tasks)?;
        router.insert("/{task_id}", Route::Task)?;
        Ok(Self { store, router })
    }

    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    async fn handle(&self, scope: &Scope, receive: &mut RequestBody<'_>) -> Result<Reply, ApiError> {
        let (route, task_id) = match self.router.at(&scope.path) {
            Ok(matched) => (*matched.value, matched.params.get(TASK_ID).map(str::to_owned)),
            Err(_) => return Err(ApiError::RouteNotFound),
        };

        match (route, scope.method.as_str()) {
            (Route::Tasks, "GET") => Reply::json(StatusCode::OK, &self.store.list()),
            (Route::Tasks, "POST") => {
                let value = form_value(scope, receive, "val").await?;
                Reply::json(StatusCode::CREATED, &self.store.create(value))
            }
            (Route::Tasks, _) => Err(ApiError::MethodNotAllowed { allow: "GET, POST" }),

            (Route::Task, "GET") => {
                let id = parse_task_id(task_id)?;
                let value = self.store.get(id).ok_or(ApiError::TaskNotFound)?;
                Reply::json(StatusCode::OK, &value)
            }
            (Route::Task, "PATCH") => {
                let id = parse_task_id(task_id)?;
                let value = form_value(scope, receive, "new_val").await?;
                let value = self.store.update(id, value).ok_or(ApiError::TaskNotFound)?;
                Reply::json(StatusCode::OK, &value)
            }
            (Route::Task, "DELETE") => {
                let id = parse_task_id(task_id)?;
                let value = self.store.delete(id).ok_or(ApiError::TaskNotFound)?;
                Reply::json(StatusCode::OK, &value)
            }
            (Route::Task, _) => Err(ApiError::MethodNotAllowed { allow: "GET, PATCH, DELETE" }),
        }
    }
}

impl std::fmt::Debug for TasksApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TasksApp").field("store", &self.store).finish_non_exhaustive()
    }
}

#[async_trait]
impl Application for TasksApp {
    type Error = HttpError;

    async fn call(&self, scope: Scope, receive: &mut RequestBody<'_>, send: &mut ResponseSender<'_>) -> Result<(), Self::Error> {
        let reply = match self.handle(&scope, receive).await {
            Ok(reply) => reply,
            Err(ApiError::Body { source }) if source.status_code().is_none() => return Err(source.into()),
            Err(e) => {
                debug!(method = %scope.method, path = %scope.path, cause = %e, "request rejected");
                Reply::error(&e).map_err(HttpError::application)?
            }
        };

        if reply.status.is_server_error() {
            warn!(method = %scope.method, path = %scope.path, status = %reply.status, "request failed");
        }

        let headers = reply.headers();
        send.respond(reply.status, headers, reply.body).await?;
        Ok(())
    }
}

fn parse_task_id(task_id: Option<String>) -> Result<u64, ApiError> {
    let id = task_id.unwrap_or_default();
    id.parse::<u64>().map_err(|source| ApiError::InvalidTaskId { id, source })
}

/// Reads a form field from the query string, falling back to an urlencoded body.
async fn form_value(scope: &Scope, receive: &mut RequestBody<'_>, field: &'static str) -> Result<String, ApiError> {
    if let Some(value) = find_field(&scope.query_string, field)? {
        return Ok(value);
    }

    let body = receive.collect(MAX_BODY_SIZE).await?;
    find_field(&body, field)?.ok_or(ApiError::MissingField { field })
}

// the last occurrence wins, like a query dict would keep it
fn find_field(input: &[u8], field: &str) -> Result<Option<String>, ApiError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(input)?;
    Ok(pairs.into_iter().rev().find(|(key, _)| key == field).map(|(_, value)| value))
}
