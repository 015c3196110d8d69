//! A single mock HTTP server.
//!
//! Every request goes through one fallback handler that looks the request up
//! in the server's [`StubStore`], records it in the journal and answers with
//! the matched stub's response.

use crate::defaults::default_stubs;
use crate::error::ServerError;
use crate::journal::RecordedRequest;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use multimock_core::config::loader::load_stub_source;
use multimock_core::{HttpMethod, Request, ResponseDefinition, StubMapping, StubStore};
use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How long `stop` waits for in-flight requests before aborting the task.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// State shared between a server handle and its request handler.
#[derive(Debug)]
struct ServerState {
    name: String,
    stubs: RwLock<StubStore>,
    journal: RwLock<Vec<RecordedRequest>>,
}

impl ServerState {
    /// Replace every stub with `loaded` plus the defaults and clear the journal.
    async fn install(&self, loaded: Vec<StubMapping>) -> usize {
        let mut stubs = self.stubs.write().await;
        stubs.clear();
        stubs.add_all(loaded);
        stubs.add_all(default_stubs(&self.name));
        self.journal.write().await.clear();
        stubs.len()
    }
}

#[derive(Debug)]
struct RunningServer {
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<io::Result<()>>,
}

/// Mock server for one API, listening on a fixed port.
///
/// Dropping a running server signals it to shut down without waiting.
#[derive(Debug)]
pub struct MockServer {
    name: String,
    port: u16,
    bind_address: IpAddr,
    host: String,
    stub_dir: PathBuf,
    state: Arc<ServerState>,
    running: Option<RunningServer>,
}

impl MockServer {
    /// Build a stopped server.
    pub fn new(
        name: impl Into<String>,
        port: u16,
        bind_address: IpAddr,
        host: impl Into<String>,
        stub_dir: impl Into<PathBuf>,
    ) -> Self {
        let name = name.into();
        Self {
            state: Arc::new(ServerState {
                name: name.clone(),
                stubs: RwLock::new(StubStore::new()),
                journal: RwLock::new(Vec::new()),
            }),
            name,
            port,
            bind_address,
            host: host.into(),
            stub_dir: stub_dir.into(),
            running: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn stub_dir(&self) -> &Path {
        &self.stub_dir
    }

    /// Base URL: `http://<host>:<port>`.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// `true` while the serving task is alive.
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// Load the stub source, bind the port and start serving.
    ///
    /// Does nothing when the server is already running.
    pub async fn start(&mut self) -> Result<(), ServerError> {
        if self.is_running() {
            return Ok(());
        }
        self.running = None;

        let loaded = self.load_stubs().await?;

        let address = SocketAddr::new(self.bind_address, self.port);
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.to_string(),
                source,
            })?;

        let stub_count = self.state.install(loaded).await;

        let app = Router::new()
            .fallback(handle_request)
            .with_state(Arc::clone(&self.state));
        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await
        });

        self.running = Some(RunningServer {
            shutdown: Some(tx),
            handle,
        });
        info!(api = %self.name, port = self.port, stubs = stub_count, "Mock server started");
        Ok(())
    }

    /// Signal shutdown and wait for the serving task. No-op when stopped.
    pub async fn stop(&mut self) {
        let Some(mut running) = self.running.take() else {
            return;
        };
        if let Some(tx) = running.shutdown.take() {
            let _ = tx.send(());
        }

        match tokio::time::timeout(STOP_TIMEOUT, &mut running.handle).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(source))) => {
                let error = ServerError::Serve {
                    port: self.port,
                    source,
                };
                warn!(api = %self.name, "{error}");
            }
            Ok(Err(join_error)) => {
                warn!(api = %self.name, "Mock server task failed: {join_error}");
            }
            Err(_) => {
                warn!(api = %self.name, "Mock server did not stop in time, aborting");
                running.handle.abort();
            }
        }
        info!(api = %self.name, port = self.port, "Mock server stopped");
    }

    /// Drop every stub and recorded request, keeping only the default stubs.
    pub async fn reset(&self) {
        self.state.install(Vec::new()).await;
        debug!(api = %self.name, "Mock server reset");
    }

    /// Like [`reset`](Self::reset), then load the stub source again.
    pub async fn reload(&self) -> Result<(), ServerError> {
        let loaded = self.load_stubs().await?;
        let stub_count = self.state.install(loaded).await;
        info!(api = %self.name, stubs = stub_count, "Mock server reloaded");
        Ok(())
    }

    /// Add a stub at runtime. A stub with the same id is replaced.
    pub async fn register(&self, stub: StubMapping) {
        self.state.stubs.write().await.add(stub);
    }

    pub async fn remove(&self, id: &str) -> Option<StubMapping> {
        self.state.stubs.write().await.remove(id)
    }

    /// Active stubs in match order.
    pub async fn stubs(&self) -> Vec<StubMapping> {
        self.state.stubs.read().await.stubs().cloned().collect()
    }

    /// Requests received since the last start, reset or reload.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.journal.read().await.clone()
    }

    async fn load_stubs(&self) -> Result<Vec<StubMapping>, ServerError> {
        load_stub_source(&self.stub_dir)
            .await
            .map_err(|source| ServerError::StubSource {
                path: self.stub_dir.clone(),
                source,
            })
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(mut running) = self.running.take() {
            if let Some(tx) = running.shutdown.take() {
                let _ = tx.send(());
            }
        }
    }
}

async fn handle_request(
    State(state): State<Arc<ServerState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let url = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let headers = collect_headers(&headers);

    let request = Request {
        method: HttpMethod::parse(method.as_str()),
        url: url.clone(),
        headers: headers.clone(),
        payload: None,
    }
    .with_body(&body);

    let matched = state.stubs.read().await.find(&request).cloned();
    let matched_stub_id = matched.as_ref().map(|stub| stub.id.clone());
    debug!(
        api = %state.name,
        method = %method,
        url = %url,
        stub = matched_stub_id.as_deref().unwrap_or("-"),
        "Request received"
    );

    state.journal.write().await.push(RecordedRequest {
        method: method.as_str().to_string(),
        url,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
        matched_stub_id,
    });

    let Some(stub) = matched else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(delay) = stub.response.delay {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    build_response(&stub.response)
}

/// Header names lowercased; repeated headers joined with commas.
fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut collected: HashMap<String, String> = HashMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    collected
}

fn build_response(definition: &ResponseDefinition) -> Response {
    let Ok(status) = StatusCode::from_u16(definition.status) else {
        warn!("Stub has invalid status {}", definition.status);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let mut builder = Response::builder().status(status);
    for (name, value) in definition.headers.iter().flatten() {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if definition.has_json_body() && definition.header("content-type").is_none() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }

    builder
        .body(Body::from(definition.body_bytes()))
        .unwrap_or_else(|e| {
            warn!("Stub response could not be built: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}
