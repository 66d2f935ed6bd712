//! HTTP transport for the dispatcher.
//!
//! Wire shape: `POST /<procedureName>` with a JSON body (empty for
//! procedures that declare no input). The response status carries the
//! dispatch outcome: 200 success, 400 client error, 404 unknown
//! procedure or path, 500 server error. Every connection is served on
//! its own tokio task, so one suspended handler never blocks the rest.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use accord_contract::{ErrorBody, RequestEnvelope, ResponseEnvelope, ResponseStatus};

use crate::cors::CorsLayer;
use crate::dispatch::Dispatcher;

/// Configuration for the HTTP RPC server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_address: SocketAddr,
    /// Enable permissive CORS headers and OPTIONS preflight handling
    pub enable_cors: bool,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".parse().unwrap(),
            enable_cors: true,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Builder for [`HttpRpcServer`]
pub struct HttpRpcServerBuilder<Ctx> {
    config: ServerConfig,
    dispatcher: Dispatcher<Ctx>,
    ctx: Ctx,
}

impl<Ctx> HttpRpcServerBuilder<Ctx>
where
    Ctx: Clone + Send + Sync + 'static,
{
    pub fn new(dispatcher: Dispatcher<Ctx>, ctx: Ctx) -> Self {
        Self {
            config: ServerConfig::default(),
            dispatcher,
            ctx,
        }
    }

    /// Set the bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.config.bind_address = addr;
        self
    }

    /// Enable or disable CORS
    pub fn cors(mut self, enable: bool) -> Self {
        self.config.enable_cors = enable;
        self
    }

    /// Set maximum request body size
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    pub fn build(self) -> HttpRpcServer<Ctx> {
        HttpRpcServer {
            config: Arc::new(self.config),
            dispatcher: self.dispatcher,
            ctx: self.ctx,
        }
    }
}

/// HTTP server wrapping a [`Dispatcher`]
pub struct HttpRpcServer<Ctx> {
    config: Arc<ServerConfig>,
    dispatcher: Dispatcher<Ctx>,
    ctx: Ctx,
}

impl<Ctx> HttpRpcServer<Ctx>
where
    Ctx: Clone + Send + Sync + 'static,
{
    pub fn builder(dispatcher: Dispatcher<Ctx>, ctx: Ctx) -> HttpRpcServerBuilder<Ctx> {
        HttpRpcServerBuilder::new(dispatcher, ctx)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the configured address and serve forever.
    pub async fn run(&self) -> std::io::Result<()> {
        let listener = TcpListener::bind(&self.config.bind_address).await?;
        self.serve(listener).await
    }

    /// Serve on an already-bound listener. Split out from [`run`] so
    /// tests can bind an ephemeral port first.
    ///
    /// [`run`]: HttpRpcServer::run
    pub async fn serve(&self, listener: TcpListener) -> std::io::Result<()> {
        info!(address = %listener.local_addr()?, "HTTP RPC server listening");

        let handler = RequestHandler {
            config: Arc::clone(&self.config),
            dispatcher: self.dispatcher.clone(),
            ctx: self.ctx.clone(),
        };

        loop {
            let (stream, peer_addr) = listener.accept().await?;
            debug!(%peer_addr, "new connection");

            let handler = handler.clone();
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| handle_request(req, handler.clone()));

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    // Clients closing mid-request is routine, not a fault.
                    let message = err.to_string();
                    if message.contains("connection closed before message completed") {
                        debug!("client disconnected: {message}");
                    } else {
                        error!("error serving connection: {message}");
                    }
                }
            });
        }
    }
}

/// Per-connection request state; clones share the dispatcher table.
struct RequestHandler<Ctx> {
    config: Arc<ServerConfig>,
    dispatcher: Dispatcher<Ctx>,
    ctx: Ctx,
}

impl<Ctx: Clone> Clone for RequestHandler<Ctx> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            dispatcher: self.dispatcher.clone(),
            ctx: self.ctx.clone(),
        }
    }
}

async fn handle_request<Ctx>(
    req: Request<hyper::body::Incoming>,
    handler: RequestHandler<Ctx>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    Ctx: Clone + Send + Sync + 'static,
{
    let mut response = match (req.method().clone(), req.uri().path().to_string()) {
        (Method::OPTIONS, _) => {
            // Preflight; the CORS headers are attached below.
            Response::builder()
                .status(StatusCode::OK)
                .body(Full::new(Bytes::new()))
                .unwrap()
        }
        (Method::POST, path) => {
            let procedure = path.trim_start_matches('/').to_string();
            match read_payload(req, handler.config.max_body_size).await {
                Ok(payload) => {
                    let envelope = RequestEnvelope::new(procedure, payload);
                    let response = handler.dispatcher.dispatch(envelope, handler.ctx.clone()).await;
                    encode_response(response)
                }
                Err(body) => encode_response(ResponseEnvelope::error(
                    ResponseStatus::ClientError,
                    body,
                )),
            }
        }
        _ => encode_response(ResponseEnvelope::error(
            ResponseStatus::NotFound,
            ErrorBody::new("Not found"),
        )),
    };

    if handler.config.enable_cors {
        CorsLayer::apply_cors_headers(response.headers_mut());
    }
    Ok(response)
}

/// Read and parse the request body. An empty body means no payload.
async fn read_payload(
    req: Request<hyper::body::Incoming>,
    max_body_size: usize,
) -> Result<Option<serde_json::Value>, ErrorBody> {
    let bytes = req
        .into_body()
        .collect()
        .await
        .map_err(|err| ErrorBody::new(format!("failed to read request body: {err}")))?
        .to_bytes();

    if bytes.len() > max_body_size {
        return Err(ErrorBody::new(format!(
            "request body exceeds the {max_body_size} byte limit"
        )));
    }
    if bytes.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|err| ErrorBody::new(format!("invalid JSON body: {err}")))
}

fn encode_response(envelope: ResponseEnvelope) -> Response<Full<Bytes>> {
    let status =
        StatusCode::from_u16(envelope.status.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = envelope.body.to_string();
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        // Infallible: status and header are known-valid.
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = ServerConfig::default();
        assert!(config.enable_cors);
        assert_eq!(config.max_body_size, 1024 * 1024);
        assert_eq!(config.bind_address.port(), 3000);
    }

    #[test]
    fn encode_response_maps_status_and_content_type() {
        let response = encode_response(ResponseEnvelope::error(
            ResponseStatus::NotFound,
            ErrorBody::new("Not found"),
        ));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["Content-Type"], "application/json");
    }
}
