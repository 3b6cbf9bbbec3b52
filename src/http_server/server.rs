//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::auth_routes::{auth_routes, AuthState};
use super::config::HttpServerConfig;
use super::observability_routes::{health_routes, log_request};
use super::realtime_routes::{realtime_routes, RealtimeState};
use super::resource_routes::{resource_routes, ResourceState};
use crate::config::AppConfig;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::realtime::ChangeHub;
use crate::service::{ChangeSink, ServiceRegistry, ServiceResult};

/// HTTP server for the configured resources
pub struct HttpServer {
    config: HttpServerConfig,
    registry: Arc<ServiceRegistry>,
    hub: Arc<ChangeHub>,
    router: Router,
}

impl HttpServer {
    /// Create a server with the built-in default resources
    pub fn new() -> ServiceResult<Self> {
        Self::with_config(AppConfig::default())
    }

    /// Create a server from a loaded configuration
    pub fn with_config(config: AppConfig) -> ServiceResult<Self> {
        let hub = Arc::new(ChangeHub::new(config.realtime.channel_capacity));
        let sink: Arc<dyn ChangeSink> = hub.clone();
        let registry = Arc::new(ServiceRegistry::from_resources(
            &config.resources,
            Some(sink),
        )?);

        let router = Self::build_router(&config, &registry, &hub);
        Ok(Self {
            config: config.server,
            registry,
            hub,
            router,
        })
    }

    /// Build the combined router with all endpoints
    fn build_router(
        config: &AppConfig,
        registry: &Arc<ServiceRegistry>,
        hub: &Arc<ChangeHub>,
    ) -> Router {
        let auth_state = Arc::new(AuthState::new(config.auth.clone()));
        let realtime_state = Arc::new(RealtimeState::new(hub.clone(), registry.clone()));
        let resource_state = Arc::new(ResourceState::new(registry.clone()));

        let cors = if config.server.cors_origins.is_empty() {
            // No origins configured: permissive for development
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .server
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        // Static prefixes are reserved resource names, so they never collide
        // with /:resource
        Router::new()
            .merge(health_routes())
            .nest("/auth", auth_routes(auth_state))
            .nest("/realtime", realtime_routes(realtime_state))
            .merge(resource_routes(resource_state))
            .layer(middleware::from_fn(log_request))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    pub fn registry(&self) -> Arc<ServiceRegistry> {
        self.registry.clone()
    }

    pub fn hub(&self) -> Arc<ChangeHub> {
        self.hub.clone()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?.to_string();
        let resources = self.registry.names().join(",");
        log_event_with_fields(
            Event::Serving,
            &[("addr", local_addr.as_str()), ("resources", resources.as_str())],
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        log_event(Event::ShutdownComplete);
        Ok(())
    }
}

async fn shutdown_signal() {
    // If the handler cannot be installed, run until killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new().unwrap();
        assert_eq!(server.socket_addr(), "0.0.0.0:3030");
        assert_eq!(server.registry().names(), vec!["messages", "todos"]);
    }

    #[test]
    fn test_server_with_custom_port() {
        let mut config = AppConfig::default();
        config.server = HttpServerConfig::with_port(8080);
        let server = HttpServer::with_config(config).unwrap();
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[tokio::test]
    async fn test_health() {
        let router = HttpServer::new().unwrap().router();
        let (status, body) = send(&router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_crud_round() {
        let router = HttpServer::new().unwrap().router();

        let (status, created) =
            send(&router, "POST", "/messages", Some(json!({"text": "hi"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created, json!({"id": 1, "text": "hi"}));

        let (status, fetched) = send(&router, "GET", "/messages/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, patched) =
            send(&router, "PATCH", "/messages/1", Some(json!({"read": true}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched, json!({"id": 1, "text": "hi", "read": true}));

        let (status, replaced) =
            send(&router, "PUT", "/messages/1", Some(json!({"text": "bye"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(replaced, json!({"id": 1, "text": "bye"}));

        let (status, removed) = send(&router, "DELETE", "/messages/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(removed, replaced);

        let (status, body) = send(&router, "GET", "/messages/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn test_find_with_query() {
        let router = HttpServer::new().unwrap().router();
        for (title, done) in [("a", true), ("b", false), ("c", true)] {
            send(&router, "POST", "/todos", Some(json!({"title": title, "done": done}))).await;
        }

        let (status, page) = send(&router, "GET", "/todos?done=true&$sort=-id", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 2);
        assert_eq!(page["limit"], 10);
        assert_eq!(page["data"][0]["title"], "c");
        assert_eq!(page["data"][1]["title"], "a");

        let (status, all) = send(&router, "GET", "/todos?$paginate=false", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().map(Vec::len), Some(3));

        let (status, body) = send(&router, "GET", "/todos?$bogus=1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let router = HttpServer::new().unwrap().router();

        let (status, _) = send(&router, "GET", "/nothing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, "GET", "/messages/abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, "POST", "/messages", Some(json!([1, 2]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .method("POST")
            .uri("/messages")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login() {
        let router = HttpServer::new().unwrap().router();

        let (status, body) = send(
            &router,
            "POST",
            "/auth/login",
            Some(json!({"username": "admin", "password": "admin"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["user"]["username"], "admin");

        let (status, body) = send(
            &router,
            "POST",
            "/auth/login",
            Some(json!({"username": "admin", "password": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 401);
    }

    #[tokio::test]
    async fn test_mutations_reach_hub() {
        let server = HttpServer::new().unwrap();
        let hub = server.hub();
        let mut events = hub.subscribe();
        let router = server.router();

        send(&router, "POST", "/messages", Some(json!({"text": "x"}))).await;

        let event = events.recv().await.unwrap();
        assert_eq!(event.resource, "messages");
        assert_eq!(event.sequence, 1);
        assert_eq!(hub.stats().events_published, 1);

        let (_, stats) = send(&router, "GET", "/realtime/stats", None).await;
        assert_eq!(stats["events_published"], 1);
        assert_eq!(stats["resources"], json!(["messages", "todos"]));
    }
}
