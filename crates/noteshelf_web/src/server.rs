//! HTTP server lifecycle.

use crate::routes::build_router;
use crate::state::AppState;
use axum::Router;
use log::info;
use tokio::net::TcpListener;

pub struct HttpServer {
    bind_addr: String,
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState, bind_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            router: build_router(state),
        }
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// Router without a listener, for in-process requests.
    pub fn router(self) -> Router {
        self.router
    }

    /// Binds the listener and serves until the process stops.
    pub async fn start(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.bind_addr.as_str()).await?;
        let local_addr = listener.local_addr()?;
        info!("event=http_listen module=web status=ok addr={local_addr}");
        println!("noteshelf listening on http://{local_addr}");

        axum::serve(listener, self.router).await
    }
}
