use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use askdoc_core::Engine;
use askdoc_llm::LlmProvider;
use tokio::sync::watch;

use crate::error::WebError;
use crate::router::build_router;

pub(crate) struct AppState<P: LlmProvider> {
    pub engine: Arc<Engine<P>>,
    pub started_at: Instant,
}

impl<P: LlmProvider> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            started_at: self.started_at,
        }
    }
}

/// Serves the question form over HTTP.
pub struct WebServer<P: LlmProvider> {
    addr: SocketAddr,
    max_body_size: usize,
    engine: Arc<Engine<P>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl<P: LlmProvider + 'static> WebServer<P> {
    #[must_use]
    pub fn new(
        bind: &str,
        port: u16,
        engine: Arc<Engine<P>>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let addr: SocketAddr = format!("{bind}:{port}").parse().unwrap_or_else(|e| {
            tracing::warn!("invalid bind '{bind}': {e}, falling back to 127.0.0.1:{port}");
            SocketAddr::from(([127, 0, 0, 1], port))
        });

        Self {
            addr,
            max_body_size: 65_536,
            engine,
            shutdown_rx,
        }
    }

    #[must_use]
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Start serving the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or encounters a fatal IO
    /// error.
    pub async fn serve(self) -> Result<(), WebError> {
        let state = AppState {
            engine: self.engine,
            started_at: Instant::now(),
        };

        let router = build_router(state, self.max_body_size);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| WebError::Bind(self.addr.to_string(), e))?;
        tracing::info!("askdoc web form listening on {}", self.addr);

        let mut shutdown_rx = self.shutdown_rx;
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                while !*shutdown_rx.borrow_and_update() {
                    if shutdown_rx.changed().await.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
                tracing::info!("web form shutting down");
            })
            .await
            .map_err(|e| WebError::Server(format!("{e}")))?;

        Ok(())
    }
}
