//! Server module
//!
//! Accept loop, per-connection serving and the request entry point shared by
//! every connection.

pub mod connection;
pub mod listener;

pub use listener::create_reusable_listener;

use hyper::body::Body as _;
use hyper::header::{REFERER, USER_AGENT};
use hyper::Request;
use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::Instant;

use crate::config::Config;
use crate::http::{HttpResponse, RequestContext};
use crate::logger::{AccessLogEntry, Logger};
use crate::routing::Router;

/// Everything a connection needs to answer requests
pub struct App {
    pub router: Router,
    pub logger: Logger,
    pub access_log: bool,
    pub keep_alive: bool,
    pub connection_timeout: Duration,
    pub max_connections: Option<usize>,
}

impl App {
    pub fn new(router: Router, logger: Logger, config: &Config) -> Self {
        Self {
            router,
            logger,
            access_log: config.logging.access_log,
            keep_alive: config.performance.keep_alive_timeout > 0,
            connection_timeout: config.connection_timeout(),
            max_connections: config
                .performance
                .max_connections
                .map(|max| usize::try_from(max).unwrap_or(usize::MAX)),
        }
    }

    /// Route one request and record it in the access log
    pub async fn respond<B>(
        &self,
        req: Request<B>,
        peer_addr: Option<SocketAddr>,
        deadline: Option<Instant>,
    ) -> HttpResponse {
        let mut ctx = RequestContext::new(req.method().clone(), req.uri().path());
        ctx.peer_addr = peer_addr;
        ctx.deadline = deadline;

        let started = Instant::now();
        let response = self.router.dispatch(&ctx).await;

        if self.access_log {
            let mut entry = AccessLogEntry::new(
                peer_addr.map_or_else(|| "-".to_string(), |addr| addr.ip().to_string()),
                ctx.method.to_string(),
                ctx.path.clone(),
            );
            entry.query = req.uri().query().map(ToString::to_string);
            entry.http_version = version_label(req.version()).to_string();
            entry.status = response.status().as_u16();
            entry.body_bytes = response
                .body()
                .size_hint()
                .exact()
                .map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX));
            entry.referer = header_string(&req, REFERER);
            entry.user_agent = header_string(&req, USER_AGENT);
            entry.request_time_us =
                u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
            self.logger.access(&entry);
        }

        response
    }
}

fn header_string<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

/// Accept connections until Ctrl-C or SIGTERM
pub async fn serve(listener: TcpListener, app: Arc<App>) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(stream, peer_addr, &app, &active_connections);
                    }
                    Err(e) => {
                        app.logger.error("failed to accept connection", &[("error", &e)]);
                    }
                }
            }

            () = &mut shutdown => {
                app.logger.info("shutdown signal received, no longer accepting connections", &[]);
                return Ok(());
            }
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(_) => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
