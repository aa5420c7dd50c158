// Connection handling module
// Accepts TCP connections and serves them over HTTP/1.1

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::time::Instant;

use super::App;

/// Accept a connection unless the connection cap is reached.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `app` - Shared application
/// * `conn_counter` - Active connection counter
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    app: &Arc<App>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment first, then check, so concurrent accepts cannot both slip under the cap
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = app.max_connections {
        if prev_count >= max_conn {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            app.logger.warn(
                "max connections reached, connection rejected",
                &[("active", &prev_count), ("max", &max_conn), ("peer", &peer_addr)],
            );
            drop(stream);
            return;
        }
    }

    app.logger.debug("connection accepted", &[("peer", &peer_addr)]);

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(app),
        Arc::clone(conn_counter),
    );
}

/// Serve one connection in its own task.
///
/// The whole connection is bounded by the configured timeout; the same
/// instant is handed to every request on it as its deadline. The counter is
/// decremented when the task ends.
fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    app: Arc<App>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let timeout = app.connection_timeout;
        let deadline = Instant::now() + timeout;

        let mut builder = http1::Builder::new();
        builder.keep_alive(app.keep_alive);

        let service_app = Arc::clone(&app);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let app = Arc::clone(&service_app);
                async move {
                    let response = app.respond(req, Some(peer_addr), Some(deadline)).await;
                    Ok::<_, Infallible>(response)
                }
            }),
        );

        match tokio::time::timeout_at(deadline, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => app.logger.error(
                "failed to serve connection",
                &[("peer", &peer_addr), ("error", &err)],
            ),
            Err(_) => app.logger.warn(
                "connection timed out",
                &[("peer", &peer_addr), ("after_secs", &timeout.as_secs())],
            ),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
