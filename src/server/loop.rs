// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop
///
/// Every accepted connection is served on its own task. When `shutdown`
/// resolves, the listener is dropped and the loop returns; connections
/// already accepted keep running on the runtime until it is torn down.
pub async fn start_server_loop<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = &'static str>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _peer_addr)) => {
                        handle_connection(stream, Arc::clone(&state));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            reason = &mut shutdown => {
                logger::log_shutdown(reason);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::logger::RecordingRequestLog;
    use crate::server::create_listener;
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;
    use hyper::{Request, StatusCode};
    use hyper_util::rt::TokioIo;
    use std::net::SocketAddr;
    use std::time::{Duration, Instant};
    use tokio::sync::oneshot;

    async fn spawn_server() -> (SocketAddr, Arc<RecordingRequestLog>, oneshot::Sender<()>) {
        let log = Arc::new(RecordingRequestLog::default());
        let state = Arc::new(AppState::with_request_log(&Config::default(), log.clone()));
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(start_server_loop(listener, state, async move {
            let _ = rx.await;
            "test finished"
        }));
        (addr, log, tx)
    }

    async fn get(addr: SocketAddr, uri: &str) -> (StatusCode, Bytes) {
        let stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        tokio::spawn(conn);

        let req = Request::builder()
            .uri(uri)
            .header("host", addr.to_string())
            .body(Empty::<Bytes>::new())
            .unwrap();
        let response = sender.send_request(req).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    #[tokio::test]
    async fn test_end_to_end_echo() {
        let (addr, log, shutdown) = spawn_server().await;

        let started = Instant::now();
        let (status, body) = get(addr, "/teapot?status=418&delay=30").await;
        assert!(started.elapsed() >= Duration::from_millis(30));
        assert_eq!(status.as_u16(), 418);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["method"], "GET");
        assert_eq!(json["url"], "/teapot?status=418&delay=30");
        assert_eq!(json["delay"], 30);
        assert_eq!(json["headers"]["host"], addr.to_string());

        assert_eq!(log.entries().len(), 1);
        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn test_concurrent_delays_do_not_serialize() {
        let (addr, log, shutdown) = spawn_server().await;

        let started = Instant::now();
        let (a, b) = tokio::join!(
            get(addr, "/a?delay=300"),
            get(addr, "/contact?delay=300")
        );
        assert_eq!(a.0, StatusCode::OK);
        assert_eq!(b.0, StatusCode::OK);
        assert!(started.elapsed() < Duration::from_millis(600));

        assert_eq!(log.entries().len(), 2);
        let _ = shutdown.send(());
    }
}
