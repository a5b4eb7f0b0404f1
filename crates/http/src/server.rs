//! TCP server: one task per accepted connection
//!
//! [`Server::serve`] binds the listener and spawns the accept loop in the background,
//! returning immediately. Each accepted stream is split into its read and write halves
//! and driven through an [`HttpConnection`] on its own task, so a slow or failing
//! connection never holds up the accept loop or other connections.
//!
//! [`Server::close`] stops accepting and releases the listener. Connections already in
//! flight are left to finish on their own.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::select;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::connection::HttpConnection;
use crate::handler::Handler;

/// Handle to a running server
///
/// Dropping the handle stops the accept loop as [`close`](Self::close) would, without
/// waiting for it.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    open: AtomicBool,
    shutdown: CancellationToken,
    accept_loop: Option<JoinHandle<()>>,
}

impl Server {
    /// Listens on `0.0.0.0:port`.
    pub async fn serve<H>(port: u16, handler: H) -> io::Result<Server>
    where
        H: Handler + 'static,
    {
        Self::bind(("0.0.0.0", port), handler).await
    }

    /// Listens on `addr`. Failing to bind is the only error a server reports.
    pub async fn bind<A, H>(addr: A, handler: H) -> io::Result<Server>
    where
        A: ToSocketAddrs,
        H: Handler + 'static,
    {
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return Err(e);
            }
        };
        let local_addr = listener.local_addr()?;
        info!(%local_addr, "start listening");

        let shutdown = CancellationToken::new();
        let accept_loop = tokio::spawn(accept_loop(listener, Arc::new(handler), shutdown.clone()));

        Ok(Server { local_addr, open: AtomicBool::new(true), shutdown, accept_loop: Some(accept_loop) })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Stops accepting connections and waits for the listener to be released.
    ///
    /// Calling it again is a no-op. Handlers still running are not interrupted.
    pub async fn close(&mut self) {
        if !self.open.swap(false, Ordering::AcqRel) {
            return;
        }

        self.shutdown.cancel();
        if let Some(accept_loop) = self.accept_loop.take()
            && let Err(e) = accept_loop.await
        {
            warn!(cause = %e, "accept loop ended abnormally");
        }
        info!(local_addr = %self.local_addr, "server closed");
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.open.store(false, Ordering::Release);
        self.shutdown.cancel();
    }
}

async fn accept_loop<H>(listener: TcpListener, handler: Arc<H>, shutdown: CancellationToken)
where
    H: Handler + 'static,
{
    loop {
        let accepted = select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => accepted,
        };

        let (tcp_stream, remote_addr) = match accepted {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::new(reader, writer);
            match connection.process(handler).await {
                Ok(()) => debug!(%remote_addr, "finished process, connection shutdown"),
                Err(e) => error!(%remote_addr, cause = %e, "service has error, connection shutdown"),
            }
        });
    }

    info!("stop accepting connections");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ResponseWriter;
    use crate::handler::make_handler;
    use crate::protocol::{Request, default_headers};
    use futures::FutureExt;
    use futures::future::BoxFuture;
    use http::StatusCode;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    fn route<'a>(writer: &'a mut ResponseWriter, request: &'a Request) -> BoxFuture<'a, ()> {
        async move {
            if request.target() == "/stall" {
                return futures::future::pending().await;
            }

            let body = format!("you asked for {}", request.target());
            writer.write_status_line(StatusCode::OK).await.unwrap();
            writer.write_headers(&default_headers(body.len())).await.unwrap();
            writer.write_body(body.as_bytes()).await.unwrap();
        }
        .boxed()
    }

    async fn start() -> Server {
        Server::bind("127.0.0.1:0", make_handler(route)).await.unwrap()
    }

    async fn exchange(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        timeout(WAIT, stream.read_to_string(&mut response)).await.unwrap().unwrap();
        response
    }

    #[tokio::test]
    async fn serves_request() {
        let mut server = start().await;

        let response = exchange(server.local_addr(), "GET /coffee HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.ends_with("\r\n\r\nyou asked for /coffee"));
        server.close().await;
    }

    #[tokio::test]
    async fn malformed_request_gets_error_response() {
        let mut server = start().await;

        let response = exchange(server.local_addr(), "GET / HTTP/1.0\r\n\r\n").await;

        assert!(response.starts_with("HTTP/1.1 500 Server Error\r\n"));
        assert!(response.ends_with("\r\n\r\ninvalid http version: 1.0"), "{response}");
        server.close().await;
    }

    #[tokio::test]
    async fn stalled_connection_does_not_block_others() {
        let mut server = start().await;
        let addr = server.local_addr();

        let mut stalled = TcpStream::connect(addr).await.unwrap();
        stalled.write_all(b"GET /stall HTTP/1.1\r\n\r\n").await.unwrap();

        let response = exchange(addr, "GET /other HTTP/1.1\r\n\r\n").await;
        assert!(response.ends_with("you asked for /other"));

        timeout(WAIT, server.close()).await.unwrap();
    }

    #[tokio::test]
    async fn close_is_idempotent_and_stops_accepting() {
        let mut server = start().await;
        let addr = server.local_addr();
        assert!(server.is_open());

        timeout(WAIT, server.close()).await.unwrap();
        timeout(WAIT, server.close()).await.unwrap();

        assert!(!server.is_open());
        assert!(TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let mut server = start().await;

        let err = Server::bind(server.local_addr(), make_handler(route)).await.unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AddrInUse);
        server.close().await;
    }
}
