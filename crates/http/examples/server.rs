use std::io::{self, Cursor};

use futures::{FutureExt, TryStreamExt};
use futures::future::BoxFuture;
use http::StatusCode;
use tcp_http::connection::ResponseWriter;
use tcp_http::handler::{make_handler, stream_with_digest};
use tcp_http::protocol::{Headers, Request, SendError};
use tcp_http::server::Server;
use tokio_util::io::StreamReader;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_PORT: u16 = 42069;

const UPSTREAM: &str = "https://httpbin.org";

const BAD_REQUEST_PAGE: &str = "<html>
  <head><title>400 Bad Request</title></head>
  <body><h1>Bad Request</h1><p>Your request honestly kinda sucked.</p></body>
</html>
";

const SERVER_ERROR_PAGE: &str = "<html>
  <head><title>500 Internal Server Error</title></head>
  <body><h1>Internal Server Error</h1><p>Okay, you know what? This one is on me.</p></body>
</html>
";

const SUCCESS_PAGE: &str = "<html>
  <head><title>200 OK</title></head>
  <body><h1>Success!</h1><p>Your request was an absolute banger.</p></body>
</html>
";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let port = std::env::var("PORT").ok().and_then(|port| port.parse().ok()).unwrap_or(DEFAULT_PORT);

    let mut server = Server::serve(port, make_handler(route)).await?;
    info!(port, "server started");

    tokio::signal::ctrl_c().await?;
    server.close().await;
    info!("server gracefully stopped");
    Ok(())
}

fn route<'a>(writer: &'a mut ResponseWriter, request: &'a Request) -> BoxFuture<'a, ()> {
    async move {
        let target = request.target();
        let result = match target {
            "/yourproblem" => send_page(writer, StatusCode::BAD_REQUEST, BAD_REQUEST_PAGE).await,
            "/myproblem" => send_page(writer, StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_PAGE).await,
            _ => {
                if let Some(path) = target.strip_prefix("/httpbin") {
                    proxy(writer, path).await
                } else if let Some(n) = target.strip_prefix("/stream/").and_then(|n| n.parse::<usize>().ok()) {
                    send_stream(writer, n).await
                } else {
                    send_page(writer, StatusCode::OK, SUCCESS_PAGE).await
                }
            }
        };

        if let Err(e) = result {
            error!(path = target, cause = %e, "failed to send response");
        }
    }
    .boxed()
}

async fn send_page(writer: &mut ResponseWriter, status: StatusCode, page: &str) -> Result<(), SendError> {
    let mut headers = Headers::new();
    headers.insert("Content-Length", page.len().to_string());
    headers.insert("Connection", "close");
    headers.insert("Content-Type", "text/html");

    writer.write_status_line(status).await?;
    writer.write_headers(&headers).await?;
    writer.write_body(page.as_bytes()).await?;
    Ok(())
}

/// Streams `n` generated bytes with digest trailers.
async fn send_stream(writer: &mut ResponseWriter, n: usize) -> Result<(), SendError> {
    let data: Vec<u8> = (b'a'..=b'z').cycle().take(n).collect();

    let mut headers = Headers::new();
    headers.insert("Connection", "close");
    headers.insert("Content-Type", "text/plain");

    writer.write_status_line(StatusCode::OK).await?;
    stream_with_digest(writer, headers, Cursor::new(data)).await
}

/// Relays `UPSTREAM` + `path` as a chunked body with digest trailers.
async fn proxy(writer: &mut ResponseWriter, path: &str) -> Result<(), SendError> {
    let url = format!("{UPSTREAM}{path}");
    let response = match reqwest::get(&url).await {
        Ok(response) => response,
        Err(e) => {
            error!(%url, cause = %e, "upstream request failed");
            return writer.write_error(e).await;
        }
    };
    info!(%url, status = %response.status(), "proxying upstream body");

    let body = StreamReader::new(Box::pin(response.bytes_stream().map_err(io::Error::other)));

    let mut headers = Headers::new();
    headers.insert("Connection", "close");
    headers.insert("Content-Type", "text/plain");

    writer.write_status_line(StatusCode::OK).await?;
    stream_with_digest(writer, headers, body).await
}
