//! A small HTTP/1.1 server built from incremental, sans-io state machines
//!
//! Requests are parsed from a byte stream delivered in chunks of any size, without
//! needing the whole message up front. Responses go through an ordered writer that
//! only allows status line, headers, body, trailers in that order, with either a
//! fixed-length body or a chunked body followed by trailers. A TCP server runs one
//! task per connection and closes each connection after a single exchange.
//!
//! # Example
//!
//! ```no_run
//! use futures::FutureExt;
//! use futures::future::BoxFuture;
//! use http::StatusCode;
//! use tcp_http::connection::ResponseWriter;
//! use tcp_http::handler::make_handler;
//! use tcp_http::protocol::{Request, default_headers};
//! use tcp_http::server::Server;
//!
//! fn hello<'a>(writer: &'a mut ResponseWriter, request: &'a Request) -> BoxFuture<'a, ()> {
//!     async move {
//!         let body = format!("Hello from {}\n", request.target());
//!         if writer.write_status_line(StatusCode::OK).await.is_err() {
//!             return;
//!         }
//!         let _ = writer.write_headers(&default_headers(body.len())).await;
//!         let _ = writer.write_body(body.as_bytes()).await;
//!     }
//!     .boxed()
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let mut server = Server::serve(42069, make_handler(hello)).await?;
//!     tokio::signal::ctrl_c().await?;
//!     server.close().await;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: request, headers, parser and writer states, error types
//! - [`codec`]: the request decoder and response encoder state machines
//! - [`connection`]: reading requests from and writing responses to async streams
//! - [`handler`]: the [`handler::Handler`] trait and handler compositions
//! - [`server`]: the TCP accept loop
//!
//! # Limitations
//!
//! - HTTP/1.1 only, one request per connection
//! - Request bodies need `Content-Length`; chunked request bodies are not supported
//! - Header order is not kept and repeated headers are folded into one value

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
