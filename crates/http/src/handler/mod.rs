//! Request handlers
//!
//! A handler receives the parsed [`Request`] and a [`ResponseWriter`] bound to the
//! connection. It drives the writer through a valid sequence of calls before returning;
//! the connection is closed once it does.

mod stream;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::net::tcp::OwnedWriteHalf;

use crate::connection::ResponseWriter;
use crate::protocol::Request;

pub use stream::{STREAM_READ_SIZE, stream_with_digest};

#[async_trait]
pub trait Handler<W = OwnedWriteHalf>: Send + Sync {
    async fn call(&self, writer: &mut ResponseWriter<W>, request: &Request);
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<W, F> Handler<W> for HandlerFn<F>
where
    W: Send,
    F: for<'a> Fn(&'a mut ResponseWriter<W>, &'a Request) -> BoxFuture<'a, ()> + Send + Sync,
{
    async fn call(&self, writer: &mut ResponseWriter<W>, request: &Request) {
        (self.f)(writer, request).await
    }
}

/// Wraps a function returning a boxed future into a [`Handler`].
///
/// ```
/// use futures::FutureExt;
/// use futures::future::BoxFuture;
/// use http::StatusCode;
/// use tcp_http::connection::ResponseWriter;
/// use tcp_http::handler::make_handler;
/// use tcp_http::protocol::{Request, default_headers};
///
/// fn hello<'a>(writer: &'a mut ResponseWriter, _request: &'a Request) -> BoxFuture<'a, ()> {
///     async move {
///         let body = b"Hello World!";
///         let _ = writer.write_status_line(StatusCode::OK).await;
///         let _ = writer.write_headers(&default_headers(body.len())).await;
///         let _ = writer.write_body(body).await;
///     }
///     .boxed()
/// }
///
/// let handler = make_handler(hello);
/// ```
pub fn make_handler<W, F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(&'a mut ResponseWriter<W>, &'a Request) -> BoxFuture<'a, ()>,
{
    HandlerFn { f }
}
