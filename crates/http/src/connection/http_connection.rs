use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, warn};

use crate::connection::{RequestReader, ResponseWriter};
use crate::handler::Handler;
use crate::protocol::HttpError;

/// One request/response cycle over a byte stream
///
/// `HttpConnection` reads a single request, hands it to the handler together with a
/// [`ResponseWriter`] bound to the same stream, and shuts the write side down once the
/// handler returns. There is no keep-alive: whatever state the writer reached, the
/// connection ends after one exchange.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: RequestReader<R>,
    writer: ResponseWriter<W>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader: RequestReader::new(reader), writer: ResponseWriter::new(writer) }
    }

    /// Processes the connection to completion.
    ///
    /// A request that fails to parse is answered with a 500 carrying the parse error
    /// text, as long as the stream still accepts writes, and the parse error is returned.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler<W> + ?Sized,
    {
        let request = match self.reader.read_request().await {
            Ok(request) => request,
            Err(e) => {
                error!(cause = %e, "can't read request");
                if let Err(send_err) = self.writer.write_error(&e).await {
                    warn!(cause = %send_err, "failed to send error response");
                }
                let _ = self.writer.shutdown().await;
                return Err(e.into());
            }
        };

        info!(method = %request.method(), path = request.target(), "receive request");

        handler.call(&mut self.writer, &request).await;
        debug!(state = ?self.writer.state(), "handler finished, connection shutdown");

        self.writer.shutdown().await?;
        Ok(())
    }
}
