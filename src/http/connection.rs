use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{DispatchError, ParseError};
use crate::http::parser::{MAX_BODY_BYTES, find_headers_end, parse_http_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

const READ_CHUNK: usize = 1024;

/// Upper bound on the header block before a request is rejected.
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

/// An accepted byte stream owned by exactly one dispatcher.
///
/// [`Connection::close`] consumes the connection, so it can be released at
/// most once; dropping it without closing still releases the socket.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Reads and parses one request from the stream.
    ///
    /// I/O errors and a peer that hangs up before sending a full request are
    /// [`DispatchError::Transport`]. Malformed input is
    /// [`DispatchError::BadRequest`] since the stream can still carry a reply.
    /// Header blocks over [`MAX_HEADER_BYTES`] and bodies declared over
    /// [`MAX_BODY_BYTES`] count as malformed and are never read in full.
    pub async fn read_request(&mut self) -> Result<Request, DispatchError> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    // Remove consumed bytes
                    self.buffer.advance(consumed);
                    return Ok(request);
                }

                Err(ParseError::Incomplete) => {
                    if find_headers_end(&self.buffer).is_none()
                        && self.buffer.len() > MAX_HEADER_BYTES
                    {
                        return Err(DispatchError::BadRequest(ParseError::InvalidHeader));
                    }
                }

                Err(e) => return Err(DispatchError::BadRequest(e)),
            }

            let mut temp = [0u8; READ_CHUNK];
            let n = self.stream.read(&mut temp).await?;

            if n == 0 {
                return Err(DispatchError::Transport(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "peer closed before a complete request",
                )));
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }

    /// Serializes and writes `response`, committing it.
    ///
    /// A response that is already committed is not written again.
    pub async fn send(&mut self, response: &mut Response) -> std::io::Result<()> {
        if response.is_committed() {
            return Ok(());
        }
        response.mark_committed();

        let mut writer = ResponseWriter::new(response);
        writer.write_to_stream(&mut self.stream).await
    }

    /// Shuts the stream down and releases it.
    pub async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "Error while closing connection");
        }
    }
}
