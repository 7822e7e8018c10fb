//! Byte copy from a source to the response body.
//!
//! The body is fed through an in-process pipe by a spawned copy task. When
//! the client goes away hyper drops the body, the next pipe write fails and
//! the task stops, dropping the source.

use bytes::{Bytes, BytesMut};
use futures::Stream;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream};
use tracing_futures::Instrument;
use vellum_db::assetstore::ByteSource;

use crate::error::{ServiceError, ServiceResult};

use super::DeliveryHeaders;

const CHUNK_SIZE: usize = 64 * 1024;

fn body_stream(reader: DuplexStream) -> impl Stream<Item = std::io::Result<Bytes>> + Send + 'static {
    futures::stream::unfold(Some(reader), |state| async move {
        let mut reader = state?;
        let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
        match reader.read_buf(&mut buf).await {
            Ok(0) => None,
            Ok(_) => Some((Ok(buf.freeze()), Some(reader))),
            Err(err) => Some((Err(err), None)),
        }
    })
}

pub struct ContentStreamer;

impl ContentStreamer {
    /// ## Summary
    /// Copies the whole source into `sink`, then flushes and closes it.
    /// Returns the number of bytes written.
    ///
    /// The source is dropped on every exit path.
    ///
    /// ## Errors
    /// Returns `StreamingFailure` on the first failed read or write; nothing is retried.
    pub async fn copy<R, W>(mut source: R, mut sink: W) -> ServiceResult<u64>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let written = tokio::io::copy(&mut source, &mut sink)
            .await
            .map_err(ServiceError::StreamingFailure)?;
        drop(source);
        sink.flush().await.map_err(ServiceError::StreamingFailure)?;
        sink.shutdown().await.map_err(ServiceError::StreamingFailure)?;
        Ok(written)
    }

    /// ## Summary
    /// Applies `headers` and streams `source` as the response body.
    ///
    /// For `HEAD` requests only the headers are sent and the source is dropped.
    ///
    /// ## Errors
    /// Returns `InvariantViolation` if a header cannot be set. Failures during
    /// the copy happen after the response has started; they are logged as
    /// streaming failures.
    #[tracing::instrument(skip(res, source, headers), fields(length = headers.content_length))]
    pub fn stream(
        res: &mut salvo::Response,
        source: ByteSource,
        headers: &DeliveryHeaders,
        head_only: bool,
    ) -> ServiceResult<()> {
        headers.apply(res)?;

        if source.length != headers.content_length {
            tracing::warn!(
                source_length = source.length,
                "Source length differs from planned Content-Length"
            );
        }

        if head_only {
            tracing::trace!("HEAD request, dropping source");
            return Ok(());
        }

        let expected = headers.content_length;
        let (writer, reader) = tokio::io::duplex(CHUNK_SIZE);
        let span = tracing::debug_span!("copy_content", expected);
        let _copy_task = tokio::spawn(
            async move {
                match Self::copy(source.reader, writer).await {
                    Ok(written) if written == expected => {
                        tracing::debug!(written, "Content streamed");
                    }
                    Ok(written) => {
                        tracing::warn!(written, "Content ended before its declared length");
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Streaming aborted");
                    }
                }
            }
            .instrument(span),
        );

        res.stream(body_stream(reader));
        Ok(())
    }
}
