//! Bounded-chunk stream plumbing shared by the backends and the gateway.

use async_stream::try_stream;
use bytes::Buf;
use futures_util::StreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::ByteStream;

/// Transfer buffer size. Nothing in the crate holds blob bytes beyond one
/// chunk of this size per in-flight transfer.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Drain a byte stream into a writer, one chunk at a time.
///
/// Returns the total number of bytes written. The stream is consumed even
/// on short input; any read or write failure aborts the copy.
pub async fn copy_stream<W>(mut stream: ByteStream, writer: &mut W) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;
    Ok(written)
}

/// Adapt a read-once stream to the byte window `[start, start + len)`.
///
/// The source is not seekable, so leading bytes are read and discarded;
/// the tail past the window is never pulled. Emitted chunks stay within
/// [`CHUNK_SIZE`].
pub fn slice_stream(mut stream: ByteStream, start: u64, len: u64) -> ByteStream {
    Box::pin(try_stream! {
        let mut to_skip = start;
        let mut remaining = len;
        while remaining > 0 {
            let Some(chunk) = stream.next().await else { break };
            let mut chunk = chunk?;
            if to_skip >= chunk.len() as u64 {
                to_skip -= chunk.len() as u64;
                continue;
            }
            if to_skip > 0 {
                chunk.advance(to_skip as usize);
                to_skip = 0;
            }
            if chunk.len() as u64 > remaining {
                chunk.truncate(remaining as usize);
            }
            remaining -= chunk.len() as u64;
            while chunk.len() > CHUNK_SIZE {
                yield chunk.split_to(CHUNK_SIZE);
            }
            if !chunk.is_empty() {
                yield chunk;
            }
        }
    })
}
