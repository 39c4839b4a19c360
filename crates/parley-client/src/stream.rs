// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Newline-delimited JSON decoding for generation bodies.

use std::io;
use std::pin::Pin;

use futures::{Stream, StreamExt};
use parley_core::TransportFailure;
use serde_json::Value;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, FramedRead};
use tokio_util::io::StreamReader;
use tracing::warn;

use crate::generate::{ByteStream, GenerationResponse};

/// Decoded NDJSON values.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Value, TransportFailure>> + Send>>;

impl GenerationResponse {
    /// Body decoded as one JSON value per line.
    ///
    /// Inherits the cancellation binding of [`GenerationResponse::into_bytes_stream`].
    pub fn chunks(self) -> ChunkStream {
        decode_ndjson(self.into_bytes_stream())
    }
}

/// Longest line accepted before the stream is abandoned.
pub const MAX_LINE_BYTES: usize = 8 * 1024 * 1024;

/// Splits a byte stream into lines and parses each non-blank line as JSON.
///
/// A line that fails to parse yields a [`TransportFailure::Malformed`] item
/// and decoding continues. A transport error is yielded once and ends the
/// stream, as does a line longer than [`MAX_LINE_BYTES`]. A trailing line
/// without a newline is decoded at end of input.
pub fn decode_ndjson(inner: ByteStream) -> ChunkStream {
    decode_ndjson_with_limit(inner, MAX_LINE_BYTES)
}

fn decode_ndjson_with_limit(inner: ByteStream, max_line: usize) -> ChunkStream {
    let reader = StreamReader::new(inner.map(|chunk| chunk.map_err(io::Error::other)));
    let codec = AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), Vec::new(), max_line);
    let lines = FramedRead::new(reader, codec);

    Box::pin(futures::stream::unfold(Some(lines), move |state| async move {
        let mut lines = state?;
        loop {
            match lines.next().await? {
                Ok(line) => {
                    if let Some(item) = parse_line(&line) {
                        return Some((item, Some(lines)));
                    }
                }
                Err(AnyDelimiterCodecError::MaxChunkLengthExceeded) => {
                    warn!(max_line, "stream line too long, abandoning stream");
                    let failure =
                        TransportFailure::Malformed(format!("line exceeds {max_line} bytes"));
                    return Some((Err(failure), None));
                }
                Err(AnyDelimiterCodecError::Io(e)) => return Some((Err(into_failure(e)), None)),
            }
        }
    }))
}

/// Recovers the [`TransportFailure`] carried through the reader's I/O error.
fn into_failure(error: io::Error) -> TransportFailure {
    let fallback = error.to_string();
    error
        .into_inner()
        .and_then(|inner| inner.downcast::<TransportFailure>().ok())
        .map_or(TransportFailure::Network(fallback), |failure| *failure)
}

fn parse_line(line: &[u8]) -> Option<Result<Value, TransportFailure>> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_slice(line).map_err(|e| {
        warn!(error = %e, "skipping undecodable stream line");
        TransportFailure::Malformed(e.to_string())
    }))
}
