//! Byte-range media delivery.
//!
//! Streams local files to players and cast receivers. `Accept-Ranges` is
//! advertised on every response so clients know seeking is possible; a
//! malformed range serves the whole file rather than failing the request.
//! Content is streamed from the requested offset, never buffered whole.

use crate::error::{Result, TelecastError};
use axum::{
    body::Body,
    extract::Query,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::io::SeekFrom;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::info;

#[derive(Deserialize)]
pub struct VideoParams {
    path: String,
}

/// Content type by container extension; players sniff the rest.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp4") => "video/mp4",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

/// Parse a single `bytes=<start>-<end>` range against a file of `size` bytes.
///
/// `end` may be omitted, meaning end of file. Both bounds are clamped into
/// `[0, size - 1]`. Anything unparsable yields `None`: the request is served
/// as if no range had been asked for.
fn parse_range(header: &str, size: u64) -> Option<(u64, u64)> {
    if size == 0 {
        return None;
    }
    let spec = header.strip_prefix("bytes=")?;
    let (start, end) = spec.split_once('-')?;
    let start: u64 = start.trim().parse().ok()?;
    let end: u64 = match end.trim() {
        "" => size - 1,
        s => s.parse().ok()?,
    };

    let start = start.min(size - 1);
    let end = end.min(size - 1);
    if start > end {
        return None;
    }
    Some((start, end))
}

/// Serve a media file, honoring a single byte-range request.
pub async fn serve_video(Query(params): Query<VideoParams>, headers: HeaderMap) -> Result<Response> {
    let path = Path::new(&params.path);

    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|_| TelecastError::MediaNotFound(params.path.clone()))?;
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(TelecastError::MediaNotFound(params.path.clone()));
    }
    let size = metadata.len();
    let content_type = content_type_for(path);

    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|r| parse_range(r, size));

    match range {
        Some((start, end)) => {
            let length = end - start + 1;
            info!(
                "Serving {} bytes {}-{}/{}",
                params.path, start, end, size
            );

            file.seek(SeekFrom::Start(start)).await?;
            let stream = ReaderStream::new(file.take(length));

            Ok((
                StatusCode::PARTIAL_CONTENT,
                [
                    (header::CONTENT_TYPE, content_type.to_string()),
                    (header::CONTENT_LENGTH, length.to_string()),
                    (
                        header::CONTENT_RANGE,
                        format!("bytes {}-{}/{}", start, end, size),
                    ),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                ],
                Body::from_stream(stream),
            )
                .into_response())
        }
        None => {
            info!("Serving {} ({} bytes)", params.path, size);

            let stream = ReaderStream::new(file);

            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type.to_string()),
                    (header::CONTENT_LENGTH, size.to_string()),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                ],
                Body::from_stream(stream),
            )
                .into_response())
        }
    }
}
