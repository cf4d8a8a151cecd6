// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turning a service response into a report file or plain text

use super::ReportResponse;
use crate::error::{ReporterError, Result};
use flate2::read::{MultiGzDecoder, ZlibDecoder};
use std::io::Read;

pub const GZIP_CONTENT_TYPE: &str = "application/a-gzip";
pub const DEFAULT_FILENAME: &str = "report.txt.gz";

const FILENAME_HEADER: &str = "filename";
const MESSAGE_HEADER: &str = "downloadmsg";
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unwrapped {
    File {
        filename: String,
        status_message: Option<String>,
        payload: Vec<u8>,
    },
    Text(String),
}

/// Decide how to present a successful response
///
/// Compressed reports are inflated unless `inflate` is false, in which case
/// the payload and the names the service suggested are kept as they are.
pub fn unwrap_response(response: ReportResponse, inflate: bool) -> Result<Unwrapped> {
    if !is_compressed_report(&response.content_type) {
        return Ok(Unwrapped::Text(
            String::from_utf8_lossy(&response.body).into_owned(),
        ));
    }

    let status_message = response.header(MESSAGE_HEADER).map(str::to_string);
    let filename = match response.header(FILENAME_HEADER) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            tracing::warn!("response carries no filename, using {}", DEFAULT_FILENAME);
            DEFAULT_FILENAME.to_string()
        }
    };

    if !inflate {
        return Ok(Unwrapped::File {
            filename,
            status_message,
            payload: response.body,
        });
    }

    let payload = inflate_payload(&response.body)?;
    tracing::debug!(
        compressed = response.body.len(),
        inflated = payload.len(),
        "inflated report"
    );

    Ok(Unwrapped::File {
        filename: strip_gz(&filename).to_string(),
        status_message: status_message.map(|msg| msg.replace(".txt.gz", ".txt")),
        payload,
    })
}

fn is_compressed_report(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|mime| mime.trim().eq_ignore_ascii_case(GZIP_CONTENT_TYPE))
        .unwrap_or(false)
}

fn strip_gz(filename: &str) -> &str {
    filename.strip_suffix(".gz").unwrap_or(filename)
}

/// Inflate a gzip or zlib wrapped stream, detected from its header
fn inflate_payload(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let read = if data.starts_with(&GZIP_MAGIC) {
        MultiGzDecoder::new(data).read_to_end(&mut out)
    } else {
        ZlibDecoder::new(data).read_to_end(&mut out)
    };
    read.map_err(ReporterError::Decompression)?;
    Ok(out)
}
