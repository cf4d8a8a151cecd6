// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client implementation

use super::{HttpConfig, ReportResponse};
use crate::error::{ReporterError, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::time::Duration;

const ACCEPT_VALUE: &str = "text/html,image/gif,image/jpeg; q=.2, */*; q=.2";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        if config.timeout > 0 {
            builder = builder.timeout(Duration::from_millis(config.timeout));
        }

        if let Some(proxy_url) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            inner: builder.build()?,
        })
    }

    /// Post one encoded query, exactly once
    pub async fn post(&self, endpoint: &str, body: String) -> Result<ReportResponse> {
        tracing::debug!(endpoint, "posting report query");

        let response = self
            .inner
            .post(endpoint)
            .header(ACCEPT, ACCEPT_VALUE)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_ascii_lowercase(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let content_type = headers.get("content-type").cloned().unwrap_or_default();

        Ok(ReportResponse {
            status: status.as_u16(),
            content_type,
            headers,
            body,
        })
    }
}

/// Map a non-2xx answer to an error
///
/// The service explains 400, 401, 403 and 404 in the body; other codes
/// come without a usable message.
fn classify_failure(status: StatusCode, body: &[u8]) -> ReporterError {
    match status.as_u16() {
        code @ (400 | 401 | 403 | 404) => ReporterError::Service {
            status: code,
            message: String::from_utf8_lossy(body).into_owned(),
        },
        code => ReporterError::HttpStatus { status: code },
    }
}
