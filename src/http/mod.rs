// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP exchange with the reporting service

mod client;
pub mod envelope;
pub mod unwrap;

pub use client::Client;
pub use envelope::encode_request;
pub use unwrap::{unwrap_response, Unwrapped};

use crate::report::Service;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const SALES_ENDPOINT: &str = "https://reportingitc-reporter.apple.com/reportservice/sales/v1";
pub const FINANCE_ENDPOINT: &str =
    "https://reportingitc-reporter.apple.com/reportservice/finance/v1";

/// Successful answer from the service
#[derive(Debug, Clone)]
pub struct ReportResponse {
    pub status: u16,
    pub content_type: String,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl ReportResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_sales_endpoint")]
    pub sales_endpoint: String,
    #[serde(default = "default_finance_endpoint")]
    pub finance_endpoint: String,
    /// Milliseconds; 0 waits for as long as the service takes
    #[serde(default)]
    pub timeout: u64,
    pub proxy: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            sales_endpoint: default_sales_endpoint(),
            finance_endpoint: default_finance_endpoint(),
            timeout: 0,
            proxy: None,
        }
    }
}

impl HttpConfig {
    pub fn endpoint(&self, service: Service) -> &str {
        match service {
            Service::Sales => &self.sales_endpoint,
            Service::Finance => &self.finance_endpoint,
        }
    }
}

fn default_sales_endpoint() -> String {
    SALES_ENDPOINT.to_string()
}

fn default_finance_endpoint() -> String {
    FINANCE_ENDPOINT.to_string()
}
