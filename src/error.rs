// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for report queries
//!
//! Every failure is terminal for the invocation. Validation variants are
//! raised before any network activity; the rest come from the exchange
//! with the reporting service or from unpacking its response.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReporterError>;

#[derive(Debug, Error)]
pub enum ReporterError {
    /// A required argument was not supplied for the command
    #[error("Argument {argument} is needed for command '{command}'")]
    MissingArgument {
        command: String,
        argument: &'static str,
    },

    /// An argument does not match the format the command expects
    #[error("{message}")]
    InvalidFormat {
        field: &'static str,
        message: String,
    },

    /// A numeric argument lies outside its permitted range
    #[error("{field} must be a value between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: u32,
        max: u32,
    },

    /// The service rejected the query and explained why in the body
    #[error("{message}")]
    Service { status: u16, message: String },

    /// The service answered with a status that carries no explanation
    #[error("HTTP Error {status}. Did you choose reasonable query arguments?")]
    HttpStatus { status: u16 },

    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decompress report: {0}")]
    Decompression(#[source] std::io::Error),

    #[error("Could not resolve secret '{reference}': {message}")]
    Secret { reference: String, message: String },
}

impl ReporterError {
    /// True for errors raised by the argument checks
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument { .. } | Self::InvalidFormat { .. } | Self::OutOfRange { .. }
        )
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// A follow-up line for the user, where one helps
    pub fn hint(&self) -> Option<&'static str> {
        if self.is_network() {
            Some("Check your network connection and the [http] proxy setting")
        } else {
            None
        }
    }
}

impl From<reqwest::Error> for ReporterError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
