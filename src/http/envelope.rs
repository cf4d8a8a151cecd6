// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request body encoding
//!
//! The service expects a form field `jsonRequest` whose value is a JSON
//! object of individually percent-encoded strings.

use crate::credentials::{CredentialSet, Secret};
use crate::report::ReportCommand;
use serde::Serialize;
use url::form_urlencoded;

pub const PROTOCOL_VERSION: &str = "2.1";
const PROPERTIES_PREFIX: &str = "p=Reporter.properties";
const BODY_KEY: &str = "jsonRequest=";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportEnvelope {
    pub version: String,
    pub mode: String,
    #[serde(rename = "queryInput")]
    pub query_input: String,
    #[serde(rename = "userid", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "accesstoken", skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl TransportEnvelope {
    pub fn new(credentials: &CredentialSet, command: &ReportCommand) -> Self {
        let query = format!("[{}, {}]", PROPERTIES_PREFIX, command);
        let (password, access_token) = match &credentials.secret {
            Secret::Password(p) => (non_empty(p), None),
            Secret::AccessToken(t) => (None, non_empty(t)),
        };

        Self {
            version: quote(PROTOCOL_VERSION),
            mode: quote(credentials.mode.as_str()),
            query_input: quote(&query),
            user_id: credentials.user_id.as_deref().and_then(non_empty),
            // An empty account makes the service answer 404
            account: credentials
                .account
                .filter(|&account| account != 0)
                .map(|account| quote(&account.to_string())),
            password,
            access_token,
        }
    }

    /// Form body ready to be posted
    pub fn to_body(&self) -> serde_json::Result<String> {
        Ok(format!("{}{}", BODY_KEY, serde_json::to_string(self)?))
    }
}

/// Build the POST body for a command
pub fn encode_request(
    credentials: &CredentialSet,
    command: &ReportCommand,
) -> serde_json::Result<String> {
    TransportEnvelope::new(credentials, command).to_body()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| quote(value))
}

// WHATWG form encoding: `*` stays literal and `~` becomes %7E. The service
// decodes both spellings.
fn quote(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
