// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identity sent with every report query

use crate::error::{ReporterError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::Command;

/// Output format requested from the service
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    #[value(name = "Normal")]
    Normal,
    #[value(name = "Robot.XML")]
    #[serde(rename = "Robot.XML")]
    RobotXml,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::RobotXml => "Robot.XML",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single authentication secret of a request
#[derive(Clone, PartialEq, Eq)]
pub enum Secret {
    Password(String),
    AccessToken(String),
}

// Keeps secrets out of logs and panic messages.
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Password(***)"),
            Self::AccessToken(_) => f.write_str("AccessToken(***)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSet {
    pub user_id: Option<String>,
    pub secret: Secret,
    pub account: Option<u64>,
    pub mode: Mode,
}

impl CredentialSet {
    pub fn new(user_id: Option<String>, secret: Secret, account: Option<u64>, mode: Mode) -> Self {
        Self {
            user_id,
            secret,
            account,
            mode,
        }
    }
}

/// Looks up a secret by the name it is stored under
pub trait SecretResolver {
    fn resolve_secret(&self, reference: &str) -> Result<String>;
}

/// Reads generic passwords from the macOS login keychain
#[derive(Debug, Default)]
pub struct KeychainResolver;

impl SecretResolver for KeychainResolver {
    fn resolve_secret(&self, reference: &str) -> Result<String> {
        if !cfg!(target_os = "macos") {
            return Err(ReporterError::Secret {
                reference: reference.to_string(),
                message: "the keychain is only available on macOS".to_string(),
            });
        }

        let output = Command::new("security")
            .args(["find-generic-password", "-s", reference, "-w"])
            .output()
            .map_err(|e| ReporterError::Secret {
                reference: reference.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ReporterError::Secret {
                reference: reference.to_string(),
                message: "no item with that name in the default keychain".to_string(),
            });
        }

        let secret = String::from_utf8_lossy(&output.stdout)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        Ok(secret)
    }
}

/// Where the password or access token comes from
#[derive(Clone, PartialEq, Eq)]
pub enum SecretSource {
    Password(String),
    PasswordItem(String),
    AccessToken(String),
    AccessTokenItem(String),
}

impl fmt::Debug for SecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Password(***)"),
            Self::PasswordItem(item) => f.debug_tuple("PasswordItem").field(item).finish(),
            Self::AccessToken(_) => f.write_str("AccessToken(***)"),
            Self::AccessTokenItem(item) => f.debug_tuple("AccessTokenItem").field(item).finish(),
        }
    }
}

impl SecretSource {
    pub fn resolve(&self, resolver: &dyn SecretResolver) -> Result<Secret> {
        let secret = match self {
            Self::Password(value) => Secret::Password(value.clone()),
            Self::AccessToken(value) => Secret::AccessToken(value.clone()),
            Self::PasswordItem(item) => Secret::Password(resolver.resolve_secret(item)?),
            Self::AccessTokenItem(item) => Secret::AccessToken(resolver.resolve_secret(item)?),
        };
        tracing::debug!(source = ?self, "resolved secret");
        Ok(secret)
    }
}
