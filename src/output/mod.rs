// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presenting an unwrapped response to the operator

use crate::http::Unwrapped;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What `emit` did with the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    File(PathBuf),
    Text,
}

/// Write file payloads into `dir` and print text payloads to `out`
///
/// For files the service's status line is printed, or the written path
/// when the service sent none.
pub fn emit(unwrapped: Unwrapped, dir: &Path, out: &mut dyn Write) -> Result<Emitted> {
    match unwrapped {
        Unwrapped::Text(text) => {
            writeln!(out, "{}", text)?;
            Ok(Emitted::Text)
        }
        Unwrapped::File {
            filename,
            status_message,
            payload,
        } => {
            let path = dir.join(safe_file_name(&filename));
            fs::write(&path, &payload)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;

            match status_message {
                Some(message) => writeln!(out, "{}", message)?,
                None => writeln!(out, "Report written to {}", path.display())?,
            }
            Ok(Emitted::File(path))
        }
    }
}

/// Print a failure the way the rest of the CLI does
pub fn print_error(message: &str, colorized: bool) {
    if colorized {
        eprintln!("{} {}", "Error:".red().bold(), message);
    } else {
        eprintln!("Error: {}", message);
    }
}

// The service names files itself; never let that name leave `dir`.
fn safe_file_name(name: &str) -> &str {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(crate::http::unwrap::DEFAULT_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_text_is_printed() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        let emitted = emit(Unwrapped::Text("Sales is available".into()), dir.path(), &mut out).unwrap();
        assert_eq!(emitted, Emitted::Text);
        assert_eq!(String::from_utf8(out).unwrap(), "Sales is available\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_file_is_written_and_message_printed() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        let emitted = emit(
            Unwrapped::File {
                filename: "S_D_1_20240401.txt".into(),
                status_message: Some("Successfully downloaded S_D_1_20240401.txt".into()),
                payload: b"report".to_vec(),
            },
            dir.path(),
            &mut out,
        )
        .unwrap();

        let path = dir.path().join("S_D_1_20240401.txt");
        assert_eq!(emitted, Emitted::File(path.clone()));
        assert_eq!(fs::read(&path).unwrap(), b"report");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Successfully downloaded S_D_1_20240401.txt\n"
        );
    }

    #[test]
    fn test_file_without_message_reports_path() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        emit(
            Unwrapped::File {
                filename: "report.txt".into(),
                status_message: None,
                payload: vec![],
            },
            dir.path(),
            &mut out,
        )
        .unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("Report written to "));
    }

    #[test]
    fn test_file_name_cannot_escape_directory() {
        assert_eq!(safe_file_name("../../etc/passwd"), "passwd");
        assert_eq!(safe_file_name("S_D_1.txt"), "S_D_1.txt");
        assert_eq!(safe_file_name(".."), "report.txt.gz");
    }
}
