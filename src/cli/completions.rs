// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Completion scripts for the report subcommands

use super::{Cli, Shell};
use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::generate;
use std::io::{self, Write};

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => Self::Bash,
            Shell::Zsh => Self::Zsh,
            Shell::Fish => Self::Fish,
            Shell::PowerShell => Self::PowerShell,
            Shell::Elvish => Self::Elvish,
        }
    }
}

pub fn execute(shell: Shell) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_script(shell, &mut out);
    out.flush().context("Failed to write completion script")
}

/// Render the script for `shell`, registered under the binary's own name
pub fn write_script(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    generate(clap_complete::Shell::from(shell), &mut cmd, bin, out);
}
