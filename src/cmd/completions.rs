//! Completions command implementation
//!
//! Handles `fbx2glb --completions <SHELL>`, which prints a shell completion
//! script for bash, zsh, fish, etc.

use clap::Command;
use clap_complete::{generate, Shell};
use std::io::Write;

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
/// Users can redirect this to their shell's completion directory.
///
/// # Examples
///
/// ```bash
/// # Bash
/// fbx2glb --completions bash > /etc/bash_completion.d/fbx2glb
///
/// # Zsh
/// fbx2glb --completions zsh > ~/.zfunc/_fbx2glb
///
/// # Fish
/// fbx2glb --completions fish > ~/.config/fish/completions/fbx2glb.fish
/// ```
pub fn cmd_completions(shell: Shell, cmd: &mut Command) {
    write_completions(shell, cmd, &mut std::io::stdout());
}

/// Write a completion script to any writer
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let bin_name = cmd.get_name().to_string();
    generate(shell, cmd, bin_name, out);
}
