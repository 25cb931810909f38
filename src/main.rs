use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process;

use fbx2glb::cmd::{self, ConvertArgs};

/// FBX to web-ready GLB converter
///
/// Converts an FBX scene with FBX2glTF, cleans it up (weld, prune, dedup),
/// optionally applies Draco and KTX2 compression, and reports what changed.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// FBX file to convert
    #[arg(value_name = "INPUT", required_unless_present_any = ["check_tools", "completions"])]
    input: Option<PathBuf>,

    /// Output GLB path (default: INPUT with a .glb extension)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Apply Draco geometry compression
    #[arg(long)]
    draco: bool,

    /// Apply KTX2 texture compression
    #[arg(long)]
    ktx2: bool,

    /// Maximum texture dimension used when compressing textures [default: 2048]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_texture: Option<u32>,

    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long)]
    no_emoji: bool,

    /// Check that the external tools are installed and exit
    #[arg(long)]
    check_tools: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    // Set console emoji mode based on CLI flag
    if cli.no_emoji {
        std::env::set_var("NO_EMOJI", "1");
    }

    let result = if let Some(shell) = cli.completions {
        cmd::cmd_completions(shell, &mut Cli::command());
        Ok(())
    } else if cli.check_tools {
        cmd::cmd_check_tools()
    } else {
        match cli.input {
            Some(input) => cmd::cmd_convert(&ConvertArgs {
                input,
                output: cli.output,
                draco: cli.draco,
                ktx2: cli.ktx2,
                max_texture: cli.max_texture,
            }),
            None => Err(anyhow::anyhow!("missing INPUT")),
        }
    };

    if let Err(e) = result {
        use fbx2glb::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
