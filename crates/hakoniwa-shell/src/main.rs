//! hakoniwa shell binary.
//!
//! Usage:
//!   # Default layout, host mode
//!   cargo run -p hakoniwa-shell
//!
//!   # Seed the VFS from an archive and run a startup script
//!   cargo run -p hakoniwa-shell -- --vfs seed.zip --script setup.sh --vfs-mode
//!
//! Set `RUST_LOG=hakoniwa_vfs=debug` to see import and resolution events.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use hakoniwa_shell::config::{self, ShellConfig};
use hakoniwa_shell::{Flow, Shell, script};
use hakoniwa_vfs::{HostFs, VirtualFs};

/// UNIX-like shell over an in-memory filesystem.
#[derive(Parser, Debug)]
#[command(name = "hakoniwa")]
#[command(about = "UNIX-like shell over an in-memory virtual filesystem")]
struct Args {
    /// ZIP archive to seed the VFS from
    #[arg(long, value_name = "ZIP")]
    vfs: Option<PathBuf>,

    /// Startup script to run before the prompt
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Config file (default: ~/.config/hakoniwa/config.ron)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start in VFS mode
    #[arg(long)]
    vfs_mode: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with command output
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => ShellConfig::load(&config::expand_path(path))?,
        None => config::load_config(),
    };

    let archive = args
        .vfs
        .map(|p| config::expand_path(&p))
        .or(settings.archive);
    let script_path = args
        .script
        .map(|p| config::expand_path(&p))
        .or(settings.script);

    let vfs = VirtualFs::load(archive.as_deref());
    let mut shell = Shell::new(vfs, HostFs::new())
        .with_vfs_mode(args.vfs_mode || settings.vfs_mode)
        .with_color(!args.no_color && settings.color);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    shell.banner(&mut out)?;

    if let Some(path) = script_path {
        match script::load_script(&path) {
            Ok(lines) => {
                if shell.run_script(&lines, &mut out)? == Flow::Exit {
                    return Ok(());
                }
            }
            Err(e) => writeln!(out, "cannot read startup script {}: {e}", path.display())?,
        }
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        write!(out, "{}", shell.prompt())?;
        out.flush()?;

        let Some(line) = lines.next() else {
            // EOF (Ctrl-D)
            writeln!(out)?;
            break;
        };
        if shell.execute_line(&line?, &mut out)? == Flow::Exit {
            break;
        }
    }

    Ok(())
}
