use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use noodle::{InodeHandle, NoodleConfig, NoodleError, VmAreaHandle};

/// Query the noodle kernel module for inode and VM-area metadata
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the inode behind a filesystem path
    Inode {
        #[arg(value_name = "FILEPATH")]
        filepath: PathBuf,
    },
    /// Show the first memory area of a process
    #[command(name = "vm_area")]
    VmArea {
        #[arg(value_name = "PID")]
        pid: u32,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = NoodleConfig::default();

    // Render into a buffer so a failure never leaves a partial report
    let mut buf: Vec<u8> = Vec::new();
    let outcome = match &cli.command {
        Commands::Inode { filepath } => noodle::run(&InodeHandle::new(filepath), &config, &mut buf),
        Commands::VmArea { pid } => noodle::run(&VmAreaHandle::new(*pid), &config, &mut buf),
    };

    if let Err(err) = outcome {
        return Err(report_error(err));
    }

    use std::io::Write;
    std::io::stdout().write_all(&buf)?;
    Ok(())
}

/// Attach a short explanation when the kernel alert is a known one
fn report_error(err: NoodleError) -> anyhow::Error {
    match err.alert().and_then(|a| a.hint()) {
        Some(hint) => anyhow::Error::new(err).context(hint),
        None => anyhow::Error::new(err),
    }
}
