use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use revcanvas::{decode_from_slice, encode_to_vec, CanvasProfile};

#[derive(Parser)]
#[command(name = "revcanvas", version, about = "Reversible planar byte codec")]
struct Cli {
    /// Optional TOML profile (baseline, base, k_max); defaults apply
    /// per missing field.
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Encode a file into a canvas container.
    Encode { input: PathBuf, output: PathBuf },
    /// Decode a canvas container back to the original file.
    Decode { input: PathBuf, output: PathBuf },
}

fn load_profile(path: Option<&PathBuf>) -> Result<CanvasProfile> {
    match path {
        None => Ok(CanvasProfile::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading profile {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing profile {}", path.display()))
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Encode { input, output } => {
            // Decode takes its profile from the container header, so
            // the flag only matters here.
            let profile = load_profile(cli.profile.as_ref())?;
            let data =
                std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let raw = encode_to_vec(&data, profile)?;
            tracing::info!(payload = data.len(), container = raw.len(), "encoded");
            std::fs::write(&output, raw)
                .with_context(|| format!("writing {}", output.display()))?;
        }
        Cmd::Decode { input, output } => {
            let raw =
                std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let data = decode_from_slice(&raw)?;
            tracing::info!(payload = data.len(), "decode converged");
            std::fs::write(&output, data)
                .with_context(|| format!("writing {}", output.display()))?;
        }
    }
    Ok(())
}
