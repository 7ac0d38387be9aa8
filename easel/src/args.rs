use std::path::PathBuf;

use clap::Parser;

/// Easel art generation server
#[derive(Debug, Parser)]
#[command(name = "easel", about = "Text-to-image generation proxy with a persisted gallery")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "easel.toml", env = "EASEL_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "EASEL_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
