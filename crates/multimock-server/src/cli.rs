use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "multimock")]
#[command(about = "Multimock - Run one mock HTTP server per external API")]
pub struct Cli {
    /// Registry file (YAML, JSON or JSONC) listing the mocked APIs
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Host used in the printed URLs, overriding the registry file
    #[arg(long)]
    pub host: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
