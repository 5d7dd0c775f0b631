use clap::Parser;

/// Command-line surface. Values left unset fall back to the `CNS_*`
/// environment variables and the built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "cns-orchestrator")]
#[command(about = "Reconciling controller for a CNS configuration store", long_about = None)]
#[command(version, disable_version_flag = true)]
pub struct Args {
    /// Print version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    /// Store host
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Store port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Store auth username
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// Store auth password
    #[arg(short = 'p', long)]
    pub password: Option<String>,

    /// Disable ANSI colour output
    #[arg(short = 'm', long)]
    pub monochrome: bool,

    /// Suppress non-error console output
    #[arg(short = 's', long)]
    pub silent: bool,

    /// Emit debug traces
    #[arg(short = 'd', long)]
    pub debug: bool,
}
