use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use clap::Parser;
use tokio::signal::unix::SignalKind;
use tokio::signal::unix::signal;
use tokio::sync::watch;
use tracing::Level;
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use cns_client::EtcdStore;
use cns_core::Engine;
use cns_core::OrchestratorConfig;
use cns_core::Result;

mod command_line;

use command_line::Args;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Help and version render through the same path with exit 0;
            // unknown options and missing values exit 1.
            let failed = e.use_stderr();
            let _ = e.print();
            std::process::exit(if failed { 1 } else { 0 });
        }
    };

    init_observability(&args);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    info!(?config, "configuration loaded");

    // Shutdown signal
    let (graceful_tx, graceful_rx) = watch::channel(());
    let signalled = Arc::new(AtomicBool::new(false));
    tokio::spawn(graceful_shutdown(graceful_tx, signalled.clone()));

    let store = match EtcdStore::builder(&config.host, config.port)
        .username(&config.username)
        .password(&config.password)
        .connect()
        .await
    {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "store connection failed");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    info!(host = %config.host, port = config.port, "connected to store");

    let mut engine = Engine::new(store, &config, graceful_rx);
    if let Err(e) = engine.run().await {
        error!(error = %e, "engine stopped");
        eprintln!("{e}");
        std::process::exit(1);
    }

    // An interrupted run is an abort, not a clean exit.
    if signalled.load(Ordering::SeqCst) {
        std::process::exit(1);
    }
}

/// Overrides loaded configuration with command-line flags, then validates.
fn load_config(args: &Args) -> Result<OrchestratorConfig> {
    let mut config = OrchestratorConfig::load()?;
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(username) = &args.username {
        config.username = username.clone();
    }
    if let Some(password) = &args.password {
        config.password = password.clone();
    }
    config.validate()
}

/// Console output: normal messages to stdout, errors to stderr, colour and
/// verbosity per the flags. `RUST_LOG` overrides the flag-derived filter.
fn init_observability(args: &Args) {
    let default_filter = if args.debug {
        "debug"
    } else if args.silent {
        "error"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let writer = std::io::stderr
        .with_max_level(Level::ERROR)
        .or_else(std::io::stdout);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!args.monochrome)
        .with_writer(writer)
        .init();
}

async fn graceful_shutdown(graceful_tx: watch::Sender<()>, signalled: Arc<AtomicBool>) {
    let mut sigint = signal(SignalKind::interrupt()).unwrap();
    let mut sigterm = signal(SignalKind::terminate()).unwrap();
    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT detected.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM detected.");
        },
    }

    signalled.store(true, Ordering::SeqCst);
    if graceful_tx.send(()).is_err() {
        error!("failed to notify shutdown");
    }
}
