use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::{debug, error};
use tokio::signal::{self, unix::SignalKind};

use crate::{
    config::{Config, HOOK_SOCKETS_SHARED_DIR},
    hookserver,
    namescheme::HashedNameScheme,
    rewrite::DomainHook,
};

/// KubeVirt hook sidecar that renames interface tap devices after the
/// hashed pod interface naming scheme.
#[derive(Debug, Parser)]
#[command(author, about, long_about = None, disable_version_flag = true)]
struct Cli {
    #[clap(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// hook version to use
    #[clap(long)]
    version: Option<String>,

    /// directory the hook socket is created in
    #[clap(long, default_value = HOOK_SOCKETS_SHARED_DIR)]
    hooks_dir: PathBuf,
}

async fn run(config: Arc<Config>) -> eyre::Result<()> {
    let socket_path = hookserver::socket_path(&config.hooks_dir, &config.name).map_err(|e| {
        error!("environment error: {}", e);
        e
    })?;

    let hook = Arc::new(DomainHook::new(config.clone(), Box::new(HashedNameScheme)));

    let sig_int = signal::ctrl_c();
    let mut sig_quit = signal::unix::signal(SignalKind::quit())?;
    let mut sig_term = signal::unix::signal(SignalKind::terminate())?;
    let shutdown = async move {
        tokio::select! {
            _ = sig_int => debug!("SIGINT received; shutting down"),
            _ = sig_quit.recv() => debug!("SIGQUIT received; shutting down"),
            _ = sig_term.recv() => debug!("SIGTERM received; shutting down"),
        }
    };

    hookserver::run_server(config, hook, socket_path, shutdown)
        .await
        .map_err(|e| {
            error!("{}", e);
            e
        })?;

    Ok(())
}

pub async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let config = Config::new(cli.version.as_deref(), cli.hooks_dir).map_err(|e| {
        error!("input error: {}", e);
        e
    })?;

    run(Arc::new(config)).await
}
