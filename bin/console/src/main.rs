use scorecard_access::{
    AuthService, CredentialDirectory, FileStorage, MemoryStorage, SessionStore, StorageBackend,
};
use scorecard_console::{Console, ConsoleConfig};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match ConsoleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let backend: Box<dyn StorageBackend> = if config.storage.in_memory {
        tracing::info!("session storage: in memory");
        Box::new(MemoryStorage::new())
    } else {
        tracing::info!(path = %config.storage.path.display(), "session storage: file");
        Box::new(FileStorage::new(config.storage.path))
    };

    let auth = AuthService::restore(CredentialDirectory::demo(), SessionStore::new(backend));
    let mut console = Console::new(auth);

    let stdin = io::stdin();
    match console.run(stdin.lock(), io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "console I/O failed");
            ExitCode::FAILURE
        }
    }
}
