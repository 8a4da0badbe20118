//! solidview - B-Rep viewer session core
//!
//! Runs as a child of the presentation shell: commands arrive on stdin as
//! JSON lines, display instructions leave on stdout, logs go to stderr.

use anyhow::Context;
use kernel::BRepKernel;
use solidview_session::Session;

mod commands;
mod config;
mod event_loop;
mod logging;
mod shell;

use commands::Dispatcher;
use config::AppConfig;
use shell::IpcShell;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    logging::init(&config.session.log.filter);

    tracing::info!(
        "Starting solidview v{} (config: {})",
        env!("CARGO_PKG_VERSION"),
        config.path.display()
    );
    tracing::debug!("{:?}", config.session);

    let stdout = std::io::stdout().lock();
    let shell = match IpcShell::connect(
        stdout,
        &config.session.display,
        config.session.tessellation.clone(),
    ) {
        Ok(shell) => shell,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e).context("presentation shell unavailable");
        }
    };

    let mut session = Session::new(BRepKernel::new(), shell, &config.session);
    let mut dispatcher = Dispatcher::new();

    event_loop::run(std::io::stdin().lock(), &mut session, &mut dispatcher)
        .context("lost connection to the presentation shell")?;

    tracing::info!(
        "Session ended with {} tracked shapes",
        session.registry().len()
    );
    Ok(())
}
