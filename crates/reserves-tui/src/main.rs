#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

use std::io;

use ratatui::{Terminal, backend::CrosstermBackend};
use reserves::ReservesController;

mod app;
mod logging;
mod terminal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let _log_guard = logging::init()?;
    tracing::info!("reserves v{} starting", env!("CARGO_PKG_VERSION"));

    let (controller, events) = ReservesController::fdic_from_env();
    let mut app = app::App::new(controller, events);

    let mut stdout = io::stdout();
    terminal::enter(&mut stdout)?;
    let result = terminal::restoring(&mut stdout, async {
        let mut screen = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        app.run(&mut screen).await
    })
    .await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Terminal loop failed");
    }
    result?;

    tracing::info!("reserves exiting");
    Ok(())
}
