//! Terminal User Interface components

pub mod app;
pub mod event_loop;
pub mod ui;

use anyhow::Result;

use crate::config::AppConfig;

/// Run the Terminal User Interface
pub async fn run_tui(config: AppConfig) -> Result<()> {
    let (app, rx, tutor_rx) = app::App::new(config)?;
    event_loop::run_tui_event_loop(app, rx, tutor_rx).await
}
