//! Limitrofe TUI: pick a municipality, see the ones bordering it.
//!
//! A searchable municipality list on the left and the neighbor list on the
//! right, built with `ratatui` + `crossterm`.

mod app;
mod widgets;

use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    app::run()
}

/// Log to `~/.limitrofe/limitrofe-tui.log`; the terminal belongs to the UI.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let Ok(dir) = limitrofe_shared::config_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("limitrofe-tui.log"))
    else {
        return;
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("limitrofe=info"));

    fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
}
