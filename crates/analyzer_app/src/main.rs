use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use client_logging::{client_info, client_warn};

use analyzer_app::config::AppConfig;
use analyzer_app::logging::{self, LogDestination};
use analyzer_app::session::Session;

/// Headless demo driver: starts a session, waits for the initial library
/// fetch, and prints the result. The real UI embeds `Session` instead.
fn main() -> Result<()> {
    let config = AppConfig::from_env();
    logging::initialize(LogDestination::Terminal, config.verbose);
    client_info!("starting workflow session against {}", config.base_url);

    let mut session = Session::new(config.api_settings(), config.token_provider())?;

    let deadline = Instant::now() + Duration::from_secs(15);
    while Instant::now() < deadline {
        session.pump();
        if session.take_dirty() {
            let view = session.view();
            if let Some(error) = &view.last_error {
                client_warn!("session error: {error}");
                break;
            }
            if !view.busy.listing {
                println!("{} document(s) in library:", view.documents.len());
                for row in &view.documents {
                    println!("  {}  {} ({} pages)", row.id, row.filename, row.page_count);
                }
                break;
            }
        }
        thread::sleep(Duration::from_millis(50));
    }

    session.sign_out();
    Ok(())
}
