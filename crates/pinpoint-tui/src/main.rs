//! PinPoint terminal chat.
//!
//! Chat with an assistant and highlight words from earlier answers to
//! focus the next question on them.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};

use pinpoint_client::{HttpTransport, OpenAiTransport, ProviderConfig, Transport};
use pinpoint_session::spawn_session;

mod app;
mod selection;
mod state;
mod ui;

use app::App;

#[derive(Parser)]
#[command(name = "pinpoint-tui")]
#[command(about = "PinPoint AI chat in the terminal")]
#[command(version)]
struct Cli {
    /// Base URL of the PinPoint server
    #[arg(short, long, default_value = "http://localhost:3000")]
    server: String,

    /// Call the provider directly using OPENAI_* environment variables
    #[arg(long)]
    direct: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "60")]
    timeout: u64,

    /// Log file path
    #[arg(long, default_value = "/tmp/pinpoint-tui.log")]
    log_file: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Write logs to a file to avoid terminal interference
    if let Ok(file) = std::fs::File::create(&cli.log_file) {
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_env_filter("pinpoint_tui=debug,pinpoint_session=debug,pinpoint_client=debug")
            .with_ansi(false)
            .init();
    }

    // Runtime for the session actor; the UI loop stays on the main thread
    let rt = tokio::runtime::Runtime::new()?;

    let timeout = Duration::from_secs(cli.timeout);
    let transport: Arc<dyn Transport> = if cli.direct {
        let config = ProviderConfig {
            request_timeout: timeout,
            ..ProviderConfig::from_env()
        };
        if config.api_key.is_none() {
            warn!("OPENAI_API_KEY is not set - messages will fail until it is provided");
        }
        info!(model = %config.model, "Calling provider directly");
        Arc::new(OpenAiTransport::new(config)?)
    } else {
        let transport = HttpTransport::with_timeout(&cli.server, timeout)?;
        match rt.block_on(transport.health()) {
            Ok(true) => info!(server = %cli.server, "PinPoint server is healthy"),
            Ok(false) => warn!(server = %cli.server, "PinPoint server reported unhealthy"),
            Err(e) => warn!(server = %cli.server, error = %e, "PinPoint server not reachable"),
        }
        Arc::new(transport)
    };
    let (session, session_task) = rt.block_on(async move { spawn_session(transport) });

    // Initialize terminal (enters alternate screen, enables raw mode)
    let terminal = ratatui::init();

    // Caught panics are reported in the UI; keep the terminal as is
    std::panic::set_hook(Box::new(|info| {
        error!(panic = %info, "Panic in TUI");
    }));

    let mut app = App::new(session.clone());
    let result = app.run(terminal);

    // Restore terminal (exits alternate screen, disables raw mode)
    ratatui::restore();

    session.blocking_shutdown();
    if let Err(e) = rt.block_on(session_task) {
        error!(error = %e, "Session task failed");
    }

    info!("TUI shutdown complete");

    result.map_err(|e| e.into())
}
