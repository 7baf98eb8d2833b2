use std::sync::Arc;

use anyhow::Result;

use console_tee::capture::{CaptureSession, Channel, ChannelRegistry};
use console_tee::config::Config;
use console_tee::console::Console;
use console_tee::logging;

fn main() -> Result<()> {
    let registry = ChannelRegistry::global();

    // Initialize logging BEFORE any tracing calls
    logging::init_channel_logging(registry.clone())?;

    let config = Config::load()?;
    let console = Console::new(registry.clone(), config.console_style());

    let mut builder = CaptureSession::builder(config.resolved_dump_dir())
        .registry(registry)
        .continue_capture(config.continue_capture)
        .failure_policy(config.failure_policy)
        .alert(Arc::new(config.terminal_alert()));
    if !config.capture_stderr {
        builder = builder.only(Channel::Stdout);
    }
    let mut session = builder.build();

    console.log("This is a message");
    console.info("This is an info message");
    console.warn("This is a warning");
    console.err("This is an error");

    session.stop_capture();
    console.info("Not captured while stopped");
    session.start_capture();
    console.log("Capture resumed");

    match session.log_console() {
        Some(path) => console.info(format!("Console dump: {}", path.display())),
        None => console.err("No console dump was written"),
    }

    Ok(())
}
