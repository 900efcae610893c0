mod app_dir;
mod preferences;
mod session;

use std::process::ExitCode;

use tracing::{error, info};

use preferences::Preferences;
use session::Session;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting mandelzoom");

    let prefs = Preferences::load();
    let mut session = match Session::new(prefs.clone()) {
        Ok(session) => session,
        Err(e) => {
            error!("Invalid preferences: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = session.run() {
        error!("Session aborted: {e}");
        return ExitCode::FAILURE;
    }

    if let Some(disp) = session.display() {
        info!(
            width = disp.width,
            height = disp.height,
            "Final frame ready"
        );
    }
    let vp = session.viewport();
    info!(
        x = vp.x,
        y = vp.y,
        width = vp.width,
        height = vp.height,
        frames = session.frames_received(),
        "Session finished"
    );
    prefs.save();
    ExitCode::SUCCESS
}
