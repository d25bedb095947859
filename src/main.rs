//! Initial Setup - First-boot setup wizard
//!
//! This is the main entry point. It handles:
//! 1. CLI argument parsing (--force-new-user, --skip-file)
//! 2. Quietly finishing for the shared account
//! 3. Sending existing users to the welcome tutorial
//! 4. Launching the GTK4/Libadwaita wizard for new users

use anyhow::Result;
use clap::Parser;
use initial_setup::config::DEFAULT_SKIP_FILE;
use initial_setup::page_table::SetupMode;
use initial_setup::session::{self, SHARED_USER};
use initial_setup::tutorial;
use initial_setup::ui::app::SetupApplication;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Initial Setup - configure a freshly installed system
#[derive(Parser, Debug)]
#[command(name = "initial-setup")]
#[command(about = "First-boot setup wizard")]
#[command(version)]
struct Args {
    /// Force new user mode
    #[arg(long)]
    force_new_user: bool,

    /// TOML file listing pages to leave out
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SKIP_FILE)]
    skip_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _ = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .without_time()
        .try_init();

    info!("Initial Setup v{}", env!("CARGO_PKG_VERSION"));

    // Launched automatically for the shared account: nothing to set up.
    if session::is_running_as_user(SHARED_USER) {
        info!("Running as the shared account, skipping setup");
        session::mark_setup_done();
        return Ok(());
    }

    let mode = session::detect_mode(args.force_new_user);
    info!("Setup mode: {:?}", mode);

    if mode == SetupMode::ExistingUser {
        tutorial::launch();
        session::mark_setup_done();
        return Ok(());
    }

    run_gui(args, mode)
}

fn run_gui(args: Args, mode: SetupMode) -> Result<()> {
    if std::env::var("DISPLAY").is_err() && std::env::var("WAYLAND_DISPLAY").is_err() {
        anyhow::bail!("No display server detected (X11 or Wayland)");
    }

    gtk::init().map_err(|e| anyhow::anyhow!("Failed to initialize GTK4: {}", e))?;
    adw::init().map_err(|e| anyhow::anyhow!("Failed to initialize Libadwaita: {}", e))?;

    let app = SetupApplication::new(mode, &args.skip_file);
    let exit_code = app.run();

    std::process::exit(exit_code.into());
}
