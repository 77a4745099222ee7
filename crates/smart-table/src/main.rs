use anyhow::Context;
use clap::Parser;
use relm4::prelude::*;
use smart_table::config;
use smart_table::gui::app::{AppInit, AppModel};
use smart_table::sys::runtime;

#[derive(Parser, Debug)]
#[command(version, about = "Touch table kiosk with a long-press radial menu", long_about = None)]
struct Args {
    /// Open a regular window instead of covering the output
    #[arg(short, long)]
    windowed: bool,

    /// Write the default config file (if missing), print its path and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.write_config {
        let path = config::write_default_config().context("Failed to write default config")?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx).context("Failed to start background services")?;

    let app = RelmApp::new("org.smarttable.kiosk").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        config,
        windowed: args.windowed,
        events: rx,
    });

    Ok(())
}
