mod action;
mod app;
mod cli;
mod components;
mod config;
mod errors;
mod logging;
mod notify;
mod pages;
mod services;
mod store;
mod theme;
mod tui;

use clap::Parser;
use color_eyre::Result;

use crate::app::App;
use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    errors::init()?;
    logging::init()?;

    let config = config::Config::new(&args)?;
    let mut app = App::new(config, args.tick_rate, args.frame_rate)?;
    app.run().await
}
