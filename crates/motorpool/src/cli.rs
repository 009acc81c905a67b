use clap::Parser;

#[derive(Parser)]
#[command(name = "motorpool", version, about = "Car inventory admin console")]
pub struct Cli {
    /// Base URL of the inventory API (overrides the config file)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Bearer token for the inventory API (overrides the config file)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Tick rate, i.e. ticks per second
    #[arg(long, value_name = "FLOAT", default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate, i.e. frames per second
    #[arg(long, value_name = "FLOAT", default_value_t = 30.0)]
    pub frame_rate: f64,
}
