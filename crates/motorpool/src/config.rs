use std::path::PathBuf;
use std::{env, fs};

use color_eyre::Result;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;
use tracing::error;

use crate::cli::Cli;

/// Runtime configuration, merged from defaults, the config file
/// (`config.json5` or `config.toml` in the config dir), `MOTORPOOL_*`
/// environment variables, and CLI flags; later sources win.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
    /// Base URL of the inventory API, e.g. `https://host:8085/kefa/lab/v1`.
    pub base_url: String,
    /// Bearer token injected into every request.
    pub token: String,
    /// Initial page size of the car list.
    pub page_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: get_data_dir(),
            config_dir: get_config_dir(),
            base_url: "http://127.0.0.1:8085/kefa/lab/v1".into(),
            token: String::new(),
            page_size: 10,
        }
    }
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    pub fn new(cli: &Cli) -> Result<Self, config::ConfigError> {
        let default = Config::default();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", default.data_dir.to_str().unwrap_or("."))?
            .set_default("config_dir", default.config_dir.to_str().unwrap_or("."))?
            .set_default("base_url", default.base_url.clone())?
            .set_default("token", default.token.clone())?
            .set_default("page_size", default.page_size)?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true;
            }
        }
        if !found_config {
            error!("No configuration file found. Application may not behave as expected");
        }

        builder = builder.add_source(config::Environment::with_prefix(PROJECT_NAME.as_str()));

        let mut cfg: Self = builder.build()?.try_deserialize()?;

        if let Some(base_url) = &cli.base_url {
            cfg.base_url = base_url.clone();
        }
        if let Some(token) = &cli.token {
            cfg.token = token.clone();
        }

        Ok(cfg)
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "motorpool", env!("CARGO_PKG_NAME"))
}

#[allow(dead_code)]
pub fn ensure_data_and_config_dirs_exist() -> std::io::Result<()> {
    let data_dir = get_data_dir();
    let config_dir = get_config_dir();

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(())
}
