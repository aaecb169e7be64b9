use std::path::PathBuf;

use serde::Deserialize;

use crate::{cli::GlobalArgs, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/tally.toml";

/// Where records live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The hosted record service.
    #[default]
    Hosted,
    /// A JSON file on disk.
    Local,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendKind,
    pub base_url: String,
    pub project_id: String,
    pub public_key: String,
    pub state_path: PathBuf,
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Hosted,
            base_url: String::new(),
            project_id: String::new(),
            public_key: String::new(),
            state_path: PathBuf::from("config/tally_state.json"),
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Config file, then `TALLY_*` environment variables, then command line.
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("TALLY"));
        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings.with_overrides(args))
    }

    fn with_overrides(mut self, args: &GlobalArgs) -> Self {
        if let Some(backend) = args.backend {
            self.backend = backend;
        }
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(state_path) = &args.state_path {
            self.state_path = state_path.clone();
        }
        if let Some(level) = &args.level {
            self.level = level.clone();
        }
        self
    }
}
