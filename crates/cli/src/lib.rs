/// Configuration.
pub mod config;

/// Commands.
pub mod commands;

use std::{
    ops::Deref,
    path::{Path, PathBuf},
};

use clap::Parser;
use commands::{Command, Commands, Context};
use config::{Config, OutputFormat};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

const ENV_PREFIX: &str = "COMPPLAN_";
const CONFIG_DIR: &str = "compplan";

/// We use `__` in the name of environment variable as an alias of `.`.
///
/// See [`Env`] for more infomation.
const DOT_ALIAS: &str = "__";

/// Command-line interface for the compensation engine.
#[derive(Debug)]
pub struct Cli {
    inner: Inner,
    config_path: PathBuf,
    config: Config,
}

impl Cli {
    /// Creates from the command line arguments.
    pub fn init() -> eyre::Result<Self> {
        let inner = Inner::parse();
        let config_path = inner.find_config()?;
        let config = inner.load_config(&config_path)?;

        Ok(Self {
            inner,
            config_path,
            config,
        })
    }

    /// Execute command.
    pub async fn execute(&self) -> eyre::Result<()> {
        self.command
            .execute(Context::new(&self.config_path, &self.config))
            .await
    }
}

impl Deref for Cli {
    type Target = Inner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Command-line interface for the compensation engine.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Inner {
    /// Path to the config file.
    #[clap(long = "config", short)]
    config_path: Option<PathBuf>,
    /// Output format, overrides the config.
    #[arg(long, short, value_enum)]
    output: Option<OutputFormat>,
    /// Commands.
    #[command(subcommand)]
    command: Commands,
}

impl Inner {
    fn find_config(&self) -> eyre::Result<PathBuf> {
        use etcetera::{choose_base_strategy, BaseStrategy};

        match self.config_path.as_ref() {
            Some(path) => Ok(path.clone()),
            None => {
                let strategy = choose_base_strategy()?;
                Ok(strategy.config_dir().join(CONFIG_DIR).join("config.toml"))
            }
        }
    }

    /// Layer the defaults, the config file and the environment.
    fn load_config(&self, config_path: &Path) -> eyre::Result<Config> {
        let mut config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split(DOT_ALIAS))
            .extract()?;
        if let Some(output) = self.output {
            config.set_output(output);
        }
        Ok(config)
    }
}
