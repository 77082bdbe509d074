use tokio::{fs, io::AsyncWriteExt};

use crate::config::Config;

use super::Command;

/// Initialize config.
#[derive(Debug, clap::Args)]
pub struct InitConfig {
    /// Replace if the config file already exists.
    #[arg(long, short)]
    force: bool,
}

impl Command for InitConfig {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let path = ctx.config_path();
        if fs::try_exists(path).await? && !self.force {
            eyre::bail!("Config file already exists. Use `--force` to overwrite it.");
        }

        let content = toml::to_string_pretty(&Config::default())?;

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .await?;
        file.write_all(content.as_bytes()).await?;

        tracing::info!(path = %path.display(), "config file initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::Context;

    use super::*;

    #[tokio::test]
    async fn test_init_config_requires_force_to_overwrite() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("compplan").join("config.toml");
        let config = Config::default();

        InitConfig { force: false }
            .execute(Context::new(&path, &config))
            .await?;
        let written: Config = toml::from_str(&fs::read_to_string(&path).await?)?;
        assert_eq!(written.plan(), config.plan());

        fs::write(&path, "output = \"json\"\n").await?;
        let res = InitConfig { force: false }
            .execute(Context::new(&path, &config))
            .await;
        assert!(res.is_err());
        assert_eq!(fs::read_to_string(&path).await?, "output = \"json\"\n");

        InitConfig { force: true }
            .execute(Context::new(&path, &config))
            .await?;
        let written: Config = toml::from_str(&fs::read_to_string(&path).await?)?;
        assert_eq!(written.plan(), config.plan());
        Ok(())
    }
}
