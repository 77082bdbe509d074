use std::path::Path;

use eyre::WrapErr;
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;

/// Read a JSON document from the given file.
pub(super) async fn read_json<T: DeserializeOwned>(path: &Path) -> eyre::Result<T> {
    let content = fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("failed to read `{}`", path.display()))?;
    serde_json::from_str(&content).wrap_err_with(|| format!("invalid JSON in `{}`", path.display()))
}

/// Write a value to the given file as pretty JSON.
pub(super) async fn write_json(path: &Path, value: &impl Serialize) -> eyre::Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)
        .await
        .wrap_err_with(|| format!("failed to write `{}`", path.display()))
}
