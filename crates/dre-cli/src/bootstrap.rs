use std::path::PathBuf;

use anyhow::Context;
use dre_config::DreConfig;

/// Load `.env` (if present) and then the layered configuration.
pub fn load_config() -> anyhow::Result<DreConfig> {
    load_dotenv()?;
    DreConfig::load().context("failed to load configuration")
}

fn load_dotenv() -> anyhow::Result<()> {
    if let Some(path) = std::env::var_os("DRE_ENV_FILE").map(PathBuf::from) {
        dotenvy::from_path(&path)
            .with_context(|| format!("failed to load dotenv file at {}", path.display()))?;
        return Ok(());
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}
