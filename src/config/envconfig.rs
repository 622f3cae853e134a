use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Environment-backed configuration loading.
///
/// Variables carry the `APP_` prefix with `__` between nesting levels, so
/// `database.url` reads `APP_DATABASE__URL` and the token secrets read
/// `APP_AUTH__ACCESS_SECRET` / `APP_AUTH__REFRESH_SECRET`.
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    /// Hook for cross-field checks; a failure here aborts startup.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        load_dotenv();

        let raw = config_rs::Config::builder()
            .add_source(env_source(Self::PREFIX, Self::SEPARATOR))
            .build()
            .context("reading process environment")?;
        let cfg = raw
            .try_deserialize::<Self>()
            .context("environment does not form a valid configuration")?;

        cfg.validate()?;
        Ok(cfg)
    }
}

/// A `.env` beside the manifest wins; one in the working directory is the
/// fallback when running the installed binary.
fn load_dotenv() {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
}

fn env_source(prefix: &str, separator: &str) -> config_rs::Environment {
    config_rs::Environment::with_prefix(prefix)
        .prefix_separator("_")
        .separator(separator)
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::EnvConfig;

    #[derive(Debug, Deserialize)]
    struct Section {
        value: String,
    }

    #[derive(Debug, Deserialize)]
    struct SampleConfig {
        section: Section,
    }

    impl EnvConfig for SampleConfig {
        const PREFIX: &'static str = "CARESAMPLE";
    }

    #[test]
    fn nested_variables_map_through_the_separator() {
        // set_var is unsafe with concurrent readers; the prefix is unique to
        // this test
        unsafe { std::env::set_var("CARESAMPLE_SECTION__VALUE", "from-env") };

        let cfg = SampleConfig::from_env().expect("config should load");
        assert_eq!(cfg.section.value, "from-env");
    }
}
