use crate::config::AppConfig;
use figment::{
    providers::{Env, Format, Json, Toml},
    Figment,
};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by merging `config/Calcutta.toml`,
    /// `CALCUTTA_` environment variables and `config/Calcutta.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but cannot be parsed.
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from("config/Calcutta.toml")
    }

    /// Loads configuration using an explicit TOML file in place of
    /// `config/Calcutta.toml`. A missing file leaves the defaults in place.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, figment::Error> {
        Self::figment(path.as_ref()).extract()
    }

    fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("CALCUTTA_").split("__"))
            .join(Json::file("config/Calcutta.json"))
    }
}
