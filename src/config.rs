use std::time::Duration;

use log::{error, info};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    card_uri: String,
    card_timeout: u64,
}

impl Config {
    /// Base URI of the smartcard service, e.g. `http://localhost:3001`.
    pub fn card_uri(&self) -> &str {
        self.card_uri.trim_end_matches('/')
    }

    /// How long to wait on the smartcard service before giving up.
    pub fn card_timeout(&self) -> Duration {
        Duration::from_secs(self.card_timeout)
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!(
            "Using card service at {} ({}s timeout)",
            config.card_uri(),
            config.card_timeout
        );

        Ok(rocket.manage(config))
    }
}

#[cfg(test)]
mod tests {
    use rocket::figment::{providers::Serialized, Figment};
    use rocket::serde::json::serde_json::json;

    use super::*;

    #[test]
    fn extract_from_figment() {
        let figment = Figment::from(Serialized::defaults(json!({
            "card_uri": "http://localhost:3001/",
            "card_timeout": 4,
        })));
        let config: Config = figment.extract().unwrap();
        assert_eq!(config.card_uri(), "http://localhost:3001");
        assert_eq!(config.card_timeout(), Duration::from_secs(4));

        let missing = Figment::from(Serialized::defaults(json!({ "card_timeout": 4 })));
        assert!(missing.extract::<Config>().is_err());
    }
}
