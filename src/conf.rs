use crate::{client::ClientConf, provider::UpstreamConf, repository::DbConf};
use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::{env, path::PathBuf};

#[derive(Deserialize)]
pub struct Conf {
    pub server: ServerConf,
    pub upstream: UpstreamConf,
    pub db: DbConf,
    pub client: ClientConf,
}

#[derive(Deserialize)]
pub struct ServerConf {
    pub address: String,
    pub port: u16,
}

impl Conf {
    pub fn new() -> Result<Conf> {
        let default_conf = include_bytes!("../usdbrl.conf");
        let default_conf = String::from_utf8_lossy(default_conf);

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let custom_conf_path = data_dir.join("usdbrl.conf");

        let conf: Conf = Figment::new()
            .merge(Toml::string(&default_conf))
            .merge(Toml::file(custom_conf_path))
            .merge(Env::prefixed("USDBRL_").split("__"))
            .extract()?;

        Ok(conf)
    }
}

#[cfg(test)]
mod test {
    use super::Conf;
    use figment::Jail;

    #[test]
    fn defaults() {
        Jail::expect_with(|_| {
            let conf = Conf::new().unwrap();
            assert_eq!(8080, conf.server.port);
            assert_eq!(200, conf.upstream.timeout_ms);
            assert_eq!(10, conf.db.timeout_ms);
            assert_eq!(300, conf.client.timeout_ms);
            assert_eq!("cotacao.txt", conf.client.output.to_str().unwrap());
            Ok(())
        });
    }

    #[test]
    fn env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env("USDBRL_CLIENT__TIMEOUT_MS", "1000");
            jail.set_env("USDBRL_DB__URL", "other.db");
            let conf = Conf::new().unwrap();
            assert_eq!(1000, conf.client.timeout_ms);
            assert_eq!("other.db", conf.db.url);
            Ok(())
        });
    }

    #[test]
    fn data_dir_file() {
        Jail::expect_with(|jail| {
            jail.create_file("usdbrl.conf", "[server]\nport = 9090")?;
            let dir = jail.directory().to_string_lossy().to_string();
            jail.set_env("DATA_DIR", dir);
            let conf = Conf::new().unwrap();
            assert_eq!(9090, conf.server.port);
            assert_eq!("0.0.0.0", conf.server.address);
            Ok(())
        });
    }
}
