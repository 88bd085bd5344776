use anyhow::Context;
use std::io::Read;

#[derive(serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bind_address: String,
    pub bind_port: u16,
    /// Base64-encoded HS256 secret; generate one with `gen-signing-key`.
    pub token_secret: String,
    pub database: equiptrack_db::Config,
    pub tracing: TracingConfig,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TracingConfig {
    pub console: bool,
}

pub fn load() -> anyhow::Result<Config> {
    let mut configuration = String::with_capacity(4096);
    std::fs::File::open("./app-config.toml")
        .context("unable to open configuration file ./app-config.toml")?
        .read_to_string(&mut configuration)
        .context("unable to read configuration file ./app-config.toml")?;
    let mut config = toml::from_str::<Config>(&configuration)
        .context("unable to parse configuration file ./app-config.toml")?;
    if let Ok(token_secret) = std::env::var("EQUIPTRACK_TOKEN_SECRET") {
        config.token_secret = token_secret;
    }
    Ok(config)
}
