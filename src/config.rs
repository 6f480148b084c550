//! Environment configuration.

use anyhow::Context;

pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub nats_url: Option<String>,
}

impl Config {
    /// Read configuration from the environment. A missing `DATABASE_URL` or
    /// `JWT_SECRET` is fatal; the service must not start without them.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT is not a valid port number")?,
            Err(_) => 8080,
        };
        let nats_url = std::env::var("NATS_URL").ok();

        Ok(Self {
            database_url,
            jwt_secret,
            port,
            nats_url,
        })
    }
}
