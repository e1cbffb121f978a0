use anyhow::{Context, Result};
use dialtone_core::utils::{DEFAULT_HOST, DEFAULT_PORT};
use std::net::{IpAddr, SocketAddr};

/// Where the signaling server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let host: IpAddr = DEFAULT_HOST
            .parse()
            .unwrap_or(IpAddr::from([0, 0, 0, 0]));
        Self {
            listen_addr: SocketAddr::new(host, DEFAULT_PORT),
        }
    }
}

impl ServerConfig {
    /// Reads `HOST` and `PORT`, falling back to the defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            let ip: IpAddr = host
                .parse()
                .with_context(|| format!("HOST is not an IP address: {host:?}"))?;
            config.listen_addr.set_ip(ip);
        }

        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .with_context(|| format!("PORT is not a port number: {port:?}"))?;
            config.listen_addr.set_port(port);
        }

        Ok(config)
    }
}
