use crate::signaling::ReconnectPolicy;
use crate::transport::TransportConfig;
use dialtone_core::utils::DEFAULT_SIGNALING_URL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the signaling server, e.g. `http://localhost:5000`.
    pub signaling_url: String,
    pub transport: TransportConfig,
    pub reconnect: ReconnectPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            signaling_url: DEFAULT_SIGNALING_URL.to_owned(),
            transport: TransportConfig::default(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Reads `SIGNALING_URL` and `STUN_URL`; unset or empty values keep the
    /// defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("SIGNALING_URL") {
            config.signaling_url = url;
        }
        if let Some(stun) = non_empty("STUN_URL") {
            config.transport.ice_servers = vec![stun];
        }
        config
    }
}
