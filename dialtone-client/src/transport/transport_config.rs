use crate::transport::MediaConstraints;
use dialtone_core::utils::DEFAULT_STUN_ADDR;

/// Settings every peer connection of a client is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub ice_servers: Vec<String>,
    pub media: MediaConstraints,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![DEFAULT_STUN_ADDR.to_owned()],
            media: MediaConstraints::default(),
        }
    }
}
