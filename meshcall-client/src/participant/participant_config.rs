use crate::capture::MediaConstraints;
use meshcall_core::IceServerConfig;
use meshcall_core::utils::default_ice_servers;

#[derive(Debug, Clone)]
pub struct ParticipantConfig {
    /// Used until the relay's welcome message supplies its own list.
    pub ice_servers: Vec<IceServerConfig>,
    pub constraints: MediaConstraints,
}

impl Default for ParticipantConfig {
    fn default() -> Self {
        Self {
            ice_servers: default_ice_servers(),
            constraints: MediaConstraints::default(),
        }
    }
}
