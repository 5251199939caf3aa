use meshcall_core::utils::SIGNALING_PATH;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub url: String,
    /// Reconnect attempts after a failure before giving up.
    pub reconnect_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl ChannelConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Delay before reconnect attempt `attempt` (1-based): doubles from
    /// `initial_delay` and saturates at `max_delay`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            url: format!("ws://localhost:3000{}", SIGNALING_PATH),
            reconnect_attempts: 5,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(5000),
        }
    }
}
