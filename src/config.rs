//! Construction parameters, `spec.md` §6.

use crate::proto::Addr;
use std::time::Duration;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "config-toml", derive(serde::Serialize, serde::Deserialize))]
pub struct DfloodConfig {
    /// This node's address.
    pub addr: Addr,
    /// This node's configured destination sink.
    pub sink_addr: Addr,
    /// Sink-beacon cadence. `0` disables origination even if `addr == sink_addr`.
    pub broadcast_interval: Duration,
    /// Redirect diagnostics to `errors_<addr>.txt`.
    pub errors_to_file: bool,
    /// Redirect delivered payloads to `data_<addr>.txt`.
    pub data_to_file: bool,
    /// Minimum data-forward backoff.
    pub t_min: Duration,
    /// Maximum data-forward backoff.
    pub t_max: Duration,
    /// Max tolerated duplicate overhears before suppression.
    pub n_dupl: u32,
    /// Data-table entry lifetime.
    pub plt: Duration,
    /// Sink/neighbor table entry lifetime.
    pub slt: Duration,
    /// TTL robustness margin above hop-distance.
    pub r: u8,
    /// Emit per-packet diagnostic lines.
    pub debug: bool,
    /// Reserved; not consumed by the core.
    pub fec: Option<String>,
}

/// Sink-table backoff tiers (`spec.md` §4.3). Not part of the public
/// construction parameters in the original block (they are hardcoded
/// there too, `self.large_backoff = 5`, etc.), but broken out as named
/// constants rather than buried in `engine::handlers`.
pub mod backoff {
    use std::time::Duration;

    pub const LOW: Duration = Duration::from_millis(1_000);
    pub const SMALL: Duration = Duration::from_millis(2_500);
    pub const LARGE: Duration = Duration::from_millis(5_000);
}

impl Default for DfloodConfig {
    fn default() -> Self {
        Self {
            addr: Addr(0),
            sink_addr: Addr(0),
            broadcast_interval: Duration::from_secs(30),
            errors_to_file: false,
            data_to_file: false,
            t_min: Duration::from_secs(5),
            t_max: Duration::from_secs(65),
            n_dupl: 2,
            plt: Duration::from_secs(120),
            slt: Duration::from_secs(50),
            r: 2,
            debug: false,
            fec: None,
        }
    }
}

impl DfloodConfig {
    /// Construct with the two parameters that have no universally
    /// sensible default, leaving everything else at its documented value.
    pub fn new(addr: Addr, sink_addr: Addr) -> Self {
        Self {
            addr,
            sink_addr,
            ..Default::default()
        }
    }

    /// This node is the sink it's configured to route toward.
    pub fn is_sink(&self) -> bool {
        self.addr == self.sink_addr
    }
}

#[cfg(feature = "config-toml")]
pub fn from_toml_str(s: &str) -> Result<DfloodConfig, toml::de::Error> {
    toml::from_str(s)
}
