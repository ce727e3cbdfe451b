//! Message-port surface, `spec.md` §6 / `SPEC_FULL.md` §6. Grounded on
//! `merkle-tox-core`'s node/effect split: a thin adapter over the engine
//! that names every port the original block registers, including the
//! two it never wires to a handler.

use crate::clock::TimeProvider;
use crate::config::DfloodConfig;
use crate::engine::{DfloodEngine, Emission};
use crate::error::DfloodResult;
use crate::metadata::Metadata;
use std::sync::Arc;

/// Wraps a [`DfloodEngine`] with the full named port surface of the
/// original block, including `from_app_arq` and `ctrl_out`, which the
/// original registers but never attaches a handler to (`spec.md` §4.9).
pub struct PortAdapter {
    engine: DfloodEngine,
}

impl PortAdapter {
    pub fn new(config: DfloodConfig) -> DfloodResult<Self> {
        Ok(Self {
            engine: DfloodEngine::new(config)?,
        })
    }

    pub fn with_clock(config: DfloodConfig, clock: Arc<dyn TimeProvider>) -> DfloodResult<Self> {
        Ok(Self {
            engine: DfloodEngine::with_clock(config, clock)?,
        })
    }

    pub fn config(&self) -> DfloodConfig {
        self.engine.config()
    }

    /// Inbound radio frame.
    pub fn from_radio(&self, bytes: &[u8], meta: &Metadata) -> Vec<Emission> {
        self.engine.from_radio(bytes, meta)
    }

    /// Inbound application payload.
    pub fn from_app(&self, bytes: &[u8], meta: &Metadata) -> Vec<Emission> {
        self.engine.from_app(bytes, meta)
    }

    /// Reserved inbound port for a future ARQ/reliable-transport layer.
    /// The original block registers `from_app_arq` with
    /// `message_port_register_in` but never calls `set_msg_handler` for
    /// it; this adapter mirrors that by accepting and discarding input
    /// on it rather than omitting the port.
    pub fn from_app_arq(&self, _bytes: &[u8], _meta: &Metadata) {
        tracing::trace!("from_app_arq: reserved port, no handler attached");
    }

    /// Periodic scheduler tick.
    pub fn ctrl_in(&self) -> Vec<Emission> {
        self.engine.ctrl_in()
    }

    /// Reserved outbound control port, unused by this core.
    pub fn ctrl_out(&self) {}
}
