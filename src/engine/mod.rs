//! The protocol engine: receive-side dispatch, emit-side packet
//! construction, sink-beacon origination, and the tick-driven scheduler.
//!
//! Grounded on `merkle-tox-core::engine`'s split of a plain-data engine
//! struct (`MerkleToxEngine`) with handler methods that return a vector
//! of effects for the caller to drain (`node.rs::process_effects`),
//! rather than the engine calling back into an unspecified transport
//! trait. Here the "effects" are `Emission`s, the only two things this
//! core ever produces, per `spec.md` §6.

mod beacon;
mod handlers;
mod ingress;
mod tick;

use crate::clock::{SystemTimeProvider, TimeProvider};
use crate::config::DfloodConfig;
use crate::diagnostics::Diagnostics;
use crate::error::DfloodResult;
use crate::metadata::Metadata;
use crate::proto::SeqNum;
use crate::tables::{DataTable, SinkNeighborTable, SinkTable};
use parking_lot::ReentrantMutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::sync::Arc;
use std::time::Instant;

/// Something the engine wants sent onward: a raw frame for the radio, or
/// a delivered payload for the application, with its original metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum Emission {
    ToRadio(Vec<u8>),
    ToApp { payload: Vec<u8>, meta: Metadata },
}

/// All mutable protocol state, guarded by `DfloodEngine`'s reentrant
/// mutex. Plain fields rebuilt on update, not derived/computed (matches
/// `spec.md` §9's note on the source's "immutable record" style).
pub(crate) struct EngineState {
    pub(crate) config: DfloodConfig,
    pub(crate) clock: Arc<dyn TimeProvider>,
    pub(crate) rng: StdRng,
    pub(crate) sink_neighbor: SinkNeighborTable,
    pub(crate) sink: SinkTable,
    pub(crate) data: DataTable,
    /// This node's own sink-beacon sequence counter (meaningful only
    /// when `config.is_sink()`).
    pub(crate) seq: SeqNum,
    pub(crate) last_beacon: Option<Instant>,
    /// This node's data-packet sequence counter for `from_app` traffic.
    pub(crate) pkt_cnt: SeqNum,
}

/// A single protocol engine instance, one per node (`spec.md` §2).
pub struct DfloodEngine {
    state: ReentrantMutex<RefCell<EngineState>>,
    diagnostics: Diagnostics,
}

impl DfloodEngine {
    /// Builds an engine with the real system clock and a process-seeded RNG.
    pub fn new(config: DfloodConfig) -> DfloodResult<Self> {
        Self::with_clock(config, Arc::new(SystemTimeProvider))
    }

    /// Builds an engine against an injected clock, for deterministic tests
    /// (`ManualTimeProvider`) or an embedding host with its own notion of
    /// time.
    pub fn with_clock(config: DfloodConfig, clock: Arc<dyn TimeProvider>) -> DfloodResult<Self> {
        let diagnostics = Diagnostics::new(config.addr, config.errors_to_file, config.data_to_file)?;
        let state = EngineState {
            rng: StdRng::from_entropy(),
            config,
            clock,
            sink_neighbor: SinkNeighborTable::new(),
            sink: SinkTable::new(),
            data: DataTable::new(),
            seq: SeqNum(0),
            last_beacon: None,
            pkt_cnt: SeqNum(0),
        };
        Ok(Self {
            state: ReentrantMutex::new(RefCell::new(state)),
            diagnostics,
        })
    }

    pub fn config(&self) -> DfloodConfig {
        self.state.lock().borrow().config.clone()
    }

    /// Handles a frame arriving on `from_radio`.
    pub fn from_radio(&self, bytes: &[u8], meta: &Metadata) -> Vec<Emission> {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        ingress::handle_from_radio(&mut state, &self.diagnostics, bytes, meta)
    }

    /// Handles a payload arriving on `from_app`.
    pub fn from_app(&self, bytes: &[u8], meta: &Metadata) -> Vec<Emission> {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        ingress::handle_from_app(&mut state, &self.diagnostics, bytes, meta)
    }

    /// Handles a `ctrl_in` tick: beacon origination, scheduled-forward
    /// release, and table aging (`spec.md` §4.7).
    pub fn ctrl_in(&self) -> Vec<Emission> {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        let now = state.clock.now();
        tick::run_tick(&mut state, &self.diagnostics, now)
    }
}
