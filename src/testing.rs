//! Test-only harness and assertion helpers, `SPEC_FULL.md` §9. Grounded
//! on `merkle-tox-core::testing`'s `apply_effects`/`get_node_from_effects`
//! style: small free functions over the public `Emission` vector rather
//! than a bespoke mock transport.

use crate::clock::ManualTimeProvider;
use crate::config::DfloodConfig;
use crate::engine::{DfloodEngine, Emission};
use crate::metadata::Metadata;
use crate::proto::Addr;
use std::sync::Arc;

/// A pair of engines sharing one manual clock: `sink` is configured as
/// its own sink, `leaf` routes toward it. Used across the end-to-end
/// scenarios in `spec.md` §8.
pub struct TwoNodeHarness {
    pub clock: Arc<ManualTimeProvider>,
    pub sink: DfloodEngine,
    pub leaf: DfloodEngine,
}

pub fn two_node_harness(sink_addr: Addr, leaf_addr: Addr) -> TwoNodeHarness {
    let clock = Arc::new(ManualTimeProvider::new());
    let sink_config = DfloodConfig::new(sink_addr, sink_addr);
    let leaf_config = DfloodConfig::new(leaf_addr, sink_addr);
    let sink = DfloodEngine::with_clock(sink_config, clock.clone() as Arc<dyn crate::clock::TimeProvider>)
        .expect("sink engine construction is infallible without file diagnostics");
    let leaf = DfloodEngine::with_clock(leaf_config, clock.clone() as Arc<dyn crate::clock::TimeProvider>)
        .expect("leaf engine construction is infallible without file diagnostics");
    TwoNodeHarness { clock, sink, leaf }
}

pub fn empty_meta() -> Metadata {
    Metadata::new()
}

/// First `ToRadio` payload in `emissions`, if any.
pub fn find_to_radio(emissions: &[Emission]) -> Option<&[u8]> {
    emissions.iter().find_map(|e| match e {
        Emission::ToRadio(bytes) => Some(bytes.as_slice()),
        _ => None,
    })
}

/// First `ToApp` payload and metadata in `emissions`, if any.
pub fn find_to_app(emissions: &[Emission]) -> Option<(&[u8], &Metadata)> {
    emissions.iter().find_map(|e| match e {
        Emission::ToApp { payload, meta } => Some((payload.as_slice(), meta)),
        _ => None,
    })
}

/// All `ToRadio` payloads in `emissions`, in order.
pub fn all_to_radio(emissions: &[Emission]) -> Vec<&[u8]> {
    emissions
        .iter()
        .filter_map(|e| match e {
            Emission::ToRadio(bytes) => Some(bytes.as_slice()),
            _ => None,
        })
        .collect()
}
