//! Sink-beacon origination, `spec.md` §4.2. Grounded on `dflood.py`'s
//! `ctrl_in` beacon branch: a configured sink emits a SINK packet for
//! itself every `broadcast_interval`, jittered by up to 2x.

use super::EngineState;
use crate::codec::{encode, Packet};
use crate::proto::HopCount;
use rand::Rng;
use std::time::Instant;

/// Emits a self-originated SINK packet if this node is a sink, the
/// interval has elapsed, and the interval is nonzero (`0` disables
/// origination, `spec.md` §6).
pub(crate) fn maybe_originate(state: &mut EngineState, now: Instant) -> Option<Vec<u8>> {
    if !state.config.is_sink() || state.config.broadcast_interval.is_zero() {
        return None;
    }

    let due = match state.last_beacon {
        None => true,
        Some(last) => {
            let jitter: f64 = state.rng.gen::<f64>() * 2.0;
            now.duration_since(last) >= state.config.broadcast_interval.mul_f64(jitter)
        }
    };
    if !due {
        return None;
    }

    state.last_beacon = Some(now);
    let seq = state.seq;
    state.seq = seq.wrapping_next();

    let pkt = Packet::Sink {
        sender: state.config.addr,
        source: state.config.addr,
        seq,
        hop_count: HopCount(0),
    };
    Some(encode(&pkt))
}
