//! `ctrl_in` tick handling, `spec.md` §4.7. Grounded on `dflood.py`'s
//! `ctrl_rx`: beacon origination (sinks only), scheduled sink-packet
//! forwarding (non-sinks only), scheduled data-packet forwarding, then
//! aging of all three tables, in that fixed order.

use super::{beacon, EngineState, Emission};
use crate::codec::{encode, Packet};
use crate::diagnostics::Diagnostics;
use std::time::Instant;

pub(crate) fn run_tick(state: &mut EngineState, diag: &Diagnostics, now: Instant) -> Vec<Emission> {
    tracing::trace!(
        sink_entries = state.sink.iter().count(),
        "ctrl_in tick"
    );
    let mut out = Vec::new();

    if state.config.is_sink() {
        if let Some(bytes) = beacon::maybe_originate(state, now) {
            out.push(Emission::ToRadio(bytes));
        }
    } else {
        for sink_addr in state.sink.due_for_forwarding(now) {
            let Some(entry) = state.sink.get(&sink_addr) else {
                continue;
            };
            let pkt = Packet::Sink {
                sender: state.config.addr,
                source: sink_addr,
                seq: entry.highest_seq,
                hop_count: entry.min_hops,
            };
            out.push(Emission::ToRadio(encode(&pkt)));
            state.sink.mark_forwarded_at(&sink_addr, now);
        }
    }

    for key in state.data.due_for_forwarding(now, state.config.n_dupl) {
        let Some(entry) = state.data.get(&key) else {
            continue;
        };
        if let Some(bytes) = entry.pending_bytes.clone() {
            if state.config.debug {
                diag.log_error(&format!("ctrl_in: forwarding data packet {:?}", key));
            }
            out.push(Emission::ToRadio(bytes));
        }
        state.data.mark_forwarded_at(&key, now);
    }

    state.sink_neighbor.age(now, state.config.slt);
    state.sink.age(now, state.config.slt);
    state.data.age(now, state.config.plt);

    out
}
