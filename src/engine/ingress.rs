//! `from_radio` and `from_app` dispatch, `spec.md` §4.1/§4.6. Grounded on
//! `dflood.py`'s `radio_rx`/`_app_rx`/`send_pkt_radio`.

use super::handlers;
use super::{EngineState, Emission};
use crate::codec::{decode, encode, Packet};
use crate::diagnostics::Diagnostics;
use crate::metadata::Metadata;

pub(crate) fn handle_from_radio(
    state: &mut EngineState,
    diag: &Diagnostics,
    bytes: &[u8],
    meta: &Metadata,
) -> Vec<Emission> {
    let Some(pkt) = decode(state.config.addr, bytes, meta) else {
        return vec![];
    };
    let now = state.clock.now();

    match pkt {
        Packet::Sink {
            sender,
            source,
            seq,
            hop_count,
        } => {
            handlers::handle_sink_packet(state, diag, sender, source, seq, hop_count, now);
            vec![]
        }
        Packet::Noti { sender, source, seq } => {
            handlers::handle_noti_packet(state, sender, source, seq);
            vec![]
        }
        Packet::Data {
            sender,
            source,
            seq,
            hop_count,
            dest_sink,
            ttl,
            payload,
        } => handlers::handle_data_packet(
            state, diag, sender, source, seq, hop_count, dest_sink, ttl, payload, meta, now,
        ),
    }
}

/// Locally-originated payload, addressed to `config.sink_addr`. Dropped
/// silently when no gradient to that sink is known yet, matching
/// `send_pkt_radio`'s `if not SINK_ADDR in sinkTable: drop`.
pub(crate) fn handle_from_app(
    state: &mut EngineState,
    diag: &Diagnostics,
    bytes: &[u8],
    _meta: &Metadata,
) -> Vec<Emission> {
    let sink_addr = state.config.sink_addr;
    let Some(sink_entry) = state.sink.get(&sink_addr) else {
        if state.config.debug {
            diag.log_error(&format!("dropping locally-originated packet: no gradient to {sink_addr}"));
        }
        return vec![];
    };
    let my_hops = sink_entry.min_hops;
    let ttl = my_hops.0.saturating_add(state.config.r);

    let seq = state.pkt_cnt;
    state.pkt_cnt = seq.wrapping_next();

    let pkt = Packet::Data {
        sender: state.config.addr,
        source: state.config.addr,
        seq,
        hop_count: my_hops,
        dest_sink: sink_addr,
        ttl,
        payload: bytes.to_vec(),
    };
    if state.config.debug {
        diag.log_error(&format!("sending packet: {pkt}"));
    }
    vec![Emission::ToRadio(encode(&pkt))]
}
