//! Per-protocol-ID receive handlers, `spec.md` §4.3–§4.5. Grounded on
//! `dflood.py`'s `handle_sink_packet`/`handle_data_packet`/
//! `handle_receive_notification`.

use super::{EngineState, Emission};
use crate::codec::{encode, Packet};
use crate::config::backoff;
use crate::diagnostics::Diagnostics;
use crate::metadata::Metadata;
use crate::proto::{Addr, HopCount, SeqNum};
use crate::tables::data::DataEntry;
use crate::tables::sink::SinkEntry;
use crate::tables::sink_neighbor::SinkNeighborEntry;
use rand::Rng;
use std::time::{Duration, Instant};

/// Exponential moving average with weight `alpha` on history, matching
/// `dflood.py`: `new = alpha*old + (1-alpha)*sample`.
const NEIGHBOR_INTERVAL_ALPHA: f64 = 0.8;

fn ema(old: Duration, sample: Duration, alpha: f64) -> Duration {
    let new_secs = alpha * old.as_secs_f64() + (1.0 - alpha) * sample.as_secs_f64();
    Duration::from_secs_f64(new_secs.max(0.0))
}

pub(crate) fn handle_sink_packet(
    state: &mut EngineState,
    _diag: &Diagnostics,
    sender: Addr,
    source: Addr,
    seq: SeqNum,
    hc: HopCount,
    now: Instant,
) {
    // --- Sink-neighbor table (spec.md §4.3 step 1) ---
    let neighbor_key = (sender, source);
    let new_interval = match state.sink_neighbor.get(&neighbor_key) {
        None => state.config.broadcast_interval,
        Some(old) => ema(old.estimated_interval, now.duration_since(old.last_heard), NEIGHBOR_INTERVAL_ALPHA),
    };
    state.sink_neighbor.insert(
        neighbor_key,
        SinkNeighborEntry {
            last_seq: seq,
            min_hops_to_sink: hc,
            last_heard: now,
            estimated_interval: new_interval,
        },
    );
    tracing::debug!(sender = sender.0, source = source.0, "updated sink-neighbor entry");

    // --- Broadcast-interval arbitration (spec.md §4.3 step 2) ---
    // Reads `new_interval` from the entry just touched, not from whichever
    // neighbor holds the minimum address (preserved per spec.md §9 design
    // note (b)).
    if let Some(min_addr) = state.sink_neighbor.min_sender_addr() {
        if state.config.addr > min_addr {
            state.config.broadcast_interval = new_interval;
        }
    }

    // --- Sink table (spec.md §4.3 step 3) ---
    match state.sink.get(&source) {
        None => {
            state.sink.insert(
                source,
                SinkEntry {
                    highest_seq: seq,
                    min_hops: hc.plus_one(),
                    last_heard: now,
                    forwarding_time: now + backoff::SMALL,
                    scheduled: true,
                    tentative_min_hops: hc,
                },
            );
            tracing::debug!(sink = source.0, "new sink-table entry, scheduled for small backoff");
        }
        Some(existing) => {
            let mut e = existing.clone();
            if seq.0 > e.highest_seq.0 {
                e.highest_seq = seq;
                e.tentative_min_hops = hc;
                e.scheduled = true;
                e.forwarding_time = now
                    + if hc.0 > e.min_hops.0 {
                        backoff::LARGE
                    } else {
                        backoff::SMALL
                    };
            } else if seq.0 == e.highest_seq.0 {
                if !e.scheduled {
                    if hc.0 < e.min_hops.0 {
                        e.forwarding_time = now + backoff::LOW;
                        e.scheduled = true;
                        e.tentative_min_hops = hc;
                    }
                    // else: intentional fallthrough, no scheduling change
                    // (spec.md §9 design note (a)).
                } else if hc.0 < e.tentative_min_hops.0 {
                    e.tentative_min_hops = hc;
                }
            }
            // seq < highest_seq: stale beacon, no field changes besides
            // last_heard below.
            e.last_heard = now;
            state.sink.insert(source, e);
        }
    }
}

pub(crate) fn handle_data_packet(
    state: &mut EngineState,
    diag: &Diagnostics,
    sender: Addr,
    source: Addr,
    seq: SeqNum,
    hc: HopCount,
    dest_sink: Addr,
    ttl: u8,
    payload: Vec<u8>,
    meta: &Metadata,
    now: Instant,
) -> Vec<Emission> {
    let _ = sender;

    if dest_sink == state.config.addr {
        let noti = Packet::Noti {
            sender: state.config.addr,
            source,
            seq,
        };
        if state.config.debug {
            diag.log_error(&format!("delivering payload from {source} seq {seq}"));
        }
        diag.log_data(&format!("{source} {seq} {payload:?}"));
        return vec![
            Emission::ToRadio(encode(&noti)),
            Emission::ToApp {
                payload,
                meta: meta.clone(),
            },
        ];
    }

    let Some(sink_entry) = state.sink.get(&dest_sink) else {
        if state.config.debug {
            diag.log_error(&format!("no gradient to {dest_sink}, dropping data packet"));
        }
        return vec![];
    };
    let my_hops = sink_entry.min_hops;

    if (ttl as i16) - 1 < my_hops.0 as i16 {
        tracing::debug!(ttl, my_hops = my_hops.0, "TTL too small, dropping data packet");
        if state.config.debug {
            diag.log_error("TTL too small, dropping data packet");
        }
        return vec![];
    }

    let key = (source, dest_sink, seq);
    match state.data.get(&key) {
        None => {
            let rewritten = Packet::Data {
                sender: state.config.addr,
                source,
                seq,
                hop_count: my_hops,
                dest_sink,
                ttl: ttl - 1,
                payload,
            };
            let bytes = encode(&rewritten);
            let jitter: f64 = state.rng.gen();
            let span = state.config.t_max - state.config.t_min;
            let forwarding_time = now + state.config.t_min + span.mul_f64(jitter);
            state.data.insert(
                key,
                DataEntry {
                    pending_bytes: Some(bytes),
                    last_heard: now,
                    forwarding_time,
                    scheduled: true,
                    duplicates: 0,
                },
            );
        }
        Some(existing) if hc.0 <= my_hops.0 => {
            let mut e = existing.clone();
            e.duplicates += 1;
            e.scheduled = e.duplicates < state.config.n_dupl;
            tracing::debug!(duplicates = e.duplicates, scheduled = e.scheduled, "duplicate data packet counted");
            state.data.insert(key, e);
        }
        Some(_) => {
            // Overheard copy's hop count is strictly greater than ours:
            // came from further out, doesn't count as redundant coverage.
        }
    }
    vec![]
}

pub(crate) fn handle_noti_packet(state: &mut EngineState, sender: Addr, source: Addr, seq: SeqNum) {
    let key = (source, sender, seq);
    if state.data.cancel(&key) {
        tracing::debug!(source = source.0, dest_sink = sender.0, seq = seq.0, "NOTI cancelled pending forward");
    }
}
