//! Decode/encode the three on-wire packet shapes (`spec.md` §3.2) and the
//! ingress validation pipeline (`spec.md` §4.1), grounded on
//! `dflood.py`'s `_radio_rx` validation order: CRC, protocol ID, length,
//! then self-origin.

use crate::metadata::{crc_ok, Metadata};
use crate::proto::{Addr, HopCount, ProtoId, SeqNum};
use std::fmt;

pub const SINK_PKT_LENGTH: usize = 5;
pub const NOTI_PKT_LENGTH: usize = 4;
pub const DATA_PKT_MIN_LENGTH: usize = 7;

/// A decoded, validated packet.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Sink {
        sender: Addr,
        source: Addr,
        seq: SeqNum,
        hop_count: HopCount,
    },
    Noti {
        sender: Addr,
        source: Addr,
        seq: SeqNum,
    },
    Data {
        sender: Addr,
        source: Addr,
        seq: SeqNum,
        hop_count: HopCount,
        dest_sink: Addr,
        ttl: u8,
        payload: Vec<u8>,
    },
}

impl Packet {
    pub fn proto_id(&self) -> ProtoId {
        match self {
            Packet::Data { .. } => ProtoId::Data,
            Packet::Sink { .. } => ProtoId::Sink,
            Packet::Noti { .. } => ProtoId::Noti,
        }
    }

    pub fn sender(&self) -> Addr {
        match self {
            Packet::Data { sender, .. } | Packet::Sink { sender, .. } | Packet::Noti { sender, .. } => {
                *sender
            }
        }
    }

    pub fn source(&self) -> Addr {
        match self {
            Packet::Data { source, .. } | Packet::Sink { source, .. } | Packet::Noti { source, .. } => {
                *source
            }
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Packet::Sink {
                sender,
                source,
                seq,
                hop_count,
            } => write!(
                f,
                "PROT ID: {} (SINK) SNDR: {sender} SINK: {source} SN: {seq} HC: {hop_count}",
                ProtoId::Sink
            ),
            Packet::Noti { sender, source, seq } => {
                write!(f, "PROT ID: {} (NOTI) SNDR: {sender} SRC: {source} SN: {seq}", ProtoId::Noti)
            }
            Packet::Data {
                sender,
                source,
                seq,
                hop_count,
                dest_sink,
                ttl,
                payload,
            } => write!(
                f,
                "PROT ID: {} (DATA) SNDR: {sender} SNSOR: {source} SN: {seq} HC: {hop_count} DST: {dest_sink} TTL: {ttl} DATA: {payload:?}",
                ProtoId::Data
            ),
        }
    }
}

/// Decodes and validates a raw frame. Returns `None` on any rejection
/// (malformed structure, CRC failure, unknown protocol ID, wrong length,
/// or a self-originated frame), a silent no-op per `spec.md` §4.1/§7.
pub fn decode(self_addr: Addr, bytes: &[u8], meta: &Metadata) -> Option<Packet> {
    if !crc_ok(meta) {
        return None;
    }
    let proto_byte = *bytes.first()?;
    let proto = ProtoId::from_byte(proto_byte)?;

    let valid_length = match proto {
        ProtoId::Data => bytes.len() >= DATA_PKT_MIN_LENGTH,
        ProtoId::Sink => bytes.len() == SINK_PKT_LENGTH,
        ProtoId::Noti => bytes.len() == NOTI_PKT_LENGTH,
    };
    if !valid_length {
        return None;
    }

    let sender = Addr(bytes[1]);
    let source = Addr(bytes[2]);
    if sender == self_addr || source == self_addr {
        return None;
    }

    let seq = SeqNum(bytes[3]);
    match proto {
        ProtoId::Sink => Some(Packet::Sink {
            sender,
            source,
            seq,
            hop_count: HopCount(bytes[4]),
        }),
        ProtoId::Noti => Some(Packet::Noti { sender, source, seq }),
        ProtoId::Data => Some(Packet::Data {
            sender,
            source,
            seq,
            hop_count: HopCount(bytes[4]),
            dest_sink: Addr(bytes[5]),
            ttl: bytes[6],
            payload: bytes[DATA_PKT_MIN_LENGTH..].to_vec(),
        }),
    }
}

/// Encodes a packet into its on-wire byte vector.
pub fn encode(pkt: &Packet) -> Vec<u8> {
    match pkt {
        Packet::Sink {
            sender,
            source,
            seq,
            hop_count,
        } => vec![ProtoId::Sink.as_byte(), sender.0, source.0, seq.0, hop_count.0],
        Packet::Noti { sender, source, seq } => {
            vec![ProtoId::Noti.as_byte(), sender.0, source.0, seq.0]
        }
        Packet::Data {
            sender,
            source,
            seq,
            hop_count,
            dest_sink,
            ttl,
            payload,
        } => {
            let mut out = Vec::with_capacity(DATA_PKT_MIN_LENGTH + payload.len());
            out.push(ProtoId::Data.as_byte());
            out.push(sender.0);
            out.push(source.0);
            out.push(seq.0);
            out.push(hop_count.0);
            out.push(dest_sink.0);
            out.push(*ttl);
            out.extend_from_slice(payload);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetaValue;

    fn meta() -> Metadata {
        Metadata::new()
    }

    #[test]
    fn decode_rejects_bad_crc() {
        let mut m = meta();
        m.insert("CRC_OK".to_string(), MetaValue::Bool(false));
        let bytes = [1u8, 1, 0, 0, 0];
        assert!(decode(Addr(5), &bytes, &m).is_none());
    }

    #[test]
    fn decode_rejects_unknown_proto_id() {
        let bytes = [3u8, 1, 0, 0, 0];
        assert!(decode(Addr(5), &bytes, &meta()).is_none());
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let bytes = [1u8, 1, 0, 0]; // SINK needs 5
        assert!(decode(Addr(5), &bytes, &meta()).is_none());
    }

    #[test]
    fn decode_rejects_self_sender_or_source() {
        let bytes = [1u8, 5, 0, 0, 0]; // sender == self
        assert!(decode(Addr(5), &bytes, &meta()).is_none());
        let bytes2 = [1u8, 1, 5, 0, 0]; // source == self
        assert!(decode(Addr(5), &bytes2, &meta()).is_none());
    }

    #[test]
    fn decode_sink_packet() {
        let bytes = [1u8, 1, 0, 7, 2];
        let pkt = decode(Addr(9), &bytes, &meta()).unwrap();
        assert_eq!(
            pkt,
            Packet::Sink {
                sender: Addr(1),
                source: Addr(0),
                seq: SeqNum(7),
                hop_count: HopCount(2),
            }
        );
    }

    #[test]
    fn decode_data_packet_with_payload() {
        let bytes = [0u8, 2, 2, 7, 0, 0, 5, 0xAA];
        let pkt = decode(Addr(1), &bytes, &meta()).unwrap();
        assert_eq!(
            pkt,
            Packet::Data {
                sender: Addr(2),
                source: Addr(2),
                seq: SeqNum(7),
                hop_count: HopCount(0),
                dest_sink: Addr(0),
                ttl: 5,
                payload: vec![0xAA],
            }
        );
    }

    #[test]
    fn decode_noti_packet() {
        let bytes = [2u8, 5, 9, 3];
        let pkt = decode(Addr(1), &bytes, &meta()).unwrap();
        assert_eq!(
            pkt,
            Packet::Noti {
                sender: Addr(5),
                source: Addr(9),
                seq: SeqNum(3),
            }
        );
    }

    #[test]
    fn round_trips_through_encode_decode() {
        let original = Packet::Data {
            sender: Addr(2),
            source: Addr(2),
            seq: SeqNum(7),
            hop_count: HopCount(0),
            dest_sink: Addr(0),
            ttl: 5,
            payload: vec![0xAA, 0xBB],
        };
        let bytes = encode(&original);
        let decoded = decode(Addr(1), &bytes, &meta()).unwrap();
        assert_eq!(decoded, original);
    }
}
