//! Wire-level identifiers shared by the codec, tables, and engine.
//!
//! Newtypes over `u8` so an `Addr` and a `SeqNum` can't be swapped at a
//! call site, the same reasoning `merkle-tox-core::dag` applies to
//! `NodeHash`/`PhysicalDevicePk` rather than passing raw byte arrays
//! around.

use std::fmt;

/// An 8-bit node address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "config-toml", derive(serde::Serialize, serde::Deserialize))]
pub struct Addr(pub u8);

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Addr {
    fn from(v: u8) -> Self {
        Addr(v)
    }
}

/// An 8-bit sequence number. Comparison is plain integer order, not
/// wrap-aware (preserved intentionally, see `spec.md` §9 design note (c)
/// and §3.4 invariant 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeqNum(pub u8);

impl SeqNum {
    pub fn wrapping_next(self) -> SeqNum {
        SeqNum(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for SeqNum {
    fn from(v: u8) -> Self {
        SeqNum(v)
    }
}

/// An 8-bit hop count, zero at the originating sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HopCount(pub u8);

impl HopCount {
    pub fn plus_one(self) -> HopCount {
        HopCount(self.0.saturating_add(1))
    }
}

impl fmt::Display for HopCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for HopCount {
    fn from(v: u8) -> Self {
        HopCount(v)
    }
}

/// The protocol ID carried in every packet's first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtoId {
    Data = 0,
    Sink = 1,
    Noti = 2,
}

impl ProtoId {
    pub fn from_byte(b: u8) -> Option<ProtoId> {
        match b {
            0 => Some(ProtoId::Data),
            1 => Some(ProtoId::Sink),
            2 => Some(ProtoId::Noti),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ProtoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProtoId::Data => "DATA",
            ProtoId::Sink => "SINK",
            ProtoId::Noti => "NOTI",
        };
        write!(f, "{s}")
    }
}
