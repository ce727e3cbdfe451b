pub mod clock;
pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod ports;
pub mod proto;
pub mod tables;
pub mod testing;

pub use codec::Packet;
pub use config::DfloodConfig;
pub use engine::{DfloodEngine, Emission};
pub use error::{DfloodError, DfloodResult};
pub use metadata::{MetaValue, Metadata};
pub use ports::PortAdapter;
pub use proto::{Addr, HopCount, ProtoId, SeqNum};
