//! The three soft-state tables (`spec.md` §3.3), each a thin typed
//! wrapper over a `HashMap` with an `age` sweep. Values are rebuilt
//! wholesale on update rather than mutated field-by-field in place, the
//! Rust analogue of the original's `namedtuple` rebuild-on-write, per
//! `spec.md` §9.

pub mod data;
pub mod sink;
pub mod sink_neighbor;

pub use data::{DataEntry, DataKey, DataTable};
pub use sink::{SinkEntry, SinkTable};
pub use sink_neighbor::{SinkNeighborEntry, SinkNeighborKey, SinkNeighborTable};
