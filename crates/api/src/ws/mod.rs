//! WebSocket plumbing for realtime snapshot streams.

mod snapshot;

pub use snapshot::{stream_snapshots, SnapshotMessage};
