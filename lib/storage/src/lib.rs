pub mod dataset;
pub mod snapshot;

pub use dataset::{assign_ids, load_dataset, restore_into};
pub use snapshot::{SnapshotStore, SNAPSHOT_FILE};
