// Cache module for the activity snapshot.
// Storage backends plus the gate that decides between cache and network.

pub mod gate;
pub mod paths;
pub mod store;

pub use gate::{CacheGate, DEFAULT_CACHE_KEY};
pub use store::{FileStore, KeyValueStore};
