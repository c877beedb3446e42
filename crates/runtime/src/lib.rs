pub mod context;
mod refresh;
pub mod selector;
pub mod stats;
mod store;

pub use context::{CONTEXT_DIR_ENV, ContextDetector};
pub use refresh::{ContextSource, RefreshLoop};
pub use selector::{WeightTable, pick_uniform, pick_weighted, select_tip};
pub use stats::SystemSnapshot;
pub use store::{CACHE_FILE_NAME, CacheStore, LOG_FILE_NAME, PID_FILE_NAME, StoreError};
