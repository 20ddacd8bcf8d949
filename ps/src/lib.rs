//! PlanStore - key-value persistence for planning records
//!
//! Each record type lives in its own collection, stored as one JSON array
//! file. Writes go through a temporary file and a rename so a crashed write
//! never leaves a truncated collection behind.
//!
//! # Layout
//!
//! ```text
//! ~/.local/share/chantier/
//! ├── tasks.json
//! ├── time_entries.json
//! └── active_timers.json
//! ```
//!
//! # Example
//!
//! ```ignore
//! use planstore::Store;
//!
//! let store = Store::open("/tmp/chantier")?;
//! store.upsert(&task)?;
//! let tasks: Vec<Task> = store.list()?;
//! store.remove::<Task>(&task.id)?;
//! ```

mod store;

pub use store::{Record, Store};
