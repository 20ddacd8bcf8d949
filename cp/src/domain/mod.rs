//! Domain types for Chantier
//!
//! Core domain types: Task, TimeEntry, AiPrompt.
//! Task and TimeEntry implement the Record trait for PlanStore persistence.

mod category;
mod id;
mod priority;
mod prompt;
mod task;
mod time_entry;

pub use category::Category;
pub use id::generate_id;
pub use priority::Priority;
pub use prompt::AiPrompt;
pub use task::{Material, Task, TaskStatus, hours_to_duration};
pub use time_entry::TimeEntry;

#[cfg(test)]
pub(crate) use task::tests::sample_task;

// Re-export planstore types for convenience
pub use planstore::{Record, Store};
