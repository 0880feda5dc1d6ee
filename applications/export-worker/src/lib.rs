//! OpenMusic Export Worker
//!
//! Long-running consumer of the export queue. It shares nothing with the
//! server except the database and the queue: each job is re-read from the
//! database at processing time and mailed as a JSON attachment.

pub mod config;
pub mod source;

pub use config::WorkerConfig;
pub use source::StoreSnapshots;
