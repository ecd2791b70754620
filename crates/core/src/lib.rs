pub mod aggregate;
pub mod columns;
pub mod event;
pub mod severity;

pub use aggregate::{coverage, notable_events, top_n, value_counts, AggregateRow};
pub use columns::{source_aliases, Column};
pub use event::{CleanedTable, EventRecord};
pub use severity::SeverityClass;
