//! Services that drive the split pipeline.

mod split;

pub use split::{CheckOutcome, DocumentSummary, SplitOutcome, SplitService};
