pub mod disjoint_set;
pub mod error;
pub mod simulate;

pub use disjoint_set::DisjointSet;
pub use error::UnionFindError;
pub use simulate::{run_trial, ConnectivitySimulator, SitePicker, TrialSummary};
