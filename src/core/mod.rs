//! Pure table transforms: cleaning, size ordering, pivoting

pub mod dates;
pub mod normalizer;
pub mod pivot;
pub mod size_order;

pub use normalizer::{normalize, Normalizer};
pub use pivot::{pivot, DataIssue, IssueKind, PivotEngine, PivotOutput, PivotStats};
pub use size_order::{SizeOrder, SizeRank};
