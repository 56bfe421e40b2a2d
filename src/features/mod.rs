//! Feature assembly for the classifier.
//!
//! Turns matchups plus the offense/defense profile tables into a fixed-width
//! feature matrix.

pub mod builder;
pub mod profile;
pub mod schema;

pub use builder::{AssemblyReport, DropReason, FeatureBuilder, FeatureMatrix, FeatureRow};
pub use profile::{Lookup, ProfileKind, ProfileTable, ProfileTables};
pub use schema::{FeatureSchema, FeatureSlot};
