//! Normalization of heterogeneous content fragments.
//!
//! `fragment` classifies raw JSON by shape, `normalize` maps each shape to an
//! `Item` tree and `builder` folds fragment sequences into `Block`s. Problems
//! are collected in `diagnostics` instead of aborting.

pub mod builder;
pub mod diagnostics;
pub mod fragment;
pub mod normalize;

pub use builder::{block_fragments, build_block, BlockBuilder};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use fragment::{Fragment, ItemBody};
pub use normalize::{normalize, Normalized};
