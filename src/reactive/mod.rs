//! Explicit recomputation graph between the body-mass slider and the
//! dashboard outputs.
//!
//! - [`RangeInput`]: the clamped threshold control value.
//! - [`ReactiveGraph`]: owns the input, the memoized [`graph::DerivedDataset`] and a
//!   name → compute function table of outputs.
//!
//! Everything is single-threaded; the source table is shared through `Rc`.

pub mod graph;
pub mod input;

pub use graph::{Artifact, ReactiveGraph};
pub use input::RangeInput;
