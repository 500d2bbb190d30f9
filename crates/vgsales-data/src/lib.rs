//! # VGSales Data
//!
//! Loading of the delimited sales dataset and normalization of its release
//! years into a [`SalesTable`](vgsales_common::SalesTable) ready for
//! aggregation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod normalizer;

pub use loader::*;
pub use normalizer::*;
