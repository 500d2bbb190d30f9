//! # VGSales Graphs
//!
//! Regional sales aggregation and chart generation for the vgsales dashboard.
//!
//! Aggregations are pure functions over a [`SalesTable`](vgsales_common::SalesTable);
//! [`ChartSpecBuilder`] turns their results into declarative chart
//! specifications and [`ChartRenderer`] draws those with plotters.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod cached_aggregator;
pub mod chart;
pub mod renderer;
pub mod traits;
pub mod utils;

pub use aggregator::*;
pub use cached_aggregator::*;
pub use chart::*;
pub use renderer::*;
pub use traits::*;
pub use utils::*;
