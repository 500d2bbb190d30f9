//! # VGSales Dashboard
//!
//! Headless video game sales dashboard. Loads the sales dataset, keeps the
//! year-range and per-tab platform selections, and renders one tab of four
//! charts per sales region to PNG, SVG or JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod error;
pub mod export;
pub mod shell;

pub use app::*;
pub use error::*;
pub use export::*;
pub use shell::*;
