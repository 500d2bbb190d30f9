//! # VGSales I18n
//!
//! Internationalization support using the Fluent localization system.
//!
//! Translations are embedded at compile time; every locale falls back to
//! `en-US` for messages it does not define.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod locale;
pub mod messages;

pub use loader::*;
pub use locale::*;
pub use messages::*;
