//! Cosmetic themes: the loaded catalog and its application to a target.
//!
//! Ownership of themes lives in the progress record; this module only knows
//! what themes exist and how they look.

mod apply;
mod catalog;

pub use apply::{CssTarget, ThemeApplier, ThemeTarget};
pub use catalog::{Theme, ThemeCatalog, ThemeSource};
