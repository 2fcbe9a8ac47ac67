//! Analysis modules.
//!
//! `extractor` reads the report sections; `derived` computes ratios and
//! tables on top of the extracted values.

pub mod derived;
pub mod extractor;

pub use derived::*;
pub use extractor::*;
