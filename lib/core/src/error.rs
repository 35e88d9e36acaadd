//! Error handling foundation for the scorecard client.
//!
//! Errors travel as rootcause reports. Crates define their own error enums
//! and return `Result<T, TheirError>` through this alias; callers one layer
//! up wrap them with `.context()` instead of flattening them into strings.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
///
/// `C` is the report's context type; the default `()` is for call sites that
/// do not care about a typed context.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
