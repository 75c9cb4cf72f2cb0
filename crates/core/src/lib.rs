//! Domain layer for the music library service.
//!
//! Holds the pieces that have no I/O: error kinds, the filter grammar,
//! field projection aliases, pagination rules and couplet slicing. Both the
//! repository layer and the HTTP layer build on these.

pub mod error;
pub mod fields;
pub mod filter;
pub mod lyrics;
pub mod pagination;
pub mod release_date;
pub mod types;
