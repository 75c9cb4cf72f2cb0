//! Request guards and extractors.
//!
//! - [`extract::ApiJson`], [`extract::ApiQuery`] -- body and query extractors
//!   whose rejections use the JSON error body.
//! - [`extract::SongIdPath`] -- validated positive song id from the path.
//! - [`header_limit::limit_header_size`] -- rejects oversized request headers.

pub mod extract;
pub mod header_limit;
