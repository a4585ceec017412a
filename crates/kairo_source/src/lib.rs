//! Source locations for diagnostics emitted by the Kairo IR layer.
//!
//! This crate provides the [`FileId`] and [`Span`] types used to tag
//! diagnostics and IR entities with their origin in source text. Loading and
//! managing the source files themselves is the host frontend's concern.

#![warn(missing_docs)]

pub mod file_id;
pub mod span;

pub use file_id::FileId;
pub use span::Span;
