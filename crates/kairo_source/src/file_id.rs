//! Opaque identifier for source files in a compilation session.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a source file in a compilation session.
///
/// File IDs are assigned by the host frontend when it loads sources. They
/// are used in [`Span`](crate::Span) to associate byte ranges with their
/// source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// A dummy file ID used for synthetic spans (e.g., generated IR).
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Creates a `FileId` from a raw `u32` value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw `u32` value of this `FileId`.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}
