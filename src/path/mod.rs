//! Schema-independent access into value trees
//!
//! - `get`: read with a default, never fails
//! - `modify`: transform one value in place, reports `NotFound`
//! - `modify_multiple`: transform many paths, collecting per-path failures

mod access;
mod errors;
mod segments;

pub use access::{get, get_with, lookup, lookup_mut, modify, modify_multiple, try_modify, Modification};
pub use errors::PathError;
pub use segments::{PathSegment, ValuePath};
