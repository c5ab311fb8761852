//! Low-level text helpers shared by the importer.

pub mod csv;
pub(crate) mod text;
