//! Table and column structures shared by the importer and the inferrer.

pub mod column;
pub mod header;
pub mod table;
