//! Demo-data generators driven by extracted schemas.

pub mod tables;
pub mod templates;
