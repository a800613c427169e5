//! Block-aware scanning for the policy template DSL.
//!
//! The DSL delimits blocks with `do` ... `end`, but template prose, quoted
//! strings and heredocs may themselves contain those words. The scanner
//! therefore threads a [`LexState`] through every pass so that keyword
//! matching only happens outside literals.

mod blocks;
mod lexer;

pub use blocks::{find_blocks, scan_block, ScanSpan};
pub use lexer::LexState;
