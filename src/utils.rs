//! Helper modules for lsr.
//!
//! Currently only the command-line layer lives here; everything else sits
//! with the pipeline stage that uses it.

pub mod cli;
