//! Core listing logic for lsr.
//!
//! This module contains the non-rendering "engine" pieces of the program:
//! - [fm]: the per-entry metadata snapshot (see [Entry]).
//! - [walk]: target expansion into ordered batches (see [collect_batches], [Batch]).
//! - [formatter]: the filter and sort pipeline applied to each batch (see [Formatter]).
//!
//! Most callers will import [Entry], [Batch] and [collect_batches] from this module.

pub mod fm;
pub mod formatter;
pub mod walk;

pub use fm::Entry;
pub use formatter::{Formatter, version_cmp};
pub use walk::{Batch, collect_batches};
