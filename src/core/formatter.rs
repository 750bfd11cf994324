//! Filtering and sorting for file entries in lsr.
//!
//! The [Formatter] struct holds the compiled ignore/hide patterns and the
//! sort settings for one invocation, and prepares each batch of entries for
//! rendering. Filtering is stateless per entry; sorting is stable, so entries
//! that compare equal keep their enumeration order.

use crate::config::{Options, SortKey, Visibility};
use crate::core::Entry;

use glob::Pattern;

use std::cmp::Ordering;

/// Filter and sort pipeline applied to every batch.
pub struct Formatter<'a> {
    opts: &'a Options,
    ignore: Vec<Pattern>,
    hide: Vec<Pattern>,
}

impl<'a> Formatter<'a> {
    /// Compile the glob pattern sets up front. A pattern that fails to
    /// compile is reported once and dropped; the listing continues.
    pub fn new(opts: &'a Options) -> Self {
        Formatter {
            opts,
            ignore: compile_patterns(&opts.ignore_patterns),
            hide: compile_patterns(&opts.hide_patterns),
        }
    }

    /// Drops entries excluded by visibility, backup and pattern rules.
    pub fn filter_entries(&self, entries: &mut Vec<Entry>) {
        entries.retain(|e| self.included(e));
    }

    /// Whether one entry survives filtering. Rules short-circuit in order:
    /// hidden-visibility, backup suffix, ignore patterns, hide patterns.
    pub fn included(&self, entry: &Entry) -> bool {
        let name = entry.name();

        if entry.is_hidden() {
            match self.opts.visibility {
                Visibility::Default => return false,
                Visibility::AlmostAll => {
                    if name == "." || name == ".." {
                        return false;
                    }
                }
                Visibility::All => {}
            }
        }

        if self.opts.ignore_backups && name.ends_with('~') {
            return false;
        }

        if self.ignore.iter().any(|p| p.matches(name)) {
            return false;
        }

        if self.hide.iter().any(|p| p.matches(name)) {
            return false;
        }

        true
    }

    /// Sorts the entries in place according to the selected key.
    ///
    /// With `SortKey::None` the slice is left in enumeration order and
    /// neither grouping nor reversal applies. Otherwise directories are
    /// optionally partitioned first, and a requested reverse is applied as
    /// the final step, so it also reverses the directory grouping.
    pub fn sort_entries(&self, entries: &mut [Entry]) {
        if self.opts.sort_key == SortKey::None {
            return;
        }

        let key = self.opts.sort_key;
        let kind = self.opts.time_kind;
        let fold = self.opts.case_insensitive;
        let dirs_first = self.opts.group_dirs_first;

        entries.sort_by(|a, b| {
            if dirs_first {
                match (a.is_dir(), b.is_dir()) {
                    (true, false) => return Ordering::Less,
                    (false, true) => return Ordering::Greater,
                    _ => {}
                }
            }
            match key {
                SortKey::Name => name_cmp(a.name(), b.name(), fold),
                SortKey::Time => b.time(kind).cmp(&a.time(kind)),
                SortKey::Size => b.size().cmp(&a.size()),
                SortKey::Extension => a
                    .extension()
                    .cmp(b.extension())
                    .then_with(|| name_cmp(a.name(), b.name(), fold)),
                SortKey::Version => version_cmp(a.name(), b.name()),
                SortKey::None => Ordering::Equal,
            }
        });

        if self.opts.reverse {
            entries.reverse();
        }
    }
}

fn compile_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                eprintln!("lsr: invalid pattern '{}': {}", p, e);
                None
            }
        })
        .collect()
}

/// Name comparison, optionally case-folded. Plain codepoint order stands in
/// for locale collation; dot-prefixed names sort before letters either way.
fn name_cmp(a: &str, b: &str, fold: bool) -> Ordering {
    if fold {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    } else {
        a.cmp(b)
    }
}

/// Natural version ordering: runs of ASCII digits compare by numeric value,
/// everything else byte-wise. `file2` sorts before `file10`.
pub fn version_cmp(a: &str, b: &str) -> Ordering {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let run_a = digit_run(a, &mut i);
            let run_b = digit_run(b, &mut j);
            let trimmed_a = trim_leading_zeros(run_a);
            let trimmed_b = trim_leading_zeros(run_b);

            let ord = trimmed_a
                .len()
                .cmp(&trimmed_b.len())
                .then_with(|| trimmed_a.cmp(trimmed_b))
                // Equal values with different zero-padding still need a
                // deterministic order.
                .then_with(|| run_a.len().cmp(&run_b.len()));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = a[i].cmp(&b[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }

    (a.len() - i).cmp(&(b.len() - j))
}

fn digit_run<'s>(s: &'s [u8], pos: &mut usize) -> &'s [u8] {
    let start = *pos;
    while *pos < s.len() && s[*pos].is_ascii_digit() {
        *pos += 1;
    }
    &s[start..*pos]
}

fn trim_leading_zeros(run: &[u8]) -> &[u8] {
    let mut start = 0;
    while start + 1 < run.len() && run[start] == b'0' {
        start += 1;
    }
    &run[start..]
}
