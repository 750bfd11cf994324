//! Rendering of entry batches for lsr.
//!
//! Dispatches one batch at a time to a layout strategy:
//! - long rows with per-batch field widths ([long])
//! - fitted multi-column output, across, commas and one-per-line ([grid])
//!
//! This module owns the helpers every layout shares: name quoting and
//! file-type indicators, terminal display width, and the optional
//! inode/block prefix.

pub mod grid;
pub mod long;

use crate::config::{Layout, Options, QuotingMode};
use crate::core::Entry;
use crate::icons;

use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

/// Render one batch of already filtered and sorted entries.
pub fn render_batch(out: &mut impl Write, entries: &[Entry], opts: &Options) -> io::Result<()> {
    match opts.layout {
        Layout::Long => long::render(out, entries, opts),
        Layout::OnePerLine => grid::render_one_per_line(out, entries, opts),
        Layout::Commas => grid::render_commas(out, entries, opts),
        Layout::Across => grid::render_across(out, entries, opts),
        Layout::Columns | Layout::Vertical => grid::render_columns(out, entries, opts),
    }
}

/// Display name after quoting and file-type indicators.
///
/// Exactly one quoting transformation applies; indicators are independent.
/// Directories and symlinks take precedence over the executable star.
pub fn format_name(entry: &Entry, opts: &Options) -> String {
    let mut name = match opts.quoting {
        QuotingMode::Literal => entry.name().to_string(),
        QuotingMode::Quote => format!("\"{}\"", entry.name()),
        QuotingMode::Escape => escape_name(entry.name()),
        QuotingMode::None => neutralize_controls(entry.name()),
    };

    if entry.is_dir() {
        if opts.classify || opts.slash_dirs {
            name.push('/');
        }
    } else if opts.classify {
        if entry.is_symlink() {
            name.push('@');
            if let Some(target) = entry.symlink_target() {
                name.push_str(" -> ");
                name.push_str(target);
            }
        } else if entry.is_executable() {
            name.push('*');
        }
    }

    name
}

/// Terminal cell count for a rendered string.
///
/// Wide characters count two cells. Codepoints without a width (controls)
/// fall back to their UTF-8 byte length, one cell per byte.
pub fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| UnicodeWidthChar::width(c).unwrap_or_else(|| c.len_utf8()))
        .sum()
}

/// 1024-byte blocks occupied by an entry, rounded up.
pub(crate) fn blocks(entry: &Entry) -> u64 {
    entry.size().div_ceil(1024)
}

/// Optional inode and block-count prefix shared by the short layouts.
/// Fixed widths; never part of column fitting.
pub(crate) fn prefix(entry: &Entry, opts: &Options) -> String {
    let mut p = String::new();
    if opts.show_inode {
        p.push_str(&format!("{:>8} ", entry.inode()));
    }
    if opts.show_blocks {
        p.push_str(&format!("{:>6} ", blocks(entry)));
    }
    p
}

/// Colored glyph and name span. The returned width covers the name only,
/// excluding the glyph and any escape sequences.
pub(crate) fn glyph_and_name(entry: &Entry, opts: &Options) -> (String, usize) {
    let name = format_name(entry, opts);
    let width = display_width(&name);
    let (glyph, color) = icons::classify(entry, opts.color);
    let text = if color.is_empty() {
        format!("{} {}", glyph, name)
    } else {
        format!("{}{} {}{}", color, glyph, name, icons::RESET)
    };
    (text, width)
}

/// C-style escaping: named escapes for the common controls and space,
/// octal escapes for every other control byte.
fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut buf = [0u8; 4];
    for ch in name.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            ' ' => out.push_str("\\ "),
            c if c.is_control() => {
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("\\{:03o}", b));
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Default transformation: control characters become `?`.
fn neutralize_controls(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_control() { '?' } else { c })
        .collect()
}
