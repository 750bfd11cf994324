//! Short layouts: fitted columns, across, commas and one-per-line.
//!
//! The fitted layout fills column-major and searches row counts upward; the
//! first count whose total width fits the terminal wins. Across uses one
//! uniform column width instead and fills row-major.

use crate::config::Options;
use crate::core::Entry;

use std::io::{self, Write};

/// Multi-column layout, column-major fill.
pub fn render_columns(out: &mut impl Write, entries: &[Entry], opts: &Options) -> io::Result<()> {
    let cells: Vec<(String, usize)> = entries
        .iter()
        .map(|e| super::glyph_and_name(e, opts))
        .collect();
    let widths: Vec<usize> = cells.iter().map(|(_, w)| *w).collect();
    let (rows, col_widths) = fit_columns(&widths, effective_width(opts));

    for row in 0..rows {
        for (col, &col_width) in col_widths.iter().enumerate() {
            let idx = col * rows + row;
            let Some((text, width)) = cells.get(idx) else {
                continue;
            };
            write!(out, "{}{}", super::prefix(&entries[idx], opts), text)?;

            let row_continues =
                col + 1 < col_widths.len() && (col + 1) * rows + row < cells.len();
            if row_continues {
                write!(out, "{:pad$}", "", pad = col_width - width + 2)?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Row-major layout with one uniform column width.
pub fn render_across(out: &mut impl Write, entries: &[Entry], opts: &Options) -> io::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    let cells: Vec<(String, usize)> = entries
        .iter()
        .map(|e| super::glyph_and_name(e, opts))
        .collect();
    let max_width = cells.iter().map(|(_, w)| *w).max().unwrap_or(0);
    let cols_per_row = (effective_width(opts) / (max_width + 2)).max(1);

    for (idx, (text, width)) in cells.iter().enumerate() {
        write!(out, "{}{}", super::prefix(&entries[idx], opts), text)?;
        if (idx + 1) % cols_per_row == 0 || idx + 1 == cells.len() {
            writeln!(out)?;
        } else {
            write!(out, "{:pad$}", "", pad = max_width - width + 2)?;
        }
    }
    Ok(())
}

/// All names on one line, joined with `", "`. Terminal width is ignored.
pub fn render_commas(out: &mut impl Write, entries: &[Entry], opts: &Options) -> io::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    for (idx, entry) in entries.iter().enumerate() {
        if idx > 0 {
            write!(out, ", ")?;
        }
        let (text, _) = super::glyph_and_name(entry, opts);
        write!(out, "{}{}", super::prefix(entry, opts), text)?;
    }
    writeln!(out)
}

/// Each entry on its own line.
pub fn render_one_per_line(
    out: &mut impl Write,
    entries: &[Entry],
    opts: &Options,
) -> io::Result<()> {
    for entry in entries {
        let (text, _) = super::glyph_and_name(entry, opts);
        writeln!(out, "{}{}", super::prefix(entry, opts), text)?;
    }
    Ok(())
}

/// Pick a row count and per-column widths for the fitted layout.
///
/// Tries `rows = 1, 2, 3, ...`; for each candidate, entries fill columns
/// top to bottom and the cost is the sum of `colWidth + 2` minus the
/// trailing gutter. The first row count that fits wins. When nothing fits,
/// falls back to a single column.
///
/// # Returns
///
/// The chosen row count and the width of each column.
pub(crate) fn fit_columns(widths: &[usize], term_width: usize) -> (usize, Vec<usize>) {
    let n = widths.len();
    if n == 0 {
        return (0, Vec::new());
    }

    for rows in 1..=n {
        let cols = n.div_ceil(rows);
        let mut col_widths = vec![0usize; cols];
        for (i, &w) in widths.iter().enumerate() {
            let col = i / rows;
            if w > col_widths[col] {
                col_widths[col] = w;
            }
        }

        let total: usize = col_widths.iter().map(|w| w + 2).sum::<usize>() - 2;
        if total <= term_width {
            return (rows, col_widths);
        }
    }

    let max = widths.iter().copied().max().unwrap_or(0);
    (n, vec![max])
}

/// Output width: the explicit override when set, otherwise the terminal's
/// reported column count, falling back to 80.
fn effective_width(opts: &Options) -> usize {
    if opts.width > 0 {
        return opts.width;
    }
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => cols as usize,
        _ => 80,
    }
}
