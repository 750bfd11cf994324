//! Long-format rows: permissions, counts, sizes and timestamps.
//!
//! Field widths are measured fresh for every batch, so each directory in a
//! multi-target listing aligns independently.

use crate::config::Options;
use crate::core::Entry;
use crate::icons;

use chrono::{DateTime, Local};
use std::io::{self, Write};
use std::time::SystemTime;

const READ_COLOR: &str = "\x1b[38;2;76;175;80m";
const WRITE_COLOR: &str = "\x1b[38;2;255;202;61m";
const EXEC_COLOR: &str = "\x1b[38;2;239;83;80m";

/// Six months, the cutoff between recent and dated timestamps.
const RECENT_CUTOFF_HOURS: i64 = 24 * 30 * 6;

/// Right/left alignment widths for one batch, measured before any row is
/// printed and discarded afterwards.
#[derive(Default)]
struct Widths {
    inode: usize,
    blocks: usize,
    links: usize,
    owner: usize,
    group: usize,
    size: usize,
}

impl Widths {
    fn measure(entries: &[Entry], opts: &Options) -> Widths {
        let mut w = Widths::default();
        for entry in entries {
            w.inode = w.inode.max(digits(entry.inode()));
            w.blocks = w.blocks.max(digits(super::blocks(entry)));
            w.links = w.links.max(digits(entry.hard_links()));
            w.owner = w.owner.max(entry.owner().len());
            w.group = w.group.max(entry.group().len());
            w.size = w.size.max(format_size(entry.size(), opts).len());
        }
        w
    }
}

/// Render one batch in long format.
pub fn render(out: &mut impl Write, entries: &[Entry], opts: &Options) -> io::Result<()> {
    let widths = Widths::measure(entries, opts);

    if opts.show_blocks {
        let total: u64 = entries.iter().map(super::blocks).sum();
        writeln!(out, "total {}", total)?;
    }

    for entry in entries {
        write_row(out, entry, &widths, opts)?;
    }
    Ok(())
}

fn write_row(out: &mut impl Write, entry: &Entry, w: &Widths, opts: &Options) -> io::Result<()> {
    if opts.show_inode {
        write!(out, "{:>width$} ", entry.inode(), width = w.inode)?;
    }
    if opts.show_blocks {
        write!(out, "{:>width$} ", super::blocks(entry), width = w.blocks)?;
    }

    write!(out, "{} ", permission_string(entry.mode(), opts.color))?;
    write!(out, "{:>width$} ", entry.hard_links(), width = w.links)?;
    if opts.show_owner {
        write!(out, "{:<width$} ", entry.owner(), width = w.owner)?;
    }
    if opts.show_group {
        write!(out, "{:<width$} ", entry.group(), width = w.group)?;
    }
    if opts.show_author {
        // On this platform the author is the owner.
        write!(out, "{:<width$} ", entry.owner(), width = w.owner)?;
    }
    write!(
        out,
        "{:>width$} ",
        format_size(entry.size(), opts),
        width = w.size
    )?;
    write!(out, "{} ", format_time(entry.time(opts.time_kind), opts))?;

    let (text, _) = super::glyph_and_name(entry, opts);
    write!(out, "{}", text)?;

    // -F already rendered the target as part of the indicator.
    if entry.is_symlink() && !opts.classify {
        if let Some(target) = entry.symlink_target() {
            write!(out, " -> {}", target)?;
        }
    }
    if opts.show_context && !entry.security_label().is_empty() {
        write!(out, " {}", entry.security_label())?;
    }
    writeln!(out)
}

/// Type character plus the nine permission bits.
///
/// Setuid, setgid and sticky replace the corresponding execute slot with
/// `s`/`t` when the execute bit is also set, `S`/`T` when it is not. With
/// color enabled every set bit is wrapped individually; the type character
/// and cleared slots stay plain.
fn permission_string(mode: u32, color: bool) -> String {
    let mut out = String::with_capacity(64);
    out.push(type_char(mode));

    let specials = [mode & 0o4000 != 0, mode & 0o2000 != 0, mode & 0o1000 != 0];
    let special_chars = ['s', 's', 't'];

    for group in 0..3 {
        let shift = 6 - group * 3;
        let bits = (mode >> shift) & 0o7;

        push_bit(&mut out, bits & 0o4 != 0, 'r', READ_COLOR, color);
        push_bit(&mut out, bits & 0o2 != 0, 'w', WRITE_COLOR, color);

        let exec = bits & 0o1 != 0;
        if specials[group] {
            if exec {
                push_bit(&mut out, true, special_chars[group], EXEC_COLOR, color);
            } else {
                // Uppercase special without the exec bit stays uncolored.
                out.push(special_chars[group].to_ascii_uppercase());
            }
        } else {
            push_bit(&mut out, exec, 'x', EXEC_COLOR, color);
        }
    }
    out
}

fn push_bit(out: &mut String, set: bool, ch: char, bit_color: &str, color: bool) {
    if !set {
        out.push('-');
        return;
    }
    if color {
        out.push_str(bit_color);
        out.push(ch);
        out.push_str(icons::RESET);
    } else {
        out.push(ch);
    }
}

fn type_char(mode: u32) -> char {
    match mode & 0o170000 {
        0o040000 => 'd',
        0o120000 => 'l',
        0o060000 => 'b',
        0o020000 => 'c',
        0o010000 => 'p',
        0o140000 => 's',
        _ => '-',
    }
}

/// Size column value: raw bytes, or scaled with a suffix under `-h`/`--si`.
fn format_size(bytes: u64, opts: &Options) -> String {
    if opts.human_readable {
        human_size(bytes, 1024, &["", "K", "M", "G", "T", "P", "E", "Z", "Y"])
    } else if opts.si_units {
        human_size(bytes, 1000, &["", "k", "M", "G", "T", "P", "E", "Z", "Y"])
    } else {
        bytes.to_string()
    }
}

/// Divide by the base while a larger suffix remains; one decimal place for
/// scaled values below ten, none otherwise.
fn human_size(bytes: u64, base: u64, suffixes: &[&str]) -> String {
    if bytes == 0 {
        return String::from("0");
    }

    let mut value = bytes as f64;
    let mut idx = 0;
    while value >= base as f64 && idx + 1 < suffixes.len() {
        value /= base as f64;
        idx += 1;
    }

    if idx == 0 {
        bytes.to_string()
    } else if value < 10.0 {
        format!("{:.1}{}", value, suffixes[idx])
    } else {
        format!("{:.0}{}", value, suffixes[idx])
    }
}

/// Timestamp column. Explicit styles use fixed formats; the locale default
/// drops the time-of-day for entries older than six months or in the future.
fn format_time(t: SystemTime, opts: &Options) -> String {
    let dt: DateTime<Local> = t.into();

    if opts.full_time || opts.time_style == "full-iso" {
        return dt.format("%Y-%m-%d %H:%M:%S%.9f %z").to_string();
    }
    if opts.time_style == "long-iso" {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if opts.time_style == "iso" {
        return if is_recent(&dt) {
            dt.format("%m-%d %H:%M").to_string()
        } else {
            dt.format("%Y-%m-%d ").to_string()
        };
    }

    if is_recent(&dt) {
        dt.format("%b %e %H:%M").to_string()
    } else {
        dt.format("%b %e  %Y").to_string()
    }
}

fn is_recent(dt: &DateTime<Local>) -> bool {
    let now = Local::now();
    if *dt > now {
        return false;
    }
    now - *dt <= chrono::Duration::hours(RECENT_CUTOFF_HOURS)
}

fn digits(mut n: u64) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn permission_string_for_regular_file() {
        assert_eq!(permission_string(0o100644, false), "-rw-r--r--");
        assert_eq!(permission_string(0o100755, false), "-rwxr-xr-x");
    }

    #[test]
    fn permission_string_for_other_types() {
        assert_eq!(&permission_string(0o040755, false)[..1], "d");
        assert_eq!(&permission_string(0o120777, false)[..1], "l");
        assert_eq!(&permission_string(0o140644, false)[..1], "s");
        assert_eq!(&permission_string(0o010644, false)[..1], "p");
    }

    #[test]
    fn setuid_is_lowercase_only_with_exec() {
        assert_eq!(permission_string(0o104755, false), "-rwsr-xr-x");
        assert_eq!(permission_string(0o104644, false), "-rwSr--r--");
    }

    #[test]
    fn setgid_and_sticky_follow_the_same_rule() {
        assert_eq!(permission_string(0o102710, false), "-rwx--s---");
        assert_eq!(permission_string(0o102640, false), "-rw-r-S---");
        assert_eq!(permission_string(0o041777, false), "drwxrwxrwt");
        assert_eq!(permission_string(0o041776, false), "drwxrwxrwT");
    }

    #[test]
    fn colored_permissions_wrap_each_set_bit() {
        let colored = permission_string(0o100644, true);
        assert!(colored.starts_with('-'));
        assert!(colored.contains(READ_COLOR));
        assert!(colored.contains(WRITE_COLOR));
        assert!(!colored.contains(EXEC_COLOR));
    }

    #[test]
    fn human_sizes_scale_per_unit_base() {
        let suffixes = &["", "K", "M", "G", "T", "P", "E"];
        assert_eq!(human_size(0, 1024, suffixes), "0");
        assert_eq!(human_size(1023, 1024, suffixes), "1023");
        assert_eq!(human_size(1024, 1024, suffixes), "1.0K");
        assert_eq!(human_size(1048576, 1024, suffixes), "1.0M");
        assert_eq!(human_size(123456789, 1024, suffixes), "118M");

        let si = &["", "k", "M", "G", "T", "P", "E"];
        assert_eq!(human_size(1000, 1000, si), "1.0k");
        assert_eq!(human_size(999, 1000, si), "999");
    }

    #[test]
    fn old_timestamps_drop_the_time_of_day() {
        let opts = Options::default();
        let old = format_time(UNIX_EPOCH, &opts);
        assert!(old.contains("1970"));

        let recent = format_time(SystemTime::now(), &opts);
        assert!(recent.contains(':'));
    }

    #[test]
    fn future_timestamps_count_as_old() {
        let opts = Options::default();
        let future = SystemTime::now() + Duration::from_secs(365 * 24 * 3600);
        assert!(!format_time(future, &opts).contains(':'));
    }

    #[test]
    fn long_iso_style_is_fixed() {
        let opts = Options {
            time_style: String::from("long-iso"),
            ..Options::default()
        };
        let text = format_time(UNIX_EPOCH, &opts);
        assert!(text.starts_with("1970-01-01"));
    }

    #[test]
    fn total_header_appears_only_with_blocks() -> io::Result<()> {
        let entries = vec![
            Entry::fake("a", 2048, false),
            Entry::fake("b", 100, false),
        ];

        let mut out = Vec::new();
        render(&mut out, &entries, &Options::default())?;
        assert!(!String::from_utf8_lossy(&out).contains("total"));

        let opts = Options {
            show_blocks: true,
            ..Options::default()
        };
        let mut out = Vec::new();
        render(&mut out, &entries, &opts)?;
        assert!(String::from_utf8_lossy(&out).starts_with("total 3\n"));
        Ok(())
    }

    #[test]
    fn sizes_align_right_per_batch() -> io::Result<()> {
        let entries = vec![
            Entry::fake("small", 5, false),
            Entry::fake("large", 12345, false),
        ];

        let mut out = Vec::new();
        render(&mut out, &entries, &Options::default())?;
        let text = String::from_utf8_lossy(&out);

        assert!(text.contains("    5 "));
        assert!(text.contains("12345 "));
        Ok(())
    }

    #[test]
    fn owner_and_group_columns_can_be_dropped() -> io::Result<()> {
        let entries = vec![Entry::fake("a", 1, false)];
        let opts = Options {
            show_owner: false,
            show_group: false,
            ..Options::default()
        };

        let mut out = Vec::new();
        render(&mut out, &entries, &opts)?;
        assert!(!String::from_utf8_lossy(&out).contains("user"));
        Ok(())
    }
}
