//! Command-line argument parsing and help for lsr.
//!
//! Parses the flag surface into an [Options] record on top of the `lsr.toml`
//! defaults; flags always win over the file. `--help`, `--version` and
//! `--init` short-circuit before any parsing.

use crate::config::{FileDefaults, Layout, Options, QuotingMode, SortKey, TimeKind, Visibility};

use std::io::IsTerminal;

pub enum CliAction {
    List(Box<Options>),
    Exit(i32),
}

pub fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().skip(1).collect();

    for arg in &args {
        match arg.as_str() {
            "--help" => {
                print_help();
                return CliAction::Exit(0);
            }
            "--version" => {
                print_version();
                return CliAction::Exit(0);
            }
            "--init" => {
                let config_path = FileDefaults::default_path();
                if let Err(e) = FileDefaults::generate_default(&config_path) {
                    eprintln!("lsr: {}", e);
                    return CliAction::Exit(1);
                }
                return CliAction::Exit(0);
            }
            "--" => break,
            _ => {}
        }
    }

    let defaults = FileDefaults::load();
    match parse_args(&args, Options::with_file_defaults(&defaults)) {
        Ok(mut opts) => {
            // Piped output defaults to one name per line; an explicit -C
            // parses to Vertical, so it still forces columns.
            if opts.layout == Layout::Columns && !std::io::stdout().is_terminal() {
                opts.layout = Layout::OnePerLine;
            }
            CliAction::List(Box::new(opts))
        }
        Err(msg) => {
            eprintln!("lsr: {}", msg);
            eprintln!("Try 'lsr --help' for more information.");
            CliAction::Exit(1)
        }
    }
}

/// Fold the argument list into `opts`. Targets and flags may interleave;
/// everything after `--` is a target.
fn parse_args(args: &[String], mut opts: Options) -> Result<Options, String> {
    let mut literal = false;
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if literal || !arg.starts_with('-') || arg == "-" {
            opts.targets.push(arg.clone());
        } else if arg == "--" {
            literal = true;
        } else if let Some(long) = arg.strip_prefix("--") {
            apply_long(&mut opts, long)?;
        } else {
            let mut chars = arg[1..].chars();
            while let Some(ch) = chars.next() {
                // -I, -T and -w take a value: the rest of this token,
                // or the next argument.
                if matches!(ch, 'I' | 'T' | 'w') {
                    let rest: String = chars.collect();
                    let value = if rest.is_empty() {
                        i += 1;
                        args.get(i)
                            .cloned()
                            .ok_or_else(|| format!("option requires an argument -- '{}'", ch))?
                    } else {
                        rest
                    };
                    apply_short_value(&mut opts, ch, &value)?;
                    break;
                }
                apply_short(&mut opts, ch)?;
            }
        }

        i += 1;
    }

    Ok(opts)
}

fn apply_short(opts: &mut Options, ch: char) -> Result<(), String> {
    match ch {
        'a' => opts.visibility = Visibility::All,
        'A' => opts.visibility = Visibility::AlmostAll,
        'd' => opts.directory_only = true,
        'R' => opts.recursive = true,
        'B' => opts.ignore_backups = true,

        't' => opts.sort_key = SortKey::Time,
        'S' => opts.sort_key = SortKey::Size,
        'X' => opts.sort_key = SortKey::Extension,
        'v' => opts.sort_key = SortKey::Version,
        'U' => opts.sort_key = SortKey::None,
        'u' => opts.time_kind = TimeKind::Access,
        'c' => opts.time_kind = TimeKind::StatusChange,
        'r' => opts.reverse = true,
        'f' => {
            opts.visibility = Visibility::All;
            opts.sort_key = SortKey::None;
        }

        'l' => opts.layout = Layout::Long,
        '1' => opts.layout = Layout::OnePerLine,
        'm' => opts.layout = Layout::Commas,
        'x' => opts.layout = Layout::Across,
        'C' => opts.layout = Layout::Vertical,
        'g' => {
            opts.layout = Layout::Long;
            opts.show_owner = false;
        }
        'o' => {
            opts.layout = Layout::Long;
            opts.show_group = false;
        }
        'n' => {
            opts.layout = Layout::Long;
            opts.numeric_ids = true;
        }

        'G' => opts.show_group = false,

        'h' => {
            opts.human_readable = true;
            opts.si_units = false;
        }
        // Block counts are already reported in 1024-byte units.
        'k' => {}
        'i' => opts.show_inode = true,
        's' => opts.show_blocks = true,
        'Z' => opts.show_context = true,

        'Q' => opts.quoting = QuotingMode::Quote,
        'b' => opts.quoting = QuotingMode::Escape,
        'N' => opts.quoting = QuotingMode::Literal,
        'q' => opts.quoting = QuotingMode::None,
        'F' => opts.classify = true,
        'p' => opts.slash_dirs = true,

        _ => return Err(format!("invalid option -- '{}'", ch)),
    }
    Ok(())
}

fn apply_short_value(opts: &mut Options, ch: char, value: &str) -> Result<(), String> {
    match ch {
        'I' => opts.ignore_patterns.push(value.to_string()),
        'T' => opts.tab_size = parse_number("tabsize", value)?,
        'w' => opts.width = parse_number("width", value)?,
        _ => unreachable!("caller only dispatches value-taking options"),
    }
    Ok(())
}

fn apply_long(opts: &mut Options, long: &str) -> Result<(), String> {
    let (name, value) = match long.split_once('=') {
        Some((n, v)) => (n, Some(v)),
        None => (long, None),
    };

    match name {
        "all" => opts.visibility = Visibility::All,
        "almost-all" => opts.visibility = Visibility::AlmostAll,
        "directory" => opts.directory_only = true,
        "recursive" => opts.recursive = true,
        "ignore-backups" => opts.ignore_backups = true,
        "ignore" => opts.ignore_patterns.push(required(name, value)?.to_string()),
        "hide" => opts.hide_patterns.push(required(name, value)?.to_string()),

        "sort" => opts.sort_key = parse_sort(required(name, value)?)?,
        "time" => opts.time_kind = parse_time(required(name, value)?)?,
        "reverse" => opts.reverse = true,
        "group-directories-first" => opts.group_dirs_first = true,

        "format" => opts.layout = parse_format(required(name, value)?)?,
        "long" => opts.layout = Layout::Long,
        "no-group" => opts.show_group = false,
        "numeric-uid-gid" => {
            opts.layout = Layout::Long;
            opts.numeric_ids = true;
        }
        "human-readable" => {
            opts.human_readable = true;
            opts.si_units = false;
        }
        "si" => {
            opts.si_units = true;
            opts.human_readable = false;
        }
        "inode" => opts.show_inode = true,
        "size" => opts.show_blocks = true,
        "author" => opts.show_author = true,
        "context" => opts.show_context = true,
        "full-time" => {
            opts.layout = Layout::Long;
            opts.full_time = true;
        }
        "color" => opts.color = parse_color(value)?,
        "tabsize" => opts.tab_size = parse_number(name, required(name, value)?)?,
        "width" => opts.width = parse_number(name, required(name, value)?)?,
        "time-style" => opts.time_style = required(name, value)?.to_string(),

        "quote-name" => opts.quoting = QuotingMode::Quote,
        "escape" => opts.quoting = QuotingMode::Escape,
        "literal" => opts.quoting = QuotingMode::Literal,
        "hide-control-chars" => opts.quoting = QuotingMode::None,
        "classify" | "file-type" => opts.classify = true,
        "indicator-style" => match required(name, value)? {
            "none" => {
                opts.classify = false;
                opts.slash_dirs = false;
            }
            "slash" => opts.slash_dirs = true,
            "classify" | "file-type" => opts.classify = true,
            other => {
                return Err(format!("invalid argument '{}' for '--indicator-style'", other));
            }
        },

        _ => return Err(format!("unrecognized option '--{}'", name)),
    }
    Ok(())
}

fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, String> {
    value.ok_or_else(|| format!("option '--{}' requires an argument", name))
}

fn parse_number(name: &str, value: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("invalid argument '{}' for '--{}'", value, name))
}

fn parse_sort(value: &str) -> Result<SortKey, String> {
    match value {
        "name" => Ok(SortKey::Name),
        "time" => Ok(SortKey::Time),
        "size" => Ok(SortKey::Size),
        "extension" => Ok(SortKey::Extension),
        "version" => Ok(SortKey::Version),
        "none" => Ok(SortKey::None),
        _ => Err(format!("invalid argument '{}' for '--sort'", value)),
    }
}

fn parse_time(value: &str) -> Result<TimeKind, String> {
    match value {
        "atime" | "access" | "use" => Ok(TimeKind::Access),
        "ctime" | "status" => Ok(TimeKind::StatusChange),
        "mtime" | "modification" => Ok(TimeKind::Modification),
        _ => Err(format!("invalid argument '{}' for '--time'", value)),
    }
}

fn parse_format(value: &str) -> Result<Layout, String> {
    match value {
        "long" | "verbose" => Ok(Layout::Long),
        "single-column" => Ok(Layout::OnePerLine),
        "commas" => Ok(Layout::Commas),
        "across" | "horizontal" => Ok(Layout::Across),
        "vertical" => Ok(Layout::Vertical),
        _ => Err(format!("invalid argument '{}' for '--format'", value)),
    }
}

fn parse_color(value: Option<&str>) -> Result<bool, String> {
    match value {
        None | Some("always") | Some("yes") => Ok(true),
        Some("never") | Some("no") => Ok(false),
        Some("auto") => Ok(std::io::stdout().is_terminal()),
        Some(other) => Err(format!("invalid argument '{}' for '--color'", other)),
    }
}

fn print_version() {
    println!("lsr {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    println!(
        r#"lsr - list directory contents with Nerd Font icons

USAGE:
  lsr [OPTION]... [FILE]...

FILTERING:
  -a, --all               Do not hide entries starting with .
  -A, --almost-all        Like -a, but skip . and ..
  -B, --ignore-backups    Skip entries ending with ~
  -d, --directory         List directories themselves, not their contents
  -I, --ignore=PATTERN    Skip entries matching the shell PATTERN
      --hide=PATTERN      Additional patterns to skip, same semantics as --ignore
  -R, --recursive         List subdirectories recursively

SORTING:
  -t                      Sort by time, newest first (see --time)
  -S                      Sort by size, largest first
  -X                      Sort by extension
  -v                      Natural sort of version numbers within names
  -U                      Do not sort; list in directory order
  -f                      Like -aU
  -r, --reverse           Reverse the final order
  -u                      With -t: sort by access time
  -c                      With -t: sort by status-change time
      --sort=WORD         name, time, size, extension, version or none
      --time=WORD         atime, ctime or mtime
      --group-directories-first
                          Group directories before files

LAYOUT:
  -l                      Long listing format
  -g                      Like -l, but without the owner column
  -o                      Like -l, but without the group column
  -n, --numeric-uid-gid   Like -l, with numeric owner and group
  -1                      One entry per line
  -m                      Comma-separated names filling the line
  -x                      Entries in rows instead of columns
  -C                      Entries in columns (the default)
      --format=WORD       long, single-column, commas, across or vertical
  -w, --width=COLS        Assume this output width instead of asking the terminal
  -T, --tabsize=COLS      Assume this tab size

APPEARANCE:
  -h, --human-readable    Sizes like 1.0K, 234M (powers of 1024)
      --si                Like -h, but powers of 1000
  -i, --inode             Print each entry's inode number
  -s, --size              Print each entry's block count and a total line
  -F, --classify          Append /, @ or * type indicators
  -p                      Append / to directories only
      --indicator-style=WORD
                          none, slash or classify
  -G                      With -l, skip the group column (also --no-group)
  -Q, --quote-name        Wrap names in double quotes
  -b, --escape            C-style escapes for control characters
  -N, --literal           Print names without any transformation
  -q, --hide-control-chars
                          Print ? instead of control characters (default)
      --author            With -l, print the author column
  -Z, --context           With -l, print the security context
      --full-time         Like -l with full ISO timestamps
      --time-style=STYLE  full-iso, long-iso, iso or locale
      --color[=WHEN]      always, auto or never

OTHER:
      --init              Generate a default lsr.toml and exit
      --help              Print help information
      --version           Display the installed version

ENVIRONMENT:
  LSR_CONFIG              Override the default config path
"#
    );
}
