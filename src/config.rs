//! Listing configuration for lsr.
//!
//! Holds the [Options] record consumed by the enumerator, filter/sort pipeline
//! and renderer, the closed enums it dispatches on, and the optional
//! `lsr.toml` defaults layer.
//!
//! [Options] is produced by the CLI layer (`utils::cli`); the TOML file only
//! seeds a few presentation defaults and is always overridden by flags.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Which hidden entries survive filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Hidden entries are excluded.
    Default,
    /// Hidden entries are shown, except `.` and `..`.
    AlmostAll,
    /// Everything is shown; `.` and `..` are injected into each directory.
    All,
}

/// Sort key selected with `--sort` or one of `-tSUvX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Time,
    Size,
    Extension,
    Version,
    None,
}

/// Which timestamp `-t` sorts by and the long format shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeKind {
    Modification,
    Access,
    StatusChange,
}

/// Output layout. `Vertical` is the explicit `-C` spelling of the default
/// multi-column layout; both render identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Columns,
    Vertical,
    Long,
    OnePerLine,
    Commas,
    Across,
}

/// Name transformation applied before rendering. `None` neutralizes control
/// characters to `?`; `Literal` passes names through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotingMode {
    None,
    Quote,
    Escape,
    Literal,
}

/// The full configuration record for one invocation.
///
/// Built by `utils::cli::handle_args` on top of [FileDefaults]; consumed
/// read-only by every later stage.
#[derive(Debug, Clone)]
pub struct Options {
    pub visibility: Visibility,
    pub directory_only: bool,
    pub recursive: bool,
    pub ignore_backups: bool,
    pub ignore_patterns: Vec<String>,
    pub hide_patterns: Vec<String>,

    pub sort_key: SortKey,
    pub time_kind: TimeKind,
    pub reverse: bool,
    pub group_dirs_first: bool,
    pub case_insensitive: bool,

    pub layout: Layout,
    pub numeric_ids: bool,
    pub human_readable: bool,
    pub si_units: bool,
    pub show_inode: bool,
    pub show_blocks: bool,
    pub show_owner: bool,
    pub show_group: bool,
    pub show_author: bool,
    pub show_context: bool,
    pub full_time: bool,
    pub color: bool,
    pub tab_size: usize,
    pub width: usize,
    pub time_style: String,
    pub quoting: QuotingMode,
    pub classify: bool,
    pub slash_dirs: bool,

    pub targets: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            visibility: Visibility::Default,
            directory_only: false,
            recursive: false,
            ignore_backups: false,
            ignore_patterns: Vec::new(),
            hide_patterns: Vec::new(),
            sort_key: SortKey::Name,
            time_kind: TimeKind::Modification,
            reverse: false,
            group_dirs_first: false,
            case_insensitive: false,
            layout: Layout::Columns,
            numeric_ids: false,
            human_readable: false,
            si_units: false,
            show_inode: false,
            show_blocks: false,
            show_owner: true,
            show_group: true,
            show_author: false,
            show_context: false,
            full_time: false,
            color: false,
            tab_size: 8,
            width: 0,
            time_style: String::from("locale"),
            quoting: QuotingMode::None,
            classify: false,
            slash_dirs: false,
            targets: Vec::new(),
        }
    }
}

impl Options {
    /// Fresh options seeded from the config file defaults, if any.
    pub fn with_file_defaults(defaults: &FileDefaults) -> Self {
        let mut opts = Options::default();
        if let Some(color) = defaults.color {
            opts.color = color;
        }
        if let Some(group) = defaults.group_dirs_first {
            opts.group_dirs_first = group;
        }
        if let Some(human) = defaults.human_readable {
            opts.human_readable = human;
        }
        if let Some(fold) = defaults.case_insensitive {
            opts.case_insensitive = fold;
        }
        opts
    }
}

/// Presentation defaults read from `lsr.toml`.
///
/// Every field is optional so an absent key never overrides the internal
/// default; flags in turn override anything set here.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct FileDefaults {
    pub color: Option<bool>,
    pub group_dirs_first: Option<bool>,
    pub human_readable: Option<bool>,
    pub case_insensitive: Option<bool>,
}

impl FileDefaults {
    /// Load defaults from the default path.
    /// A missing file is normal and yields empty defaults; a file that fails
    /// to parse is reported once and ignored.
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            return FileDefaults::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<FileDefaults>(&content) {
                Ok(defaults) => defaults,
                Err(e) => {
                    eprintln!("lsr: ignoring {}: {}", path.display(), e);
                    FileDefaults::default()
                }
            },
            Err(_) => FileDefaults::default(),
        }
    }

    /// Determine the default configuration file path.
    /// Checks the LSR_CONFIG environment variable first,
    /// checks for XDG_CONFIG_HOME after,
    /// then defaults to ~/.config/lsr/lsr.toml.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("LSR_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("lsr/lsr.toml");
        }

        if let Some(home) = dirs::home_dir() {
            return home.join(".config/lsr/lsr.toml");
        }
        PathBuf::from("lsr.toml")
    }

    /// Generate a commented default configuration file at the specified path.
    /// If the file already exists, returns an error.
    pub fn generate_default(path: &PathBuf) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("config file already exists at {:?}", path),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = r#"# lsr.toml - default flags for lsr
#
# Every key is optional; command-line flags always win.

# color = true
# group_dirs_first = false
# human_readable = false
# case_insensitive = false
"#;

        fs::write(path, content)?;
        println!("Default config generated at {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_defaults_override_only_present_keys() -> Result<(), Box<dyn std::error::Error>> {
        let defaults: FileDefaults = toml::from_str("color = true\n")?;
        let opts = Options::with_file_defaults(&defaults);

        assert!(opts.color);
        assert!(!opts.group_dirs_first);
        assert!(!opts.human_readable);
        Ok(())
    }

    #[test]
    fn empty_defaults_keep_internal_values() -> Result<(), Box<dyn std::error::Error>> {
        let defaults: FileDefaults = toml::from_str("")?;
        let opts = Options::with_file_defaults(&defaults);

        assert_eq!(opts.sort_key, SortKey::Name);
        assert_eq!(opts.layout, Layout::Columns);
        assert!(!opts.color);
        Ok(())
    }

    #[test]
    fn generate_refuses_existing_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("lsr.toml");

        FileDefaults::generate_default(&path)?;
        assert!(FileDefaults::generate_default(&path).is_err());
        Ok(())
    }
}
