//! Classification of entries into Nerd Font glyphs and colors.
//!
//! The backing tables are plain configuration data; the part that matters is
//! the priority chain in [classify]: special directory names, then symlink,
//! executable, conventional file names, the filename table, hidden names,
//! backup names, the extension table, and finally a generic fallback.
//!
//! Colors are raw truecolor escape sequences; [RESET] closes them.

use crate::core::Entry;

use phf::phf_map;

/// One classification result: a glyph and the escape sequence coloring it.
pub type IconColor = (&'static str, &'static str);

/// Terminal reset sequence emitted after every colored span.
pub const RESET: &str = "\x1b[m";

// Generic per-category glyphs.
const DIRECTORY: IconColor = ("\u{f74a}", "\x1b[38;2;224;177;77m");
const SYMLINK: IconColor = ("\u{f838}", "\x1b[38;2;76;175;255m");
const EXECUTABLE: IconColor = ("\u{f713}", "\x1b[38;2;76;175;80m");
const SOURCE_CONTROL: IconColor = ("\u{e702}", "\x1b[38;2;250;111;66m");
const HIDDEN_CONFIG: IconColor = ("\u{f013}", "\x1b[38;2;3;136;209m");
const TODO_FILE: IconColor = ("\u{f00c}", "\x1b[38;2;255;202;61m");
const LICENSE_FILE: IconColor = ("\u{f718}", "\x1b[38;2;255;215;0m");
const README_FILE: IconColor = ("\u{f853}", "\x1b[38;2;8;219;239m");
const HIDDEN_FILE: IconColor = ("\u{f723}", "\x1b[38;2;130;130;130m");
const BACKUP_FILE: IconColor = ("\u{f723}", "\x1b[38;2;100;100;100m");
const UNKNOWN: IconColor = ("\u{f723}", "\x1b[38;2;150;150;150m");

/// Well-known user directories, keyed lowercase; matched case-insensitively.
static SPECIAL_DIR_MAP: phf::Map<&'static str, IconColor> = phf_map! {
    "desktop" => ("\u{f108}", "\x1b[38;2;84;110;232m"),
    "documents" => ("\u{f15c}", "\x1b[38;2;84;110;232m"),
    "downloads" => ("\u{f019}", "\x1b[38;2;84;110;232m"),
    "music" => ("\u{f001}", "\x1b[38;2;84;110;232m"),
    "audio" => ("\u{f001}", "\x1b[38;2;84;110;232m"),
    "pictures" => ("\u{f03e}", "\x1b[38;2;84;110;232m"),
    "photos" => ("\u{f03e}", "\x1b[38;2;84;110;232m"),
    "videos" => ("\u{f03d}", "\x1b[38;2;84;110;232m"),
    "movies" => ("\u{f03d}", "\x1b[38;2;84;110;232m"),
    "public" => ("\u{f0c0}", "\x1b[38;2;84;110;232m"),
    "templates" => ("\u{f0f6}", "\x1b[38;2;84;110;232m"),
};

/// Well-known dot-directories, collapsed into two categories.
static DOT_DIR_MAP: phf::Map<&'static str, IconColor> = phf_map! {
    ".git" => SOURCE_CONTROL,
    ".github" => SOURCE_CONTROL,
    ".gitlab" => SOURCE_CONTROL,
    ".svn" => SOURCE_CONTROL,
    ".hg" => SOURCE_CONTROL,
    ".ssh" => HIDDEN_CONFIG,
    ".gnupg" => HIDDEN_CONFIG,
    ".config" => HIDDEN_CONFIG,
    ".cache" => HIDDEN_CONFIG,
    ".local" => HIDDEN_CONFIG,
};

/// Exact file names with their own glyphs.
static FILENAME_MAP: phf::Map<&'static str, IconColor> = phf_map! {
    "Makefile" => ("\u{f728}", "\x1b[38;2;239;83;80m"),
    "makefile" => ("\u{f728}", "\x1b[38;2;239;83;80m"),
    "GNUmakefile" => ("\u{f728}", "\x1b[38;2;239;83;80m"),
    "CMakeLists.txt" => ("\u{f425}", "\x1b[38;2;178;178;179m"),
    "Dockerfile" => ("\u{f308}", "\x1b[38;2;72;126;176m"),
    "docker-compose.yml" => ("\u{f308}", "\x1b[38;2;72;126;176m"),
    "docker-compose.yaml" => ("\u{f308}", "\x1b[38;2;72;126;176m"),
    ".gitignore" => ("\u{e702}", "\x1b[38;2;250;111;66m"),
    ".gitmodules" => ("\u{e702}", "\x1b[38;2;250;111;66m"),
    ".gitattributes" => ("\u{e702}", "\x1b[38;2;250;111;66m"),
    "package.json" => ("\u{e60b}", "\x1b[38;2;251;193;60m"),
    "package-lock.json" => ("\u{e60b}", "\x1b[38;2;251;193;60m"),
    "yarn.lock" => ("\u{e60b}", "\x1b[38;2;251;193;60m"),
    "requirements.txt" => ("\u{f81f}", "\x1b[38;2;49;114;166m"),
    "Pipfile" => ("\u{f81f}", "\x1b[38;2;49;114;166m"),
    "Cargo.toml" => ("\u{e7a8}", "\x1b[38;2;222;166;133m"),
    "Cargo.lock" => ("\u{e7a8}", "\x1b[38;2;222;166;133m"),
    "go.mod" => ("\u{fcd1}", "\x1b[38;2;42;174;216m"),
    "go.sum" => ("\u{fcd1}", "\x1b[38;2;42;174;216m"),
    ".env" => ("\u{f013}", "\x1b[38;2;3;136;209m"),
    ".env.example" => ("\u{f013}", "\x1b[38;2;3;136;209m"),
    ".bashrc" => ("\u{f68c}", "\x1b[38;2;137;224;79m"),
    ".zshrc" => ("\u{f68c}", "\x1b[38;2;137;224;79m"),
    ".profile" => ("\u{f68c}", "\x1b[38;2;137;224;79m"),
    ".vimrc" => ("\u{e62b}", "\x1b[38;2;67;160;71m"),
};

/// File extensions (lowercase, no dot) with their own glyphs.
static EXT_MAP: phf::Map<&'static str, IconColor> = phf_map! {
    // Programming languages
    "asm" => ("\u{f471}", "\x1b[38;2;250;109;63m"),
    "c" => ("\u{fb70}", "\x1b[38;2;146;140;140m"),
    "cpp" => ("\u{fb71}", "\x1b[38;2;241;81;126m"),
    "cxx" => ("\u{fb71}", "\x1b[38;2;241;81;126m"),
    "cc" => ("\u{fb71}", "\x1b[38;2;241;81;126m"),
    "cs" => ("\u{f81a}", "\x1b[38;2;64;135;24m"),
    "css" => ("\u{f81b}", "\x1b[38;2;86;156;214m"),
    "go" => ("\u{fcd1}", "\x1b[38;2;42;174;216m"),
    "h" => ("\u{2261}", "\x1b[38;2;146;140;140m"),
    "hpp" => ("\u{2261}", "\x1b[38;2;173;151;185m"),
    "html" => ("\u{f13b}", "\x1b[38;2;228;79;57m"),
    "htm" => ("\u{f13b}", "\x1b[38;2;228;79;57m"),
    "java" => ("\u{f675}", "\x1b[38;2;177;115;31m"),
    "js" => ("\u{e74e}", "\x1b[38;2;241;224;89m"),
    "jsx" => ("\u{e74e}", "\x1b[38;2;241;224;89m"),
    "php" => ("\u{e73d}", "\x1b[38;2;77;92;150m"),
    "json" => ("\u{e60b}", "\x1b[38;2;251;193;60m"),
    "lua" => ("\u{e620}", "\x1b[38;2;8;49;129m"),
    "md" => ("\u{f853}", "\x1b[38;2;8;219;239m"),
    "markdown" => ("\u{f853}", "\x1b[38;2;8;219;239m"),
    "ps1" => ("\u{fcb5}", "\x1b[38;2;5;169;244m"),
    "py" => ("\u{f81f}", "\x1b[38;2;49;114;166m"),
    "rs" => ("\u{e7a8}", "\x1b[38;2;222;166;133m"),
    "rb" => ("\u{e739}", "\x1b[38;2;176;43;28m"),
    "sh" => ("\u{f68c}", "\x1b[38;2;137;224;79m"),
    "bash" => ("\u{f68c}", "\x1b[38;2;137;224;79m"),
    "zsh" => ("\u{f68c}", "\x1b[38;2;137;224;79m"),
    "fish" => ("\u{f68c}", "\x1b[38;2;137;224;79m"),
    "swift" => ("\u{fbe3}", "\x1b[38;2;240;79;53m"),
    "ts" => ("\u{e628}", "\x1b[38;2;103;161;224m"),
    "tsx" => ("\u{e628}", "\x1b[38;2;103;161;224m"),
    "xml" => ("\u{f72d}", "\x1b[38;2;64;153;69m"),
    "yaml" => ("\u{e60b}", "\x1b[38;2;244;68;62m"),
    "yml" => ("\u{e60b}", "\x1b[38;2;244;68;62m"),
    "vue" => ("\u{fd42}", "\x1b[38;2;65;184;131m"),
    "vim" => ("\u{e62b}", "\x1b[38;2;67;160;71m"),
    "sql" => ("\u{e704}", "\x1b[38;2;1;94;134m"),
    "sqlite" => ("\u{e7c4}", "\x1b[38;2;1;57;84m"),
    "nix" => ("\u{f313}", "\x1b[38;2;80;117;193m"),
    "zig" => ("\u{2b4d}", "\x1b[38;2;236;146;91m"),
    "hs" => ("\u{e61f}", "\x1b[38;2;94;80;134m"),
    "kt" => ("\u{e70e}", "\x1b[38;2;169;123;255m"),
    "jl" => ("\u{e624}", "\x1b[38;2;162;112;186m"),
    "ex" => ("\u{e62d}", "\x1b[38;2;110;72;37m"),
    "exs" => ("\u{e62d}", "\x1b[38;2;110;72;37m"),
    "pl" => ("\u{e769}", "\x1b[38;2;31;153;196m"),
    "tex" => ("\u{f783}", "\x1b[38;2;66;165;245m"),

    // Archives
    "zip" => ("\u{f410}", "\x1b[38;2;175;180;43m"),
    "rar" => ("\u{f410}", "\x1b[38;2;175;180;43m"),
    "7z" => ("\u{f410}", "\x1b[38;2;175;180;43m"),
    "tar" => ("\u{f410}", "\x1b[38;2;175;180;43m"),
    "gz" => ("\u{f410}", "\x1b[38;2;175;180;43m"),
    "bz2" => ("\u{f410}", "\x1b[38;2;175;180;43m"),
    "xz" => ("\u{f410}", "\x1b[38;2;175;180;43m"),
    "deb" => ("\u{f306}", "\x1b[38;2;240;85;142m"),
    "rpm" => ("\u{f30a}", "\x1b[38;2;52;103;172m"),

    // Media
    "mp3" => ("\u{fb75}", "\x1b[38;2;239;83;80m"),
    "flac" => ("\u{fb75}", "\x1b[38;2;200;80;70m"),
    "wav" => ("\u{fb75}", "\x1b[38;2;200;80;70m"),
    "ogg" => ("\u{fb75}", "\x1b[38;2;199;70;67m"),
    "mp4" => ("\u{e271}", "\x1b[38;2;253;154;62m"),
    "mkv" => ("\u{e271}", "\x1b[38;2;253;154;62m"),
    "webm" => ("\u{e271}", "\x1b[38;2;253;154;62m"),
    "avi" => ("\u{e271}", "\x1b[38;2;253;154;62m"),
    "mov" => ("\u{f72a}", "\x1b[38;2;240;141;54m"),

    // Images
    "jpg" => ("\u{f71e}", "\x1b[38;2;45;165;154m"),
    "jpeg" => ("\u{f71e}", "\x1b[38;2;45;165;154m"),
    "png" => ("\u{f71e}", "\x1b[38;2;40;160;150m"),
    "gif" => ("\u{f71e}", "\x1b[38;2;40;160;150m"),
    "bmp" => ("\u{f71e}", "\x1b[38;2;35;155;145m"),
    "svg" => ("\u{fc1f}", "\x1b[38;2;48;166;154m"),
    "ico" => ("\u{f71e}", "\x1b[38;2;40;160;150m"),
    "webp" => ("\u{f71e}", "\x1b[38;2;40;160;150m"),

    // Documents
    "pdf" => ("\u{f724}", "\x1b[38;2;240;100;100m"),
    "doc" => ("\u{f724}", "\x1b[38;2;100;150;240m"),
    "docx" => ("\u{f724}", "\x1b[38;2;100;150;240m"),
    "xls" => ("\u{f724}", "\x1b[38;2;100;200;100m"),
    "xlsx" => ("\u{f724}", "\x1b[38;2;100;200;100m"),
    "ppt" => ("\u{f724}", "\x1b[38;2;240;150;100m"),
    "pptx" => ("\u{f724}", "\x1b[38;2;240;150;100m"),
    "odt" => ("\u{f724}", "\x1b[38;2;100;150;240m"),
    "txt" => ("\u{f723}", "\x1b[38;2;200;200;200m"),

    // Config
    "ini" => ("\u{f013}", "\x1b[38;2;3;136;209m"),
    "conf" => ("\u{f013}", "\x1b[38;2;3;136;209m"),
    "config" => ("\u{f013}", "\x1b[38;2;3;136;209m"),
    "toml" => ("\u{f013}", "\x1b[38;2;3;136;209m"),

    // Misc
    "iso" => ("\u{e271}", "\x1b[38;2;253;154;62m"),
    "exe" => ("\u{f2d0}", "\x1b[38;2;76;175;80m"),
    "msi" => ("\u{f2d0}", "\x1b[38;2;76;175;80m"),
    "log" => ("\u{f723}", "\x1b[38;2;150;150;150m"),
    "tmp" => ("\u{f723}", "\x1b[38;2;100;100;100m"),
    "lock" => ("\u{f023}", "\x1b[38;2;150;150;150m"),
};

/// Glyph and color for one entry.
///
/// Color is the empty string when coloring is disabled; the glyph is always
/// returned.
pub fn classify(entry: &Entry, color_enabled: bool) -> (&'static str, &'static str) {
    let (glyph, color) = lookup(entry);
    if color_enabled { (glyph, color) } else { (glyph, "") }
}

fn lookup(entry: &Entry) -> IconColor {
    let name = entry.name();

    if entry.is_dir() {
        if let Some(&ic) = DOT_DIR_MAP.get(name) {
            return ic;
        }
        let lowered = name.to_lowercase();
        if let Some(&ic) = SPECIAL_DIR_MAP.get(lowered.as_str()) {
            return ic;
        }
        return DIRECTORY;
    }

    if entry.is_symlink() {
        return SYMLINK;
    }

    if entry.is_executable() {
        return EXECUTABLE;
    }

    if let Some(ic) = conventional_name(name) {
        return ic;
    }

    if let Some(&ic) = FILENAME_MAP.get(name) {
        return ic;
    }

    if entry.is_hidden() {
        return HIDDEN_FILE;
    }

    if name.ends_with('~') {
        return BACKUP_FILE;
    }

    let ext = entry.extension().to_lowercase();
    if let Some(&ic) = EXT_MAP.get(ext.as_str()) {
        return ic;
    }

    UNKNOWN
}

/// Conventional project files collapsed into one category each.
fn conventional_name(name: &str) -> Option<IconColor> {
    match name {
        "TODO" | "TODO.md" | "TODO.txt" => Some(TODO_FILE),
        "LICENSE" | "LICENSE.md" | "LICENSE.txt" | "LICENSE-MIT" | "LICENSE-APACHE"
        | "COPYING" | "COPYRIGHT" | "UNLICENSE" => Some(LICENSE_FILE),
        "README" | "README.md" | "README.txt" | "README.rst" => Some(README_FILE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_directories_match_case_insensitively() {
        let (desktop, _) = classify(&Entry::fake("Desktop", 0, true), false);
        let (desktop_lower, _) = classify(&Entry::fake("desktop", 0, true), false);
        assert_eq!(desktop, desktop_lower);
        assert_ne!(desktop, DIRECTORY.0);
    }

    #[test]
    fn dot_directories_collapse_into_categories() {
        let (git, _) = classify(&Entry::fake(".git", 0, true), false);
        let (github, _) = classify(&Entry::fake(".github", 0, true), false);
        assert_eq!(git, SOURCE_CONTROL.0);
        assert_eq!(git, github);

        let (ssh, _) = classify(&Entry::fake(".ssh", 0, true), false);
        assert_eq!(ssh, HIDDEN_CONFIG.0);
    }

    #[test]
    fn symlink_beats_executable() {
        let entry = Entry::fake("tool", 0, false)
            .with_flag(Entry::IS_SYMLINK)
            .with_flag(Entry::IS_EXECUTABLE);
        let (glyph, _) = classify(&entry, false);
        assert_eq!(glyph, SYMLINK.0);
    }

    #[test]
    fn executable_beats_extension() {
        let entry = Entry::fake("run.py", 0, false).with_flag(Entry::IS_EXECUTABLE);
        let (glyph, _) = classify(&entry, false);
        assert_eq!(glyph, EXECUTABLE.0);
    }

    #[test]
    fn conventional_names_collapse() {
        let (a, _) = classify(&Entry::fake("README", 0, false), false);
        let (b, _) = classify(&Entry::fake("README.md", 0, false), false);
        assert_eq!(a, b);
        assert_eq!(a, README_FILE.0);

        let (lic, _) = classify(&Entry::fake("COPYING", 0, false), false);
        assert_eq!(lic, LICENSE_FILE.0);
    }

    #[test]
    fn hidden_beats_extension_and_backup_beats_unknown() {
        let (hidden, _) = classify(&Entry::fake(".secret.rs", 0, false), false);
        assert_eq!(hidden, HIDDEN_FILE.0);

        let (backup, _) = classify(&Entry::fake("notes~", 0, false), false);
        assert_eq!(backup, BACKUP_FILE.0);
    }

    #[test]
    fn extension_lookup_is_lowercased() {
        let (upper, _) = classify(&Entry::fake("MAIN.RS", 0, false), false);
        let (lower, _) = classify(&Entry::fake("main.rs", 0, false), false);
        assert_eq!(upper, lower);
    }

    #[test]
    fn color_is_suppressed_when_disabled() {
        let entry = Entry::fake("main.rs", 0, false);
        let (_, color_off) = classify(&entry, false);
        assert_eq!(color_off, "");
        let (_, color_on) = classify(&entry, true);
        assert!(color_on.starts_with("\x1b["));
    }
}
