//! File metadata snapshots for lsr.
//!
//! Provides the [Entry] struct, one immutable record per filesystem object,
//! captured with a single `lstat` at enumeration time. Everything later in the
//! pipeline (filtering, sorting, rendering) reads from these snapshots only;
//! the filesystem is never consulted twice for the same entry.
//!
//! A failed stat does not drop the entry: it is kept with sentinel metadata so
//! it still appears in the listing.

use crate::config::{Options, TimeKind};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Snapshot of one filesystem entry.
///
/// Immutable after construction; represents a point-in-time `lstat` result.
/// Staleness across a run is accepted behavior, not a bug.
#[derive(Debug, Clone)]
pub struct Entry {
    path: PathBuf,
    display_name: String,
    mode: u32,
    size: u64,
    hard_links: u64,
    inode: u64,
    owner: String,
    group: String,
    mtime: SystemTime,
    atime: SystemTime,
    ctime: SystemTime,
    flags: u8,
    symlink_target: Option<String>,
    security_label: String,
}

impl Entry {
    // Flag bit definitions
    pub(crate) const IS_DIR: u8 = 1 << 0;
    pub(crate) const IS_SYMLINK: u8 = 1 << 1;
    pub(crate) const IS_EXECUTABLE: u8 = 1 << 2;
    pub(crate) const IS_HIDDEN: u8 = 1 << 3;

    /// Any of the three exec bits marks an entry executable.
    #[cfg(unix)]
    const EXEC_FLAG: u32 = 0o111;

    /// Capture a snapshot for `path`, rendered under `display_name`.
    ///
    /// `lstat` failure yields sentinel metadata (zeroed numerics, "unknown"
    /// owner and group) rather than an error; the entry stays listed.
    pub fn from_path(path: &Path, display_name: String, opts: &Options) -> Entry {
        let mut flags = 0u8;
        if display_name.starts_with('.') {
            flags |= Entry::IS_HIDDEN;
        }

        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(_) => {
                return Entry {
                    path: path.to_path_buf(),
                    display_name,
                    mode: 0,
                    size: 0,
                    hard_links: 0,
                    inode: 0,
                    owner: String::from("unknown"),
                    group: String::from("unknown"),
                    mtime: UNIX_EPOCH,
                    atime: UNIX_EPOCH,
                    ctime: UNIX_EPOCH,
                    flags,
                    symlink_target: None,
                    security_label: String::new(),
                };
            }
        };

        if meta.is_dir() {
            flags |= Entry::IS_DIR;
        }
        if meta.file_type().is_symlink() {
            flags |= Entry::IS_SYMLINK;
        }

        #[cfg(unix)]
        let entry = {
            use std::os::unix::fs::MetadataExt;

            if meta.mode() & Entry::EXEC_FLAG != 0 && !meta.is_dir() {
                flags |= Entry::IS_EXECUTABLE;
            }

            let symlink_target = if flags & Entry::IS_SYMLINK != 0 {
                fs::read_link(path)
                    .ok()
                    .map(|t| t.to_string_lossy().into_owned())
            } else {
                None
            };

            let security_label = if opts.show_context {
                read_security_label(path)
            } else {
                String::new()
            };

            Entry {
                path: path.to_path_buf(),
                display_name,
                mode: meta.mode(),
                size: meta.size(),
                hard_links: meta.nlink(),
                inode: meta.ino(),
                owner: resolve_owner(meta.uid(), opts.numeric_ids),
                group: resolve_group(meta.gid(), opts.numeric_ids),
                mtime: meta.modified().unwrap_or(UNIX_EPOCH),
                atime: meta.accessed().unwrap_or(UNIX_EPOCH),
                ctime: epoch_time(meta.ctime(), meta.ctime_nsec()),
                flags,
                symlink_target,
                security_label,
            }
        };

        #[cfg(not(unix))]
        let entry = {
            let _ = opts;
            Entry {
                path: path.to_path_buf(),
                display_name,
                mode: 0,
                size: meta.len(),
                hard_links: 1,
                inode: 0,
                owner: String::from("unknown"),
                group: String::from("unknown"),
                mtime: meta.modified().unwrap_or(UNIX_EPOCH),
                atime: meta.accessed().unwrap_or(UNIX_EPOCH),
                ctime: meta.modified().unwrap_or(UNIX_EPOCH),
                flags,
                symlink_target: None,
                security_label: String::new(),
            }
        };

        entry
    }

    // Accessors

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.display_name
    }

    #[inline]
    pub fn mode(&self) -> u32 {
        self.mode
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn hard_links(&self) -> u64 {
        self.hard_links
    }

    #[inline]
    pub fn inode(&self) -> u64 {
        self.inode
    }

    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[inline]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The timestamp selected by the given time kind.
    pub fn time(&self, kind: TimeKind) -> SystemTime {
        match kind {
            TimeKind::Modification => self.mtime,
            TimeKind::Access => self.atime,
            TimeKind::StatusChange => self.ctime,
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.flags & Entry::IS_DIR != 0
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.flags & Entry::IS_SYMLINK != 0
    }

    #[inline]
    pub fn is_executable(&self) -> bool {
        self.flags & Entry::IS_EXECUTABLE != 0
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.flags & Entry::IS_HIDDEN != 0
    }

    #[inline]
    pub fn symlink_target(&self) -> Option<&str> {
        self.symlink_target.as_deref()
    }

    #[inline]
    pub fn security_label(&self) -> &str {
        &self.security_label
    }

    /// Extension for sorting and classification: the substring after the last
    /// `.` in the display name, empty when there is none.
    pub fn extension(&self) -> &str {
        match self.display_name.rfind('.') {
            Some(idx) => &self.display_name[idx + 1..],
            None => "",
        }
    }

    /// Test-only constructor so pipeline and renderer behavior can be checked
    /// without touching the filesystem.
    #[cfg(test)]
    pub(crate) fn fake(name: &str, size: u64, is_dir: bool) -> Entry {
        let mut flags = 0u8;
        if is_dir {
            flags |= Entry::IS_DIR;
        }
        if name.starts_with('.') {
            flags |= Entry::IS_HIDDEN;
        }
        Entry {
            path: PathBuf::from(name),
            display_name: name.to_string(),
            mode: if is_dir { 0o040755 } else { 0o100644 },
            size,
            hard_links: 1,
            inode: 0,
            owner: String::from("user"),
            group: String::from("user"),
            mtime: UNIX_EPOCH,
            atime: UNIX_EPOCH,
            ctime: UNIX_EPOCH,
            flags,
            symlink_target: None,
            security_label: String::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_mtime(mut self, mtime: SystemTime) -> Entry {
        self.mtime = mtime;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_flag(mut self, flag: u8) -> Entry {
        self.flags |= flag;
        self
    }
}

/// Seconds + nanoseconds from stat into a SystemTime. Pre-epoch values clamp
/// to the epoch; they only occur on clock-damaged filesystems.
#[cfg(unix)]
fn epoch_time(secs: i64, nsec: i64) -> SystemTime {
    if secs < 0 {
        return UNIX_EPOCH;
    }
    UNIX_EPOCH + std::time::Duration::new(secs as u64, nsec.max(0) as u32)
}

#[cfg(unix)]
fn resolve_owner(uid: u32, numeric: bool) -> String {
    if numeric {
        return uid.to_string();
    }
    match uzers::get_user_by_uid(uid) {
        Some(user) => user.name().to_string_lossy().into_owned(),
        None => uid.to_string(),
    }
}

#[cfg(unix)]
fn resolve_group(gid: u32, numeric: bool) -> String {
    if numeric {
        return gid.to_string();
    }
    match uzers::get_group_by_gid(gid) {
        Some(group) => group.name().to_string_lossy().into_owned(),
        None => gid.to_string(),
    }
}

/// SELinux label from the `security.selinux` xattr, empty when the attribute
/// is missing or unreadable.
#[cfg(unix)]
fn read_security_label(path: &Path) -> String {
    match xattr::get(path, "security.selinux") {
        Ok(Some(raw)) => {
            let label = String::from_utf8_lossy(&raw);
            label.trim_end_matches('\0').to_string()
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn snapshot_basic_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("hello.txt");
        let mut file = File::create(&path)?;
        write!(file, "abc123")?;

        let opts = Options::default();
        let entry = Entry::from_path(&path, "hello.txt".into(), &opts);
        assert_eq!(entry.name(), "hello.txt");
        assert_eq!(entry.size(), 6);
        assert!(!entry.is_dir());
        assert!(!entry.is_hidden());
        assert_eq!(entry.extension(), "txt");
        Ok(())
    }

    #[test]
    fn snapshot_directory_and_hidden() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join(".cache");
        std::fs::create_dir(&path)?;

        let opts = Options::default();
        let entry = Entry::from_path(&path, ".cache".into(), &opts);
        assert!(entry.is_dir());
        assert!(entry.is_hidden());
        assert!(!entry.is_executable());
        Ok(())
    }

    #[test]
    fn missing_path_keeps_sentinel_entry() {
        let opts = Options::default();
        let entry = Entry::from_path(Path::new("/no/such/entry"), "entry".into(), &opts);

        assert_eq!(entry.size(), 0);
        assert_eq!(entry.inode(), 0);
        assert_eq!(entry.owner(), "unknown");
        assert_eq!(entry.group(), "unknown");
        assert!(!entry.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_target_is_captured() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let target = dir.path().join("target.txt");
        File::create(&target)?;
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link)?;

        let opts = Options::default();
        let entry = Entry::from_path(&link, "link".into(), &opts);
        assert!(entry.is_symlink());
        assert!(!entry.is_dir());
        assert_eq!(entry.symlink_target(), Some(target.to_str().unwrap()));
        Ok(())
    }

    #[test]
    fn extension_of_dotfile_and_plain_name() {
        let e = Entry::fake(".bashrc", 0, false);
        assert_eq!(e.extension(), "bashrc");
        let e = Entry::fake("Makefile", 0, false);
        assert_eq!(e.extension(), "");
    }
}
