//! Target expansion for lsr.
//!
//! Turns the target path list into an ordered sequence of [Batch]es: one
//! headerless batch for standalone file targets, then one batch per listed
//! directory. Each batch is filtered and sorted before it is returned, and
//! is the isolation arena for the renderer's width computations.
//!
//! Errors are isolated per target and per directory: a missing target or an
//! unreadable directory is reported on stderr and skipped, everything else
//! continues.

use crate::config::{Options, Visibility};
use crate::core::{Entry, Formatter};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One renderable group of entries sharing field widths and column layout.
/// `label` is the directory header, if one is printed.
#[derive(Debug)]
pub struct Batch {
    pub label: Option<String>,
    pub entries: Vec<Entry>,
}

/// Expands all targets into batches, in rendering order.
///
/// Returns the batches plus the number of errors reported on stderr. File
/// targets come first as a single combined batch; directory targets follow in
/// the order given, each expanded depth-first when recursion is enabled.
pub fn collect_batches(opts: &Options) -> (Vec<Batch>, usize) {
    let fmt = Formatter::new(opts);
    let mut errors = 0usize;
    let mut files: Vec<Entry> = Vec::new();
    let mut dirs: Vec<PathBuf> = Vec::new();

    let targets: Vec<String> = if opts.targets.is_empty() {
        vec![String::from(".")]
    } else {
        opts.targets.clone()
    };

    for target in &targets {
        let path = PathBuf::from(target);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() && !opts.directory_only => dirs.push(path),
            Ok(_) => files.push(Entry::from_path(&path, target.clone(), opts)),
            Err(_) => {
                eprintln!("lsr: cannot access '{}': No such file or directory", target);
                errors += 1;
            }
        }
    }

    // Header lines appear once more than one surviving target is listed;
    // recursion always labels the directories it descends into.
    let show_headers = files.len() + dirs.len() > 1;
    let mut batches = Vec::new();

    if !files.is_empty() {
        fmt.sort_entries(&mut files);
        batches.push(Batch {
            label: None,
            entries: files,
        });
    }

    for dir in dirs {
        errors += expand_directory(&dir, opts, &fmt, show_headers, &mut batches);
    }

    (batches, errors)
}

/// Lists `dir` and, with recursion enabled, every subdirectory below it via
/// an explicit worklist, so traversal depth never grows the call stack.
fn expand_directory(
    dir: &Path,
    opts: &Options,
    fmt: &Formatter,
    show_headers: bool,
    batches: &mut Vec<Batch>,
) -> usize {
    let mut errors = 0usize;
    let mut stack = vec![dir.to_path_buf()];
    let mut first = true;

    while let Some(current) = stack.pop() {
        let labeled = if first {
            show_headers || opts.recursive
        } else {
            true
        };
        first = false;

        match list_directory(&current, opts, fmt) {
            Ok(entries) => {
                if opts.recursive {
                    // Reverse push so the worklist pops subdirectories in
                    // entry order, giving a depth-first left-to-right walk.
                    for entry in entries.iter().rev() {
                        if entry.is_dir() && entry.name() != "." && entry.name() != ".." {
                            stack.push(current.join(entry.name()));
                        }
                    }
                }
                batches.push(Batch {
                    label: labeled.then(|| current.to_string_lossy().into_owned()),
                    entries,
                });
            }
            Err(e) => {
                eprintln!("lsr: cannot open directory '{}': {}", current.display(), e);
                errors += 1;
            }
        }
    }

    errors
}

/// Reads one directory into filtered, sorted entries.
///
/// A failure mid-iteration discards the partial results for this directory;
/// the caller reports it and moves on. Under show-all, `.` and `..` are
/// injected ahead of the real children so they participate in sorting.
fn list_directory(dir: &Path, opts: &Options, fmt: &Formatter) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::with_capacity(64);

    for item in fs::read_dir(dir)? {
        let item = item?;
        let name = item.file_name().to_string_lossy().into_owned();
        entries.push(Entry::from_path(&item.path(), name, opts));
    }

    if opts.visibility == Visibility::All {
        entries.insert(0, Entry::from_path(&dir.join(".."), String::from(".."), opts));
        entries.insert(0, Entry::from_path(&dir.join("."), String::from("."), opts));
    }

    fmt.filter_entries(&mut entries);
    fmt.sort_entries(&mut entries);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn opts_for(targets: Vec<String>) -> Options {
        Options {
            targets,
            ..Options::default()
        }
    }

    #[test]
    fn single_directory_has_no_header() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        File::create(dir.path().join("a.txt"))?;
        File::create(dir.path().join("b.txt"))?;

        let opts = opts_for(vec![dir.path().to_string_lossy().into_owned()]);
        let (batches, errors) = collect_batches(&opts);

        assert_eq!(errors, 0);
        assert_eq!(batches.len(), 1);
        assert!(batches[0].label.is_none());
        let names: Vec<_> = batches[0].entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
        Ok(())
    }

    #[test]
    fn file_and_directory_mix_labels_the_directory() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file = dir.path().join("x");
        File::create(&file)?;
        let sub = dir.path().join("d");
        fs::create_dir(&sub)?;
        File::create(sub.join("y"))?;

        let opts = opts_for(vec![
            file.to_string_lossy().into_owned(),
            sub.to_string_lossy().into_owned(),
        ]);
        let (batches, errors) = collect_batches(&opts);

        assert_eq!(errors, 0);
        assert_eq!(batches.len(), 2);
        assert!(batches[0].label.is_none());
        assert_eq!(batches[0].entries.len(), 1);
        assert_eq!(batches[1].label.as_deref(), Some(sub.to_str().unwrap()));
        assert_eq!(batches[1].entries[0].name(), "y");
        Ok(())
    }

    #[test]
    fn missing_target_is_isolated() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        File::create(dir.path().join("real"))?;

        let opts = opts_for(vec![
            String::from("/definitely/not/here"),
            dir.path().to_string_lossy().into_owned(),
        ]);
        let (batches, errors) = collect_batches(&opts);

        assert_eq!(errors, 1);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].entries[0].name(), "real");
        Ok(())
    }

    #[test]
    fn show_all_injects_dot_entries_first() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        File::create(dir.path().join("a.txt"))?;
        File::create(dir.path().join(".secret"))?;

        let mut opts = opts_for(vec![dir.path().to_string_lossy().into_owned()]);
        opts.visibility = Visibility::All;
        let (batches, _) = collect_batches(&opts);

        let names: Vec<_> = batches[0].entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, [".", "..", ".secret", "a.txt"]);
        Ok(())
    }

    #[test]
    fn directory_only_lists_the_directory_itself() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("inner"))?;

        let mut opts = opts_for(vec![dir.path().to_string_lossy().into_owned()]);
        opts.directory_only = true;
        let (batches, _) = collect_batches(&opts);

        assert_eq!(batches.len(), 1);
        assert!(batches[0].label.is_none());
        assert_eq!(batches[0].entries.len(), 1);
        assert!(batches[0].entries[0].is_dir());
        Ok(())
    }

    #[test]
    fn recursion_walks_depth_first_with_headers() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("a/inner"))?;
        fs::create_dir(dir.path().join("b"))?;
        File::create(dir.path().join("a/file"))?;

        let mut opts = opts_for(vec![dir.path().to_string_lossy().into_owned()]);
        opts.recursive = true;
        let (batches, errors) = collect_batches(&opts);

        assert_eq!(errors, 0);
        let labels: Vec<_> = batches
            .iter()
            .map(|b| b.label.as_deref().unwrap())
            .collect();
        let root = dir.path().to_str().unwrap().to_string();
        assert_eq!(
            labels,
            [
                root.clone(),
                format!("{}/a", root),
                format!("{}/a/inner", root),
                format!("{}/b", root),
            ]
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_reported_and_skipped() -> Result<(), Box<dyn std::error::Error>> {
        use std::os::unix::fs::PermissionsExt;

        // Root bypasses permission checks, so this path cannot fire there.
        if uzers::get_effective_uid() == 0 {
            return Ok(());
        }

        let dir = tempdir()?;
        let locked = dir.path().join("locked");
        let open = dir.path().join("open");
        fs::create_dir(&locked)?;
        fs::create_dir(&open)?;
        File::create(open.join("visible"))?;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

        let opts = opts_for(vec![
            locked.to_string_lossy().into_owned(),
            open.to_string_lossy().into_owned(),
        ]);
        let (batches, errors) = collect_batches(&opts);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;

        assert_eq!(errors, 1);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].entries.len(), 1);
        assert_eq!(batches[0].entries[0].name(), "visible");
        Ok(())
    }

    #[test]
    fn hidden_subdirectories_are_not_descended_by_default(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join(".hidden"))?;
        fs::create_dir(dir.path().join("shown"))?;

        let mut opts = opts_for(vec![dir.path().to_string_lossy().into_owned()]);
        opts.recursive = true;
        let (batches, _) = collect_batches(&opts);

        assert_eq!(batches.len(), 2);
        assert!(batches[1].label.as_deref().unwrap().ends_with("/shown"));
        Ok(())
    }
}
