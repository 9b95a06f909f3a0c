use crate::error::Error;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{error, warn};
use walkdir::WalkDir;

/// Recursively list every regular file below `root`.
///
/// Entries are sorted by file name at each directory level, so the returned
/// order is reproducible between runs over the same tree. Symlinks are not
/// followed. Files or directories matching one of `ignore_globs` are skipped.
pub fn discover_files(root: &Path, ignore_globs: &[String]) -> Result<Vec<PathBuf>, Error> {
    let metadata = std::fs::metadata(root).map_err(|source| Error::Discovery {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(Error::Discovery {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }
    // Verify the root itself is listable before walking.
    std::fs::read_dir(root).map_err(|source| Error::Discovery {
        path: root.to_path_buf(),
        source,
    })?;

    let ignore_patterns = compile_patterns(ignore_globs);

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !ignore_patterns
                    .iter()
                    .any(|pattern| pattern.matches_path(entry.path()))
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn compile_patterns(ignore_globs: &[String]) -> Vec<Pattern> {
    ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_discover_files_sorted_and_recursive() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("100CANON")).unwrap();
        fs::create_dir_all(root.join("101CANON")).unwrap();
        fs::write(root.join("101CANON/IMG_0200.JPG"), b"b").unwrap();
        fs::write(root.join("100CANON/IMG_0001.JPG"), b"a").unwrap();
        fs::write(root.join("100CANON/IMG_0001.CR2"), b"a").unwrap();

        let files = discover_files(root, &[]).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("100CANON/IMG_0001.CR2"),
                PathBuf::from("100CANON/IMG_0001.JPG"),
                PathBuf::from("101CANON/IMG_0200.JPG"),
            ]
        );
    }

    #[test]
    fn test_discover_files_skips_ignored_entries() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join(".thumbnails")).unwrap();
        fs::write(root.join(".thumbnails/IMG_0001.THM"), b"t").unwrap();
        fs::write(root.join("IMG_0001.JPG"), b"j").unwrap();
        fs::write(root.join("desktop.ini"), b"x").unwrap();

        let ignore = vec!["**/.thumbnails".to_string(), "**/*.ini".to_string()];
        let files = discover_files(root, &ignore).unwrap();

        assert_eq!(files, vec![root.join("IMG_0001.JPG")]);
    }

    #[test]
    fn test_discover_files_missing_root_is_discovery_error() {
        let tmp = tempdir().unwrap();
        let result = discover_files(&tmp.path().join("no-card-inserted"), &[]);
        assert!(matches!(result, Err(Error::Discovery { .. })));
    }

    #[test]
    fn test_discover_files_empty_root() {
        let tmp = tempdir().unwrap();
        assert!(discover_files(tmp.path(), &[]).unwrap().is_empty());
    }
}
