//! Chapter file collection and ordering.
//!
//! Produces the ordered list of chapter files for one build: either the
//! explicit `[build.files]` list or the immediate entries of the input
//! directory. The designated index file is always pinned to processing
//! position 0 and the remaining files end up in lexicographic path order.

use crate::config::{BookConfig, OrderMode};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Collect the chapter files to render, in final processing order.
///
/// Entries that are missing or are directories are silently dropped.
/// An empty result is not an error; downstream stages render zero chapters.
/// A directory enumeration failure aborts the run.
pub fn collect_files(config: &BookConfig) -> Result<Vec<PathBuf>> {
    let mut files = match &config.build.files {
        Some(files) => files.clone(),
        None => enumerate_dir(&config.build.input)?,
    };

    if config.build.order == OrderMode::Sort {
        files.sort();
    }
    pin_index(&mut files, &config.build.index);

    // Keep only entries that exist and are regular files
    files.retain(|path| path.is_file());

    // Final render order: the pinned index first, everything else
    // lexicographic by path
    if files.first().is_some_and(|f| is_index(f, &config.build.index)) {
        files[1..].sort();
    } else {
        files.sort();
    }

    Ok(files)
}

/// Enumerate the immediate entries of the input directory.
///
/// Entries are joined to the directory's full path, so the result stays
/// valid regardless of the process working directory.
fn enumerate_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read input directory: {}", dir.display()))?;
        files.push(entry.path());
    }
    Ok(files)
}

/// Move the entry whose file name matches the designated index to the front.
fn pin_index(files: &mut Vec<PathBuf>, index: &str) {
    if let Some(pos) = files.iter().position(|f| is_index(f, index)) {
        let file = files.remove(pos);
        files.insert(0, file);
    }
}

fn is_index(path: &Path, index: &str) -> bool {
    path.file_name().is_some_and(|name| name == index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "# chapter\n").unwrap();
        path
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_index_pinned_first_with_given_order() {
        let input = tempdir().unwrap();
        touch(input.path(), "01-intro.md");
        touch(input.path(), "02-time.md");
        touch(input.path(), "index.md");

        let mut config = BookConfig::default();
        config.build.input = input.path().to_path_buf();

        let files = collect_files(&config).unwrap();
        assert_eq!(names(&files), vec!["index.md", "01-intro.md", "02-time.md"]);
    }

    #[test]
    fn test_index_pinned_first_with_sort_order() {
        let input = tempdir().unwrap();
        touch(input.path(), "index.md");
        touch(input.path(), "02-time.md");
        touch(input.path(), "01-intro.md");

        let mut config = BookConfig::default();
        config.build.input = input.path().to_path_buf();
        config.build.order = OrderMode::Sort;

        let files = collect_files(&config).unwrap();
        assert_eq!(names(&files), vec!["index.md", "01-intro.md", "02-time.md"]);
    }

    #[test]
    fn test_explicit_file_list_drops_missing_entries() {
        let input = tempdir().unwrap();
        let intro = touch(input.path(), "01-intro.md");
        let ghost = input.path().join("99-ghost.md");

        let mut config = BookConfig::default();
        config.build.files = Some(vec![ghost, intro]);

        let files = collect_files(&config).unwrap();
        assert_eq!(names(&files), vec!["01-intro.md"]);
    }

    #[test]
    fn test_directories_are_filtered_out() {
        let input = tempdir().unwrap();
        touch(input.path(), "01-intro.md");
        fs::create_dir(input.path().join("assets")).unwrap();

        let mut config = BookConfig::default();
        config.build.input = input.path().to_path_buf();

        let files = collect_files(&config).unwrap();
        assert_eq!(names(&files), vec!["01-intro.md"]);
    }

    #[test]
    fn test_empty_input_directory_is_not_an_error() {
        let input = tempdir().unwrap();

        let mut config = BookConfig::default();
        config.build.input = input.path().to_path_buf();

        let files = collect_files(&config).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_missing_input_directory_is_fatal() {
        let mut config = BookConfig::default();
        config.build.input = PathBuf::from("/nonexistent/bookgen-input");

        assert!(collect_files(&config).is_err());
    }

    #[test]
    fn test_remaining_files_sorted_even_without_sort_mode() {
        let input = tempdir().unwrap();
        touch(input.path(), "03-replication.md");
        touch(input.path(), "index.md");
        touch(input.path(), "01-intro.md");
        touch(input.path(), "02-time.md");

        let mut config = BookConfig::default();
        config.build.input = input.path().to_path_buf();

        let files = collect_files(&config).unwrap();
        assert_eq!(
            names(&files),
            vec!["index.md", "01-intro.md", "02-time.md", "03-replication.md"]
        );
    }

    #[test]
    fn test_no_index_present_sorts_everything() {
        let input = tempdir().unwrap();
        touch(input.path(), "02-time.md");
        touch(input.path(), "01-intro.md");

        let mut config = BookConfig::default();
        config.build.input = input.path().to_path_buf();

        let files = collect_files(&config).unwrap();
        assert_eq!(names(&files), vec!["01-intro.md", "02-time.md"]);
    }
}
