//! Discovery of phrase files.
//!
//! [`PhraseFileWalker`] lists the `*.yaml` files directly inside the phrase
//! directory (no recursion) using the `ignore` crate, and returns them in
//! sorted order so that merging is reproducible across platforms.

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;

use crate::error::DataError;

/// Extension of phrase files.
const PHRASE_EXTENSION: &str = "yaml";

/// Lists phrase files in a single directory.
///
/// # Examples
///
/// ```ignore
/// use elect_data::PhraseFileWalker;
/// use camino::Utf8Path;
///
/// let paths = PhraseFileWalker::new(Utf8Path::new("i18n/auto")).collect_paths()?;
/// for path in &paths {
///     println!("{path}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PhraseFileWalker {
    dir: Utf8PathBuf,
}

impl PhraseFileWalker {
    /// Creates a walker for `dir`.
    #[must_use]
    pub fn new(dir: &Utf8Path) -> Self {
        Self {
            dir: dir.to_owned(),
        }
    }

    /// Returns the directory being listed.
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Collects the phrase file paths, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Walk`] if the directory cannot be listed (a
    /// missing directory included) and [`DataError::NonUtf8Path`] for a
    /// path that is not UTF-8.
    pub fn collect_paths(&self) -> Result<Vec<Utf8PathBuf>, DataError> {
        let mut paths = Vec::new();

        for result in self.build_walker() {
            let entry = result?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let utf8_path =
                Utf8Path::from_path(path).ok_or_else(|| DataError::NonUtf8Path(path.to_owned()))?;

            if is_phrase_file(utf8_path) {
                paths.push(utf8_path.to_owned());
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn build_walker(&self) -> ignore::Walk {
        WalkBuilder::new(&self.dir)
            .standard_filters(true)
            .max_depth(Some(1))
            .require_git(false)
            .build()
    }
}

fn is_phrase_file(path: &Utf8Path) -> bool {
    path.extension() == Some(PHRASE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_is_phrase_file() {
        assert!(is_phrase_file(Utf8Path::new("i18n/auto/es.yaml")));
        assert!(!is_phrase_file(Utf8Path::new("i18n/auto/es.yml")));
        assert!(!is_phrase_file(Utf8Path::new("i18n/auto/README")));
    }

    #[test]
    fn test_collect_paths_sorted_and_flat() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        for name in ["zh.yaml", "en.yaml", "es.yaml", "notes.txt"] {
            fs::write(root.join(name), "texts: {}\n").unwrap();
        }
        fs::create_dir(root.join("old")).unwrap();
        fs::write(root.join("old/fr.yaml"), "texts: {}\n").unwrap();

        let paths = PhraseFileWalker::new(root).collect_paths().unwrap();
        let names: Vec<_> = paths.iter().filter_map(|p| p.file_name()).collect();
        assert_eq!(names, ["en.yaml", "es.yaml", "zh.yaml"]);
    }

    #[test]
    fn test_collect_paths_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Utf8Path::from_path(dir.path()).unwrap().join("nope");
        let err = PhraseFileWalker::new(&missing).collect_paths().unwrap_err();
        assert!(matches!(err, DataError::Walk(_)));
    }
}
