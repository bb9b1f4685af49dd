use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use itertools::Itertools;
use log::debug;
use walkdir::WalkDir;

use crate::input::File;

const GLOB_META: &[char] = &['?', '*', '{', '}', '[', ']', '!'];

/// Every document matched by a unix-style glob. Each matched file is an independent [File] input.
#[derive(Debug, Default)]
pub struct Glob {
    files: Vec<File>,
}

impl Glob {
    /// Relative globs are rooted at the working directory. The longest leading part without glob
    /// syntax becomes the root that chunks are named relative to.
    pub fn new(glob: &str) -> Result<Self> {
        let cwd = env::current_dir().context("working directory")?;
        match split_glob(glob) {
            Some((root, pattern)) => Self::new_with_root(cwd.join(root), &pattern),
            None => Self::new_with_root(cwd, glob),
        }
    }

    /// An empty `glob` takes every file under `root`, or `root` itself if it is a file.
    pub fn new_with_root<P: AsRef<Path>>(root: P, glob: &str) -> Result<Self> {
        let root = root.as_ref();
        let files = match glob {
            "" if root.is_file() => {
                let (dir, name) = root
                    .parent()
                    .zip(root.file_name())
                    .ok_or_else(|| anyhow!("'{}' is not a file path", root.display()))?;
                vec![File::with_root(dir, name)]
            }
            "" => matching_files(root, "**/*")?,
            glob => matching_files(root, glob)?,
        };
        debug!("'{}' matched {} document(s)", root.join(glob).display(), files.len());
        Ok(Self { files })
    }

    pub fn files(&self) -> &[File] {
        &self.files
    }
}

fn matching_files(root: &Path, glob: &str) -> Result<Vec<File>> {
    let pattern = root.join(glob);
    let pattern = pattern
        .to_str()
        .ok_or_else(|| anyhow!("glob '{}' is not valid unicode", pattern.display()))?;
    let matcher = globset::Glob::new(pattern)?.compile_matcher();
    let mut relative_paths = vec![];
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file() && matcher.is_match(entry.path()) {
            relative_paths.push(entry.path().strip_prefix(root)?.to_path_buf());
        }
    }
    Ok(relative_paths
        .into_iter()
        .sorted()
        .map(|relative_path| File::with_root(root, relative_path))
        .collect())
}

/// Splits off the leading directories that contain no glob syntax, e.g. `specs/v1/**/*.yaml`
/// becomes `specs/v1` and `**/*.yaml`. `None` if the glob starts with glob syntax.
fn split_glob(glob: &str) -> Option<(PathBuf, String)> {
    let Some(meta) = glob.find(GLOB_META) else {
        return Some((PathBuf::from(glob), String::new()));
    };
    let slash = glob[..meta].rfind('/')?;
    let root = if slash == 0 { "/" } else { &glob[..slash] };
    Some((PathBuf::from(root), glob[slash + 1..].to_string()))
}

#[cfg(test)]
mod tests {
    mod new_with_root {
        use std::fs;
        use std::fs::File;
        use std::path::PathBuf;

        use anyhow::Result;
        use itertools::Itertools;
        use tempfile::tempdir;

        use crate::input::Glob;
        use crate::Input;

        #[test]
        fn glob() -> Result<()> {
            let root = tempdir()?;
            fs::create_dir_all(root.path().join("a/b"))?;
            fs::create_dir_all(root.path().join("a/c"))?;
            fs::create_dir_all(root.path().join("d/e"))?;
            let paths = [
                PathBuf::from("a/b/api0.yaml"),
                PathBuf::from("a/b/api1.json"),
                PathBuf::from("a/c/api2.yaml"),
                PathBuf::from("d/e/api3.yaml"),
            ];
            for path in &paths {
                File::create(root.path().join(path))?;
            }

            let glob = Glob::new_with_root(root.path().join("a"), "**/*.yaml")?;
            assert_files(glob, vec!["b/api0.yaml", "c/api2.yaml"]);
            Ok(())
        }

        #[test]
        fn directory() -> Result<()> {
            let root = tempdir()?;
            fs::create_dir_all(root.path().join("a/b"))?;
            File::create(root.path().join("a/b/api0.json"))?;
            File::create(root.path().join("a/b/api1.json"))?;

            let glob = Glob::new_with_root(root.path().join("a/b"), "")?;
            assert_files(glob, vec!["api0.json", "api1.json"]);
            Ok(())
        }

        #[test]
        fn single_file() -> Result<()> {
            let root = tempdir()?;
            fs::create_dir_all(root.path().join("a/b"))?;
            File::create(root.path().join("a/b/api0.json"))?;

            let glob = Glob::new_with_root(root.path().join("a/b/api0.json"), "")?;
            assert_files(glob, vec!["api0.json"]);
            Ok(())
        }

        fn assert_files(glob: Glob, expected: Vec<&str>) {
            let file_names = glob
                .files()
                .iter()
                .map(|file| {
                    file.chunk()
                        .relative_file_path
                        .as_ref()
                        .unwrap()
                        .to_string_lossy()
                        .replace('\\', "/")
                })
                .collect_vec();
            assert_eq!(file_names, expected);
        }
    }

    mod split_glob {
        use std::path::PathBuf;

        use crate::input::glob::split_glob;

        #[test]
        fn path_and_glob() {
            assert_eq!(
                split_glob("a/b/c/**/*"),
                Some((PathBuf::from("a/b/c"), "**/*".to_string()))
            );
        }

        #[test]
        fn glob_within_segment() {
            assert_eq!(
                split_glob("specs/api-*.yaml"),
                Some((PathBuf::from("specs"), "api-*.yaml".to_string()))
            );
        }

        #[test]
        fn path_only() {
            assert_eq!(
                split_glob("a/b/c.json"),
                Some((PathBuf::from("a/b/c.json"), "".to_string()))
            );
        }

        #[test]
        fn glob_only() {
            assert_eq!(split_glob("**/specs/*.json"), None);
        }
    }
}
