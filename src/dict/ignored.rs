use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Words the user chose to ignore, one per line. Lines starting with `#`
/// are comments. The file only ever grows, except through [`clear`].
///
/// [`clear`]: IgnoredWords::clear
#[derive(Debug, Clone, Default)]
pub struct IgnoredWords {
    words: HashSet<String>,
    order: Vec<String>,
    path: Option<PathBuf>,
}

impl IgnoredWords {
    /// In-memory list, never persisted.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut ignored = Self {
            path: Some(path.to_path_buf()),
            ..Default::default()
        };

        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read ignored words: {}", path.display()))?;
            for line in content.lines() {
                let word = line.trim();
                if !word.is_empty() && !word.starts_with('#') {
                    ignored.remember(word);
                }
            }
        }

        Ok(ignored)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word.trim())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Words in the order they were first ignored.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Record `word`. Returns false if it was already ignored.
    pub fn add(&mut self, word: &str) -> Result<bool> {
        let word = word.trim();
        if word.is_empty() || !self.remember(word) {
            return Ok(false);
        }

        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).context("Failed to create ignored words directory")?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open ignored words: {}", path.display()))?;
            writeln!(file, "{}", word).context("Failed to append ignored word")?;
        }

        Ok(true)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.words.clear();
        self.order.clear();
        if let Some(path) = &self.path {
            fs::write(path, "").context("Failed to clear ignored words")?;
        }
        Ok(())
    }

    fn remember(&mut self, word: &str) -> bool {
        if self.words.insert(word.to_string()) {
            self.order.push(word.to_string());
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ignored_words_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("ignored.txt");

        let mut ignored = IgnoredWords::load(&path).unwrap();
        assert!(ignored.is_empty());
        assert!(ignored.add("خطاء").unwrap());
        assert!(!ignored.add(" خطاء ").unwrap());
        assert!(ignored.add("انشاء").unwrap());

        let reloaded = IgnoredWords::load(&path).unwrap();
        assert!(reloaded.contains("خطاء"));
        assert_eq!(reloaded.iter().collect::<Vec<_>>(), vec!["خطاء", "انشاء"]);
    }

    #[test]
    fn test_comments_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ignored.txt");
        fs::write(&path, "# ignored words\nكلمة\n\n").unwrap();

        let ignored = IgnoredWords::load(&path).unwrap();
        assert_eq!(ignored.len(), 1);
        assert!(!ignored.contains("# ignored words"));
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ignored.txt");
        let mut ignored = IgnoredWords::load(&path).unwrap();
        ignored.add("كلمة").unwrap();
        ignored.clear().unwrap();

        assert!(IgnoredWords::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_in_memory_does_not_touch_disk() {
        let mut ignored = IgnoredWords::in_memory();
        assert!(ignored.add("كلمة").unwrap());
        assert!(ignored.contains("كلمة"));
    }
}
