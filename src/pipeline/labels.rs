use std::{fs, path::Path};

use anyhow::Context;

/// Ordered label names; index `i` names output `i` of a model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// One label per line. Blank lines are skipped and whitespace is trimmed.
    pub fn parse(contents: &str) -> Self {
        Self::from_labels(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read label table {}", path.display()))?;
        let table = Self::parse(&contents);
        if table.is_empty() {
            anyhow::bail!("label table {} has no labels", path.display());
        }
        log::debug!("loaded {} labels from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_blank_lines() {
        let table = LabelTable::parse("Cat\n\n  Dog  \r\nBird\n");
        assert_eq!(table.as_slice(), &["Cat", "Dog", "Bird"]);
        assert_eq!(table.get(1), Some("Dog"));
        assert_eq!(table.get(3), None);
    }

    #[test]
    fn load_reads_file_and_rejects_empty_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        fs::write(&path, "beagle\npug\n").unwrap();
        assert_eq!(LabelTable::load(&path).unwrap().len(), 2);

        let empty = dir.path().join("empty.txt");
        fs::write(&empty, "\n \n").unwrap();
        assert!(LabelTable::load(&empty).is_err());
        assert!(LabelTable::load(&dir.path().join("missing.txt")).is_err());
    }
}
