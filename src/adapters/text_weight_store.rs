//! Plain-text implementation of the weight store.
//!
//! One `f64` per line in feature order. Values are written with `{}`, which
//! prints the shortest representation that parses back to the same bits.

use std::{
    fmt::Write as _,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{Result, error::Error, ports::WeightStore, q_learning::WeightVector};

/// Default directory for weight files.
pub const DEFAULT_WEIGHTS_DIR: &str = "agent_weights";
/// File name of the latest weights.
pub const WEIGHTS_FILE: &str = "weights.txt";
/// File name of the best weights.
pub const BEST_WEIGHTS_FILE: &str = "bestweights.data";

/// Text-file weight store.
///
/// # Examples
///
/// ```no_run
/// use skirmish::adapters::TextWeightStore;
/// use skirmish::ports::WeightStore;
/// use skirmish::q_learning::WeightVector;
///
/// let store = TextWeightStore::in_dir("agent_weights");
/// store.save(&WeightVector::new(vec![0.1, -0.2]))?;
/// let loaded = store.load()?;
/// # Ok::<(), skirmish::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWeightStore {
    weights_path: PathBuf,
    best_path: PathBuf,
}

impl TextWeightStore {
    pub fn new(weights_path: impl Into<PathBuf>, best_path: impl Into<PathBuf>) -> Self {
        Self {
            weights_path: weights_path.into(),
            best_path: best_path.into(),
        }
    }

    /// Store both files under `dir` with their standard names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(WEIGHTS_FILE), dir.join(BEST_WEIGHTS_FILE))
    }

    pub fn weights_path(&self) -> &Path {
        &self.weights_path
    }

    pub fn best_path(&self) -> &Path {
        &self.best_path
    }
}

impl Default for TextWeightStore {
    fn default() -> Self {
        Self::in_dir(DEFAULT_WEIGHTS_DIR)
    }
}

/// Write `weights` to `path`, creating parent directories as needed.
pub fn write_weights(path: &Path, weights: &WeightVector) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::Io {
            operation: format!("create directory {}", parent.display()),
            source,
        })?;
    }

    let mut text = String::new();
    for w in weights.as_slice() {
        // Writing to a String cannot fail.
        let _ = writeln!(text, "{w}");
    }

    fs::write(path, text).map_err(|source| Error::Io {
        operation: format!("write weights to {}", path.display()),
        source,
    })
}

/// Read weights from `path`; `Ok(None)` if the file does not exist.
pub fn read_weights(path: &Path) -> Result<Option<WeightVector>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(Error::Io {
                operation: format!("read weights from {}", path.display()),
                source,
            });
        }
    };

    let mut values = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed.parse::<f64>().map_err(|_| Error::ParseWeight {
            line: index + 1,
            value: trimmed.to_string(),
        })?;
        values.push(value);
    }
    Ok(Some(WeightVector::new(values)))
}

impl WeightStore for TextWeightStore {
    fn save(&self, weights: &WeightVector) -> Result<()> {
        write_weights(&self.weights_path, weights)
    }

    fn load(&self) -> Result<Option<WeightVector>> {
        read_weights(&self.weights_path)
    }

    fn save_best(&self, weights: &WeightVector) -> Result<()> {
        write_weights(&self.best_path, weights)
    }

    fn load_best(&self) -> Result<Option<WeightVector>> {
        read_weights(&self.best_path)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_roundtrip_is_exact() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = TextWeightStore::in_dir(temp_dir.path().join("nested"));
        let weights = WeightVector::new(vec![
            0.1,
            -1.0 / 3.0,
            1.0e-12,
            -0.0001234567890123,
            0.0,
            0.9999999999999999,
        ]);

        store.save(&weights).expect("Failed to save");
        assert_eq!(store.load().unwrap(), Some(weights));
    }

    #[test]
    fn test_latest_and_best_are_separate_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = TextWeightStore::in_dir(temp_dir.path());

        store.save(&WeightVector::new(vec![1.0])).unwrap();
        assert_eq!(store.load_best().unwrap(), None);

        store.save_best(&WeightVector::new(vec![2.0])).unwrap();
        assert_eq!(store.load().unwrap().unwrap().as_slice(), &[1.0]);
        assert_eq!(store.load_best().unwrap().unwrap().as_slice(), &[2.0]);
        assert!(temp_dir.path().join(BEST_WEIGHTS_FILE).exists());
    }

    #[test]
    fn test_missing_file_loads_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = TextWeightStore::in_dir(temp_dir.path());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(WEIGHTS_FILE);
        fs::write(&path, "0.5\nabc\n").unwrap();

        let result = read_weights(&path);
        assert!(matches!(
            result,
            Err(Error::ParseWeight { line: 2, ref value }) if value == "abc"
        ));
    }

    #[test]
    fn test_file_has_one_value_per_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(WEIGHTS_FILE);
        write_weights(&path, &WeightVector::new(vec![0.5, -2.0])).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0.5\n-2\n");
    }
}
