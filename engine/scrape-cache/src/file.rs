//! Local file-based cache backend

use crate::error::{CacheError, Result};
use crate::store::CacheStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Cache persisted as a single `bincode` file.
///
/// The whole map is loaded at open and rewritten after every `put`. Writes go
/// to a sibling temporary file which is then renamed over the target, so a
/// crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct FileCache<K, V> {
    path: PathBuf,
    entries: BTreeMap<K, V>,
}

impl<K, V> FileCache<K, V>
where
    K: Ord + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    /// Open a cache file, starting empty if it does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let bytes = fs::read(&path)?;
            if bytes.is_empty() {
                BTreeMap::new()
            } else {
                bincode::deserialize(&bytes)
                    .map_err(|e| CacheError::corruption(&path, e.to_string()))?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Opened cache {:?} with {} entries", path, entries.len());

        Ok(Self { path, entries })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            bincode::serialize_into(&mut writer, &self.entries)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }

        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl<K, V> CacheStore<K, V> for FileCache<K, V>
where
    K: Ord + Clone + Serialize + DeserializeOwned,
    V: Clone + Serialize + DeserializeOwned,
{
    fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn put(&mut self, key: K, value: V) -> Result<()> {
        self.entries.insert(key, value);
        self.persist()
    }

    fn flush(&mut self) -> Result<()> {
        self.persist()
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Point {
        value: i64,
        label: String,
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let temp_dir = TempDir::new().unwrap();
        let cache: FileCache<String, Point> =
            FileCache::open(temp_dir.path().join("absent.bin")).unwrap();

        assert!(cache.is_empty());
        assert!(!cache.path().exists());
    }

    #[test]
    fn test_put_is_durable_without_flush() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("points.bin");

        let mut cache: FileCache<String, Option<Vec<Point>>> = FileCache::open(&path).unwrap();
        cache
            .put(
                "harry kane Centre-Forward".to_string(),
                Some(vec![Point { value: 100, label: "a".to_string() }]),
            )
            .unwrap();
        cache.put("nobody Goalkeeper".to_string(), None).unwrap();
        drop(cache);

        let reopened: FileCache<String, Option<Vec<Point>>> = FileCache::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(
            reopened.get(&"harry kane Centre-Forward".to_string()),
            Some(Some(vec![Point { value: 100, label: "a".to_string() }]))
        );
        assert_eq!(reopened.get(&"nobody Goalkeeper".to_string()), Some(None));
    }

    #[test]
    fn test_no_temporary_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("links.bin");

        let mut cache: FileCache<u16, Vec<String>> = FileCache::open(&path).unwrap();
        cache.put(2020, vec!["x".to_string()]).unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["links.bin".to_string()]);
    }

    #[test]
    fn test_corrupted_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.bin");
        fs::write(&path, [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]).unwrap();

        let result: Result<FileCache<String, Point>> = FileCache::open(&path);
        assert!(matches!(result, Err(CacheError::Corruption { .. })));
    }
}
