//! JSONL (JSON Lines) storage.
//!
//! JSONL is the source of truth for players and match results.
//! Each line is a valid JSON object representing one record.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{StorageConfig, StorageError};

/// Entity types for JSONL storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Player,
    Match,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Player => "players.jsonl",
            EntityType::Match => "matches.jsonl",
        }
    }
}

/// Get the path of an entity file.
pub fn entity_path(config: &StorageConfig, entity: EntityType) -> PathBuf {
    config.tournament_dir().join(entity.filename())
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single record to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;
        writer.get_ref().sync_data()?;

        debug!("Appended record to {:?}", self.path);
        Ok(())
    }

    /// Write records, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        writer.get_ref().sync_data()?;
        debug!("Wrote {} records to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    /// Read all records from the file. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();
        let mut line_num = 0;

        for line in reader.lines() {
            line_num += 1;
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        line_num, self.path, e
                    );
                }
            }
        }

        debug!("Read {} records from {:?}", entities.len(), self.path);
        Ok(entities)
    }

    /// Read records matching a predicate.
    pub fn read_where<F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        let all = self.read_all()?;
        Ok(all.into_iter().filter(predicate).collect())
    }

    /// Count readable records in the file.
    pub fn count(&self) -> Result<usize, StorageError> {
        Ok(self.read_all()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestRecord {
        id: u64,
        name: String,
    }

    fn record(id: u64, name: &str) -> TestRecord {
        TestRecord {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_jsonl_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.jsonl");

        let records = vec![record(1, "First"), record(2, "Second")];

        let writer: JsonlWriter<TestRecord> = JsonlWriter::new(path.clone());
        assert_eq!(writer.write_all(&records).unwrap(), 2);

        let reader: JsonlReader<TestRecord> = JsonlReader::new(path);
        let read = reader.read_all().unwrap();
        assert_eq!(read, records);
    }

    #[test]
    fn test_jsonl_append_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("append.jsonl");

        let writer: JsonlWriter<TestRecord> = JsonlWriter::new(path.clone());
        writer.append(&record(1, "First")).unwrap();
        writer.append(&record(2, "Second")).unwrap();

        let reader: JsonlReader<TestRecord> = JsonlReader::new(path);
        let read = reader.read_all().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[1].name, "Second");
    }

    #[test]
    fn test_jsonl_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<TestRecord> =
            JsonlReader::new(temp_dir.path().join("nonexistent.jsonl"));

        assert!(reader.read_all().unwrap().is_empty());
        assert_eq!(reader.count().unwrap(), 0);
    }

    #[test]
    fn test_write_all_empty_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("truncate.jsonl");

        let writer: JsonlWriter<TestRecord> = JsonlWriter::new(path.clone());
        writer.write_all(&[record(1, "Old")]).unwrap();
        assert_eq!(writer.write_all(&[]).unwrap(), 0);

        assert!(path.exists());
        let reader: JsonlReader<TestRecord> = JsonlReader::new(path);
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_all_skips_bad_and_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad_lines.jsonl");

        std::fs::write(
            &path,
            r#"{"id":1,"name":"Good"}
not-valid-json

{"id":2,"name":"Also Good"}
"#,
        )
        .unwrap();

        let reader: JsonlReader<TestRecord> = JsonlReader::new(path);
        let read = reader.read_all().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].name, "Good");
        assert_eq!(read[1].name, "Also Good");
        assert_eq!(reader.count().unwrap(), 2);
    }

    #[test]
    fn test_jsonl_read_where() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("filter.jsonl");

        let writer: JsonlWriter<TestRecord> = JsonlWriter::new(path.clone());
        writer
            .write_all(&[record(1, "A"), record(2, "B"), record(3, "C")])
            .unwrap();

        let reader: JsonlReader<TestRecord> = JsonlReader::new(path);
        let filtered = reader.read_where(|r| r.id >= 2).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].name, "B");
    }

    #[test]
    fn test_entity_paths() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());

        assert!(entity_path(&config, EntityType::Player).ends_with("tournament/players.jsonl"));
        assert!(entity_path(&config, EntityType::Match).ends_with("tournament/matches.jsonl"));

        let writer: JsonlWriter<TestRecord> = JsonlWriter::for_entity(&config, EntityType::Match);
        assert_eq!(writer.path, entity_path(&config, EntityType::Match));
    }
}
