//! JSONL record storage
//!
//! Each record kind lives in its own `.larder/*.jsonl` file with one JSON
//! object per line. Uses file locking for concurrent access safety.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::domain::{Home, Ingredient, Recipe};

/// A record that can be stored one per line
pub trait Record: Serialize + DeserializeOwned {
    /// What the records are called in error messages
    const KIND: &'static str;

    /// Sort key for consistent file output
    fn sort_key(&self) -> String;
}

impl Record for Ingredient {
    const KIND: &'static str = "ingredient";

    fn sort_key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for Recipe {
    const KIND: &'static str = "recipe";

    fn sort_key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for Home {
    const KIND: &'static str = "home";

    fn sort_key(&self) -> String {
        self.id.to_string()
    }
}

/// Store for one kind of record in JSONL format
pub struct JsonlStore<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

impl<T: Record> JsonlStore<T> {
    /// Creates a new store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all records from the store
    pub fn read_all(&self) -> Result<Vec<T>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {} store: {}", T::KIND, self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .with_context(|| format!("Failed to acquire read lock on {} store", T::KIND))?;

        let reader = BufReader::new(&file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let record: T = serde_json::from_str(&line).with_context(|| {
                format!(
                    "Failed to parse {} at {}:{}",
                    T::KIND,
                    self.path.display(),
                    line_num + 1
                )
            })?;

            records.push(record);
        }

        debug!(kind = T::KIND, count = records.len(), "Loaded records");
        // Lock is released when file is dropped
        Ok(records)
    }

    /// Writes all records to the store (full rewrite)
    pub fn write_all<'a>(&self, records: impl IntoIterator<Item = &'a T>) -> Result<()>
    where
        T: 'a,
    {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("jsonl.tmp");

        let mut sorted: Vec<&T> = records.into_iter().collect();
        sorted.sort_by_key(|r| r.sort_key());

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .with_context(|| format!("Failed to acquire write lock on {} store", T::KIND))?;

            let mut writer = BufWriter::new(&file);

            for record in &sorted {
                let line = serde_json::to_string(record)
                    .with_context(|| format!("Failed to serialize {}", T::KIND))?;
                writeln!(writer, "{}", line)
                    .with_context(|| format!("Failed to write {}", T::KIND))?;
            }

            writer
                .flush()
                .with_context(|| format!("Failed to flush {} store", T::KIND))?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        debug!(kind = T::KIND, count = sorted.len(), "Saved records");
        Ok(())
    }
}
