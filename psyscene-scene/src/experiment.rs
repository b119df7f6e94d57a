use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context as _;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::data::Datum;

/// One finished row; fields keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(Vec<(String, Datum)>);

impl Row {
    pub fn get(&self, key: &str) -> Option<&Datum> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn set(&mut self, key: String, value: Datum) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Trial-by-trial results of a session.
#[derive(Debug, Clone, Default)]
pub struct ExperimentLog {
    rows: Vec<Row>,
    current: Row,
}

impl ExperimentLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field to the row being built; a repeated key overwrites.
    pub fn add_data(&mut self, key: impl Into<String>, value: impl Into<Datum>) {
        self.current.set(key.into(), value.into());
    }

    /// Closes the current row. An empty row is not recorded.
    pub fn next_entry(&mut self) {
        if !self.current.is_empty() {
            self.rows.push(std::mem::take(&mut self.current));
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.rows)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(rows = self.rows.len(), path = %path.display(), "results saved");
        Ok(())
    }
}
