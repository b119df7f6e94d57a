use psyscene_core::{Event, Result, SceneError};
use serde::{Deserialize, Serialize};

pub const SHOW_TIME: &str = "show_time";
pub const EVENTS: &str = "events";

/// A value kept in a [`DataCollector`]. `Null` marks "no value".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Datum {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    Events(Vec<Event>),
    List(Vec<Datum>),
}

impl Datum {
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Datum::Number(n) => Some(*n),
            Datum::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Datum::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Datum::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_events(&self) -> Option<&[Event]> {
        match self {
            Datum::Events(events) => Some(events),
            _ => None,
        }
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Bool(v)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Number(v)
    }
}

impl From<f32> for Datum {
    fn from(v: f32) -> Self {
        Datum::Number(v as f64)
    }
}

impl From<i32> for Datum {
    fn from(v: i32) -> Self {
        Datum::Integer(v.into())
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Integer(v)
    }
}

impl From<usize> for Datum {
    fn from(v: usize) -> Self {
        Datum::Integer(v as i64)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::Text(v.to_string())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Datum::Text(v)
    }
}

impl From<Vec<Event>> for Datum {
    fn from(v: Vec<Event>) -> Self {
        Datum::Events(v)
    }
}

impl From<Vec<Datum>> for Datum {
    fn from(v: Vec<Datum>) -> Self {
        Datum::List(v)
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(v: Option<T>) -> Self {
        v.map_or(Datum::Null, Into::into)
    }
}

/// Per-run key/value store, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataCollector {
    entries: Vec<(String, Datum)>,
}

impl DataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value under `key`. An unset key and a key holding
    /// [`Datum::Null`] both fail with `MissingKey`; use [`raw`](Self::raw)
    /// to tell them apart.
    pub fn get(&self, key: &str) -> Result<&Datum> {
        match self.raw(key) {
            Some(datum) if !datum.is_null() => Ok(datum),
            _ => Err(SceneError::MissingKey(key.to_string())),
        }
    }

    pub fn raw(&self, key: &str) -> Option<&Datum> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Datum>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn get_number(&self, key: &str) -> Result<f64> {
        self.get(key)?
            .as_number()
            .ok_or_else(|| SceneError::MissingKey(key.to_string()))
    }

    pub fn get_text(&self, key: &str) -> Result<&str> {
        self.get(key)?
            .as_text()
            .ok_or_else(|| SceneError::MissingKey(key.to_string()))
    }

    pub fn get_events(&self, key: &str) -> Result<&[Event]> {
        self.get(key)?
            .as_events()
            .ok_or_else(|| SceneError::MissingKey(key.to_string()))
    }

    /// Appends to the `events` list, replacing whatever else sits there.
    pub fn push_event(&mut self, event: Event) {
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| k == EVENTS) {
            match slot {
                Datum::Events(events) => events.push(event),
                other => *other = Datum::Events(vec![event]),
            }
        } else {
            self.entries.push((EVENTS.to_string(), Datum::Events(vec![event])));
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
