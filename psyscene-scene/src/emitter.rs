use std::collections::HashMap;

use psyscene_core::{EventName, Result, SceneError};

/// A listener receives the value its emitter dispatches with.
pub type Listener<T> = Box<dyn FnMut(&mut T) -> anyhow::Result<()>>;

/// Named listener registry: at most one listener per event name.
pub struct EventEmitter<T> {
    listeners: HashMap<String, Listener<T>>,
}

impl<T> EventEmitter<T> {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Adds a listener. Fails if `name` already has one or is not a
    /// recognised event name.
    pub fn on<F>(&mut self, name: &str, listener: F) -> Result<&mut Self>
    where
        F: FnMut(&mut T) -> anyhow::Result<()> + 'static,
    {
        if self.listeners.contains_key(name) {
            return Err(SceneError::DuplicateListener(name.to_string()));
        }
        EventName::parse(name)?;
        self.listeners.insert(name.to_string(), Box::new(listener));
        Ok(self)
    }

    /// Removes a listener; unknown names are ignored.
    pub fn off(&mut self, name: &str) -> &mut Self {
        self.listeners.remove(name);
        self
    }

    /// Calls the listener for `name` once, if there is one.
    pub fn emit(&mut self, name: &str, target: &mut T) -> Result<&mut Self> {
        if let Some(listener) = self.listeners.get_mut(name) {
            listener(target).map_err(|e| SceneError::from_listener(name, e))?;
        }
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.listeners.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.listeners.keys().map(String::as_str)
    }
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("EventEmitter").field("listeners", &names).finish()
    }
}
