// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;

/// A name-keyed store of resolved handles.
///
/// Handles are resolved once during setup and looked up by name afterwards.
#[derive(Debug, Clone)]
pub struct Registry<H> {
    storage: HashMap<String, H>,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self {
            storage: HashMap::new(),
        }
    }
}

impl<H: Copy> Registry<H> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the handle stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, handle: H) -> Option<H> {
        self.storage.insert(name.into(), handle)
    }

    /// Returns the handle stored under `name`.
    pub fn get(&self, name: &str) -> Option<H> {
        self.storage.get(name).copied()
    }

    /// Checks whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.storage.contains_key(name)
    }

    /// Removes and returns the handle stored under `name`.
    pub fn remove(&mut self, name: &str) -> Option<H> {
        self.storage.remove(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Iterates over every entry.
    pub fn iter(&self) -> impl Iterator<Item = (&str, H)> {
        self.storage.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
