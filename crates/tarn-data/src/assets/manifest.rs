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

use std::collections::BTreeMap;

/// Tracks which declared assets have finished loading.
///
/// Loaders report completion by name; rendering must not start until
/// [`is_ready`](Self::is_ready) holds.
#[derive(Debug, Clone, Default)]
pub struct AssetManifest {
    loaded: BTreeMap<String, bool>,
}

impl AssetManifest {
    /// Creates an empty manifest. An empty manifest is ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an asset that must load before rendering.
    pub fn declare(&mut self, name: impl Into<String>) {
        self.loaded.entry(name.into()).or_insert(false);
    }

    /// Records that `name` finished loading.
    ///
    /// Returns `false` if the asset was never declared.
    pub fn mark_loaded(&mut self, name: &str) -> bool {
        match self.loaded.get_mut(name) {
            Some(flag) => {
                *flag = true;
                true
            }
            None => {
                log::warn!("Asset '{name}' reported loaded but was never declared");
                false
            }
        }
    }

    /// Returns `true` once every declared asset has loaded.
    pub fn is_ready(&self) -> bool {
        self.loaded.values().all(|&loaded| loaded)
    }

    /// Names of the declared assets still outstanding, sorted.
    pub fn missing(&self) -> Vec<String> {
        self.loaded
            .iter()
            .filter(|(_, &loaded)| !loaded)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_only_after_every_declared_asset() {
        let mut manifest = AssetManifest::new();
        manifest.declare("heightmap");
        manifest.declare("grass");
        assert!(!manifest.is_ready());

        manifest.mark_loaded("grass");
        assert_eq!(manifest.missing(), vec!["heightmap".to_string()]);

        manifest.mark_loaded("heightmap");
        assert!(manifest.is_ready());
    }

    #[test]
    fn undeclared_assets_are_ignored() {
        let mut manifest = AssetManifest::new();
        assert!(!manifest.mark_loaded("ghost"));
        assert!(manifest.is_ready());
    }
}
