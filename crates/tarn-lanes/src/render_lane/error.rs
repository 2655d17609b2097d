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

use tarn_core::renderer::{RenderError, ResourceError};
use tarn_data::SceneError;

/// Errors raised while driving render passes.
#[derive(Debug, thiserror::Error)]
pub enum PassError {
    /// A target was activated twice without a deactivate in between.
    #[error("render target '{0}' is already active")]
    AlreadyActive(String),

    /// Another target is still active.
    #[error("cannot activate '{requested}' while '{active}' is active")]
    OtherTargetActive {
        /// The target being activated.
        requested: String,
        /// The target still bound.
        active: String,
    },

    /// A target was deactivated while inactive.
    #[error("render target '{0}' is not active")]
    NotActive(String),

    /// The target's attachments were already released.
    #[error("render target '{0}' has been released")]
    Released(String),

    /// The device rejected a call.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The device failed to allocate or free a resource.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// The scene rejected the request.
    #[error(transparent)]
    Scene(#[from] SceneError),
}
