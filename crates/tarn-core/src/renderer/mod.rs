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

//! Backend-agnostic rendering contracts.
//!
//! Nothing in this module talks to a GPU. It defines the resource handles,
//! draw parameters and the [`GraphicsDevice`] trait that a platform backend
//! implements, plus a [`HeadlessDevice`] that records commands instead of
//! executing them.

pub mod api;
pub mod error;
pub mod headless;
pub mod traits;

pub use self::api::*;
pub use self::error::{RenderError, ResourceError};
pub use self::headless::{DeviceCommand, HeadlessDevice};
pub use self::traits::GraphicsDevice;
