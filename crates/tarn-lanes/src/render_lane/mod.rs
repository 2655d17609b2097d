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

//! Render lane: uploads geometry, walks node subtrees and drives the
//! off-screen and default passes of a frame.

mod compositor;
mod error;
mod node_renderer;
mod queue;
mod target;
mod upload;

pub use self::compositor::{FrameCompositor, FrameStats};
pub use self::error::PassError;
pub use self::node_renderer::{NodeRenderer, RenderContext};
pub use self::queue::{QueueEntry, QueueKind, RenderQueue};
pub use self::target::{ClipSide, RenderTarget, TargetCamera};
pub use self::upload::{release_geometry, upload_geometry};
