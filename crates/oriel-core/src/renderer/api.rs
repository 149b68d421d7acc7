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

//! Data types shared by the rendering traits and their implementations.

use crate::math::Extent2D;

/// An opaque handle to a device-owned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

/// An opaque handle to a closed, submittable command buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandBufferId(pub u64);

/// An opaque handle to a pre-built pipeline state object.
///
/// Pipeline construction (shaders, root signature) is outside the engine's
/// scope; the handle is supplied at backend construction time and threaded
/// through command-recorder resets unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineHandle(pub u64);

/// Identifies a render target by its back-buffer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetId(pub u32);

/// The usage role a GPU-visible resource is currently in.
///
/// Every role change must be declared with an explicit transition recorded
/// *before* the operation that assumes the new role; omitting one is a
/// correctness bug, not just a performance one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// The resource can be handed to the display subsystem.
    Present,
    /// The resource can be written as a render target.
    RenderTarget,
    /// The resource can be read generically (upload buffers).
    GenericRead,
}

/// How consecutive vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    /// Each group of three vertices forms an independent triangle.
    TriangleList,
    /// Each vertex after the second forms a triangle with the previous two.
    TriangleStrip,
}

/// A viewport in pixels, mapping NDC onto the render target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// The left edge of the viewport.
    pub x: f32,
    /// The top edge of the viewport.
    pub y: f32,
    /// The width of the viewport.
    pub width: f32,
    /// The height of the viewport.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport covering `extent` with its origin at (0, 0).
    pub fn from_extent(extent: Extent2D) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
        }
    }
}

/// A pixel-space clipping rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScissorRect {
    /// The left edge of the rectangle.
    pub left: i32,
    /// The top edge of the rectangle.
    pub top: i32,
    /// The right edge of the rectangle.
    pub right: i32,
    /// The bottom edge of the rectangle.
    pub bottom: i32,
}

impl ScissorRect {
    /// Creates a scissor rectangle covering `extent` with its origin at (0, 0).
    pub fn from_extent(extent: Extent2D) -> Self {
        Self {
            left: 0,
            top: 0,
            right: extent.width as i32,
            bottom: extent.height as i32,
        }
    }
}

/// A position + color vertex as uploaded to the GPU.
///
/// `#[repr(C)]` plus the bytemuck derives let the backend cast a vertex
/// slice directly to bytes for the upload buffer.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct ColorVertex {
    /// Position in normalized device coordinates.
    pub position: [f32; 3],
    /// Linear RGBA color.
    pub color: [f32; 4],
}

impl ColorVertex {
    /// The stride of one vertex in bytes.
    pub const STRIDE: u32 = std::mem::size_of::<Self>() as u32;
}

/// Describes a swap chain to be created by a [`GraphicsDevice`](crate::renderer::GraphicsDevice).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapChainDescriptor {
    /// Number of back buffers to rotate through (typically 2).
    pub buffer_count: usize,
    /// Pixel dimensions of each back buffer.
    pub extent: Extent2D,
}
