// SPDX-FileCopyrightText: 2026 sora contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Software rasterization pipeline.
//!
//! Emulates the data path of a programmable GPU: a command executor walks a
//! linear command buffer over a [`GpuMemory`] bundle, assembling vertices
//! from typed attribute streams, running vertex and fragment shaders, and
//! rasterizing perspective-correct triangles into a borrowed RGBA8 + depth
//! framebuffer. The pipeline is single-threaded, synchronous, and total:
//! [`execute`] mutates the framebuffer and reports nothing else.

pub mod command;
pub mod executor;
pub mod framebuffer;
pub mod memory;
pub mod raster;
pub mod shader;
pub mod texture;
pub mod vertex_fetch;

pub use command::{ClearCommand, Command, CommandBuffer, DrawCommand, IndexType, VertexArray, VertexAttrib};
pub use executor::execute;
pub use framebuffer::Framebuffer;
pub use memory::{Buffer, GpuMemory};
pub use shader::{
    FragmentShader, InFragment, InVertex, OutFragment, OutVertex, Program, ShaderInterface,
    VertexShader,
};
pub use texture::Texture;
