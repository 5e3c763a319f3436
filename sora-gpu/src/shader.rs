// SPDX-FileCopyrightText: 2026 sora contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shader ABI.
//!
//! Shaders are plain function pointers invoked by the pipeline: the vertex
//! shader maps an assembled [`InVertex`] to a clip-space [`OutVertex`], the
//! fragment shader maps an interpolated [`InFragment`] to an
//! [`OutFragment`] color. Both receive a read-only [`ShaderInterface`]
//! over the uniform and texture stores and must not mutate anything else.

use glam::{Vec2, Vec4};
use sora_common::{Attribute, AttributeType, Uniform, MAX_VERTEX_ATTRIBUTES};

use crate::texture::Texture;

/// Vertex-stage input, assembled from the bound attribute streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct InVertex {
    /// Resolved vertex id (direct or via the index buffer).
    pub vertex_id: u32,
    /// Ordinal of the enclosing draw within the current execution.
    pub draw_id: u32,
    pub attributes: [Attribute; MAX_VERTEX_ATTRIBUTES],
}

/// Vertex-stage output: clip-space position plus the attributes declared
/// by the program's `vs2fs` table.
#[derive(Debug, Clone, Copy)]
pub struct OutVertex {
    /// Clip-space position; `w` feeds perspective division and
    /// perspective-correct interpolation.
    pub position: Vec4,
    pub attributes: [Attribute; MAX_VERTEX_ATTRIBUTES],
}

impl Default for OutVertex {
    fn default() -> Self {
        Self {
            position: Vec4::ZERO,
            attributes: [Attribute::Empty; MAX_VERTEX_ATTRIBUTES],
        }
    }
}

/// Fragment-stage input.
#[derive(Debug, Clone, Copy, Default)]
pub struct InFragment {
    /// `x`, `y` are the pixel-center sample position, `z` the interpolated
    /// depth in [0, 1]; `w` is unused.
    pub frag_coord: Vec4,
    pub attributes: [Attribute; MAX_VERTEX_ATTRIBUTES],
}

/// Fragment-stage output.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutFragment {
    /// Output color in [0, 1]; clamping happens downstream.
    pub frag_color: Vec4,
}

/// Read-only view over the uniform and texture stores, handed to every
/// shader invocation. Out-of-range access yields defaults.
#[derive(Clone, Copy)]
pub struct ShaderInterface<'a> {
    pub uniforms: &'a [Uniform],
    pub textures: &'a [Texture<'a>],
}

impl<'a> ShaderInterface<'a> {
    /// Uniform slot `index`, or the empty uniform.
    pub fn uniform(&self, index: usize) -> Uniform {
        self.uniforms.get(index).copied().unwrap_or_default()
    }

    /// Sample texture `index` at `uv`; a missing slot behaves like the
    /// null texture and yields opaque black.
    pub fn sample(&self, index: usize, uv: Vec2) -> Vec4 {
        match self.textures.get(index) {
            Some(tex) => tex.sample(uv),
            None => Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

/// Vertex shader entry point.
pub type VertexShader = fn(&mut OutVertex, &InVertex, &ShaderInterface);

/// Fragment shader entry point.
pub type FragmentShader = fn(&mut OutFragment, &InFragment, &ShaderInterface);

fn noop_vertex(_out: &mut OutVertex, _in: &InVertex, _si: &ShaderInterface) {}

fn noop_fragment(_out: &mut OutFragment, _in: &InFragment, _si: &ShaderInterface) {}

/// A vertex/fragment shader pair plus the types of the attribute slots
/// carried from the vertex stage to the fragment stage.
#[derive(Debug, Clone, Copy)]
pub struct Program {
    pub vertex_shader: VertexShader,
    pub fragment_shader: FragmentShader,
    /// `vs2fs[k]` declares the type of attribute slot `k` handed to the
    /// fragment shader; `None` slots are not interpolated.
    pub vs2fs: [Option<AttributeType>; MAX_VERTEX_ATTRIBUTES],
}

impl Program {
    pub fn new(vertex_shader: VertexShader, fragment_shader: FragmentShader) -> Self {
        Self {
            vertex_shader,
            fragment_shader,
            vs2fs: [None; MAX_VERTEX_ATTRIBUTES],
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new(noop_vertex, noop_fragment)
    }
}
