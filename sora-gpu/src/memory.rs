// SPDX-FileCopyrightText: 2026 sora contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! GPU memory bundle — the sole execution environment.
//!
//! The host populates buffers, textures, programs and uniforms, attaches a
//! framebuffer view, and hands the bundle to [`crate::execute`]. Buffers
//! and textures are read-only for the whole execution; only the
//! framebuffer is mutated.

use crate::framebuffer::Framebuffer;
use crate::shader::Program;
use crate::texture::Texture;
use sora_common::Uniform;

/// Borrowed, opaque byte region used for vertex attributes and indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct Buffer<'a> {
    pub data: &'a [u8],
}

impl<'a> Buffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Everything a command stream executes against.
pub struct GpuMemory<'a> {
    pub buffers: Vec<Buffer<'a>>,
    pub textures: Vec<Texture<'a>>,
    pub programs: Vec<Program>,
    pub uniforms: Vec<Uniform>,
    pub framebuffer: Framebuffer<'a>,
}

impl<'a> GpuMemory<'a> {
    /// Bundle an empty resource set around a framebuffer view.
    pub fn new(framebuffer: Framebuffer<'a>) -> Self {
        Self {
            buffers: Vec::new(),
            textures: Vec::new(),
            programs: Vec::new(),
            uniforms: Vec::new(),
            framebuffer,
        }
    }

    /// Uniform slot `index`, or the empty uniform when out of range.
    pub fn uniform(&self, index: usize) -> Uniform {
        self.uniforms.get(index).copied().unwrap_or_default()
    }
}
