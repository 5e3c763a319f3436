// SPDX-FileCopyrightText: 2026 sora contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command stream encoding.
//!
//! A [`CommandBuffer`] is an ordered sequence of clear and draw commands.
//! A draw carries its whole vertex-array binding table by value, so a
//! command buffer recorded once can be replayed against different memory
//! contents.

use glam::Vec4;
use sora_common::{AttributeType, MAX_VERTEX_ATTRIBUTES};

/// Element width of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexType {
    U8,
    U16,
    #[default]
    U32,
}

impl IndexType {
    /// Size of one index element in bytes.
    pub const fn byte_size(self) -> u64 {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

/// One attribute slot binding: where in which buffer the attribute of
/// vertex `id` lives (`offset + stride * id`) and how to type its bytes.
/// `buffer_id: None` leaves the slot unbound.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexAttrib {
    pub buffer_id: Option<u32>,
    pub ty: AttributeType,
    pub offset: u64,
    pub stride: u64,
}

/// Vertex array object: the attribute binding table plus the index buffer
/// binding. `index_buffer: None` means non-indexed drawing.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexArray {
    pub vertex_attrib: [VertexAttrib; MAX_VERTEX_ATTRIBUTES],
    pub index_buffer: Option<u32>,
    pub index_offset: u64,
    pub index_type: IndexType,
}

/// Fill the color and/or depth planes.
#[derive(Debug, Clone, Copy)]
pub struct ClearCommand {
    /// Clear color, components in [0, 1].
    pub color: Vec4,
    /// Depth value stored verbatim.
    pub depth: f32,
    pub clear_color: bool,
    pub clear_depth: bool,
}

impl Default for ClearCommand {
    fn default() -> Self {
        Self {
            color: Vec4::ZERO,
            depth: 1.0,
            clear_color: true,
            clear_depth: true,
        }
    }
}

/// Draw `nof_vertices / 3` triangles with the given program and bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawCommand {
    pub program_id: u32,
    pub nof_vertices: u32,
    pub backface_culling: bool,
    pub vao: VertexArray,
}

/// One recorded command.
#[derive(Debug, Clone, Copy)]
pub enum Command {
    Clear(ClearCommand),
    Draw(DrawCommand),
}

/// Ordered, replayable sequence of commands.
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    pub commands: Vec<Command>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a clear of both planes.
    pub fn push_clear(&mut self, color: Vec4, depth: f32) {
        self.commands.push(Command::Clear(ClearCommand {
            color,
            depth,
            clear_color: true,
            clear_depth: true,
        }));
    }

    /// Record a draw of `nof_vertices` vertices with backface culling
    /// disabled.
    pub fn push_draw(&mut self, nof_vertices: u32, program_id: u32, vao: VertexArray) {
        self.commands.push(Command::Draw(DrawCommand {
            program_id,
            nof_vertices,
            backface_culling: false,
            vao,
        }));
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
