// SPDX-FileCopyrightText: 2026 sora contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Vertex assembly: index resolution and typed attribute pulling.
//!
//! A draw-call element index is first resolved into a vertex id (directly,
//! or through the bound u8/u16/u32 index buffer), then every bound
//! attribute slot is read from its buffer at `offset + stride * id` and
//! decoded host-endian into the matching [`Attribute`] variant. Reads that
//! would leave the buffer are skipped and the slot stays empty.

use byteorder::{NativeEndian, ReadBytesExt};
use glam::{UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};
use sora_common::{Attribute, AttributeType};
use std::io::Cursor;

use crate::command::{IndexType, VertexArray};
use crate::memory::Buffer;
use crate::shader::InVertex;

/// Resolve draw element `i` to a vertex id.
///
/// Non-indexed draws use the element index itself. Indexed draws fetch
/// element `i` of the index buffer; an unreadable index resolves to 0.
pub fn resolve_vertex_id(buffers: &[Buffer], vao: &VertexArray, i: u32) -> u32 {
    let Some(buffer_id) = vao.index_buffer else {
        return i;
    };
    let Some(buffer) = buffers.get(buffer_id as usize) else {
        log::trace!("index buffer {} is not populated", buffer_id);
        return 0;
    };

    let elem_size = vao.index_type.byte_size();
    vao.index_offset
        .checked_add(u64::from(i) * elem_size)
        .and_then(|at| read_index(buffer.data, vao.index_type, at))
        .unwrap_or(0)
}

fn read_index(data: &[u8], ty: IndexType, at: u64) -> Option<u32> {
    let start = usize::try_from(at).ok()?;
    let end = start.checked_add(ty.byte_size() as usize)?;
    let mut cur = Cursor::new(data.get(start..end)?);
    match ty {
        IndexType::U8 => cur.read_u8().ok().map(u32::from),
        IndexType::U16 => cur.read_u16::<NativeEndian>().ok().map(u32::from),
        IndexType::U32 => cur.read_u32::<NativeEndian>().ok(),
    }
}

/// Decode one attribute of type `ty` at byte position `at`.
///
/// Reads exactly `ty.byte_size()` bytes; `None` if they are not all inside
/// the buffer.
pub fn read_attribute(data: &[u8], ty: AttributeType, at: u64) -> Option<Attribute> {
    let start = usize::try_from(at).ok()?;
    let end = start.checked_add(ty.byte_size() as usize)?;
    let mut cur = Cursor::new(data.get(start..end)?);

    let attr = match ty {
        AttributeType::Float => Attribute::Float(cur.read_f32::<NativeEndian>().ok()?),
        AttributeType::Vec2 => {
            let x = cur.read_f32::<NativeEndian>().ok()?;
            let y = cur.read_f32::<NativeEndian>().ok()?;
            Attribute::Vec2(Vec2::new(x, y))
        }
        AttributeType::Vec3 => {
            let x = cur.read_f32::<NativeEndian>().ok()?;
            let y = cur.read_f32::<NativeEndian>().ok()?;
            let z = cur.read_f32::<NativeEndian>().ok()?;
            Attribute::Vec3(Vec3::new(x, y, z))
        }
        AttributeType::Vec4 => {
            let x = cur.read_f32::<NativeEndian>().ok()?;
            let y = cur.read_f32::<NativeEndian>().ok()?;
            let z = cur.read_f32::<NativeEndian>().ok()?;
            let w = cur.read_f32::<NativeEndian>().ok()?;
            Attribute::Vec4(Vec4::new(x, y, z, w))
        }
        AttributeType::UInt => Attribute::UInt(cur.read_u32::<NativeEndian>().ok()?),
        AttributeType::UVec2 => {
            let x = cur.read_u32::<NativeEndian>().ok()?;
            let y = cur.read_u32::<NativeEndian>().ok()?;
            Attribute::UVec2(UVec2::new(x, y))
        }
        AttributeType::UVec3 => {
            let x = cur.read_u32::<NativeEndian>().ok()?;
            let y = cur.read_u32::<NativeEndian>().ok()?;
            let z = cur.read_u32::<NativeEndian>().ok()?;
            Attribute::UVec3(UVec3::new(x, y, z))
        }
        AttributeType::UVec4 => {
            let x = cur.read_u32::<NativeEndian>().ok()?;
            let y = cur.read_u32::<NativeEndian>().ok()?;
            let z = cur.read_u32::<NativeEndian>().ok()?;
            let w = cur.read_u32::<NativeEndian>().ok()?;
            Attribute::UVec4(UVec4::new(x, y, z, w))
        }
    };
    Some(attr)
}

/// Assemble the input vertex for draw element `i`.
pub fn assemble_vertex(buffers: &[Buffer], vao: &VertexArray, i: u32, draw_id: u32) -> InVertex {
    let mut vertex = InVertex {
        vertex_id: resolve_vertex_id(buffers, vao, i),
        draw_id,
        ..InVertex::default()
    };

    for (slot, binding) in vao.vertex_attrib.iter().enumerate() {
        let Some(buffer_id) = binding.buffer_id else {
            continue;
        };
        let Some(buffer) = buffers.get(buffer_id as usize) else {
            log::trace!("attribute slot {} references missing buffer {}", slot, buffer_id);
            continue;
        };
        let at = binding
            .stride
            .checked_mul(u64::from(vertex.vertex_id))
            .and_then(|rel| binding.offset.checked_add(rel));
        if let Some(attr) = at.and_then(|at| read_attribute(buffer.data, binding.ty, at)) {
            vertex.attributes[slot] = attr;
        }
    }

    vertex
}
