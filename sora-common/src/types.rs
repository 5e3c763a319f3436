// SPDX-FileCopyrightText: 2026 sora contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared value model of the rasterization pipeline.
//!
//! Attribute and uniform slots are tagged unions: the host binds a typed
//! view over raw buffer bytes, the vertex stage decodes into the matching
//! variant, and shaders read the variant they declared. Slots default to
//! [`Attribute::Empty`] / [`Uniform::Empty`] and are total to read — a
//! mismatched or empty read yields a zero value, never a panic.

use glam::{Mat4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

/// Number of attribute slots per vertex array object and per vertex.
pub const MAX_VERTEX_ATTRIBUTES: usize = 16;

/// Bytes per color pixel in the framebuffer (R, G, B, A).
pub const COLOR_CHANNELS: usize = 4;

/// Type tag of a bound vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeType {
    #[default]
    Float,
    Vec2,
    Vec3,
    Vec4,
    UInt,
    UVec2,
    UVec3,
    UVec4,
}

impl AttributeType {
    /// Size of one element of this type in a vertex buffer, in bytes.
    pub const fn byte_size(self) -> u64 {
        match self {
            Self::Float | Self::UInt => 4,
            Self::Vec2 | Self::UVec2 => 8,
            Self::Vec3 | Self::UVec3 => 12,
            Self::Vec4 | Self::UVec4 => 16,
        }
    }

    /// Whether values of this type interpolate across a triangle.
    /// Integer types are flat-shaded from the provoking vertex instead.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Vec2 | Self::Vec3 | Self::Vec4)
    }
}

/// One attribute slot of a vertex or fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Attribute {
    #[default]
    Empty,
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    UInt(u32),
    UVec2(UVec2),
    UVec3(UVec3),
    UVec4(UVec4),
}

impl Attribute {
    pub fn as_float(self) -> f32 {
        match self {
            Self::Float(v) => v,
            _ => 0.0,
        }
    }

    pub fn as_vec2(self) -> Vec2 {
        match self {
            Self::Vec2(v) => v,
            _ => Vec2::ZERO,
        }
    }

    pub fn as_vec3(self) -> Vec3 {
        match self {
            Self::Vec3(v) => v,
            _ => Vec3::ZERO,
        }
    }

    pub fn as_vec4(self) -> Vec4 {
        match self {
            Self::Vec4(v) => v,
            _ => Vec4::ZERO,
        }
    }

    pub fn as_uint(self) -> u32 {
        match self {
            Self::UInt(v) => v,
            _ => 0,
        }
    }

    pub fn as_uvec2(self) -> UVec2 {
        match self {
            Self::UVec2(v) => v,
            _ => UVec2::ZERO,
        }
    }

    pub fn as_uvec3(self) -> UVec3 {
        match self {
            Self::UVec3(v) => v,
            _ => UVec3::ZERO,
        }
    }

    pub fn as_uvec4(self) -> UVec4 {
        match self {
            Self::UVec4(v) => v,
            _ => UVec4::ZERO,
        }
    }

    /// Type tag of the stored value, or `None` for an empty slot.
    pub fn type_tag(self) -> Option<AttributeType> {
        match self {
            Self::Empty => None,
            Self::Float(_) => Some(AttributeType::Float),
            Self::Vec2(_) => Some(AttributeType::Vec2),
            Self::Vec3(_) => Some(AttributeType::Vec3),
            Self::Vec4(_) => Some(AttributeType::Vec4),
            Self::UInt(_) => Some(AttributeType::UInt),
            Self::UVec2(_) => Some(AttributeType::UVec2),
            Self::UVec3(_) => Some(AttributeType::UVec3),
            Self::UVec4(_) => Some(AttributeType::UVec4),
        }
    }
}

/// One uniform slot, set by the host before execution and read-only for
/// shaders.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Uniform {
    #[default]
    Empty,
    Float(f32),
    Int(i32),
    UInt(u32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl Uniform {
    pub fn as_float(self) -> f32 {
        match self {
            Self::Float(v) => v,
            _ => 0.0,
        }
    }

    pub fn as_int(self) -> i32 {
        match self {
            Self::Int(v) => v,
            _ => 0,
        }
    }

    pub fn as_uint(self) -> u32 {
        match self {
            Self::UInt(v) => v,
            _ => 0,
        }
    }

    pub fn as_vec2(self) -> Vec2 {
        match self {
            Self::Vec2(v) => v,
            _ => Vec2::ZERO,
        }
    }

    pub fn as_vec3(self) -> Vec3 {
        match self {
            Self::Vec3(v) => v,
            _ => Vec3::ZERO,
        }
    }

    pub fn as_vec4(self) -> Vec4 {
        match self {
            Self::Vec4(v) => v,
            _ => Vec4::ZERO,
        }
    }

    pub fn as_mat4(self) -> Mat4 {
        match self {
            Self::Mat4(v) => v,
            _ => Mat4::IDENTITY,
        }
    }
}
