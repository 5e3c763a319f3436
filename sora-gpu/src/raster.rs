// SPDX-FileCopyrightText: 2026 sora contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Triangle setup, rasterization and the fragment stage.
//!
//! Each triangle goes through perspective division, viewport mapping and a
//! winding test, then a bounding-box scan over pixel centers. Coverage and
//! depth come from barycentric weights; declared attributes interpolate
//! perspective-correct (floating types) or flat from the first vertex
//! (integer types). Surviving fragments run the fragment shader, the depth
//! test, the alpha gate, and a source-over blend into the color plane.

use glam::{Vec2, Vec4};
use sora_common::{Attribute, AttributeType, MAX_VERTEX_ATTRIBUTES};

use crate::framebuffer::Framebuffer;
use crate::shader::{InFragment, OutFragment, OutVertex, Program, ShaderInterface};

/// A vertex after perspective divide and viewport mapping.
///
/// `pos.x`/`pos.y` are pixel coordinates, `pos.z` is depth in [0, 1], and
/// `pos.w` keeps the clip-space w for perspective-correct interpolation.
#[derive(Debug, Clone, Copy)]
pub struct ScreenVertex {
    pub pos: Vec4,
    pub attributes: [Attribute; MAX_VERTEX_ATTRIBUTES],
}

/// Perspective divide + viewport map of one shaded vertex.
///
/// `None` when `w == 0`; such triangles are dropped as degenerate.
pub fn to_screen(vertex: &OutVertex, width: u32, height: u32) -> Option<ScreenVertex> {
    let clip = vertex.position;
    if clip.w == 0.0 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let ndc_z = clip.z / clip.w;

    let pos = Vec4::new(
        (ndc_x + 1.0) * 0.5 * width as f32,
        (ndc_y + 1.0) * 0.5 * height as f32,
        (ndc_z + 1.0) * 0.5,
        clip.w,
    );
    Some(ScreenVertex {
        pos,
        attributes: vertex.attributes,
    })
}

/// Signed 2D cross product of the triangle in screen space.
/// Positive means counter-clockwise, which is front-facing.
pub fn winding(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}

/// Rasterize one shaded triangle into the framebuffer.
///
/// Degenerate (zero-winding, or any vertex with `w == 0`) triangles are
/// dropped; with `backface_culling` set, clockwise triangles are too.
pub fn draw_triangle(
    fb: &mut Framebuffer,
    program: &Program,
    si: &ShaderInterface,
    vertices: &[OutVertex; 3],
    backface_culling: bool,
) {
    if fb.width() == 0 || fb.height() == 0 {
        return;
    }

    let a = match to_screen(&vertices[0], fb.width(), fb.height()) {
        Some(v) => v,
        None => return,
    };
    let b = match to_screen(&vertices[1], fb.width(), fb.height()) {
        Some(v) => v,
        None => return,
    };
    let c = match to_screen(&vertices[2], fb.width(), fb.height()) {
        Some(v) => v,
        None => return,
    };

    let cross = winding(
        Vec2::new(a.pos.x, a.pos.y),
        Vec2::new(b.pos.x, b.pos.y),
        Vec2::new(c.pos.x, c.pos.y),
    );
    if cross == 0.0 || (backface_culling && cross < 0.0) {
        return;
    }

    rasterize(fb, program, si, &[a, b, c]);
}

/// Bounding-box scan with barycentric coverage and the fragment stage.
fn rasterize(fb: &mut Framebuffer, program: &Program, si: &ShaderInterface, tri: &[ScreenVertex; 3]) {
    let [a, b, c] = tri;
    let max_x = fb.width() as i64 - 1;
    let max_y = fb.height() as i64 - 1;

    let min_px = (a.pos.x.min(b.pos.x).min(c.pos.x).floor() as i64).clamp(0, max_x);
    let max_px = (a.pos.x.max(b.pos.x).max(c.pos.x).ceil() as i64).clamp(0, max_x);
    let min_py = (a.pos.y.min(b.pos.y).min(c.pos.y).floor() as i64).clamp(0, max_y);
    let max_py = (a.pos.y.max(b.pos.y).max(c.pos.y).ceil() as i64).clamp(0, max_y);

    // Equals the winding cross product; zero-area triangles never get here.
    let denom = (b.pos.y - c.pos.y) * (a.pos.x - c.pos.x) + (c.pos.x - b.pos.x) * (a.pos.y - c.pos.y);

    let inv_w = [1.0 / a.pos.w, 1.0 / b.pos.w, 1.0 / c.pos.w];

    for y in min_py..=max_py {
        for x in min_px..=max_px {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

            let lambda_a = ((b.pos.y - c.pos.y) * (p.x - c.pos.x)
                + (c.pos.x - b.pos.x) * (p.y - c.pos.y))
                / denom;
            let lambda_b = ((c.pos.y - a.pos.y) * (p.x - c.pos.x)
                + (a.pos.x - c.pos.x) * (p.y - c.pos.y))
                / denom;
            let lambda_c = 1.0 - lambda_a - lambda_b;

            if !(lambda_a >= 0.0 && lambda_b >= 0.0 && lambda_c >= 0.0) {
                continue;
            }
            let lambda = [lambda_a, lambda_b, lambda_c];

            let z = lambda_a * a.pos.z + lambda_b * b.pos.z + lambda_c * c.pos.z;

            let mut fragment = InFragment {
                frag_coord: Vec4::new(p.x, p.y, z, 1.0),
                ..InFragment::default()
            };
            interpolate_attributes(&mut fragment, program, tri, lambda, inv_w);

            let mut out = OutFragment::default();
            (program.fragment_shader)(&mut out, &fragment, si);

            let idx = fb.pixel_index(x as u32, y as u32);
            if z >= fb.depth_at(idx) {
                continue;
            }

            let alpha = out.frag_color.w;
            if alpha <= 0.5 {
                continue;
            }

            fb.set_depth(idx, z);
            blend_pixel(fb, idx, out.frag_color, alpha);
        }
    }
}

/// Fill the fragment's attribute slots according to the program's `vs2fs`
/// declarations.
fn interpolate_attributes(
    fragment: &mut InFragment,
    program: &Program,
    tri: &[ScreenVertex; 3],
    lambda: [f32; 3],
    inv_w: [f32; 3],
) {
    for (slot, declared) in program.vs2fs.iter().enumerate() {
        let Some(ty) = *declared else {
            continue;
        };

        if !ty.is_float() {
            // Flat interpolation: the provoking (first) vertex wins.
            fragment.attributes[slot] = tri[0].attributes[slot];
            continue;
        }

        // Perspective-correct weights: lambda_i / w_i, renormalized.
        let mut coef = [
            lambda[0] * inv_w[0],
            lambda[1] * inv_w[1],
            lambda[2] * inv_w[2],
        ];
        let sum = coef[0] + coef[1] + coef[2];
        if sum != 0.0 {
            coef = [coef[0] / sum, coef[1] / sum, coef[2] / sum];
        } else {
            coef = lambda;
        }

        fragment.attributes[slot] = match ty {
            AttributeType::Float => Attribute::Float(
                coef[0] * tri[0].attributes[slot].as_float()
                    + coef[1] * tri[1].attributes[slot].as_float()
                    + coef[2] * tri[2].attributes[slot].as_float(),
            ),
            AttributeType::Vec2 => Attribute::Vec2(
                coef[0] * tri[0].attributes[slot].as_vec2()
                    + coef[1] * tri[1].attributes[slot].as_vec2()
                    + coef[2] * tri[2].attributes[slot].as_vec2(),
            ),
            AttributeType::Vec3 => Attribute::Vec3(
                coef[0] * tri[0].attributes[slot].as_vec3()
                    + coef[1] * tri[1].attributes[slot].as_vec3()
                    + coef[2] * tri[2].attributes[slot].as_vec3(),
            ),
            AttributeType::Vec4 => Attribute::Vec4(
                coef[0] * tri[0].attributes[slot].as_vec4()
                    + coef[1] * tri[1].attributes[slot].as_vec4()
                    + coef[2] * tri[2].attributes[slot].as_vec4(),
            ),
            // Unreachable for integer tags, handled above.
            _ => tri[0].attributes[slot],
        };
    }
}

/// Source-over blend of the RGB channels; the destination alpha byte is
/// left untouched.
fn blend_pixel(fb: &mut Framebuffer, idx: usize, src: Vec4, alpha: f32) {
    let dst = fb.color_at(idx);
    let mut rgb = [0u8; 3];
    for ch in 0..3 {
        let dst_c = dst[ch] as f32 / 255.0;
        let blended = (dst_c * (1.0 - alpha) + src[ch] * alpha).clamp(0.0, 1.0);
        rgb[ch] = (blended * 255.0).round() as u8;
    }
    fb.set_rgb(idx, rgb);
}
