// SPDX-FileCopyrightText: 2026 sora contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Property-based invariant tests for the rasterization pipeline.
//!
//! These verify contracts that must hold for **any** input:
//!
//! 1. An empty command buffer leaves the framebuffer byte-identical.
//! 2. Two consecutive identical clears equal a single clear, and clearing
//!    to a color stores `round(clamp(c) * 255)` per channel.
//! 3. Fragment colors far outside [0, 1] still store clamped bytes.
//! 4. The draw id observed by the k-th draw equals the number of draws
//!    (not clears) preceding it.
//! 5. A triangle with equal z at all vertices rasterizes that depth at
//!    every covered pixel, and touches nothing else.
//! 6. With backface culling enabled, exactly one orientation of a
//!    non-degenerate triangle paints, and it paints exactly its
//!    no-culling coverage; the other orientation paints nothing.
//! 7. Sampling a single-texel texture returns that texel at any uv, with
//!    alpha defaulting to 1 when the texture has fewer than 4 channels.

use glam::{Vec2, Vec4};
use proptest::prelude::*;
use sora_common::{Attribute, AttributeType, Uniform};
use sora_gpu::{
    execute, ClearCommand, Command, CommandBuffer, DrawCommand, Framebuffer, GpuMemory,
    InFragment, InVertex, OutFragment, OutVertex, Program, ShaderInterface, Texture, VertexArray,
};

const FB_SIZE: u32 = 8;

// ── Shaders ─────────────────────────────────────────────────────────────

/// Triangle corners from uniforms 0..2, NDC z from uniform 3.
fn uniform_triangle_vs(out: &mut OutVertex, input: &InVertex, si: &ShaderInterface) {
    let corner = si.uniform((input.vertex_id % 3) as usize).as_vec4();
    let z = si.uniform(3).as_float();
    out.position = Vec4::new(corner.x, corner.y, z, 1.0);
}

fn white_fs(out: &mut OutFragment, _frag: &InFragment, _si: &ShaderInterface) {
    out.frag_color = Vec4::ONE;
}

/// Color (possibly far outside [0, 1]) from uniform 4, opaque.
fn wild_color_fs(out: &mut OutFragment, _frag: &InFragment, si: &ShaderInterface) {
    let c = si.uniform(4).as_vec4();
    out.frag_color = Vec4::new(c.x, c.y, c.z, 1.0);
}

/// Full-framebuffer triangle carrying the draw id flat in slot 0.
fn draw_id_vs(out: &mut OutVertex, input: &InVertex, _si: &ShaderInterface) {
    out.position = match input.vertex_id % 3 {
        0 => Vec4::new(-4.0, -4.0, 0.0, 1.0),
        1 => Vec4::new(4.0, -4.0, 0.0, 1.0),
        _ => Vec4::new(0.0, 4.0, 0.0, 1.0),
    };
    out.attributes[0] = Attribute::UInt(input.draw_id);
}

fn draw_id_fs(out: &mut OutFragment, frag: &InFragment, _si: &ShaderInterface) {
    let id = frag.attributes[0].as_uint();
    out.frag_color = Vec4::new(id as f32 / 255.0, 0.0, 0.0, 1.0);
}

// ── Strategies ──────────────────────────────────────────────────────────

/// NDC coordinates on a dyadic 1/8 grid in [-4, 4]: every intermediate
/// product of the rasterizer's setup stays exact in f32, so coverage is
/// reproducible across runs.
fn grid_coord() -> impl Strategy<Value = f32> {
    (-32i32..=32).prop_map(|k| k as f32 / 8.0)
}

fn grid_point() -> impl Strategy<Value = Vec2> {
    (grid_coord(), grid_coord()).prop_map(|(x, y)| Vec2::new(x, y))
}

fn clear_color() -> impl Strategy<Value = Vec4> {
    (
        -2.0f32..=2.0,
        -2.0f32..=2.0,
        -2.0f32..=2.0,
        -2.0f32..=2.0,
    )
        .prop_map(|(r, g, b, a)| Vec4::new(r, g, b, a))
}

// ── Harness helpers ─────────────────────────────────────────────────────

fn run_commands(
    uniforms: Vec<Uniform>,
    program: Program,
    cb: &CommandBuffer,
) -> (Vec<u8>, Vec<f32>) {
    let pixels = (FB_SIZE * FB_SIZE) as usize;
    let mut color = vec![0u8; pixels * 4];
    let mut depth = vec![0.0f32; pixels];
    let fb = Framebuffer::new(FB_SIZE, FB_SIZE, &mut color, &mut depth).unwrap();
    let mut mem = GpuMemory::new(fb);
    mem.programs.push(program);
    mem.uniforms = uniforms;
    execute(&mut mem, cb);
    drop(mem);
    (color, depth)
}

/// Indices of pixels whose red byte is 255 (painted by `white_fs`).
fn painted(color: &[u8]) -> Vec<usize> {
    color
        .chunks_exact(4)
        .enumerate()
        .filter(|(_, px)| px[0] == 255)
        .map(|(i, _)| i)
        .collect()
}

fn triangle_uniforms(a: Vec2, b: Vec2, c: Vec2, z: f32) -> Vec<Uniform> {
    vec![
        Uniform::Vec4(Vec4::new(a.x, a.y, 0.0, 1.0)),
        Uniform::Vec4(Vec4::new(b.x, b.y, 0.0, 1.0)),
        Uniform::Vec4(Vec4::new(c.x, c.y, 0.0, 1.0)),
        Uniform::Float(z),
    ]
}

fn triangle_draw(backface_culling: bool) -> CommandBuffer {
    let mut cb = CommandBuffer::new();
    cb.push_clear(Vec4::new(0.0, 0.0, 0.0, 1.0), 2.0);
    cb.commands.push(Command::Draw(DrawCommand {
        program_id: 0,
        nof_vertices: 3,
        backface_culling,
        vao: VertexArray::default(),
    }));
    cb
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Empty command buffer is the identity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn empty_command_buffer_is_identity(
        color_seed in proptest::collection::vec(any::<u8>(), (FB_SIZE * FB_SIZE * 4) as usize),
        depth_seed in proptest::collection::vec(-1e6f32..=1e6, (FB_SIZE * FB_SIZE) as usize),
    ) {
        let mut color = color_seed.clone();
        let mut depth = depth_seed.clone();
        let fb = Framebuffer::new(FB_SIZE, FB_SIZE, &mut color, &mut depth).unwrap();
        let mut mem = GpuMemory::new(fb);
        execute(&mut mem, &CommandBuffer::new());
        drop(mem);

        prop_assert_eq!(color, color_seed);
        prop_assert_eq!(depth, depth_seed);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Clear idempotence and round-trip encoding
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn repeated_clear_is_idempotent(color in clear_color(), depth in -1e6f32..=1e6) {
        let run = |n: usize| {
            let mut cb = CommandBuffer::new();
            for _ in 0..n {
                cb.push_clear(color, depth);
            }
            run_commands(vec![], Program::default(), &cb)
        };
        prop_assert_eq!(run(1), run(2));
    }

    #[test]
    fn clear_round_trips_to_bytes(color in clear_color(), depth in -1e6f32..=1e6) {
        let mut cb = CommandBuffer::new();
        cb.push_clear(color, depth);
        let (color_plane, depth_plane) = run_commands(vec![], Program::default(), &cb);

        let expected = [
            (color.x.clamp(0.0, 1.0) * 255.0).round() as u8,
            (color.y.clamp(0.0, 1.0) * 255.0).round() as u8,
            (color.z.clamp(0.0, 1.0) * 255.0).round() as u8,
            (color.w.clamp(0.0, 1.0) * 255.0).round() as u8,
        ];
        for px in color_plane.chunks_exact(4) {
            prop_assert_eq!(px, &expected);
        }
        prop_assert!(depth_plane.iter().all(|&d| d == depth));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Fragment colors clamp into [0, 255]
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wild_fragment_colors_clamp(
        r in -10.0f32..=10.0,
        g in -10.0f32..=10.0,
        b in -10.0f32..=10.0,
        a in grid_point(),
        bp in grid_point(),
        cp in grid_point(),
    ) {
        let mut uniforms = triangle_uniforms(a, bp, cp, 0.0);
        uniforms.push(Uniform::Vec4(Vec4::new(r, g, b, 1.0)));

        let program = Program::new(uniform_triangle_vs, wild_color_fs);
        let cb = triangle_draw(false);
        let (color_plane, _) = run_commands(uniforms, program, &cb);

        let expected = [
            (r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (b.clamp(0.0, 1.0) * 255.0).round() as u8,
        ];
        for px in color_plane.chunks_exact(4) {
            // Painted pixels carry the clamped color, others the clear color.
            let is_clear = px == [0, 0, 0, 255];
            let is_clamped = px[0] == expected[0] && px[1] == expected[1] && px[2] == expected[2];
            prop_assert!(is_clear || is_clamped, "pixel {:?}", px);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Draw id counts draws, not clears
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn draw_id_counts_preceding_draws(
        // true = draw, false = extra clear, at most 20 commands.
        script in proptest::collection::vec(any::<bool>(), 1..20),
    ) {
        let mut program = Program::new(draw_id_vs, draw_id_fs);
        program.vs2fs[0] = Some(AttributeType::UInt);

        let mut cb = CommandBuffer::new();
        let mut draws = 0u32;
        for &is_draw in &script {
            if is_draw {
                // Reset depth so every draw paints over the last one.
                cb.commands.push(Command::Clear(ClearCommand {
                    color: Vec4::ZERO,
                    depth: 1.0,
                    clear_color: false,
                    clear_depth: true,
                }));
                cb.push_draw(3, 0, VertexArray::default());
                draws += 1;
            } else {
                cb.push_clear(Vec4::ZERO, 1.0);
            }
        }
        prop_assume!(draws > 0);

        let (color_plane, _) = run_commands(vec![], program, &cb);
        // The last draw observed draw_id == draws - 1 and painted it red.
        prop_assert_eq!(color_plane[0] as u32, draws - 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Equal-z triangles rasterize exactly that depth, and only where covered
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn equal_z_triangle_writes_uniform_depth(
        a in grid_point(),
        b in grid_point(),
        c in grid_point(),
        zk in -8i32..=8,
    ) {
        let z = zk as f32 / 8.0;
        let expected_depth = (z + 1.0) * 0.5;

        let program = Program::new(uniform_triangle_vs, white_fs);
        let cb = triangle_draw(false);
        let (color_plane, depth_plane) = run_commands(triangle_uniforms(a, b, c, z), program, &cb);

        for (idx, px) in color_plane.chunks_exact(4).enumerate() {
            if px[0] == 255 {
                prop_assert!(
                    (depth_plane[idx] - expected_depth).abs() <= 1e-5,
                    "covered pixel {} depth {} != {}",
                    idx, depth_plane[idx], expected_depth
                );
            } else {
                prop_assert_eq!(px, &[0, 0, 0, 255]);
                prop_assert_eq!(depth_plane[idx], 2.0);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Backface culling keeps exactly the front-facing orientation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn culling_keeps_one_orientation(
        a in grid_point(),
        b in grid_point(),
        c in grid_point(),
    ) {
        let program = Program::new(uniform_triangle_vs, white_fs);

        let coverage = |v0: Vec2, v1: Vec2, v2: Vec2, cull: bool| {
            let (color_plane, _) =
                run_commands(triangle_uniforms(v0, v1, v2, 0.0), program, &triangle_draw(cull));
            painted(&color_plane)
        };

        let fwd_cull = coverage(a, b, c, true);
        let rev_cull = coverage(a, c, b, true);
        let fwd_free = coverage(a, b, c, false);
        let rev_free = coverage(a, c, b, false);

        // At most one orientation survives culling, and the survivor paints
        // exactly what it paints without culling.
        prop_assert!(fwd_cull.is_empty() || rev_cull.is_empty());
        if !fwd_cull.is_empty() {
            prop_assert_eq!(&fwd_cull, &fwd_free);
            prop_assert_eq!(&rev_cull, &Vec::new());
        }
        if !rev_cull.is_empty() {
            prop_assert_eq!(&rev_cull, &rev_free);
        }
        // A degenerate triangle paints nothing in any configuration.
        if fwd_free.is_empty() {
            prop_assert!(rev_cull.is_empty() && fwd_cull.is_empty());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Single-texel texture sampling round-trips
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn single_texel_sampling_round_trips(
        texel in proptest::collection::vec(any::<u8>(), 1..=4),
        u in -100.0f32..=100.0,
        v in -100.0f32..=100.0,
    ) {
        let channels = texel.len() as u32;
        let tex = Texture::new(&texel, 1, 1, channels);
        let got = tex.sample(Vec2::new(u, v));

        for (ch, &byte) in texel.iter().enumerate() {
            prop_assert_eq!(got[ch], byte as f32 / 255.0);
        }
        if channels < 4 {
            prop_assert_eq!(got.w, 1.0);
        }
    }
}
