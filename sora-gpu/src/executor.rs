// SPDX-FileCopyrightText: 2026 sora contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command executor.
//!
//! Walks a command buffer in order against a [`GpuMemory`] bundle. Clear
//! commands fill the framebuffer planes; draw commands run the full vertex
//! fetch / shade / rasterize pipeline. A per-execution draw counter starts
//! at zero and advances after every draw, so the first draw observes
//! `draw_id == 0` and clears never advance it. Malformed commands are
//! skipped; the executor never fails.

use crate::command::{ClearCommand, Command, CommandBuffer, DrawCommand};
use crate::framebuffer::Framebuffer;
use crate::memory::GpuMemory;
use crate::raster;
use crate::shader::{OutVertex, ShaderInterface};
use crate::vertex_fetch::assemble_vertex;

/// Execute every command in `cb` against `mem`.
///
/// The only observable effect is mutation of `mem.framebuffer`.
pub fn execute(mem: &mut GpuMemory, cb: &CommandBuffer) {
    log::debug!("execute: {} commands", cb.len());

    let mut draw_id = 0u32;
    for command in &cb.commands {
        match command {
            Command::Clear(cmd) => clear(&mut mem.framebuffer, cmd),
            Command::Draw(cmd) => {
                draw(mem, cmd, draw_id);
                draw_id += 1;
            }
        }
    }
}

fn clear(fb: &mut Framebuffer, cmd: &ClearCommand) {
    log::trace!(
        "clear: color={} depth={} ({}x{})",
        cmd.clear_color,
        cmd.clear_depth,
        fb.width(),
        fb.height()
    );
    if cmd.clear_color {
        fb.clear_color(cmd.color);
    }
    if cmd.clear_depth {
        fb.clear_depth(cmd.depth);
    }
}

fn draw(mem: &mut GpuMemory, cmd: &DrawCommand, draw_id: u32) {
    let GpuMemory {
        buffers,
        textures,
        programs,
        uniforms,
        framebuffer,
    } = mem;

    let Some(program) = programs.get(cmd.program_id as usize) else {
        log::warn!("draw {}: program {} is not populated", draw_id, cmd.program_id);
        return;
    };

    log::debug!(
        "draw {}: {} vertices, program {}, culling={}",
        draw_id,
        cmd.nof_vertices,
        cmd.program_id,
        cmd.backface_culling
    );

    let si = ShaderInterface {
        uniforms: uniforms.as_slice(),
        textures: textures.as_slice(),
    };

    // Triangle list: consecutive triples; a trailing remainder is ignored.
    for triangle in 0..cmd.nof_vertices / 3 {
        let mut shaded = [OutVertex::default(); 3];
        for (corner, out) in shaded.iter_mut().enumerate() {
            let element = triangle * 3 + corner as u32;
            let in_vertex = assemble_vertex(buffers, &cmd.vao, element, draw_id);
            (program.vertex_shader)(out, &in_vertex, &si);
        }
        raster::draw_triangle(framebuffer, program, &si, &shaded, cmd.backface_culling);
    }
}
