use rayon::prelude::*;

use mandelzoom_core::escape_time;

use crate::buffer::{PixelBuffer, BYTES_PER_PIXEL};
use crate::cancel::RenderCancel;
use crate::settings::GenerationRequest;

/// Default number of row bands per generation.
pub const DEFAULT_TILE_COUNT: u32 = 64;

/// One unit of work: a contiguous band of output rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileJob {
    pub start_row: u32,
    pub row_count: u32,
    /// Supersampling factor of the buffer this band belongs to.
    pub multiplier: u32,
}

impl TileJob {
    pub fn end_row(&self) -> u32 {
        self.start_row + self.row_count
    }
}

/// Split `total_rows` into at most `tile_count` bands.
///
/// Every band gets `total_rows / tiles` rows and the last one absorbs the
/// remainder, so the bands cover `0..total_rows` exactly once. More tiles
/// than rows are reduced to one row per tile.
pub fn partition_rows(total_rows: u32, tile_count: u32, multiplier: u32) -> Vec<TileJob> {
    if total_rows == 0 {
        return Vec::new();
    }
    let tiles = tile_count.clamp(1, total_rows);
    let per_tile = total_rows / tiles;

    (0..tiles)
        .map(|i| {
            let start_row = i * per_tile;
            let row_count = if i + 1 == tiles {
                total_rows - start_row
            } else {
                per_tile
            };
            TileJob {
                start_row,
                row_count,
                multiplier,
            }
        })
        .collect()
}

/// Fill `buffer` by running every job in parallel, each on its own band.
///
/// Blocks until all bands finish or observe `cancel`. Returns `false` if the
/// generation was cancelled, in which case the buffer is incomplete.
pub fn render_tiles(
    request: &GenerationRequest,
    jobs: &[TileJob],
    buffer: &mut PixelBuffer,
    cancel: &RenderCancel,
) -> bool {
    let row_counts: Vec<u32> = jobs.iter().map(|j| j.row_count).collect();
    let stride = buffer.stride;
    let bands = buffer.split_rows_mut(&row_counts);

    bands
        .into_par_iter()
        .zip(jobs.par_iter())
        .for_each(|(band, job)| render_band(request, job, stride, band, cancel));

    !cancel.is_cancelled()
}

/// Compute one band, checking for cancellation before every row.
fn render_band(
    request: &GenerationRequest,
    job: &TileJob,
    stride: usize,
    band: &mut [u8],
    cancel: &RenderCancel,
) {
    if stride == 0 {
        return;
    }
    let cap = request.colors.iteration_cap();

    for (i, row) in band.chunks_exact_mut(stride).enumerate() {
        if cancel.is_cancelled() {
            return;
        }
        let py = job.start_row + i as u32;
        for (px, pixel) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let c = request
                .viewport
                .pixel_to_plane(px as u32, py, request.pixel_dims, job.multiplier);
            pixel.copy_from_slice(&request.colors.color(escape_time(c, cap)));
        }
        cancel.inc_rows();
    }
}
