use mandelzoom_core::PixelDimensions;

use crate::error::RenderError;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// An RGBA pixel buffer, row-major with an explicit stride.
///
/// Tiles receive disjoint mutable row bands from
/// [`split_rows_mut`](Self::split_rows_mut), so no two workers ever alias
/// the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// Bytes from the start of one row to the next.
    pub stride: usize,
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer filled with opaque black.
    ///
    /// Large supersampled buffers can exceed available memory, so the
    /// allocation is fallible rather than aborting the process.
    pub fn try_new(width: u32, height: u32) -> crate::Result<Self> {
        let stride = width as usize * BYTES_PER_PIXEL;
        let len = stride
            .checked_mul(height as usize)
            .ok_or(RenderError::Allocation { width, height })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| RenderError::Allocation { width, height })?;
        pixels.extend(std::iter::repeat([0u8, 0, 0, 255]).take(len / BYTES_PER_PIXEL).flatten());

        Ok(Self {
            width,
            height,
            stride,
            pixels,
        })
    }

    pub fn dimensions(&self) -> PixelDimensions {
        PixelDimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// RGBA of the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = y as usize * self.stride + x as usize * BYTES_PER_PIXEL;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.pixels[start..start + self.width as usize * BYTES_PER_PIXEL]
    }

    /// Split the buffer into consecutive mutable row bands.
    ///
    /// `row_counts` must sum to `height`; band `i` holds `row_counts[i]` rows.
    pub fn split_rows_mut(&mut self, row_counts: &[u32]) -> Vec<&mut [u8]> {
        debug_assert_eq!(row_counts.iter().map(|&r| r as u64).sum::<u64>(), self.height as u64);
        let mut bands = Vec::with_capacity(row_counts.len());
        let mut rest = self.pixels.as_mut_slice();
        for &rows in row_counts {
            let (band, tail) = std::mem::take(&mut rest).split_at_mut(rows as usize * self.stride);
            bands.push(band);
            rest = tail;
        }
        bands
    }

    /// Box-filter down by an integer `factor` (e.g. a 2× supersampled render
    /// back to display size). Partial blocks at the edges are dropped.
    pub fn downsample(&self, factor: u32) -> crate::Result<Self> {
        let factor = factor.max(1);
        let mut out = Self::try_new(self.width / factor, self.height / factor)?;
        let area = factor * factor;

        for oy in 0..out.height {
            for ox in 0..out.width {
                let mut sum = [0u32; 4];
                for sy in 0..factor {
                    for sx in 0..factor {
                        let p = self.pixel(ox * factor + sx, oy * factor + sy);
                        for (acc, v) in sum.iter_mut().zip(p) {
                            *acc += v as u32;
                        }
                    }
                }
                let i = oy as usize * out.stride + ox as usize * BYTES_PER_PIXEL;
                for (c, acc) in sum.iter().enumerate() {
                    out.pixels[i + c] = (acc / area) as u8;
                }
            }
        }
        Ok(out)
    }
}
