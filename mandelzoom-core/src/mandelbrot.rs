use crate::complex::Complex;

/// Escape threshold compared against `|z|²`, i.e. an escape radius of 2.
pub const ESCAPE_NORM_SQ: f64 = 4.0;

/// Returns `true` if `c` lies inside the main cardioid.
///
/// Such points never escape, so the full iteration can be skipped. At the
/// default view this covers a large share of the visible interior.
#[inline]
fn in_cardioid(re: f64, im: f64) -> bool {
    let im2 = im * im;
    let q = (re - 0.25) * (re - 0.25) + im2;
    q * (q + (re - 0.25)) <= 0.25 * im2
}

/// Returns `true` if `c` lies inside the period-2 bulb.
#[inline]
fn in_period2_bulb(re: f64, im: f64) -> bool {
    (re + 1.0) * (re + 1.0) + im * im <= 0.0625
}

/// Escape-time of `c` under `z ← z² + c`, starting from `z = 0`.
///
/// Counts iterations until `|z|² > 4` or `max_iter` is reached, so the result
/// lies in `[0, max_iter]` and equals `max_iter` for points that never escape.
#[inline]
pub fn escape_time(c: Complex, max_iter: u32) -> u32 {
    if in_cardioid(c.re, c.im) || in_period2_bulb(c.re, c.im) {
        return max_iter;
    }

    let mut z = Complex::ZERO;
    let mut count = 0;
    while count < max_iter && z.norm_sq() <= ESCAPE_NORM_SQ {
        z = z.square_add(c);
        count += 1;
    }
    count
}
