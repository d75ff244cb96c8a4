use rayon::prelude::*;

use crate::foundation::error::{MorphError, MorphResult};
use crate::foundation::math::reflect101_index;
use crate::frame::{RgbFrame, buffer_len};

const CHANNELS: usize = 3;

/// Kernel radius picked automatically from `sigma` for 8-bit images: the kernel spans
/// `round(6*sigma + 1)` taps, forced odd.
pub fn auto_kernel_radius(sigma: f32) -> u32 {
    let ksize = ((f64::from(sigma) * 6.0 + 1.0).round() as u32) | 1;
    ksize / 2
}

/// Separable Gaussian blur of an RGB8 frame with reflect-101 borders.
///
/// Rows are processed in parallel on the ambient rayon pool.
pub fn gaussian_blur_rgb8(src: &RgbFrame, sigma: f32) -> MorphResult<RgbFrame> {
    let radius = auto_kernel_radius(sigma);
    blur_rgb8(&src.data, src.width, src.height, radius, sigma)
        .and_then(|data| RgbFrame::from_raw(src.width, src.height, data))
}

pub fn blur_rgb8(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> MorphResult<Vec<u8>> {
    let expected_len = buffer_len(width, height, CHANNELS)?;
    if src.len() != expected_len {
        return Err(MorphError::dimension_mismatch(
            "blur_rgb8 expects src matching width*height*3",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> MorphResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(MorphError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(MorphError::validation("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Push the rounding residue onto the center tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = width as usize;
    let row_len = w * CHANNELS;
    // Column taps are the same for every row.
    let taps: Vec<Vec<usize>> = (0..w as i64)
        .map(|x| {
            (0..k.len() as i64)
                .map(|ki| reflect101_index(x + ki - radius, w))
                .collect()
        })
        .collect();

    dst.par_chunks_mut(row_len)
        .zip(src.par_chunks(row_len))
        .for_each(|(out_row, in_row)| {
            for (x, cols) in taps.iter().enumerate() {
                let mut acc = [0u32; CHANNELS];
                for (&kw, &sx) in k.iter().zip(cols) {
                    let idx = sx * CHANNELS;
                    for c in 0..CHANNELS {
                        acc[c] += kw * u32::from(in_row[idx + c]);
                    }
                }
                let o = x * CHANNELS;
                for c in 0..CHANNELS {
                    out_row[o + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let h = height as usize;
    let row_len = width as usize * CHANNELS;

    dst.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, out_row)| {
            let mut acc = vec![0u32; row_len];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = reflect101_index(y as i64 + ki as i64 - radius, h);
                let in_row = &src[sy * row_len..(sy + 1) * row_len];
                for (a, &v) in acc.iter_mut().zip(in_row) {
                    *a += kw * u32::from(v);
                }
            }
            for (o, a) in out_row.iter_mut().zip(acc) {
                *o = q16_to_u8(a);
            }
        });
}

fn q16_to_u8(acc: u32) -> u8 {
    let v = (u64::from(acc) + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
