use rayon::prelude::*;

use crate::foundation::error::{MorphError, MorphResult};
use crate::foundation::math::lerp_u8;
use crate::frame::RgbFrame;

/// Rows below this many bytes are blended on the calling thread.
const PAR_MIN_BYTES: usize = 64 * 1024;

/// Per-pixel linear mix `(1-t)*a + t*b` of two equally shaped frames.
///
/// Computed in `f32` and truncated back to 8 bits. `t = 0` returns `a` and `t = 1` returns `b`
/// exactly.
pub fn blend(a: &RgbFrame, b: &RgbFrame, t: f32) -> MorphResult<RgbFrame> {
    a.ensure_same_size(b)?;
    let mut data = vec![0u8; a.data.len()];
    blend_into(&mut data, &a.data, &b.data, t)?;
    Ok(RgbFrame {
        width: a.width,
        height: a.height,
        data,
    })
}

/// Slice form of [`blend`]; works for any channel layout as long as all three buffers agree.
pub fn blend_into(dst: &mut [u8], a: &[u8], b: &[u8], t: f32) -> MorphResult<()> {
    if dst.len() != a.len() || dst.len() != b.len() {
        return Err(MorphError::dimension_mismatch(format!(
            "blend expects equal-length buffers, got dst={} a={} b={}",
            dst.len(),
            a.len(),
            b.len()
        )));
    }
    if !t.is_finite() || !(0.0..=1.0).contains(&t) {
        return Err(MorphError::validation(format!(
            "blend t must be within [0, 1], got {t}"
        )));
    }

    if t == 0.0 {
        dst.copy_from_slice(a);
        return Ok(());
    }
    if t == 1.0 {
        dst.copy_from_slice(b);
        return Ok(());
    }

    if dst.len() < PAR_MIN_BYTES {
        blend_chunk(dst, a, b, t);
    } else {
        dst.par_chunks_mut(PAR_MIN_BYTES)
            .zip(a.par_chunks(PAR_MIN_BYTES))
            .zip(b.par_chunks(PAR_MIN_BYTES))
            .for_each(|((d, a), b)| blend_chunk(d, a, b, t));
    }
    Ok(())
}

fn blend_chunk(dst: &mut [u8], a: &[u8], b: &[u8], t: f32) {
    for ((d, &a), &b) in dst.iter_mut().zip(a).zip(b) {
        *d = lerp_u8(a, b, t);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blend.rs"]
mod tests;
