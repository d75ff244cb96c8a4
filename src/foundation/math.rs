/// Fold an out-of-range index back into `0..len`, mirroring with the edge pixel repeated
/// (`fedcba|abcdefgh|hgfedcb`).
///
/// Folding repeats as often as needed, so margins wider than `len` are valid.
pub(crate) fn reflect_index(i: i64, len: usize) -> usize {
    debug_assert!(len > 0);
    let n = len as i64;
    if n == 1 {
        return 0;
    }
    let period = 2 * n;
    let m = i.rem_euclid(period);
    (if m < n { m } else { period - 1 - m }) as usize
}

/// Fold an out-of-range index back into `0..len`, mirroring around the edge pixel without
/// repeating it (`gfedcb|abcdefgh|gfedcba`).
pub(crate) fn reflect101_index(i: i64, len: usize) -> usize {
    debug_assert!(len > 0);
    let n = len as i64;
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let m = i.rem_euclid(period);
    (if m < n { m } else { period - m }) as usize
}

/// Linear mix of two 8-bit samples in `f32`, truncated back to `u8`.
///
/// Truncates like a float32-to-uint8 cast, so equal inputs can come out one below
/// (`lerp_u8(13, 13, 1/180) == 12`). Blended output must stay truncated, not rounded.
#[inline]
pub(crate) fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let v = (1.0 - t) * f32::from(a) + t * f32::from(b);
    v.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
