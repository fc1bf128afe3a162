//! Uniform sampling helpers used for choosing interaction partners.

use rand::Rng;

/// Samples an index uniformly from `0..len` excluding `excluded`, using exactly one draw.
///
/// An index is drawn from `0..len - 1` and shifted past `excluded`, which maps the draw onto
/// the remaining `len - 1` positions without a rejection loop. Returns `None` when no other
/// index exists.
pub fn sample_index_excluding<R>(rng: &mut R, len: usize, excluded: usize) -> Option<usize>
where
    R: Rng + ?Sized,
{
    debug_assert!(excluded < len, "excluded index {excluded} out of bounds for {len}");
    if len < 2 {
        return None;
    }
    let index = rng.random_range(0..len - 1);
    if index >= excluded {
        Some(index + 1)
    } else {
        Some(index)
    }
}
