//! Sizes and offsets of arrays and struct members.
//!
//! Arrays are laid out row-major. All quantities are in words.

/// Size of an array of `element` sized values with the given dimensions,
/// or `None` when it does not fit a `usize`.
///
/// A scalar has no dimensions and takes the element size.
#[inline]
pub fn total_size(element: usize, dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(element, |size, dim| size.checked_mul(*dim))
}

/// Distance between two consecutive indices of dimension `dim`.
pub fn stride(element: usize, dims: &[usize], dim: usize) -> Option<usize> {
    let inner = dims.get(dim + 1..).unwrap_or_default();
    total_size(element, inner)
}

/// Offset of an element from the start of the array, or `None` when
/// there are more indices than dimensions, an index is out of bounds or
/// the offset overflows.
///
/// Fewer indices than dimensions address a sub-array.
pub fn offset(element: usize, dims: &[usize], indices: &[usize]) -> Option<usize> {
    if indices.len() > dims.len() {
        return None;
    }

    let mut offset = 0_usize;
    for (dim, (index, size)) in indices.iter().zip(dims).enumerate() {
        if index >= size {
            return None;
        }
        let step = index.checked_mul(stride(element, dims, dim)?)?;
        offset = offset.checked_add(step)?;
    }
    Some(offset)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_total_size() {
        assert_eq!(total_size(1, &[]), Some(1));
        assert_eq!(total_size(1, &[3, 4]), Some(12));
        assert_eq!(total_size(2, &[5]), Some(10));
        assert_eq!(total_size(0, &[5]), Some(0));
        assert_eq!(total_size(1, &[1 << 32, 1 << 32]), None);
        assert_eq!(total_size(usize::MAX, &[2]), None);
    }

    #[test]
    fn test_stride() {
        assert_eq!(stride(1, &[3, 4], 0), Some(4));
        assert_eq!(stride(1, &[3, 4], 1), Some(1));
        assert_eq!(stride(2, &[3, 4, 5], 0), Some(40));
        assert_eq!(stride(1, &[3], 4), Some(1));
    }

    #[test]
    fn test_offset() {
        assert_eq!(offset(1, &[3, 4], &[1, 2]), Some(6));
        assert_eq!(offset(1, &[3, 4], &[2]), Some(8));
        assert_eq!(offset(2, &[3, 4], &[1, 2]), Some(12));
        assert_eq!(offset(1, &[3, 4], &[]), Some(0));
        assert_eq!(offset(1, &[3, 4], &[3, 0]), None);
        assert_eq!(offset(1, &[3], &[0, 0]), None);
        assert_eq!(offset(1, &[usize::MAX, 2], &[usize::MAX - 1, 0]), None);
    }
}
