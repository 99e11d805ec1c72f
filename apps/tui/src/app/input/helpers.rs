/// Previous index in a ring of `len` items; 0 when the ring is empty.
pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 || index > len {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_in_both_directions() {
        assert_eq!(wrap_increment(2, 3), 0);
        assert_eq!(wrap_increment(0, 3), 1);
        assert_eq!(wrap_decrement(0, 3), 2);
        assert_eq!(wrap_decrement(2, 3), 1);
    }

    #[test]
    fn empty_ring_stays_at_zero() {
        assert_eq!(wrap_increment(4, 0), 0);
        assert_eq!(wrap_decrement(4, 0), 0);
    }

    #[test]
    fn out_of_range_index_wraps_to_last() {
        assert_eq!(wrap_decrement(9, 3), 2);
    }
}
