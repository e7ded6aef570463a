/// Index of the last element `<= at` in an ascending slice, or `None` if every
/// element is greater.
///
/// Duplicates resolve to the highest index.
pub fn last_at_or_before<T: PartialOrd>(sorted: &[T], at: &T) -> Option<usize> {
    sorted.partition_point(|t| t <= at).checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::last_at_or_before;

    #[test]
    fn empty_slice_has_no_index() {
        let empty: [i64; 0] = [];
        assert_eq!(last_at_or_before(&empty, &0), None);
    }

    #[test]
    fn duplicates_resolve_to_last() {
        let ts = [1, 3, 3, 3, 7];
        assert_eq!(last_at_or_before(&ts, &3), Some(3));
        assert_eq!(last_at_or_before(&ts, &6), Some(3));
        assert_eq!(last_at_or_before(&ts, &0), None);
        assert_eq!(last_at_or_before(&ts, &100), Some(4));
    }

    #[test]
    fn works_for_fractional_timestamps() {
        let ts = [0.5_f64, 1.5, 2.5];
        assert_eq!(last_at_or_before(&ts, &1.49), Some(0));
        assert_eq!(last_at_or_before(&ts, &2.5), Some(2));
    }
}
