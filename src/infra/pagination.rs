//! Offset and limit based pagination.
//!
//! Positions follow slice semantics: a negative offset or end counts back
//! from the end of the result set.

use super::query::parse_index;

/// Which part of a result set to return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Number of elements to skip. Negative values count from the end.
    offset: i64,
    /// Maximum number of elements to return, if any.
    limit: Option<i64>,
}

impl Pagination {
    /// Constructs a new [`Pagination`].
    pub fn new(offset: i64, limit: Option<i64>) -> Self {
        Self { offset, limit }
    }

    /// Coerces raw query values.
    /// A missing or non-numeric offset is zero, a missing or non-numeric limit means no limit.
    pub fn from_query(offset: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            offset: offset.and_then(parse_index).unwrap_or(0),
            limit: limit.and_then(parse_index),
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    /// The limit to report for a result set of `total` elements.
    pub fn effective_limit(&self, total: usize) -> i64 {
        self.limit.unwrap_or(total as i64)
    }

    /// The elements in `[offset, offset + limit)`, clipped to `elements`.
    pub fn window<'a, T>(&self, elements: &'a [T]) -> &'a [T] {
        let len = elements.len() as i64;
        let resolve = |position: i64| {
            if position < 0 {
                len.saturating_add(position).max(0)
            } else {
                position.min(len)
            }
        };
        let start = resolve(self.offset);
        let end = match self.limit {
            Some(limit) => resolve(self.offset.saturating_add(limit)),
            None => len,
        };
        if start >= end {
            return &[];
        }
        &elements[start as usize..end as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    const ELEMENTS: [u8; 5] = [1, 2, 3, 4, 5];

    #[test]
    fn no_parameters_return_everything() {
        let pagination = Pagination::from_query(None, None);
        assert_eq!(&ELEMENTS[..], pagination.window(&ELEMENTS));
        assert_eq!(5, pagination.effective_limit(ELEMENTS.len()));
    }

    #[test]
    fn offset_without_limit_returns_the_rest() {
        let pagination = Pagination::from_query(Some("3"), None);
        assert_eq!(&ELEMENTS[3..], pagination.window(&ELEMENTS));
    }

    #[test]
    fn limit_is_clipped() {
        let pagination = Pagination::from_query(Some("3"), Some("10"));
        assert_eq!(&ELEMENTS[3..], pagination.window(&ELEMENTS));
        assert_eq!(10, pagination.effective_limit(ELEMENTS.len()));
    }

    #[test]
    fn limit_counts_from_offset() {
        let pagination = Pagination::from_query(Some("1"), Some("2"));
        assert_eq!(&ELEMENTS[1..3], pagination.window(&ELEMENTS));
    }

    #[test]
    fn out_of_range_offset_is_empty() {
        let pagination = Pagination::from_query(Some("99"), Some("2"));
        assert!(pagination.window(&ELEMENTS).is_empty());
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let pagination = Pagination::from_query(Some("abc"), Some("xyz"));
        assert_eq!(Pagination::new(0, None), pagination);
    }

    #[test]
    fn blank_limit_is_zero() {
        let pagination = Pagination::from_query(None, Some(""));
        assert_eq!(Pagination::new(0, Some(0)), pagination);
        assert!(pagination.window(&ELEMENTS).is_empty());
        assert_eq!(0, pagination.effective_limit(ELEMENTS.len()));
    }

    #[test]
    fn negative_offset_counts_from_the_end() {
        let pagination = Pagination::from_query(Some("-2"), None);
        assert_eq!(&ELEMENTS[3..], pagination.window(&ELEMENTS));

        let pagination = Pagination::from_query(Some("-3"), Some("2"));
        assert_eq!(&ELEMENTS[2..4], pagination.window(&ELEMENTS));

        let pagination = Pagination::from_query(Some("-99"), None);
        assert_eq!(&ELEMENTS[..], pagination.window(&ELEMENTS));
    }

    #[test]
    fn negative_limit_ends_before_the_end() {
        let pagination = Pagination::from_query(None, Some("-1"));
        assert_eq!(&ELEMENTS[..4], pagination.window(&ELEMENTS));

        let pagination = Pagination::from_query(Some("-1"), Some("-1"));
        assert!(pagination.window(&ELEMENTS).is_empty());
    }

    #[test]
    fn huge_limit_does_not_overflow() {
        let pagination = Pagination::new(2, Some(i64::MAX));
        assert_eq!(&ELEMENTS[2..], pagination.window(&ELEMENTS));
    }
}
