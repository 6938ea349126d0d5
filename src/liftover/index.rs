//! Sorted interval index with overlap queries.
//!
//! Items are sorted by start; `max_end[i]` is the largest end among
//! `items[..=i]`. An overlap query binary-searches for the last item starting
//! before the query end and walks backwards until the running maximum falls
//! at or below the query start. Chains are mostly non-overlapping, so the
//! walk touches only the hits plus one item.

/// Anything with a 0-based half-open extent.
pub trait Span {
    fn span_start(&self) -> u64;
    fn span_end(&self) -> u64;
}

/// Immutable overlap index over items of one chromosome.
#[derive(Debug, Clone)]
pub struct IntervalIndex<T> {
    items: Vec<T>,
    max_end: Vec<u64>,
}

impl<T> Default for IntervalIndex<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            max_end: Vec::new(),
        }
    }
}

impl<T: Span> IntervalIndex<T> {
    /// Build an index; items with equal starts keep their input order.
    pub fn new(mut items: Vec<T>) -> Self {
        items.sort_by_key(|item| (item.span_start(), item.span_end()));

        let mut max_end = Vec::with_capacity(items.len());
        let mut running = 0u64;
        for item in &items {
            running = running.max(item.span_end());
            max_end.push(running);
        }

        Self { items, max_end }
    }

    /// All items overlapping `[start, end)`, ordered by start.
    pub fn overlapping(&self, start: u64, end: u64) -> Vec<&T> {
        let mut hits = Vec::new();
        let mut i = self.items.partition_point(|item| item.span_start() < end);

        while i > 0 {
            i -= 1;
            if self.max_end[i] <= start {
                break;
            }
            if self.items[i].span_end() > start {
                hits.push(&self.items[i]);
            }
        }

        hits.reverse();
        hits
    }

    /// True when any item overlaps `[start, end)`.
    pub fn any_overlapping(&self, start: u64, end: u64) -> bool {
        let hi = self.items.partition_point(|item| item.span_start() < end);
        hi > 0 && self.max_end[hi - 1] > start
    }

    /// First pair of overlapping items, in sorted order.
    pub fn first_overlap(&self) -> Option<(&T, &T)> {
        for i in 1..self.items.len() {
            let later = &self.items[i];
            if later.span_start() < self.max_end[i - 1] {
                let earlier = self.items[..i]
                    .iter()
                    .rev()
                    .find(|item| item.span_end() > later.span_start())?;
                return Some((earlier, later));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Iv(u64, u64);

    impl Span for Iv {
        fn span_start(&self) -> u64 {
            self.0
        }
        fn span_end(&self) -> u64 {
            self.1
        }
    }

    fn brute_force(items: &[Iv], start: u64, end: u64) -> Vec<Iv> {
        let mut hits: Vec<Iv> = items
            .iter()
            .copied()
            .filter(|iv| iv.0 < end && start < iv.1)
            .collect();
        hits.sort_by_key(|iv| (iv.0, iv.1));
        hits
    }

    #[test]
    fn test_disjoint_intervals() {
        let index = IntervalIndex::new(vec![Iv(20, 30), Iv(0, 10), Iv(40, 50)]);
        assert_eq!(index.overlapping(5, 6), vec![&Iv(0, 10)]);
        assert_eq!(index.overlapping(10, 20), Vec::<&Iv>::new()); // gap
        assert_eq!(index.overlapping(29, 41), vec![&Iv(20, 30), &Iv(40, 50)]);
        assert!(index.overlapping(50, 60).is_empty());
        assert!(index.first_overlap().is_none());
    }

    #[test]
    fn test_nested_intervals_found() {
        // A long interval followed by short ones: the running max keeps the long one reachable
        let index = IntervalIndex::new(vec![Iv(0, 1000), Iv(10, 20), Iv(30, 40)]);
        assert_eq!(index.overlapping(500, 501), vec![&Iv(0, 1000)]);
        assert_eq!(index.overlapping(35, 36), vec![&Iv(0, 1000), &Iv(30, 40)]);
        assert!(index.any_overlapping(999, 1000));
        assert!(!index.any_overlapping(1000, 1001));
    }

    #[test]
    fn test_first_overlap() {
        let index = IntervalIndex::new(vec![Iv(0, 10), Iv(20, 30), Iv(25, 35)]);
        assert_eq!(index.first_overlap(), Some((&Iv(20, 30), &Iv(25, 35))));
    }

    #[test]
    fn test_matches_brute_force() {
        let items = vec![
            Iv(5, 9),
            Iv(0, 3),
            Iv(2, 12),
            Iv(15, 16),
            Iv(11, 30),
            Iv(18, 19),
            Iv(40, 41),
        ];
        let index = IntervalIndex::new(items.clone());
        for start in 0..45 {
            for len in 1..6 {
                let got: Vec<Iv> = index
                    .overlapping(start, start + len)
                    .into_iter()
                    .copied()
                    .collect();
                assert_eq!(got, brute_force(&items, start, start + len), "query {}+{}", start, len);
                assert_eq!(
                    index.any_overlapping(start, start + len),
                    !got.is_empty()
                );
            }
        }
    }

    #[test]
    fn test_empty_index() {
        let index: IntervalIndex<Iv> = IntervalIndex::new(Vec::new());
        assert!(index.is_empty());
        assert!(index.overlapping(0, 10).is_empty());
        assert!(!index.any_overlapping(0, 10));
    }
}
