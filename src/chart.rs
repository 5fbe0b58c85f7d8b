/*
    Triangular tables indexed by span boundaries
*/

/// One cell per span `[start, end)` with `0 <= start < end <= n`, stored
/// row by row in a single vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart<T> {
    n: usize,
    cells: Vec<T>,
}

impl<T: Default> Chart<T> {
    pub fn new(n: usize) -> Self {
        let mut cells = Vec::new();
        cells.resize_with(n * (n + 1) / 2, T::default);
        Chart { n, cells }
    }
}

impl<T> Chart<T> {
    /// Length of the sentence the chart was built for.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    fn index(&self, start: usize, end: usize) -> usize {
        assert!(start < end && end <= self.n, "span ({}, {}) outside chart of length {}", start, end, self.n);
        // Row `start` is preceded by rows of length n, n-1, ..., n-start+1
        start * self.n - start * (start.saturating_sub(1)) / 2 + (end - start - 1)
    }

    pub fn cell(&self, start: usize, end: usize) -> &T {
        &self.cells[self.index(start, end)]
    }

    pub fn cell_mut(&mut self, start: usize, end: usize) -> &mut T {
        let i = self.index(start, end);
        &mut self.cells[i]
    }

    /// The cell spanning the whole sentence, if there is one.
    pub fn root(&self) -> Option<&T> {
        if self.n == 0 { None } else { Some(self.cell(0, self.n)) }
    }
}

/// Spans of width two and up, narrowest first, so every span comes after
/// all of its sub-spans.
pub fn compound_spans(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (2..=n).flat_map(move |width| (0..=n - width).map(move |start| (start, start + width)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn every_span_has_its_own_cell() {
        for n in 0..7 {
            let chart = Chart::<u8>::new(n);
            let indices = (0..n)
                .flat_map(|start| (start + 1..=n).map(move |end| (start, end)))
                .map(|(start, end)| chart.index(start, end))
                .collect_vec();

            assert_eq!(indices, (0..n * (n + 1) / 2).collect_vec());
        }
    }

    #[test]
    fn cells_are_independent() {
        let mut chart = Chart::<Vec<usize>>::new(3);
        chart.cell_mut(0, 1).push(1);
        chart.cell_mut(1, 3).push(13);
        chart.cell_mut(0, 3).push(3);

        assert_eq!(chart.cell(0, 1), &vec![1]);
        assert_eq!(chart.cell(1, 3), &vec![13]);
        assert_eq!(chart.root(), Some(&vec![3]));
        assert!(chart.cell(1, 2).is_empty());
    }

    #[test]
    fn empty_chart_has_no_root() {
        let chart = Chart::<u8>::new(0);
        assert!(chart.is_empty());
        assert_eq!(chart.root(), None);
    }

    #[test]
    #[should_panic]
    fn inverted_span_panics() {
        Chart::<u8>::new(3).cell(2, 2);
    }

    #[test]
    fn compound_spans_by_width() {
        assert_eq!(compound_spans(3).collect_vec(), vec![(0, 2), (1, 3), (0, 3)]);
        assert_eq!(compound_spans(1).count(), 0);
        assert_eq!(compound_spans(0).count(), 0);
    }
}
