use crate::draw::Rect;

/// Two index-aligned matrices: cell states and their neighbor counts.
///
/// Public coordinates are 1-indexed, `x` being the column and `y` the row.
#[derive(Clone, Debug)]
pub struct Space {
    size: Rect,
    cells: Vec<bool>,
    neighbors: Vec<u8>,
}

impl Space {

    #[inline]
    pub fn new(size: Rect) -> Self {
        let len = size.w() as usize * size.h() as usize;
        Space {
            size,
            cells: vec![false; len],
            neighbors: vec![0; len],
        }
    }

    #[inline]
    pub fn size(&self) -> &Rect {
        &self.size
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.size.h() as usize
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.size.w() as usize
    }

    /// States of one row, 0-indexed.
    #[inline]
    pub fn row(&self, r: usize) -> &[bool] {
        let cols = self.cols();
        &self.cells[r * cols..(r + 1) * cols]
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    #[inline]
    pub fn get_state(&self, x: usize, y: usize) -> Option<bool> {
        self.index(x, y).map(|i| self.cells[i])
    }

    #[inline]
    pub fn neighbors(&self, x: usize, y: usize) -> Option<u8> {
        self.index(x, y).map(|i| self.neighbors[i])
    }

    /// Flips the cell and returns its new state.
    pub fn change_state(&mut self, x: usize, y: usize) -> Option<bool> {
        let i = self.index(x, y)?;
        self.cells[i] = !self.cells[i];
        Some(self.cells[i])
    }

    /// Writes the live-neighbor count of every interior cell.
    /// Border cells keep whatever count they had.
    pub fn count_neighbors(&mut self) {
        let (rows, cols) = (self.rows(), self.cols());
        if rows < 3 || cols < 3 {
            return;
        }

        for r in 1..rows - 1 {
            for c in 1..cols - 1 {
                let mut count = 0u8;
                for nr in r - 1..=r + 1 {
                    for nc in c - 1..=c + 1 {
                        if (nr, nc) != (r, c) && self.cells[nr * cols + nc] {
                            count += 1;
                        }
                    }
                }
                self.neighbors[r * cols + c] = count;
            }
        }
    }

    /// Births on exactly 3 neighbors, deaths outside of [2, 3].
    pub fn genesis(&mut self) {
        for (cell, &n) in self.cells.iter_mut().zip(self.neighbors.iter()) {
            *cell = Self::produce_value(*cell, n);
        }
    }

    #[inline]
    pub fn tick(&mut self) {
        self.count_neighbors();
        self.genesis();
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = false);
        self.neighbors.iter_mut().for_each(|n| *n = 0);
    }

    fn produce_value(current: bool, n: u8) -> bool {
        match (current, n) {
            (false, 3) => true,
            (true, 2 | 3) => true,
            (true, _) => false,
            (false, _) => false,
        }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x == 0 || y == 0 || x > self.cols() || y > self.rows() {
            None
        } else {
            Some((y - 1) * self.cols() + (x - 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(w: u16, h: u16) -> Space {
        Space::new(Rect::new(w, h))
    }

    fn with_cells(w: u16, h: u16, live: &[(usize, usize)]) -> Space {
        let mut s = space(w, h);
        for &(x, y) in live {
            s.change_state(x, y);
        }
        s
    }

    #[test]
    fn test_new_is_empty() {
        let s = space(8, 5);
        assert_eq!(s.rows(), 5);
        assert_eq!(s.cols(), 8);
        assert_eq!(s.population(), 0);
        assert_eq!(s.neighbors(4, 3), Some(0));
    }

    #[test]
    fn test_get_state_is_bounds_checked() {
        let s = space(4, 3);
        assert_eq!(s.get_state(1, 1), Some(false));
        assert_eq!(s.get_state(4, 3), Some(false));
        assert_eq!(s.get_state(0, 1), None);
        assert_eq!(s.get_state(1, 0), None);
        assert_eq!(s.get_state(5, 1), None);
        assert_eq!(s.get_state(1, 4), None);
    }

    #[test]
    fn test_double_toggle_restores() {
        let mut s = space(6, 6);
        assert_eq!(s.change_state(3, 2), Some(true));
        assert_eq!(s.get_state(3, 2), Some(true));
        assert_eq!(s.change_state(3, 2), Some(false));
        assert_eq!(s.get_state(3, 2), Some(false));
        assert_eq!(s.change_state(7, 2), None);
        assert_eq!(s.population(), 0);
    }

    #[test]
    fn test_toggle_is_column_then_row() {
        let mut s = space(5, 3);
        s.change_state(5, 1);
        assert_eq!(s.row(0), &[false, false, false, false, true]);
        assert_eq!(s.row(1), &[false; 5]);
    }

    #[test]
    fn test_count_neighbors() {
        // Plus sign centered on (3, 3)
        let mut s = with_cells(5, 5, &[(3, 2), (2, 3), (3, 3), (4, 3), (3, 4)]);
        s.count_neighbors();
        assert_eq!(s.neighbors(3, 3), Some(4));
        assert_eq!(s.neighbors(2, 2), Some(3));
        assert_eq!(s.neighbors(3, 2), Some(3));
        assert_eq!(s.neighbors(4, 4), Some(3));
    }

    #[test]
    fn test_border_cells_are_not_counted() {
        let mut s = with_cells(5, 5, &[(1, 1), (2, 1), (1, 2)]);
        s.count_neighbors();
        assert_eq!(s.neighbors(1, 1), Some(0));
        assert_eq!(s.neighbors(2, 1), Some(0));
        assert_eq!(s.neighbors(2, 2), Some(3));

        // Border cells always hold zero, so they die and are never born
        s.genesis();
        assert_eq!(s.get_state(1, 1), Some(false));
        assert_eq!(s.get_state(2, 1), Some(false));
        assert_eq!(s.get_state(1, 2), Some(false));
        assert_eq!(s.get_state(2, 2), Some(true));
    }

    #[test]
    fn test_genesis_rule_for_every_count() {
        for n in 0..=8u8 {
            let expected_live = n == 2 || n == 3;
            assert_eq!(Space::produce_value(true, n), expected_live, "live cell, {n} neighbors");
            assert_eq!(Space::produce_value(false, n), n == 3, "dead cell, {n} neighbors");
        }
    }

    #[test]
    fn test_interior_cells_follow_the_rule() {
        // Center of a 5x5 grid with n live neighbors placed around it
        let ring = [(2, 2), (3, 2), (4, 2), (2, 3), (4, 3), (2, 4), (3, 4), (4, 4)];
        for n in 0..=8 {
            for alive in [false, true] {
                let mut s = with_cells(5, 5, &ring[..n]);
                if alive {
                    s.change_state(3, 3);
                }
                s.count_neighbors();
                assert_eq!(s.neighbors(3, 3), Some(n as u8));
                s.genesis();
                let expected = if alive { n == 2 || n == 3 } else { n == 3 };
                assert_eq!(s.get_state(3, 3), Some(expected), "alive={alive}, n={n}");
            }
        }
    }

    #[test]
    fn test_blinker_oscillates() {
        let horizontal = [(2, 3), (3, 3), (4, 3)];
        let vertical = [(3, 2), (3, 3), (3, 4)];
        let mut s = with_cells(5, 5, &horizontal);

        s.tick();
        for y in 1..=5 {
            for x in 1..=5 {
                assert_eq!(s.get_state(x, y), Some(vertical.contains(&(x, y))));
            }
        }

        s.tick();
        for y in 1..=5 {
            for x in 1..=5 {
                assert_eq!(s.get_state(x, y), Some(horizontal.contains(&(x, y))));
            }
        }
    }

    #[test]
    fn test_block_is_still() {
        let block = [(2, 2), (3, 2), (2, 3), (3, 3)];
        let mut s = with_cells(6, 6, &block);
        for _ in 0..4 {
            s.tick();
        }
        assert_eq!(s.population(), 4);
        for &(x, y) in &block {
            assert_eq!(s.get_state(x, y), Some(true));
        }
    }

    #[test]
    fn test_clear_zeroes_both_matrices() {
        let mut s = with_cells(6, 6, &[(2, 2), (3, 2), (4, 2), (3, 3)]);
        s.count_neighbors();
        assert!(s.neighbors(3, 3).unwrap() > 0);

        s.clear();
        for y in 1..=6 {
            for x in 1..=6 {
                assert_eq!(s.get_state(x, y), Some(false));
                assert_eq!(s.neighbors(x, y), Some(0));
            }
        }
    }

    #[test]
    fn test_tiny_grid_does_not_panic() {
        let mut s = with_cells(2, 2, &[(1, 1), (2, 2)]);
        s.tick();
        assert_eq!(s.population(), 0);

        let mut s = space(1, 1);
        s.tick();
        assert_eq!(s.population(), 0);
    }
}
