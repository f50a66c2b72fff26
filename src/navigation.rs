// Navigation - page cursor for the home tab's card grid
// Moves one page at a time and never leaves [0, max_page]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

/// Page position on the home tab, always within [0, max_page]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCursor {
    page: usize,
    max_page: usize,
}

impl PageCursor {
    pub fn new(max_page: usize) -> Self {
        PageCursor { page: 0, max_page }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn max_page(&self) -> usize {
        self.max_page
    }

    pub fn next(&mut self) {
        self.page = (self.page + 1).min(self.max_page);
    }

    pub fn previous(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn step(&mut self, direction: Direction) {
        match direction {
            Direction::Next => self.next(),
            Direction::Prev => self.previous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(PageCursor::new(3).page(), 0);
    }

    #[test]
    fn test_prev_at_zero_stays() {
        let mut cursor = PageCursor::new(2);
        cursor.previous();
        assert_eq!(cursor.page(), 0);
    }

    #[test]
    fn test_next_clamps_at_max() {
        let mut cursor = PageCursor::new(2);
        for _ in 0..5 {
            cursor.next();
        }
        assert_eq!(cursor.page(), 2);
    }

    #[test]
    fn test_single_page_never_moves() {
        let mut cursor = PageCursor::new(0);
        cursor.next();
        assert_eq!(cursor.page(), 0);
        cursor.previous();
        assert_eq!(cursor.page(), 0);
    }

    #[test]
    fn test_mixed_sequence_stays_in_bounds() {
        let mut cursor = PageCursor::new(4);
        // deterministic pseudo-random walk
        let mut seed: u32 = 7;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let direction = if (seed >> 16) & 1 == 0 {
                Direction::Next
            } else {
                Direction::Prev
            };
            cursor.step(direction);
            assert!(cursor.page() <= cursor.max_page());
        }
    }
}
