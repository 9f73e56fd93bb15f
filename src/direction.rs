/// One of the four sides of a grid cell.
///
/// "Above" is `y + 1`; hosts that draw with `y` pointing down flip the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `x + 1`.
    Right,
    /// `y - 1`.
    Below,
    /// `x - 1`.
    Left,
    /// `y + 1`.
    Above,
}

/// Neighbour order used everywhere a cell's surroundings are listed.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Right,
    Direction::Below,
    Direction::Left,
    Direction::Above,
];

/// `(dx, dy)` offsets in [`ALL_DIRECTIONS`] order.
pub const DIRECTION_DELTAS: [(isize, isize); 4] = [
    (1, 0),  // Right
    (0, -1), // Below
    (-1, 0), // Left
    (0, 1),  // Above
];

impl Direction {
    /// Position of this direction within [`ALL_DIRECTIONS`].
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Below => 1,
            Direction::Left => 2,
            Direction::Above => 3,
        }
    }

    /// The side facing this one from the neighbouring cell.
    #[inline]
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Below => Direction::Above,
            Direction::Left => Direction::Right,
            Direction::Above => Direction::Below,
        }
    }

    /// Offset of the neighbour on this side.
    #[inline]
    #[must_use]
    pub fn delta(self) -> (isize, isize) {
        DIRECTION_DELTAS[self.index()]
    }

    /// Step from `(x, y)` in this direction, or `None` when that leaves a
    /// `width` x `height` grid.
    #[must_use]
    pub fn step(self, (x, y): (usize, usize), width: usize, height: usize) -> Option<(usize, usize)> {
        let (dx, dy) = self.delta();
        let nx = match x.checked_add_signed(dx) {
            Some(val) if val < width => val,
            _ => return None,
        };
        let ny = match y.checked_add_signed(dy) {
            Some(val) if val < height => val,
            _ => return None,
        };
        Some((nx, ny))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for dir in ALL_DIRECTIONS {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir, dir.opposite().opposite());
        }
    }

    #[test]
    fn index_follows_neighbour_order() {
        for (i, dir) in ALL_DIRECTIONS.iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }

    #[test]
    fn step_stays_inside_grid() {
        assert_eq!(Direction::Right.step((0, 0), 2, 2), Some((1, 0)));
        assert_eq!(Direction::Above.step((0, 0), 2, 2), Some((0, 1)));
        assert_eq!(Direction::Left.step((0, 0), 2, 2), None);
        assert_eq!(Direction::Below.step((0, 0), 2, 2), None);
        assert_eq!(Direction::Right.step((1, 1), 2, 2), None);
        assert_eq!(Direction::Above.step((1, 1), 2, 2), None);
    }
}
