mod widget;
pub(crate) use self::widget::YearView;
use crate::progress::TimeUnit;

/// Number of terminal columns per cell
const CELL_WIDTH: u16 = 3;

/// Arrangement of a unit's cells into rows & columns
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GridShape {
    columns: u16,
    total: u16,
}

impl GridShape {
    pub(crate) fn for_unit(unit: TimeUnit) -> GridShape {
        let columns = match unit {
            TimeUnit::Day => 20,
            TimeUnit::Month => 4,
            TimeUnit::Week => 13,
        };
        GridShape {
            columns,
            total: unit.total(),
        }
    }

    pub(crate) fn rows(&self) -> u16 {
        self.total.div_ceil(self.columns)
    }

    /// Width of the grid in terminal columns
    pub(crate) fn width(&self) -> u16 {
        self.columns * CELL_WIDTH
    }

    /// Returns the 0-based row & column of the cell at `index`
    pub(crate) fn position(&self, index: u16) -> (u16, u16) {
        (index / self.columns, index % self.columns)
    }

    /// Returns the index of the cell one step from `index` in the given
    /// direction, or `None` if that would leave the grid.  Left and right
    /// wrap across rows.
    pub(crate) fn step(&self, index: u16, dir: Direction) -> Option<u16> {
        let next = match dir {
            Direction::Left => index.checked_sub(1)?,
            Direction::Right => index + 1,
            Direction::Up => index.checked_sub(self.columns)?,
            Direction::Down => index + self.columns,
        };
        (next < self.total).then_some(next)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes() {
        let day = GridShape::for_unit(TimeUnit::Day);
        assert_eq!(day.rows(), 19);
        assert_eq!(day.width(), 60);
        let month = GridShape::for_unit(TimeUnit::Month);
        assert_eq!(month.rows(), 3);
        assert_eq!(month.width(), 12);
        let week = GridShape::for_unit(TimeUnit::Week);
        assert_eq!(week.rows(), 4);
        assert_eq!(week.width(), 39);
    }

    #[test]
    fn test_position() {
        let day = GridShape::for_unit(TimeUnit::Day);
        assert_eq!(day.position(0), (0, 0));
        assert_eq!(day.position(19), (0, 19));
        assert_eq!(day.position(20), (1, 0));
        assert_eq!(day.position(291), (14, 11));
        assert_eq!(day.position(364), (18, 4));
    }

    #[test]
    fn test_step_inside() {
        let day = GridShape::for_unit(TimeUnit::Day);
        assert_eq!(day.step(21, Direction::Left), Some(20));
        assert_eq!(day.step(20, Direction::Left), Some(19));
        assert_eq!(day.step(19, Direction::Right), Some(20));
        assert_eq!(day.step(21, Direction::Up), Some(1));
        assert_eq!(day.step(21, Direction::Down), Some(41));
    }

    #[test]
    fn test_step_off_grid() {
        let day = GridShape::for_unit(TimeUnit::Day);
        assert_eq!(day.step(0, Direction::Left), None);
        assert_eq!(day.step(364, Direction::Right), None);
        assert_eq!(day.step(19, Direction::Up), None);
        // The last row is only partially filled
        assert_eq!(day.step(345, Direction::Down), None);
        assert_eq!(day.step(344, Direction::Down), Some(364));
        let month = GridShape::for_unit(TimeUnit::Month);
        assert_eq!(month.step(11, Direction::Down), None);
        assert_eq!(month.step(7, Direction::Down), Some(11));
    }

    #[test]
    fn test_every_step_stays_in_range() {
        for unit in TimeUnit::ALL {
            let shape = GridShape::for_unit(unit);
            for i in 0..unit.total() {
                for dir in [
                    Direction::Left,
                    Direction::Right,
                    Direction::Up,
                    Direction::Down,
                ] {
                    if let Some(j) = shape.step(i, dir) {
                        assert!(j < unit.total(), "{unit} {i} stepped {dir:?} to {j}");
                    }
                }
            }
        }
    }
}
