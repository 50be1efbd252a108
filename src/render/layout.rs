use crate::scanner::Grid;

/// The width of a single grid cell, in terminal columns.
pub(crate) const CELL_WIDTH: u16 = 2;

/// The gap between two cells in the same row, in terminal columns.
pub(crate) const CELL_GAP: u16 = 1;

/// Space between the wrapper border and the grid, in terminal columns.
const WRAPPER_PADDING: u16 = 1;

/// Title, subtitle and a blank line.
const HEADER_HEIGHT: u16 = 3;

/// Where everything goes on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Layout {
    /// The terminal row the title is drawn at.
    pub title_row: u16,
    /// The top left corner of the wrapper border.
    pub wrapper_origin: (u16, u16),
    /// The wrapper's width including its border.
    pub wrapper_width: u16,
    /// The wrapper's height including its border.
    pub wrapper_height: u16,
    /// The top left corner of the first cell.
    pub grid_origin: (u16, u16),
    /// The terminal's width.
    pub screen_width: u16,
}

impl Layout {
    /// Center the grid in a terminal of the given size.
    ///
    /// Returns `None` if the grid doesn't fit.
    pub(crate) fn compute(grid: &Grid, screen_width: u16, screen_height: u16) -> Option<Self> {
        let (wrapper_width, total_height) = Self::required_size(grid)?;
        if wrapper_width > screen_width || total_height > screen_height {
            return None;
        }
        let wrapper_height = total_height - HEADER_HEIGHT;

        let title_row = (screen_height - total_height) / 2;
        let wrapper_x = (screen_width - wrapper_width) / 2;
        let wrapper_y = title_row + HEADER_HEIGHT;
        Some(Self {
            title_row,
            wrapper_origin: (wrapper_x, wrapper_y),
            wrapper_width,
            wrapper_height,
            grid_origin: (wrapper_x + 1 + WRAPPER_PADDING, wrapper_y + 1),
            screen_width,
        })
    }

    /// The smallest terminal size (width, height) the grid fits in, or `None` if it wouldn't fit
    /// in any terminal.
    pub(crate) fn required_size(grid: &Grid) -> Option<(u16, u16)> {
        let columns = u16::try_from(grid.columns).ok()?;
        let rows = u16::try_from(grid.rows).ok()?;
        let grid_width = columns.checked_mul(CELL_WIDTH + CELL_GAP)?.checked_sub(CELL_GAP)?;
        let wrapper_width = grid_width.checked_add(2 * (WRAPPER_PADDING + 1))?;
        let total_height = rows.checked_add(2 + HEADER_HEIGHT)?;
        Some((wrapper_width, total_height))
    }

    /// The terminal position of a grid cell.
    pub(crate) fn cell_position(&self, row: usize, col: usize) -> (u16, u16) {
        let (x, y) = self.grid_origin;
        (x + col as u16 * (CELL_WIDTH + CELL_GAP), y + row as u16)
    }

    /// The column a line of `width` characters should start at to be centered.
    pub(crate) fn centered(&self, width: u16) -> u16 {
        self.screen_width.saturating_sub(width) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: Grid = Grid { rows: 15, columns: 20 };

    #[test]
    fn centered_in_screen() {
        // grid: 20 * 3 - 1 = 59 wide, wrapper: 63 wide and 17 tall, plus 3 header lines
        let layout = Layout::compute(&GRID, 83, 40).expect("should fit");
        assert_eq!(layout.wrapper_width, 63);
        assert_eq!(layout.wrapper_height, 17);
        assert_eq!(layout.title_row, 10);
        assert_eq!(layout.wrapper_origin, (10, 13));
        assert_eq!(layout.grid_origin, (12, 14));
    }

    #[test]
    fn exact_fit() {
        let layout = Layout::compute(&GRID, 63, 20).expect("should fit");
        assert_eq!(layout.title_row, 0);
        assert_eq!(layout.wrapper_origin, (0, 3));
    }

    #[test]
    fn too_small() {
        assert_eq!(Layout::compute(&GRID, 62, 40), None);
        assert_eq!(Layout::compute(&GRID, 80, 19), None);
    }

    #[test]
    fn huge_grid_does_not_overflow() {
        let grid = Grid { rows: 1, columns: 1_000_000 };
        assert_eq!(Layout::required_size(&grid), None);
        assert_eq!(Layout::compute(&grid, u16::MAX, u16::MAX), None);
    }

    #[test]
    fn required_size() {
        assert_eq!(Layout::required_size(&GRID), Some((63, 20)));
        assert_eq!(Layout::required_size(&Grid { rows: 1, columns: 1 }), Some((6, 6)));
    }

    #[test]
    fn cell_positions() {
        let layout = Layout::compute(&GRID, 83, 40).expect("should fit");
        assert_eq!(layout.cell_position(0, 0), (12, 14));
        assert_eq!(layout.cell_position(2, 3), (21, 16));
        // last cell ends right before the padding
        let (x, _) = layout.cell_position(0, 19);
        assert_eq!(x + CELL_WIDTH, layout.wrapper_origin.0 + layout.wrapper_width - 2);
    }

    #[test]
    fn centering_text() {
        let layout = Layout::compute(&GRID, 83, 40).expect("should fit");
        assert_eq!(layout.centered(12), 35);
        assert_eq!(layout.centered(200), 0);
    }
}
