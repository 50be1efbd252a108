use super::layout::Layout;
use crate::scanner::{Animation, CellContext, Grid, Rgb};

/// A cell whose color changed since the last frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CellUpdate {
    pub row: usize,
    pub col: usize,
    pub color: Rgb,
}

/// The colors last drawn for every cell in the grid.
///
/// Cells are only reported as updates when their color differs from what's on screen, so a frame
/// where nothing moved draws nothing.
#[derive(Debug)]
pub(crate) struct FrameBuffer {
    grid: Grid,
    cells: Vec<Option<Rgb>>,
}

impl FrameBuffer {
    /// Grids that can't be laid out in any terminal get no cells, since they're never drawn.
    pub(crate) fn new(grid: Grid) -> Self {
        let cells = match Layout::required_size(&grid).and(grid.cell_count()) {
            Some(count) => vec![None; count],
            None => Vec::new(),
        };
        Self { grid, cells }
    }

    /// Forget everything on screen so the next frame redraws every cell.
    pub(crate) fn invalidate(&mut self) {
        self.cells.fill(None);
    }

    /// Color every cell using the given animation, returning the cells that changed.
    pub(crate) fn update(&mut self, animation: &dyn Animation) -> Vec<CellUpdate> {
        let mut updates = Vec::new();
        for (index, drawn) in self.cells.iter_mut().enumerate() {
            let row = index / self.grid.columns;
            let col = index % self.grid.columns;
            let color = animation.render_cell(&CellContext { row, col });
            if *drawn != Some(color) {
                *drawn = Some(color);
                updates.push(CellUpdate { row, col, color });
            }
        }
        updates
    }
}
