use super::color::{Animation, CellContext, Palette, Rgb};

/// The fixed dimensions of the cell grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Grid {
    pub rows: usize,
    pub columns: usize,
}

impl Grid {
    /// The number of cells in the grid, or `None` if that doesn't fit in a `usize`.
    pub(crate) fn cell_count(&self) -> Option<usize> {
        self.rows.checked_mul(self.columns)
    }

    fn last_column(&self) -> usize {
        self.columns.saturating_sub(1)
    }
}

/// The direction the wave is travelling in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Towards the last column.
    Forward,
    /// Towards column 0.
    Backward,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// What changed as a result of a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    Moved,
    Reversed,
}

/// The mutable state of the wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct WaveState {
    pub position: usize,
    pub direction: Direction,
    pub palette_index: usize,
}

impl Default for WaveState {
    fn default() -> Self {
        Self { position: 0, direction: Direction::Forward, palette_index: 0 }
    }
}

impl WaveState {
    /// Advance the wave by one step.
    ///
    /// Once the new position reaches either edge of the grid, the direction flips and the wave
    /// moves on to the next palette color.
    pub(crate) fn tick(&mut self, grid: &Grid, palette: &Palette) -> TickOutcome {
        let last = grid.last_column() as isize;
        let next = self.position as isize + self.direction.step();
        let outcome = if next >= last || next <= 0 {
            self.direction = self.direction.reversed();
            self.palette_index = palette.next_index(self.palette_index);
            TickOutcome::Reversed
        } else {
            TickOutcome::Moved
        };
        self.position = next.clamp(0, last) as usize;
        outcome
    }
}

/// The color function: lights up the columns around the wave position.
pub(crate) struct ScannerWave<'a> {
    pub grid: &'a Grid,
    pub band_width: usize,
    pub palette: &'a Palette,
    pub background: Rgb,
    pub state: &'a WaveState,
}

impl Animation for ScannerWave<'_> {
    fn render_cell(&self, ctx: &CellContext) -> Rgb {
        let distance = ctx.col.abs_diff(self.state.position);
        if distance >= self.band_width {
            return self.background;
        }
        let intensity = 1.0 - distance as f64 / self.band_width as f64;
        let vertical_fade = 1.0 - ctx.row as f64 / (self.grid.rows as f64 * 1.5);
        self.palette
            .color(self.state.palette_index)
            .map(|c| (c as f64 * intensity * vertical_fade).floor().clamp(0.0, 255.0) as u8)
    }
}
