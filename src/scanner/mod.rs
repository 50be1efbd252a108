mod color;
mod timer;
mod wave;

pub(crate) use color::{Animation, CellContext, Palette, Rgb};
pub(crate) use timer::{PollableState, RepeatingTask};
pub(crate) use wave::{Grid, ScannerWave, TickOutcome, WaveState};

use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How strongly the active palette color tints the grid border.
const GLOW_OPACITY: f32 = 0.3;

/// Everything that stays fixed while the scanner runs.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ScannerSettings {
    pub grid: Grid,
    pub band_width: usize,
    pub tick_interval: Duration,
    pub palette: Palette,
    pub background: Rgb,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            grid: Grid { rows: 15, columns: 20 },
            band_width: 6,
            tick_interval: Duration::from_millis(50),
            palette: Palette::default(),
            background: Rgb::BACKGROUND,
        }
    }
}

/// The scanner component: a wave bouncing across the grid, driven by a repeating task.
///
/// The wave state is created fresh every time the component is mounted. Dropping the component
/// (or calling [Scanner::unmount]) cancels the task.
#[derive(Debug)]
pub(crate) struct Scanner {
    settings: ScannerSettings,
    state: WaveState,
    task: RepeatingTask,
}

impl Scanner {
    pub(crate) fn mount(settings: ScannerSettings, now: Instant) -> Self {
        let task = RepeatingTask::start(settings.tick_interval, now);
        info!(
            rows = settings.grid.rows,
            columns = settings.grid.columns,
            band_width = settings.band_width,
            colors = settings.palette.len(),
            interval_ms = task.interval().as_millis() as u64,
            "mounting scanner"
        );
        Self { settings, state: WaveState::default(), task }
    }

    #[cfg(test)]
    pub(crate) fn settings(&self) -> &ScannerSettings {
        &self.settings
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &WaveState {
        &self.state
    }

    /// How long until the next tick is due, or `None` once unmounted.
    pub(crate) fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.task.time_until_due(now)
    }

    /// Advance the wave if a tick is due.
    pub(crate) fn poll(&mut self, now: Instant) -> PollableState {
        let poll_state = self.task.poll(now);
        if poll_state != PollableState::Modified {
            return poll_state;
        }
        let ScannerSettings { grid, palette, .. } = &self.settings;
        if self.state.tick(grid, palette) == TickOutcome::Reversed {
            debug!(
                position = self.state.position,
                direction = ?self.state.direction,
                color = %palette.color(self.state.palette_index),
                "wave reversed"
            );
        }
        PollableState::Modified
    }

    /// The color function for the current wave state.
    pub(crate) fn wave(&self) -> ScannerWave<'_> {
        ScannerWave {
            grid: &self.settings.grid,
            band_width: self.settings.band_width,
            palette: &self.settings.palette,
            background: self.settings.background,
            state: &self.state,
        }
    }

    /// The color of the glow around the grid, which follows the active palette color.
    pub(crate) fn glow(&self) -> Rgb {
        self.settings.palette.color(self.state.palette_index).blend_over(Rgb::BLACK, GLOW_OPACITY)
    }

    /// Stop the animation and release its timer.
    pub(crate) fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.task.is_cancelled() {
            self.task.cancel();
            debug!("scanner timer released");
        }
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::wave::Direction;
    use super::*;

    fn settings(columns: usize) -> ScannerSettings {
        ScannerSettings { grid: Grid { rows: 15, columns }, ..Default::default() }
    }

    #[test]
    fn mount_starts_at_left_edge() {
        let scanner = Scanner::mount(settings(20), Instant::now());
        assert_eq!(scanner.state(), &WaveState::default());
    }

    #[test]
    fn poll_ticks_once_per_interval() {
        let start = Instant::now();
        let mut scanner = Scanner::mount(settings(20), start);
        let interval = scanner.settings().tick_interval;

        assert_eq!(scanner.poll(start), PollableState::Unmodified);
        assert_eq!(scanner.state().position, 0);

        assert_eq!(scanner.poll(start + interval), PollableState::Modified);
        assert_eq!(scanner.state().position, 1);
        assert_eq!(scanner.state().direction, Direction::Forward);
    }

    #[test]
    fn remount_resets_state() {
        let start = Instant::now();
        let mut scanner = Scanner::mount(settings(20), start);
        let interval = scanner.settings().tick_interval;
        for i in 1..=25 {
            scanner.poll(start + interval * i);
        }
        assert_ne!(scanner.state(), &WaveState::default());

        let settings = scanner.settings().clone();
        scanner.unmount();
        let scanner = Scanner::mount(settings, start);
        assert_eq!(scanner.state(), &WaveState::default());
    }

    #[test]
    fn unmounted_timer_never_fires() {
        let start = Instant::now();
        let mut scanner = Scanner::mount(settings(20), start);
        scanner.release();
        assert_eq!(scanner.time_until_tick(start), None);
        assert_eq!(scanner.poll(start + Duration::from_secs(10)), PollableState::Done);
        assert_eq!(scanner.state().position, 0);
    }

    #[test]
    fn glow_follows_palette() {
        let start = Instant::now();
        let mut scanner = Scanner::mount(settings(2), start);
        let interval = scanner.settings().tick_interval;
        assert_eq!(scanner.glow(), Rgb::new(0, 77, 36));

        // with 2 columns the very first tick hits the right edge
        scanner.poll(start + interval);
        assert_eq!(scanner.state().palette_index, 1);
        assert_eq!(scanner.glow(), Rgb::new(0, 60, 77));
    }

    #[test]
    fn wave_uses_current_state() {
        let scanner = Scanner::mount(settings(20), Instant::now());
        let color = scanner.wave().render_cell(&CellContext { row: 0, col: 0 });
        assert_eq!(color, Rgb::new(0, 255, 120));
    }
}
