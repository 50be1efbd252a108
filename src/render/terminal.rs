use super::{
    frame::FrameBuffer,
    layout::{CELL_WIDTH, Layout},
};
use crate::scanner::{Grid, Rgb, Scanner};
use crossterm::{
    QueueableCommand, cursor, execute,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate},
};
use std::io::{self, Write};
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

/// The color of the area around the grid.
const PAGE_COLOR: Rgb = Rgb::BACKGROUND;
const TITLE_COLOR: Rgb = Rgb::new(255, 255, 255);
const SUBTITLE_COLOR: Rgb = Rgb::new(156, 163, 175);
const WRAPPER_COLOR: Rgb = Rgb::BLACK;

/// A terminal in raw mode showing the alternate screen.
///
/// The terminal is restored when this is dropped, no matter how the program exits.
pub(crate) struct TerminalSession<W: Write> {
    writer: W,
}

impl<W: Write> TerminalSession<W> {
    pub(crate) fn start(mut writer: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let setup = execute!(writer, terminal::EnterAlternateScreen, terminal::DisableLineWrap, cursor::Hide);
        if let Err(e) = setup {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        debug!("terminal session started");
        Ok(Self { writer })
    }

    pub(crate) fn writer(&mut self) -> &mut W {
        &mut self.writer
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        let restore = execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::EnableLineWrap,
            terminal::LeaveAlternateScreen
        );
        let raw_mode = terminal::disable_raw_mode();
        if let Err(e) = restore.and(raw_mode) {
            warn!("failed to restore terminal: {e}");
        } else {
            debug!("terminal restored");
        }
    }
}

/// Draws the scanner: a header, the glowing wrapper and the grid cells.
///
/// Only cells whose color changed since the last draw are written to the terminal.
#[derive(Debug)]
pub(crate) struct ScannerView {
    title: String,
    subtitle: String,
    grid: Grid,
    frame: FrameBuffer,
    screen: (u16, u16),
    layout: Option<Layout>,
    glow: Option<Rgb>,
    needs_full_redraw: bool,
}

impl ScannerView {
    pub(crate) fn new(title: String, subtitle: String, grid: Grid, screen: (u16, u16)) -> Self {
        Self {
            title,
            subtitle,
            grid,
            frame: FrameBuffer::new(grid),
            screen,
            layout: None,
            glow: None,
            needs_full_redraw: true,
        }
    }

    /// Handle a terminal resize. The next draw repaints everything.
    pub(crate) fn resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "terminal resized");
        self.screen = (width, height);
        self.needs_full_redraw = true;
    }

    /// Draw the current state of the scanner, returning how many cells were painted.
    pub(crate) fn draw<W: Write>(&mut self, writer: &mut W, scanner: &Scanner) -> io::Result<usize> {
        let full_redraw = self.needs_full_redraw;
        if full_redraw {
            self.needs_full_redraw = false;
            self.layout = Layout::compute(&self.grid, self.screen.0, self.screen.1);
            self.frame.invalidate();
            self.glow = None;
        }
        let Some(layout) = self.layout else {
            if full_redraw {
                self.draw_too_small(writer)?;
                writer.flush()?;
            }
            return Ok(0);
        };

        let glow = scanner.glow();
        let glow_changed = self.glow != Some(glow);
        let updates = self.frame.update(&scanner.wave());
        if !full_redraw && !glow_changed && updates.is_empty() {
            return Ok(0);
        }

        writer.queue(BeginSynchronizedUpdate)?;
        if full_redraw {
            self.draw_background(writer, &layout)?;
        }
        if glow_changed {
            self.glow = Some(glow);
            Self::draw_border(writer, &layout, glow)?;
        }
        for update in &updates {
            let (x, y) = layout.cell_position(update.row, update.col);
            writer.queue(cursor::MoveTo(x, y))?;
            writer.queue(SetBackgroundColor(update.color.into()))?;
            writer.queue(Print(" ".repeat(CELL_WIDTH as usize)))?;
        }
        writer.queue(ResetColor)?;
        writer.queue(EndSynchronizedUpdate)?;
        writer.flush()?;
        Ok(updates.len())
    }

    fn draw_background<W: Write>(&self, writer: &mut W, layout: &Layout) -> io::Result<()> {
        writer.queue(SetBackgroundColor(PAGE_COLOR.into()))?;
        writer.queue(Clear(ClearType::All))?;

        self.draw_centered(writer, layout, layout.title_row, &self.title, TITLE_COLOR, true)?;
        self.draw_centered(writer, layout, layout.title_row + 1, &self.subtitle, SUBTITLE_COLOR, false)?;

        let (x, y) = layout.wrapper_origin;
        let inner = " ".repeat(layout.wrapper_width.saturating_sub(2) as usize);
        writer.queue(SetBackgroundColor(WRAPPER_COLOR.into()))?;
        for row in 1..layout.wrapper_height - 1 {
            writer.queue(cursor::MoveTo(x + 1, y + row))?;
            writer.queue(Print(&inner))?;
        }
        Ok(())
    }

    fn draw_centered<W: Write>(
        &self,
        writer: &mut W,
        layout: &Layout,
        row: u16,
        text: &str,
        color: Rgb,
        bold: bool,
    ) -> io::Result<()> {
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        writer.queue(cursor::MoveTo(layout.centered(width), row))?;
        writer.queue(SetForegroundColor(color.into()))?;
        if bold {
            writer.queue(SetAttribute(Attribute::Bold))?;
        }
        writer.queue(Print(text))?;
        writer.queue(SetAttribute(Attribute::Reset))?;
        // resetting attributes also resets colors
        writer.queue(SetBackgroundColor(PAGE_COLOR.into()))?;
        Ok(())
    }

    fn draw_border<W: Write>(writer: &mut W, layout: &Layout, glow: Rgb) -> io::Result<()> {
        let (x, y) = layout.wrapper_origin;
        let horizontal = "─".repeat(layout.wrapper_width.saturating_sub(2) as usize);
        let bottom = y + layout.wrapper_height - 1;
        let right = x + layout.wrapper_width - 1;

        writer.queue(SetBackgroundColor(PAGE_COLOR.into()))?;
        writer.queue(SetForegroundColor(glow.into()))?;
        writer.queue(cursor::MoveTo(x, y))?;
        writer.queue(Print(format!("╭{horizontal}╮")))?;
        for row in y + 1..bottom {
            writer.queue(cursor::MoveTo(x, row))?;
            writer.queue(Print("│"))?;
            writer.queue(cursor::MoveTo(right, row))?;
            writer.queue(Print("│"))?;
        }
        writer.queue(cursor::MoveTo(x, bottom))?;
        writer.queue(Print(format!("╰{horizontal}╯")))?;
        Ok(())
    }

    fn draw_too_small<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let message = match Layout::required_size(&self.grid) {
            Some((width, height)) => format!("terminal too small: need at least {width}x{height}"),
            None => "grid is too large to fit in a terminal".to_string(),
        };
        warn!(screen = ?self.screen, "{message}");

        let (width, height) = self.screen;
        let text_width = u16::try_from(message.width()).unwrap_or(u16::MAX);
        writer.queue(SetBackgroundColor(PAGE_COLOR.into()))?;
        writer.queue(Clear(ClearType::All))?;
        writer.queue(cursor::MoveTo(width.saturating_sub(text_width) / 2, height / 2))?;
        writer.queue(SetForegroundColor(SUBTITLE_COLOR.into()))?;
        writer.queue(Print(message))?;
        writer.queue(ResetColor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ScannerSettings;
    use std::time::Instant;

    fn view(screen: (u16, u16)) -> ScannerView {
        ScannerView::new("Scanner Wave".into(), "subtitle".into(), ScannerSettings::default().grid, screen)
    }

    #[test]
    fn first_draw_paints_every_cell() {
        let scanner = Scanner::mount(ScannerSettings::default(), Instant::now());
        let mut view = view((100, 40));
        let mut output = Vec::new();
        let painted = view.draw(&mut output, &scanner).expect("draw failed");
        assert_eq!(painted, 300);

        let output = String::from_utf8(output).expect("not utf8");
        assert!(output.contains("Scanner Wave"));
        assert!(output.contains("subtitle"));
        assert!(output.contains('╭'));
    }

    #[test]
    fn unchanged_state_writes_nothing() {
        let scanner = Scanner::mount(ScannerSettings::default(), Instant::now());
        let mut view = view((100, 40));
        view.draw(&mut Vec::new(), &scanner).expect("draw failed");

        let mut output = Vec::new();
        let painted = view.draw(&mut output, &scanner).expect("draw failed");
        assert_eq!(painted, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn tick_repaints_only_changed_cells() {
        let start = Instant::now();
        let mut scanner = Scanner::mount(ScannerSettings::default(), start);
        let mut view = view((100, 40));
        view.draw(&mut Vec::new(), &scanner).expect("draw failed");

        scanner.poll(start + scanner.settings().tick_interval);
        let painted = view.draw(&mut Vec::new(), &scanner).expect("draw failed");
        assert!(painted > 0);
        assert!(painted < 300);
    }

    #[test]
    fn resize_repaints_everything() {
        let scanner = Scanner::mount(ScannerSettings::default(), Instant::now());
        let mut view = view((100, 40));
        view.draw(&mut Vec::new(), &scanner).expect("draw failed");

        view.resize(120, 50);
        let painted = view.draw(&mut Vec::new(), &scanner).expect("draw failed");
        assert_eq!(painted, 300);
    }

    #[test]
    fn small_terminal_shows_notice() {
        let scanner = Scanner::mount(ScannerSettings::default(), Instant::now());
        let mut view = view((40, 10));
        let mut output = Vec::new();
        let painted = view.draw(&mut output, &scanner).expect("draw failed");
        assert_eq!(painted, 0);
        let output = String::from_utf8(output).expect("not utf8");
        assert!(output.contains("need at least 63x20"));

        // the notice is only drawn once
        let mut output = Vec::new();
        view.draw(&mut output, &scanner).expect("draw failed");
        assert!(output.is_empty());
    }
}
