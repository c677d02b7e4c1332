use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use unicode_width::UnicodeWidthChar;

use crate::components::Rgb;
use crate::input::{map_key, InputEvent, InputSource};
use crate::render::{Canvas, Point, Rect};

/// Terminal columns per grid cell; keeps cells roughly square.
const CELL_W: usize = 2;
/// Marks the second half of a double-width glyph.
const WIDE_TAIL: char = '\0';

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Slot {
    ch: char,
    color: Rgb,
}

const BLANK: Slot = Slot { ch: ' ', color: Rgb::BLACK };

pub struct TerminalCanvas<W: Write> {
    out: W,
    cell_size: u32,
    width: usize,
    height: usize,
    frame: Vec<Slot>,
    last: Vec<Slot>,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
    viewport: Option<(u16, u16)>,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, rows: usize, cols: usize, cell_size: u32) -> Self {
        let width = cols * CELL_W;
        Self {
            out,
            cell_size: cell_size.max(1),
            width,
            height: rows,
            frame: vec![BLANK; width * rows],
            last: vec![BLANK; width * rows],
            needs_full: true,
            origin_x: 0,
            origin_y: 0,
            viewport: None,
        }
    }

    pub fn with_viewport(mut self, cols: u16, rows: u16) -> Self {
        self.viewport = Some((cols, rows));
        self
    }

    pub fn glyph_at(&self, col: usize, row: usize) -> Option<char> {
        (col < self.width && row < self.height).then(|| self.frame[row * self.width + col].ch)
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn slot_col(&self, px: u32) -> usize {
        px as usize * CELL_W / self.cell_size as usize
    }

    fn cell_of(&self, px: u32) -> usize {
        (px / self.cell_size) as usize
    }

    fn put(&mut self, col: usize, row: usize, slot: Slot) {
        if col < self.width && row < self.height {
            self.frame[row * self.width + col] = slot;
        }
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        match self.viewport {
            Some(size) => Ok(size),
            None => terminal::size(),
        }
    }

    fn draw_slot(&mut self, col: usize, row: usize, slot: Slot) -> io::Result<()> {
        let x_pos = self.origin_x + col as u16;
        let y_pos = self.origin_y + row as u16;
        self.out.queue(MoveTo(x_pos, y_pos))?;
        self.out.queue(SetForegroundColor(term_color(slot.color)))?;
        self.out.queue(Print(slot.ch))?;
        self.out.queue(ResetColor)?;
        Ok(())
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn clear(&mut self, color: Rgb) -> io::Result<()> {
        self.frame.fill(Slot { ch: ' ', color });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) -> io::Result<()> {
        if rect.w == 0 || rect.h == 0 {
            return Ok(());
        }
        let (x0, x1) = (self.cell_of(rect.x), self.cell_of(rect.x + rect.w - 1));
        let (y0, y1) = (self.cell_of(rect.y), self.cell_of(rect.y + rect.h - 1));
        for row in y0..=y1 {
            for cell in x0..=x1 {
                for half in 0..CELL_W {
                    self.put(cell * CELL_W + half, row, Slot { ch: '█', color });
                }
            }
        }
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb) -> io::Result<()> {
        let cell = self.cell_of(center.x);
        let row = self.cell_of(center.y);
        // Large discs are actors, small ones pellets.
        let ch = if radius * 4 >= self.cell_size { '●' } else { '·' };
        self.put(cell * CELL_W, row, Slot { ch, color });
        for half in 1..CELL_W {
            self.put(cell * CELL_W + half, row, Slot { ch: ' ', color });
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, at: Point, color: Rgb) -> io::Result<()> {
        let row = self.cell_of(at.y);
        let mut col = self.slot_col(at.x);
        for ch in text.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if w == 0 {
                continue;
            }
            if col + w > self.width {
                break;
            }
            self.put(col, row, Slot { ch, color });
            if w > 1 {
                self.put(col + 1, row, Slot { ch: WIDE_TAIL, color });
            }
            col += w;
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let needed_w = self.width as u16;
        let needed_h = self.height as u16;
        let (term_w, term_h) = self.size()?;

        if term_w < needed_w || term_h < needed_h {
            self.out.queue(MoveTo(0, 0))?;
            self.out.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            self.out.queue(Print(msg))?;
            self.out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2;
        if self.needs_full || origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
            self.out.queue(Clear(ClearType::All))?;
        }

        for row in 0..self.height {
            for col in 0..self.width {
                let idx = row * self.width + col;
                let slot = self.frame[idx];
                if slot.ch == WIDE_TAIL {
                    self.last[idx] = slot;
                    continue;
                }
                if self.needs_full || slot != self.last[idx] {
                    self.last[idx] = slot;
                    self.draw_slot(col, row, slot)?;
                }
            }
        }
        self.needs_full = false;

        self.out.flush()
    }
}

fn term_color(color: Rgb) -> Color {
    match color {
        Rgb::BLACK => Color::Black,
        Rgb::WHITE => Color::White,
        Rgb::YELLOW => Color::Yellow,
        Rgb::RED => Color::Red,
        Rgb::BLUE => Color::Blue,
        Rgb(r, g, b) => Color::Rgb { r, g, b },
    }
}

pub fn enter_screen<W: Write>(
    out: &mut W,
    enable_raw: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    enable_raw()?;
    out.execute(EnterAlternateScreen)?;
    out.execute(Hide)?;
    Ok(())
}

/// Runs every restore step even when an earlier one fails, then reports
/// the first failure.
pub fn leave_screen<W: Write>(
    out: &mut W,
    disable_raw: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let shown = out.execute(Show).map(drop);
    let left = out.execute(LeaveAlternateScreen).map(drop);
    let raw = disable_raw();
    shown.and(left).and(raw)
}

#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn drain(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                events.extend(map_key(key));
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> TerminalCanvas<Vec<u8>> {
        TerminalCanvas::new(Vec::new(), 4, 5, 25).with_viewport(80, 24)
    }

    #[test]
    fn primitives_land_on_their_cells() {
        let mut canvas = canvas();
        canvas.clear(Rgb::BLACK).unwrap();
        canvas.fill_rect(Rect { x: 25, y: 0, w: 25, h: 25 }, Rgb::BLUE).unwrap();
        canvas.fill_circle(Point { x: 62, y: 37 }, 10, Rgb::YELLOW).unwrap();
        canvas.fill_circle(Point { x: 87, y: 62 }, 5, Rgb::WHITE).unwrap();

        assert_eq!(canvas.glyph_at(2, 0), Some('█'));
        assert_eq!(canvas.glyph_at(3, 0), Some('█'));
        assert_eq!(canvas.glyph_at(1, 0), Some(' '));
        assert_eq!(canvas.glyph_at(4, 1), Some('●'));
        assert_eq!(canvas.glyph_at(6, 2), Some('·'));
        assert_eq!(canvas.glyph_at(10, 0), None);
    }

    #[test]
    fn text_is_clipped_to_the_frame() {
        let mut canvas = canvas();
        canvas.clear(Rgb::BLACK).unwrap();
        canvas.draw_text("Score: 12345", Point { x: 10, y: 10 }, Rgb::WHITE).unwrap();
        let row: String = (0..10).filter_map(|c| canvas.glyph_at(c, 0)).collect();
        assert_eq!(row, "Score: 123");
    }

    #[test]
    fn present_only_rewrites_changed_slots() {
        let mut canvas = canvas();
        canvas.clear(Rgb::BLACK).unwrap();
        canvas.fill_rect(Rect { x: 0, y: 0, w: 25, h: 25 }, Rgb::BLUE).unwrap();
        canvas.present().unwrap();
        let first = canvas.writer().len();
        assert!(first > 0);
        assert!(String::from_utf8_lossy(canvas.writer()).contains('█'));

        canvas.clear(Rgb::BLACK).unwrap();
        canvas.fill_rect(Rect { x: 0, y: 0, w: 25, h: 25 }, Rgb::BLUE).unwrap();
        canvas.present().unwrap();
        assert_eq!(canvas.writer().len(), first);

        canvas.fill_circle(Point { x: 37, y: 37 }, 10, Rgb::YELLOW).unwrap();
        canvas.present().unwrap();
        assert!(canvas.writer().len() > first);
    }

    #[test]
    fn small_terminal_gets_a_notice() {
        let mut canvas = TerminalCanvas::new(Vec::new(), 20, 20, 25).with_viewport(30, 10);
        canvas.clear(Rgb::BLACK).unwrap();
        canvas.present().unwrap();
        let out = String::from_utf8_lossy(canvas.writer()).into_owned();
        assert!(out.contains("Terminal too small. Need at least 40x20"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn leaving_the_screen_restores_raw_mode_after_write_errors() {
        let mut disabled = false;
        let result = leave_screen(&mut BrokenPipe, || {
            disabled = true;
            Ok(())
        });
        assert!(disabled);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::BrokenPipe);

        let result = leave_screen(&mut Vec::new(), || Err(io::Error::new(io::ErrorKind::Other, "tty")));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::Other);
    }

    #[test]
    fn entering_the_screen_stops_at_the_first_failure() {
        let mut out = Vec::new();
        enter_screen(&mut out, || Ok(())).unwrap();
        assert!(!out.is_empty());

        let mut out = Vec::new();
        let result = enter_screen(&mut out, || Err(io::Error::new(io::ErrorKind::Other, "no tty")));
        assert!(result.is_err());
        assert!(out.is_empty());

        assert!(enter_screen(&mut BrokenPipe, || Ok(())).is_err());
    }

    #[test]
    fn palette_maps_to_named_colors() {
        assert_eq!(term_color(Rgb::RED), Color::Red);
        assert_eq!(term_color(Rgb(1, 2, 3)), Color::Rgb { r: 1, g: 2, b: 3 });
    }
}
