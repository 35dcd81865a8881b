//! Terminal implementation of the drawing capability.
//!
//! Maps the game's virtual surface onto the terminal grid and translates
//! every drawing call into queued crossterm commands.  Drawing itself is
//! infallible from the simulation's point of view: I/O errors stick to
//! the surface and are reported when the frame is presented.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Print},
    terminal, QueueableCommand,
};

use crate::display::{Color, Surface, TextAlign, TextStyle};
use crate::entities::Rect;

/// A [`Surface`] drawing onto a terminal through any writer.
pub struct TerminalSurface<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    width: f32,
    height: f32,
    error: Option<io::Error>,
}

impl<W: Write> TerminalSurface<W> {
    /// Surface of `width`×`height` virtual units rendered onto a terminal
    /// grid of `cols`×`rows` cells.
    pub fn new(out: W, cols: u16, rows: u16, width: f32, height: f32) -> Self {
        TerminalSurface {
            out,
            cols: cols.max(1),
            rows: rows.max(1),
            width,
            height,
            error: None,
        }
    }

    /// Flush the queued frame.  Returns the first error any drawing call
    /// hit since the previous present.
    pub fn present(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn col(&self, x: f32) -> u16 {
        let col = (x / self.width * self.cols as f32).floor();
        (col.max(0.0) as u16).min(self.cols - 1)
    }

    fn row(&self, y: f32) -> u16 {
        let row = (y / self.height * self.rows as f32).floor();
        (row.max(0.0) as u16).min(self.rows - 1)
    }

    fn try_queue(&mut self, run: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.error.is_none() {
            if let Err(err) = run(&mut self.out) {
                self.error = Some(err);
            }
        }
    }
}

fn terminal_color(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn clear(&mut self) {
        self.try_queue(|out| {
            out.queue(terminal::Clear(terminal::ClearType::All))?;
            Ok(())
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let c0 = self.col(rect.left);
        let c1 = self.col(rect.right).max(c0);
        let r0 = self.row(rect.top);
        let r1 = self.row(rect.bottom).max(r0);
        let run = "█".repeat((c1 - c0 + 1) as usize);
        self.try_queue(|out| {
            out.queue(style::SetForegroundColor(terminal_color(color)))?;
            for row in r0..=r1 {
                out.queue(cursor::MoveTo(c0, row))?;
                out.queue(Print(&run))?;
            }
            Ok(())
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        let c0 = self.col(rect.left);
        let c1 = self.col(rect.right).max(c0);
        let r0 = self.row(rect.top);
        let r1 = self.row(rect.bottom).max(r0);
        if c1 - c0 < 1 || r1 - r0 < 1 {
            return;
        }
        let span = (c1 - c0 - 1) as usize;
        self.try_queue(|out| {
            out.queue(style::SetForegroundColor(terminal_color(color)))?;
            out.queue(cursor::MoveTo(c0, r0))?;
            out.queue(Print(format!("┌{}┐", "─".repeat(span))))?;
            out.queue(cursor::MoveTo(c0, r1))?;
            out.queue(Print(format!("└{}┘", "─".repeat(span))))?;
            for row in (r0 + 1)..r1 {
                out.queue(cursor::MoveTo(c0, row))?;
                out.queue(Print("│"))?;
                out.queue(cursor::MoveTo(c1, row))?;
                out.queue(Print("│"))?;
            }
            Ok(())
        });
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style_spec: &TextStyle) {
        let len = text.chars().count() as u16;
        let anchor = self.col(x);
        let col = match style_spec.align {
            TextAlign::Left => anchor,
            TextAlign::Center => anchor.saturating_sub(len / 2),
            TextAlign::Right => anchor.saturating_sub(len.saturating_sub(1)),
        };
        let row = self.row(y);
        let color = terminal_color(style_spec.color);
        self.try_queue(|out| {
            out.queue(style::SetForegroundColor(color))?;
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print(text))?;
            Ok(())
        });
    }
}
