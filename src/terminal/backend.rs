use crate::ui::renderer::RenderFrame;
use crate::ui::span::SpanLine;
use crate::ui::style::Color;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent,
    KeyCode as CrosstermKeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind,
    KeyModifiers as CrosstermKeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::style::{
    Attribute, Color as CrosstermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
    EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Unknown,
    Char(char),
    Enter,
    Tab,
    BackTab,
    Esc,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyModifiers(u8);

impl KeyModifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CONTROL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    /// Printable character typed without Ctrl/Alt.
    pub fn printable(&self) -> Option<char> {
        if self.modifiers.contains(KeyModifiers::CONTROL)
            || self.modifiers.contains(KeyModifiers::ALT)
        {
            return None;
        }
        match self.code {
            KeyCode::Char(ch) if !ch.is_control() => Some(ch),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Primary button pressed.
    Press,
    /// Pointer moved (hover), no button held.
    Move,
}

/// Pointer event. Coordinates are absolute when produced by the terminal and
/// widget-local once the host has routed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub row: u16,
    pub col: u16,
}

impl PointerEvent {
    pub fn press(row: u16, col: u16) -> Self {
        Self {
            kind: PointerKind::Press,
            row,
            col,
        }
    }

    pub fn hover(row: u16, col: u16) -> Self {
        Self {
            kind: PointerKind::Move,
            row,
            col,
        }
    }

    pub fn is_press(&self) -> bool {
        self.kind == PointerKind::Press
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
    Resize(TerminalSize),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalSize {
    pub width: u16,
    pub height: u16,
}

pub struct Terminal {
    stdout: Stdout,
    size: TerminalSize,
    last_frame: Vec<SpanLine>,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout: io::stdout(),
            size: TerminalSize { width, height },
            last_frame: Vec::new(),
        })
    }

    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            DisableLineWrap,
            Hide
        )?;
        self.refresh_size()
    }

    pub fn exit(&mut self) -> io::Result<()> {
        execute!(
            self.stdout,
            Show,
            EnableLineWrap,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn size(&self) -> TerminalSize {
        self.size
    }

    pub fn refresh_size(&mut self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        self.size = TerminalSize { width, height };
        Ok(())
    }

    pub fn poll_event(&mut self, timeout: Duration) -> io::Result<TerminalEvent> {
        if !event::poll(timeout)? {
            return Ok(TerminalEvent::Tick);
        }
        match event::read()? {
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                Ok(TerminalEvent::Key(map_key_event(key)))
            }
            CrosstermEvent::Resize(width, height) => {
                self.size = TerminalSize { width, height };
                self.last_frame.clear();
                Ok(TerminalEvent::Resize(self.size))
            }
            CrosstermEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => Ok(TerminalEvent::Pointer(
                    PointerEvent::press(mouse.row, mouse.column),
                )),
                MouseEventKind::Moved => Ok(TerminalEvent::Pointer(PointerEvent::hover(
                    mouse.row,
                    mouse.column,
                ))),
                _ => Ok(TerminalEvent::Tick),
            },
            _ => Ok(TerminalEvent::Tick),
        }
    }

    pub fn render_frame(&mut self, frame: &RenderFrame) -> io::Result<()> {
        if frame.lines == self.last_frame {
            return Ok(());
        }
        let width = self.size.width as usize;
        let height = self.size.height as usize;

        queue!(self.stdout, BeginSynchronizedUpdate, MoveTo(0, 0))?;
        queue!(self.stdout, Clear(ClearType::All))?;
        for (row, line) in frame.lines.iter().take(height).enumerate() {
            queue!(self.stdout, MoveTo(0, row as u16))?;
            self.draw_line(line, width)?;
        }
        queue!(self.stdout, EndSynchronizedUpdate)?;
        self.stdout.flush()?;

        self.last_frame = frame.lines.clone();
        Ok(())
    }

    fn draw_line(&mut self, line: &SpanLine, width: usize) -> io::Result<()> {
        let mut used = 0usize;
        for span in line {
            if used >= width {
                break;
            }
            let (text, span_width) = fit_to_width(&span.text, width - used);
            used += span_width;

            if let Some(color) = span.style.color {
                queue!(self.stdout, SetForegroundColor(map_color(color)))?;
            }
            if let Some(background) = span.style.background {
                queue!(self.stdout, SetBackgroundColor(map_color(background)))?;
            }
            if span.style.bold {
                queue!(self.stdout, SetAttribute(Attribute::Bold))?;
            }
            if span.style.dim {
                queue!(self.stdout, SetAttribute(Attribute::Dim))?;
            }
            queue!(self.stdout, Print(text))?;
            queue!(self.stdout, SetAttribute(Attribute::Reset), ResetColor)?;
        }
        Ok(())
    }
}

fn fit_to_width(text: &str, max_width: usize) -> (&str, usize) {
    let mut width = 0usize;
    for (index, ch) in text.char_indices() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > max_width {
            return (&text[..index], width);
        }
        width += ch_width;
    }
    (text, width)
}

fn map_key_event(key: CrosstermKeyEvent) -> KeyEvent {
    let code = match key.code {
        CrosstermKeyCode::Char(c) => KeyCode::Char(c),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Tab => KeyCode::Tab,
        CrosstermKeyCode::BackTab => KeyCode::BackTab,
        CrosstermKeyCode::Esc => KeyCode::Esc,
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::Delete => KeyCode::Delete,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        CrosstermKeyCode::PageUp => KeyCode::PageUp,
        CrosstermKeyCode::PageDown => KeyCode::PageDown,
        _ => KeyCode::Unknown,
    };

    let mut modifiers = KeyModifiers::NONE;
    if key.modifiers.contains(CrosstermKeyModifiers::SHIFT) {
        modifiers = modifiers.union(KeyModifiers::SHIFT);
    }
    if key.modifiers.contains(CrosstermKeyModifiers::CONTROL) {
        modifiers = modifiers.union(KeyModifiers::CONTROL);
    }
    if key.modifiers.contains(CrosstermKeyModifiers::ALT) {
        modifiers = modifiers.union(KeyModifiers::ALT);
    }

    KeyEvent { code, modifiers }
}

fn map_color(color: Color) -> CrosstermColor {
    match color {
        Color::Reset => CrosstermColor::Reset,
        Color::Black => CrosstermColor::Black,
        Color::Red => CrosstermColor::Red,
        Color::Green => CrosstermColor::Green,
        Color::Yellow => CrosstermColor::Yellow,
        Color::Blue => CrosstermColor::Blue,
        Color::Magenta => CrosstermColor::Magenta,
        Color::Cyan => CrosstermColor::Cyan,
        Color::White => CrosstermColor::White,
        Color::DarkGrey => CrosstermColor::DarkGrey,
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyCode, KeyEvent, KeyModifiers, fit_to_width};

    #[test]
    fn fit_to_width_cuts_on_char_boundary() {
        assert_eq!(fit_to_width("‹ March ›", 3), ("‹ M", 3));
        assert_eq!(fit_to_width("abc", 10), ("abc", 3));
    }

    #[test]
    fn printable_ignores_control_chords() {
        assert_eq!(KeyEvent::key(KeyCode::Char('c')).printable(), Some('c'));
        assert_eq!(KeyEvent::ctrl(KeyCode::Char('c')).printable(), None);
        assert_eq!(
            KeyEvent::new(KeyCode::Char('C'), KeyModifiers::SHIFT).printable(),
            Some('C')
        );
        assert_eq!(KeyEvent::key(KeyCode::Enter).printable(), None);
    }
}
