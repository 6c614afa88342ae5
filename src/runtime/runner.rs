use crate::terminal::{Terminal, TerminalEvent, TerminalSize};
use crate::ui::renderer::RenderFrame;
use std::io;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue { render: bool },
    Exit,
}

/// A full-screen view driven by [`Runtime`].
pub trait Screen {
    fn render(&mut self, size: TerminalSize) -> RenderFrame;
    fn handle_event(&mut self, event: TerminalEvent) -> Flow;
}

pub struct Runtime<S: Screen> {
    screen: S,
    terminal: Terminal,
}

impl<S: Screen> Runtime<S> {
    pub fn new(screen: S, terminal: Terminal) -> Self {
        Self { screen, terminal }
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn into_screen(self) -> S {
        self.screen
    }

    pub fn run(&mut self) -> io::Result<()> {
        self.terminal.enter()?;

        let run_result = (|| -> io::Result<()> {
            self.render()?;
            loop {
                let event = self.terminal.poll_event(POLL_INTERVAL)?;
                if event == TerminalEvent::Tick {
                    continue;
                }
                match self.screen.handle_event(event) {
                    Flow::Exit => break,
                    Flow::Continue { render: true } => self.render()?,
                    Flow::Continue { render: false } => {}
                }
            }
            Ok(())
        })();

        let exit_result = self.terminal.exit();
        run_result.and(exit_result)
    }

    fn render(&mut self) -> io::Result<()> {
        let frame = self.screen.render(self.terminal.size());
        self.terminal.render_frame(&frame)
    }
}
