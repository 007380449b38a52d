//! Raw-mode terminal: key polling and the status screen.

use cart_teleop_core::{CommandFrame, Error, FrameLog, KeyCommand, KeyInput, KeySource, Result, StatusSink};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, disable_raw_mode, enable_raw_mode, ClearType},
};
use std::io::{self, stdout, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use std::time::Duration;

const INSTRUCTIONS: &str = "Move with WASD, Z for brake, X for hard stop and Y for centering the wheel.";
const EXIT_HINT: &str = "CTRL-C to exit";
const PORT_ROW: u16 = 3;
const THROTTLE_ROW: u16 = 7;
const BRAKE_ROW: u16 = 8;
const STEERING_ROW: u16 = 9;
const FRAME_ROW: u16 = 11;

/// Set while a `TerminalSession` holds raw mode.
static RAW_MODE: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK: Once = Once::new();

/// Holds the terminal in raw mode; restores it when dropped.
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        PANIC_HOOK.call_once(install_panic_hook);
        enable_raw_mode()?;
        RAW_MODE.store(true, Ordering::SeqCst);
        let session = Self { _private: () };
        execute!(stdout(), terminal::Clear(ClearType::All), cursor::Hide, cursor::MoveTo(0, 0))?;
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if !leave_raw_mode() {
            return;
        }
        if let Err(e) = restore() {
            log::error!("failed to restore terminal: {e}");
        }
    }
}

/// True exactly once per session, for whichever of drop or panic comes first.
fn leave_raw_mode() -> bool {
    RAW_MODE.swap(false, Ordering::SeqCst)
}

fn restore() -> io::Result<()> {
    execute!(stdout(), cursor::MoveTo(0, FRAME_ROW + 2), cursor::Show)?;
    disable_raw_mode()
}

/// Restores the terminal before the default hook prints the panic.
fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if leave_raw_mode() {
            let _ = restore();
        }
        default_hook(info);
    }));
}

/// Non-blocking key reader over crossterm events.
pub struct CrosstermKeys;

impl CrosstermKeys {
    fn map(key: KeyEvent) -> KeyInput {
        // crossterm also reports release and repeat events on Windows.
        if key.kind != KeyEventKind::Press {
            return KeyInput::Ignored;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyInput::Interrupt,
            KeyCode::Char(c) => KeyCommand::from_char(c).map_or(KeyInput::Ignored, KeyInput::Command),
            _ => KeyInput::Ignored,
        }
    }
}

impl KeySource for CrosstermKeys {
    fn poll_key(&mut self) -> Result<Option<KeyInput>> {
        if !event::poll(Duration::ZERO).map_err(Error::Input)? {
            return Ok(None);
        }
        Ok(Some(match event::read().map_err(Error::Input)? {
            Event::Key(key) => Self::map(key),
            _ => KeyInput::Ignored,
        }))
    }
}

pub struct Screen<W: Write> {
    out: W,
    port: String,
}

impl Screen<io::Stdout> {
    pub fn stdout(port: impl Into<String>) -> Self {
        Self::new(stdout(), port)
    }
}

impl<W: Write> Screen<W> {
    pub fn new(out: W, port: impl Into<String>) -> Self {
        Self { out, port: port.into() }
    }

    fn line(&mut self, row: u16, text: &str) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(0, row),
            Print(text),
            terminal::Clear(ClearType::UntilNewLine)
        )
    }

    fn draw_instructions(&mut self) -> io::Result<()> {
        self.line(0, INSTRUCTIONS)?;
        self.line(1, EXIT_HINT)?;
        let port = format!("Using serial port: {}", self.port);
        self.line(PORT_ROW, &port)?;
        self.line(THROTTLE_ROW, "Throttle val:")?;
        self.line(BRAKE_ROW, "Brake val:")?;
        self.line(STEERING_ROW, "Steering val:")?;
        self.out.flush()
    }

    fn draw(&mut self, frame: &CommandFrame, log: &FrameLog) -> io::Result<()> {
        self.line(THROTTLE_ROW, &format!("Throttle val: {}", frame.throttle))?;
        self.line(BRAKE_ROW, &format!("Brake val:    {}", frame.brake))?;
        self.line(STEERING_ROW, &format!("Steering val: {}", frame.steering))?;
        if let Some(hex) = log.last_hex() {
            self.line(FRAME_ROW, &format!("Last frame:   {hex} ({} sent)", log.total()))?;
        }
        self.out.flush()
    }
}

impl<W: Write> StatusSink for Screen<W> {
    fn show_instructions(&mut self) -> Result<()> {
        self.draw_instructions().map_err(Error::Display)
    }

    fn show(&mut self, frame: &CommandFrame, log: &FrameLog) -> Result<()> {
        self.draw(frame, log).map_err(Error::Display)
    }
}
