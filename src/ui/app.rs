//! Main TUI application state and logic

use crate::interpreter::engine::Status;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::history::History;
use crate::ui::panes::{
    render_memory_pane, render_source_pane, render_status_bar, render_terminal_pane,
    MemoryRenderData, MemoryScrollState, SourceRenderData, SourceScrollState, StatusRenderData,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Program,
    Output,
    Memory,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: program -> output -> memory)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Memory,
            FocusedPane::Memory => FocusedPane::Program,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Memory,
            FocusedPane::Output => FocusedPane::Program,
            FocusedPane::Memory => FocusedPane::Output,
        }
    }
}

/// The main application state
pub struct App {
    /// Recorded run being browsed
    pub history: History,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub source_scroll: SourceScrollState,
    pub memory_scroll: MemoryScrollState,
    pub terminal_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app browsing the given history
    pub fn new(history: History) -> Self {
        App {
            history,
            focused_pane: FocusedPane::Program,
            source_scroll: SourceScrollState::default(),
            memory_scroll: MemoryScrollState::default(),
            terminal_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                if self.history.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                    self.terminal_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Program (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let machine = self.history.machine();
        let status = machine.status();
        let faulted = matches!(status, Status::Faulted | Status::OutOfRange);
        let fault = if faulted { self.history.fault() } else { None };

        render_source_pane(
            frame,
            left_rows[0],
            SourceRenderData {
                program: machine.program(),
                current: machine.ip(),
                is_error: faulted,
            },
            self.focused_pane == FocusedPane::Program,
            &mut self.source_scroll,
        );

        render_terminal_pane(
            frame,
            left_rows[1],
            self.history.output(),
            self.focused_pane == FocusedPane::Output,
            &mut self.terminal_scroll,
        );

        render_memory_pane(
            frame,
            columns[1],
            MemoryRenderData {
                memory: machine.memory(),
                last_written: machine.state().last_written,
                error_address: fault.and_then(RuntimeError::address),
            },
            self.focused_pane == FocusedPane::Memory,
            &mut self.memory_scroll,
        );

        let fault_text = fault.map(|e| e.to_string());
        render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                current_step: self.history.history_position(),
                total_steps: self.history.total_snapshots(),
                counter: machine.counter(),
                status,
                fault: fault_text.as_deref(),
                is_playing: self.is_playing,
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c as usize - '0' as usize;
                let stepped = (0..n)
                    .take_while(|_| self.history.step_forward().is_ok())
                    .count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.terminal_scroll = usize::MAX;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                let result = self.history.step_backward();
                self.report("Stepped backward", result);
            }
            KeyCode::Right => {
                self.is_playing = false;
                let result = self.history.step_forward();
                self.report("Stepped forward", result);
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Program => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Memory => {
                    self.memory_scroll.offset = self.memory_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Output => {
                    self.terminal_scroll = self.terminal_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Program => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Memory => {
                    self.memory_scroll.offset = self.memory_scroll.offset.saturating_add(1);
                }
                FocusedPane::Output => {
                    self.terminal_scroll = self.terminal_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // 200ms debounce against key repeat
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                let result = self.history.jump_to_end();
                self.report("Jumped to end", result);
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                let result = self.history.rewind_to_start();
                self.report("Jumped to start", result);
            }
            _ => {}
        }
    }

    fn report(&mut self, done: &str, result: Result<(), RuntimeError>) {
        match result {
            Ok(()) => {
                self.status_message = done.to_string();
                // Auto-scroll terminal to bottom
                self.terminal_scroll = usize::MAX;
            }
            Err(RuntimeError::HistoryOperationFailed { message }) => {
                self.status_message = message;
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }
}
