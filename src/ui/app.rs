//! Main TUI application state and logic
//!
//! The program has already run to completion (or to its fault) when the
//! viewer opens; stepping moves through the recorded snapshots.

use crate::interpreter::engine::Interpreter;
use crate::snapshot::Snapshot;
use crate::ui::panes::{self, SourceScrollState, StackScrollState, StatusRenderData};
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
    Source,
    Output,
    Stack,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> output -> stack)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// A finished interpreter holding the recorded history
    pub interpreter: Interpreter,

    /// Index of the snapshot being shown
    pub position: usize,

    pub focused_pane: FocusedPane,

    pub source_scroll: SourceScrollState,
    pub stack_scroll: StackScrollState,
    pub output_scroll: usize,

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
    pub fn new(interpreter: Interpreter) -> Self {
        let status_message = match interpreter.snapshots().snapshots().last() {
            Some(Snapshot {
                fault: Some(fault), ..
            }) => format!("Program faulted: {}", fault),
            _ => String::from("Ready!"),
        };
        App {
            interpreter,
            position: 0,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            stack_scroll: StackScrollState::default(),
            output_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
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
                if self.step_forward() {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps running
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

    fn total_steps(&self) -> usize {
        self.interpreter.snapshots().len()
    }

    fn current_snapshot(&self) -> Option<&Snapshot> {
        self.interpreter.snapshots().get(self.position)
    }

    /// Render the UI
    pub(crate) fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let snapshots = self.interpreter.snapshots();
        let snapshot = snapshots.get(self.position);
        let current_line = snapshot.map_or(0, |s| s.location.line);
        let is_error = snapshot.is_some_and(|s| s.fault.is_some());
        let output_len = snapshot.map_or(0, |s| s.output_len);
        let lines = self.interpreter.output_log().lines();

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.interpreter.compiled().source,
            current_line,
            is_error,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_output_pane(
            frame,
            left_rows[1],
            &lines[..output_len.min(lines.len())],
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        panes::render_stack_pane(
            frame,
            columns[1],
            snapshot.map(|s| s.frames.as_slice()).unwrap_or_default(),
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                current_step: self.position,
                total_steps: snapshots.len(),
                truncated: snapshots.is_truncated(),
                is_error,
                is_playing: self.is_playing,
            },
        );
    }

    /// Handle keyboard events
    pub(crate) fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let stepped = (0..n).take_while(|_| self.step_forward()).count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.status_message = if self.step_backward() {
                    "Stepped backward".to_string()
                } else {
                    "Cannot step backward: at start".to_string()
                };
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.status_message = if self.step_forward() {
                    "Stepped forward".to_string()
                } else {
                    "Cannot step forward: at end".to_string()
                };
            }
            KeyCode::Up => match self.focused_pane {
                // Scrolling up moves the current line down visually
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Stack => {
                    self.stack_scroll.offset = self.stack_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Stack => {
                    self.stack_scroll.offset = self.stack_scroll.offset.saturating_add(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // 200ms debounce against key repeat
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    self.status_message = if self.is_playing {
                        "Playing...".to_string()
                    } else {
                        "Paused".to_string()
                    };
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.position = self.total_steps().saturating_sub(1);
                self.output_scroll = usize::MAX;
                self.status_message = match self.current_snapshot().and_then(|s| s.fault.clone())
                {
                    Some(fault) => format!("Jumped to end: {}", fault),
                    None => "Jumped to end".to_string(),
                };
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.position = 0;
                self.output_scroll = 0;
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    /// Step forward; false when already at the last snapshot
    fn step_forward(&mut self) -> bool {
        if self.position + 1 >= self.total_steps() {
            return false;
        }
        self.position += 1;
        self.output_scroll = usize::MAX;
        true
    }

    /// Step backward; false when already at the first snapshot
    fn step_backward(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        self.output_scroll = usize::MAX;
        true
    }
}
