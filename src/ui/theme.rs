//! Colors for the trace viewer, named by what they mark

use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    /// Plain source text and values
    pub text: Color,
    /// Comments, separators and hints
    pub muted: Color,
    /// Frame headers and the step counter
    pub accent: Color,
    /// Truncated-history badge and call sites
    pub warning: Color,
    /// Faulting line and fault messages
    pub fault: Color,
    /// Clean-exit badge
    pub ok: Color,
    pub keyword: Color,
    pub type_name: Color,
    /// Integer and bool literals, cell values
    pub literal: Color,
    /// Function names at definitions and calls
    pub call: Color,
    /// Background of the statement about to run
    pub step_bg: Color,
    pub border: Color,
    pub border_focused: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    text: Color::Rgb(220, 215, 200),
    muted: Color::Rgb(120, 118, 110),
    accent: Color::Rgb(131, 165, 152),
    warning: Color::Rgb(254, 128, 25),
    fault: Color::Rgb(251, 73, 52),
    ok: Color::Rgb(184, 187, 38),
    keyword: Color::Rgb(211, 134, 155),
    type_name: Color::Rgb(142, 192, 124),
    literal: Color::Rgb(250, 189, 47),
    call: Color::Rgb(131, 165, 152),
    step_bg: Color::Rgb(60, 56, 54),
    border: Color::Rgb(102, 92, 84),
    border_focused: Color::Rgb(250, 189, 47),
};

impl Theme {
    /// Border style of a pane, bold when it has focus
    pub fn pane_border(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.border)
        }
    }
}
