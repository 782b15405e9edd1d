//! Stack pane rendering: globals and call frames with their variables
//!
//! Each frame is a header (`▸ Frame N │ name()` plus the call site) followed
//! by one row per live variable. Arrays show all their cells inline.

use crate::snapshot::{FrameSnapshot, VarSnapshot};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Scroll state for the stack pane
#[derive(Debug, Default)]
pub struct StackScrollState {
    pub offset: usize,
    pub prev_item_count: usize,
}

fn frame_header(depth: usize, frame: &FrameSnapshot) -> Line<'_> {
    let mut spans = vec![Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.warning))];
    if frame.function.starts_with('<') {
        spans.push(Span::styled(
            "Globals",
            Style::default()
                .fg(DEFAULT_THEME.accent)
                .add_modifier(Modifier::BOLD),
        ));
        return Line::from(spans);
    }

    spans.push(Span::styled(
        format!("Frame {} ", depth),
        Style::default().fg(DEFAULT_THEME.muted),
    ));
    spans.push(Span::styled("│ ", Style::default().fg(DEFAULT_THEME.muted)));
    spans.push(Span::styled(
        format!("{}()", frame.function),
        Style::default()
            .fg(DEFAULT_THEME.call)
            .add_modifier(Modifier::BOLD),
    ));
    if let Some(call_site) = frame.call_site {
        spans.push(Span::styled(
            format!("  ↪ called at {}", call_site),
            Style::default().fg(DEFAULT_THEME.muted),
        ));
    }
    Line::from(spans)
}

/// `name: type = value`, or `name: type = [a, b, c]` for arrays
fn variable_line(var: &VarSnapshot) -> Line<'_> {
    let value = match var.cells.as_slice() {
        [single] if !var.ty.starts_with("array") => single.clone(),
        cells => format!("[{}]", cells.join(", ")),
    };
    Line::from(vec![
        Span::raw("    "),
        Span::styled(var.name.as_str(), Style::default().fg(DEFAULT_THEME.text)),
        Span::styled(": ", Style::default().fg(DEFAULT_THEME.muted)),
        Span::styled(var.ty.as_str(), Style::default().fg(DEFAULT_THEME.type_name)),
        Span::styled(" = ", Style::default().fg(DEFAULT_THEME.muted)),
        Span::styled(value, Style::default().fg(DEFAULT_THEME.literal)),
    ])
}

/// Render the stack pane
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    frames: &[FrameSnapshot],
    is_focused: bool,
    scroll_state: &mut StackScrollState,
) {
    let border_style = DEFAULT_THEME.pane_border(is_focused);

    let block = Block::default()
        .title(" Call Stack ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut all_items = Vec::new();
    for (depth, stack_frame) in frames.iter().enumerate() {
        all_items.push(ListItem::new(frame_header(depth, stack_frame)));
        if stack_frame.vars.is_empty() {
            all_items.push(
                ListItem::new("    (no variables)").style(Style::default().fg(DEFAULT_THEME.muted)),
            );
        }
        for var in &stack_frame.vars {
            all_items.push(ListItem::new(variable_line(var)));
        }
    }
    if all_items.is_empty() {
        all_items.push(ListItem::new("(empty)").style(Style::default().fg(DEFAULT_THEME.muted)));
    }

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Follow the innermost frame when the stack grows
    if total_items > scroll_state.prev_item_count && total_items > visible_height {
        scroll_state.offset = total_items - visible_height;
    }
    scroll_state.prev_item_count = total_items;
    if total_items > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_items - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let visible: Vec<ListItem> = all_items
        .into_iter()
        .skip(scroll_state.offset)
        .take(visible_height)
        .collect();
    frame.render_widget(List::new(visible).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_variable_line() {
        let scalar = VarSnapshot {
            name: "n".to_string(),
            ty: "int".to_string(),
            cells: vec!["3".to_string()],
        };
        assert_eq!(text(&variable_line(&scalar)), "    n: int = 3");

        let array = VarSnapshot {
            name: "a".to_string(),
            ty: "array[1] of int".to_string(),
            cells: vec!["7".to_string()],
        };
        assert_eq!(text(&variable_line(&array)), "    a: array[1] of int = [7]");
    }
}
