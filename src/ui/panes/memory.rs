//! Memory pane rendering
//!
//! Shows the registers `A..Z` that have been written, followed by every other
//! written cell in address order. The cell written by the last step is
//! highlighted, and the cell behind an uninitialized-read fault is shown in
//! the error color.

use super::utils::{clamp_scroll, pane_block, visible_rows};
use crate::memory::{register_address, register_name, Address, Memory};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Scroll state for the memory pane
#[derive(Debug, Default)]
pub struct MemoryScrollState {
    pub offset: usize,
}

/// Data needed to render the memory pane
pub struct MemoryRenderData<'a> {
    pub memory: &'a Memory,
    pub last_written: Option<Address>,
    pub error_address: Option<Address>,
}

fn cell_line(address: Address, value: Option<i64>, data: &MemoryRenderData) -> Line<'static> {
    let addr_text = match register_name(address) {
        Some(c) => format!("{:>6}", c),
        None => format!("[{:>4}]", address),
    };

    let is_error = Some(address) == data.error_address;
    let is_written = Some(address) == data.last_written;

    let addr_style = if is_error {
        Style::default()
            .fg(DEFAULT_THEME.error)
            .add_modifier(Modifier::BOLD)
    } else if register_name(address).is_some() {
        Style::default().fg(DEFAULT_THEME.register)
    } else {
        Style::default().fg(DEFAULT_THEME.comment)
    };

    let value_span = match value {
        Some(v) if is_written => Span::styled(
            v.to_string(),
            Style::default()
                .fg(DEFAULT_THEME.success)
                .add_modifier(Modifier::BOLD),
        ),
        Some(v) => Span::styled(v.to_string(), Style::default().fg(DEFAULT_THEME.number)),
        None => Span::styled(
            "(uninitialized)",
            Style::default().fg(DEFAULT_THEME.error),
        ),
    };

    Line::from(vec![
        Span::styled(addr_text, addr_style),
        Span::raw(" = "),
        value_span,
    ])
}

/// Build the rows of the pane in display order
fn memory_rows(data: &MemoryRenderData) -> Vec<Line<'static>> {
    let mut rows = Vec::new();

    let registers = data.memory.registers();
    let cells: Vec<(Address, i64)> = data
        .memory
        .iter()
        .filter(|(a, _)| register_name(*a).is_none())
        .collect();

    if !registers.is_empty() {
        rows.push(section_header("Registers"));
        for (name, value) in registers {
            let address = register_address(name).unwrap_or_default();
            rows.push(cell_line(address, Some(value), data));
        }
    }

    if !cells.is_empty() {
        rows.push(section_header("Cells"));
        for &(address, value) in &cells {
            rows.push(cell_line(address, Some(value), data));
        }
    }

    if let Some(address) = data.error_address {
        if !data.memory.contains(address) {
            rows.push(section_header("Fault"));
            rows.push(cell_line(address, None, data));
        }
    }

    rows
}

fn section_header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Render the memory pane
pub fn render_memory_pane(
    frame: &mut Frame,
    area: Rect,
    data: MemoryRenderData,
    is_focused: bool,
    scroll_state: &mut MemoryScrollState,
) {
    let block = pane_block(" Memory ", is_focused);

    let rows = memory_rows(&data);
    if rows.is_empty() {
        let list = List::new(vec![
            ListItem::new("(no cells written)").style(Style::default().fg(DEFAULT_THEME.comment))
        ])
        .block(block);
        frame.render_widget(list, area);
        return;
    }

    let visible_height = visible_rows(area.height);
    scroll_state.offset = clamp_scroll(scroll_state.offset, rows.len(), visible_height);

    let items: Vec<ListItem> = rows
        .into_iter()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(ListItem::new)
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_rows_group_registers_then_cells() {
        let memory: Memory = [(-2, 7), (-1, 3), (4, 9), (-30, 1)].into_iter().collect();
        let data = MemoryRenderData {
            memory: &memory,
            last_written: Some(4),
            error_address: None,
        };
        let rows: Vec<String> = memory_rows(&data).iter().map(text).collect();
        assert_eq!(
            rows,
            vec![
                "Registers",
                "     A = 3",
                "     B = 7",
                "Cells",
                "[ -30] = 1",
                "[   4] = 9",
            ]
        );
    }

    #[test]
    fn test_fault_cell_is_listed() {
        let memory = Memory::new();
        let data = MemoryRenderData {
            memory: &memory,
            last_written: None,
            error_address: Some(-3),
        };
        let rows: Vec<String> = memory_rows(&data).iter().map(text).collect();
        assert_eq!(rows, vec!["Fault", "     C = (uninitialized)"]);
    }
}
