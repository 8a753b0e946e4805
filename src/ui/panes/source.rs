//! Program pane rendering with syntax highlighting
//!
//! This module renders the compiled program in canonical form, one
//! instruction per row, with basic syntax highlighting and execution
//! indicators.
//!
//! # Features
//!
//! - Syntax highlighting for keywords, directives, registers, labels and numbers
//! - Current instruction highlighting, in the error color when the run faulted there
//! - Instruction index and source file line numbers

use super::utils::{pane_block, visible_rows};
use crate::parser::ast::Program;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Simple syntax highlighting for one canonical instruction
fn highlight_instruction(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            current_word.push(c);
            continue;
        }

        if !current_word.is_empty() {
            spans.push(style_word(&current_word));
            current_word.clear();
        }

        let style = match c {
            '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
            '@' | '*' => Style::default().fg(DEFAULT_THEME.secondary),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
    }

    if !current_word.is_empty() {
        spans.push(style_word(&current_word));
    }

    spans
}

fn style_word(word: &str) -> Span<'static> {
    let style = match word {
        "halt" | "goto" | "if" | "then" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "$init" | "$print" => Style::default()
            .fg(DEFAULT_THEME.directive)
            .add_modifier(Modifier::BOLD),
        w if w.chars().all(|c| c.is_ascii_digit()) => Style::default().fg(DEFAULT_THEME.number),
        w if w.len() == 1 && w.chars().all(|c| c.is_ascii_uppercase()) => {
            Style::default().fg(DEFAULT_THEME.register) // Registers
        }
        _ => Style::default().fg(DEFAULT_THEME.label), // Labels
    };
    Span::styled(word.to_string(), style)
}

/// Scroll state for the program pane
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

impl Default for SourceScrollState {
    fn default() -> Self {
        SourceScrollState {
            offset: 0,
            target_line_row: None, // Centered on first render
        }
    }
}

/// Data needed to render the program pane
pub struct SourceRenderData<'a> {
    pub program: &'a Program,
    /// Instruction about to execute (may be one past the end)
    pub current: usize,
    pub is_error: bool,
}

/// Render the program pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    data: SourceRenderData,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = pane_block(" Program ", is_focused);
    let program = data.program;
    let total_lines = program.len();
    let visible_height = visible_rows(area.height);

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the current instruction at the target row
    scroll_state.offset = data.current.saturating_sub(target_row);
    if total_lines > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let label_width = program.labels.keys().map(|l| l.len()).max().unwrap_or(0);

    let visible_lines: Vec<Line> = program
        .statements
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, instruction)| {
            let is_current = idx == data.current;
            let source_line = program
                .source_line(idx)
                .map_or_else(String::new, |l| format!("L{}", l));
            let gutter = format!("{:4} {:>6} ", idx, source_line);

            let (num_style, content_base_style) = if is_current && data.is_error {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                    Style::default()
                        .bg(DEFAULT_THEME.error)
                        .fg(ratatui::style::Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            } else if is_current {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(DEFAULT_THEME.current_line_bg),
                )
            } else {
                (Style::default().fg(DEFAULT_THEME.comment), Style::default())
            };

            let label = match program.label_for(idx) {
                Some(label) => format!("{:>width$}: ", label, width = label_width),
                None if label_width > 0 => " ".repeat(label_width + 2),
                None => String::new(),
            };

            let mut spans = vec![
                Span::styled(gutter, num_style),
                Span::styled(label, Style::default().fg(DEFAULT_THEME.directive)),
            ];
            spans.extend(highlight_instruction(&instruction.to_string()));

            if is_current && data.is_error {
                for span in &mut spans[1..] {
                    span.style = content_base_style;
                }
            } else if is_current {
                for span in &mut spans[1..] {
                    span.style = span.style.patch(content_base_style);
                }
            }

            Line::from(spans)
        })
        .collect();

    let paragraph = if visible_lines.is_empty() {
        Paragraph::new("(empty program)").style(Style::default().fg(DEFAULT_THEME.comment))
    } else {
        Paragraph::new(visible_lines)
    };
    frame.render_widget(paragraph.block(block), area);
}
