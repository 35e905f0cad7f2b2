use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::app::{ChatPanel, PanelMode};
use crate::core::composer::{ActionControl, NEWLINE_HINT};
use crate::core::message::Role;

const INTRO_TITLE: &str = "Where ideas begin";
const INTRO_BODY: &str = "Pick a provider and model, then type a prompt or choose an example.";

pub fn control_label(control: ActionControl) -> Option<&'static str> {
    match control {
        ActionControl::Hidden => None,
        ActionControl::Send => Some("Enter to send"),
        ActionControl::Stop => Some("Esc to stop"),
    }
}

fn header_line(panel: &ChatPanel<'_>) -> String {
    let provider = panel
        .provider
        .map(|p| p.display_name.as_str())
        .unwrap_or("no provider");
    let model = if panel.model.is_empty() {
        "no model"
    } else {
        panel.model
    };
    let key_state = if panel.api_key.is_empty() {
        "no API key"
    } else {
        "API key set"
    };
    format!(
        "{provider} · {model} ({} models) · {key_state}",
        panel.model_options.len()
    )
}

fn body_lines<'a>(panel: &'a ChatPanel<'a>) -> Vec<Line<'a>> {
    match panel.mode {
        PanelMode::Intro => {
            let mut lines = vec![
                Line::from(Span::styled(
                    INTRO_TITLE,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(INTRO_BODY),
                Line::from(""),
            ];
            lines.extend(
                panel
                    .example_prompts
                    .iter()
                    .enumerate()
                    .map(|(i, prompt)| Line::from(format!("  {}. {prompt}", i + 1))),
            );
            lines
        }
        PanelMode::Conversation => {
            let mut lines = Vec::new();
            for message in panel.messages {
                let (prefix, color) = match message.role {
                    Role::User => ("You: ", Color::Cyan),
                    Role::Assistant => ("", Color::White),
                    Role::System => ("System: ", Color::DarkGray),
                };
                for (i, text) in message.content.lines().enumerate() {
                    let prefix = if i == 0 { prefix } else { "" };
                    lines.push(Line::from(vec![
                        Span::styled(prefix, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                        Span::styled(text, Style::default().fg(color)),
                    ]));
                }
                lines.push(Line::from(""));
            }
            if panel.streaming {
                lines.push(Line::from(Span::styled(
                    "…",
                    Style::default().fg(Color::Yellow),
                )));
            }
            lines
        }
    }
}

fn input_title(panel: &ChatPanel<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(label) = control_label(panel.action_control) {
        parts.push(label);
    }
    if panel.enhancing {
        parts.push("enhancing…");
    } else if panel.enhanced {
        parts.push("prompt enhanced ✓");
    } else if panel.can_enhance {
        parts.push("Ctrl+E to enhance");
    }
    if panel.show_hint {
        parts.push(NEWLINE_HINT);
    }
    parts.join(" · ")
}

/// Draws the chat panel into `area`. A hidden panel draws nothing.
pub fn render_panel(f: &mut Frame, area: Rect, panel: &ChatPanel<'_>) {
    if !panel.visible {
        return;
    }

    let input_height = panel.draft.lines().count().clamp(1, 6) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(input_height + 2), // +2 for borders
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(header_line(panel)).style(Style::default().add_modifier(Modifier::BOLD)),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(body_lines(panel)).wrap(Wrap { trim: false }),
        chunks[1],
    );

    if let Some(status) = panel.status {
        f.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::Yellow)),
            chunks[2],
        );
    }

    let input_style = if panel.streaming {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    f.render_widget(
        Paragraph::new(panel.draft)
            .style(input_style)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(input_title(panel)),
            ),
        chunks[3],
    );
}
