//! TUI layout and rendering with ratatui.
//!
//! # Overview
//!
//! Every frame is drawn from the flow controller's state:
//! - Header with title, current screen, and logged-in guard
//! - Screen body (login form, scanner prompt, or scan result)
//! - Footer with available keys
//! - Modal dialog on top when one is open

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::theme::Theme;
use crate::flow::{Dialog, FlowController, LoginField, Screen};
use crate::input::{InputMode, PermissionState};

/// Application title shown in the header.
pub const TITLE: &str = "gatepass - Access Control";

/// Render the TUI based on current flow state.
pub fn render(frame: &mut Frame, flow: &FlowController, theme: &Theme) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(frame, flow, theme, chunks[0]);
    match flow.screen() {
        Screen::Login => render_login(frame, flow, theme, chunks[1]),
        Screen::Scanner => render_scanner(frame, flow, theme, chunks[1]),
        Screen::Confirmation => render_confirmation(frame, flow, theme, chunks[1]),
    }
    render_footer(frame, flow, theme, chunks[2]);

    if let Some(dialog) = flow.dialog() {
        render_dialog(frame, dialog, theme, area);
    }
}

fn render_header(frame: &mut Frame, flow: &FlowController, theme: &Theme, area: Rect) {
    let user = match flow.screen() {
        Screen::Login => String::new(),
        _ if flow.scanner().username.is_empty() => " | not logged in".to_string(),
        _ => format!(" | {}", flow.scanner().username),
    };
    let header = Paragraph::new(format!("{} [{}]{}", TITLE, flow.screen(), user))
        .style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.primary)),
        );
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut Frame, flow: &FlowController, theme: &Theme, area: Rect) {
    let hints = if flow.dialog().is_some() {
        "Enter/y: OK  Esc/n: Cancel"
    } else if flow.is_loading() && flow.screen() == Screen::Confirmation {
        "Please wait...  r: Cancel and scan again"
    } else if flow.is_loading() {
        "Please wait...  Ctrl+C: Exit"
    } else {
        match flow.screen() {
            Screen::Login => "Tab: Switch field  Enter: Next/Log in  Esc: Exit",
            Screen::Scanner => match flow.input().mode() {
                InputMode::Manual => "Enter: Submit  Ctrl+U: Clear  Ctrl+C: Exit",
                InputMode::Device => "Scan a badge  Enter: Grant access  Ctrl+C: Exit",
            },
            Screen::Confirmation => "Enter/r: Scan again  Ctrl+C: Exit",
        }
    };
    let footer = Paragraph::new(hints)
        .style(Style::default().fg(theme.dim))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// A bordered single-line input box.
fn input_box<'a>(title: &'a str, value: String, focused: bool, theme: &Theme) -> Paragraph<'a> {
    let border = if focused { theme.highlight } else { theme.dim };
    let cursor = if focused { "_" } else { "" };
    Paragraph::new(format!("{value}{cursor}"))
        .style(Style::default().fg(theme.normal))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border)),
        )
}

/// Centered column of the given height within `area`.
fn form_area(area: Rect, height: u16) -> Rect {
    let width = area.width.saturating_sub(4).min(60);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn render_login(frame: &mut Frame, flow: &FlowController, theme: &Theme, area: Rect) {
    let login = flow.login();
    if login.loading {
        render_message(frame, "Signing in...", theme.primary, area);
        return;
    }

    let form = form_area(area, 8);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(form);

    let title = Paragraph::new("Sign in")
        .style(Style::default().fg(theme.normal).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, rows[0]);
    frame.render_widget(
        input_box(
            "Username",
            login.username.value().to_string(),
            login.focus == LoginField::Username,
            theme,
        ),
        rows[1],
    );
    frame.render_widget(
        input_box(
            "Password",
            login.password.masked(),
            login.focus == LoginField::Password,
            theme,
        ),
        rows[2],
    );
}

fn render_scanner(frame: &mut Frame, flow: &FlowController, theme: &Theme, area: Rect) {
    let input = flow.input();
    match input.mode() {
        InputMode::Manual => {
            let form = form_area(area, 4);
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Length(3)])
                .split(form);
            let title = Paragraph::new("Enter QR code manually")
                .style(Style::default().fg(theme.normal).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center);
            frame.render_widget(title, rows[0]);
            frame.render_widget(
                input_box(
                    "QR code data",
                    input.text().unwrap_or_default().to_string(),
                    !input.scanned(),
                    theme,
                ),
                rows[1],
            );
        }
        InputMode::Device => {
            let (message, color) = match input.permission() {
                Some(PermissionState::Granted) if input.scanned() => {
                    ("Code captured, processing...".to_string(), theme.success)
                }
                Some(PermissionState::Granted) => (
                    "Point the badge QR code at the scanner".to_string(),
                    theme.highlight,
                ),
                Some(PermissionState::Denied(reason)) => (
                    format!("Please grant access to the scanner\n({reason})\n\nPress Enter to retry"),
                    theme.danger,
                ),
                Some(PermissionState::Unrequested | PermissionState::Requesting) | None => {
                    ("Requesting scanner access...".to_string(), theme.dim)
                }
            };
            render_message(frame, &message, color, area);
        }
    }
}

fn render_confirmation(frame: &mut Frame, flow: &FlowController, theme: &Theme, area: Rect) {
    let Some(confirmation) = flow.confirmation() else {
        return;
    };
    if confirmation.loading {
        render_message(frame, "Checking...", theme.primary, area);
        return;
    }

    let result = confirmation.result.as_deref().unwrap_or_default();
    let text = Text::from(vec![
        Line::from(Span::styled(
            "Scan result",
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            result.to_string(),
            Style::default().fg(theme.normal).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to scan again",
            Style::default().fg(theme.dim),
        )),
    ]);
    let card = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(card, form_area(area, 7));
}

/// Centered, wrapped message.
fn render_message(frame: &mut Frame, message: &str, color: ratatui::style::Color, area: Rect) {
    let lines = message.lines().count() as u16;
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, form_area(area, lines.max(1)));
}

fn render_dialog(frame: &mut Frame, dialog: &Dialog, theme: &Theme, area: Rect) {
    let (title, message, buttons, color) = match dialog {
        Dialog::Alert { title, message } => {
            (title.as_str(), message.as_str(), "[Enter] OK", theme.danger)
        }
        Dialog::ConfirmExit => (
            "Exit",
            "Are you sure you want to exit?",
            "[y] Exit   [n] Cancel",
            theme.highlight,
        ),
    };

    let dialog_area = form_area(area, 7);
    frame.render_widget(Clear, dialog_area);

    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(theme.normal))),
        Line::from(""),
        Line::from(Span::styled(buttons, Style::default().fg(theme.dim))),
    ]);
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    format!(" {title} "),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(paragraph, dialog_area);
}
