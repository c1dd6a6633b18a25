//! Drawing for the hero terminal and the support window

use super::app::{App, Focus};
use crate::state_machine::WindowMode;
use crate::terminal::LineKind;
use crate::transcript::Sender;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

const GREEN: Color = Color::Rgb(0x00, 0xff, 0x9d);
const AMBER: Color = Color::Rgb(0xff, 0xb0, 0x00);
const DIM: Color = Color::Rgb(0x44, 0x44, 0x44);

const WINDOW_TITLE: &str = " FAQ_CLIENT_v1.0.exe ";
const INPUT_PLACEHOLDER: &str = "Type inquiry...";

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if app.view.window_mode.is_fullscreen() {
        draw_support(frame, app, area);
        return;
    }

    let [hero, support] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(area);
    draw_hero(frame, app, hero);

    if app.view.window_mode.transcript_visible() {
        draw_support(frame, app, support);
    } else {
        let [bar, _] = Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(support);
        frame.render_widget(window_block(app), bar);
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(AMBER)
    } else {
        Style::default().fg(DIM)
    }
}

fn draw_hero(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Terminal;
    let mut lines: Vec<Line> = app
        .terminal
        .lines()
        .iter()
        .map(|line| match line.kind {
            LineKind::User => Line::from(vec![
                Span::styled("> ", Style::default().fg(GREEN).bold()),
                Span::raw(line.content.clone()),
            ]),
            LineKind::System => Line::from(vec![
                Span::styled("# ", Style::default().fg(GREEN).dim()),
                Span::styled(line.content.clone(), Style::default().fg(GREEN)),
            ]),
        })
        .collect();
    lines.push(Line::from(vec![
        Span::styled("> ", Style::default().fg(GREEN).bold()),
        Span::raw(app.terminal_input.clone()),
        Span::styled(if focused { "_" } else { "" }, Style::default().fg(GREEN)),
    ]));

    let block = Block::bordered()
        .title(" HOVERSTATE ")
        .border_style(border_style(focused));
    let inner_height = usize::from(block.inner(area).height);
    let scroll = lines.len().saturating_sub(inner_height);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
        area,
    );
}

fn window_block(app: &App) -> Block<'static> {
    let (min_label, max_label) = match app.view.window_mode {
        WindowMode::Fullscreen => ("Restore Down", "Restore"),
        WindowMode::InlineCollapsed => ("Expand", "Maximize"),
        WindowMode::InlineExpanded => ("Collapse", "Maximize"),
    };
    let chrome = format!(" [F2 {min_label}] [F3 {max_label}] [F4 Close / Reset] ");
    Block::bordered()
        .title(Line::from(WINDOW_TITLE).bold())
        .title(Line::from(chrome).right_aligned())
        .border_style(border_style(app.focus == Focus::Support))
}

fn draw_support(frame: &mut Frame, app: &App, area: Rect) {
    let block = window_block(app);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [main, input, status] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(inner);
    let [queries, chat] =
        Layout::horizontal([Constraint::Length(36), Constraint::Min(0)]).areas(main);

    draw_queries(frame, app, queries);
    draw_chat(frame, app, chat);
    draw_input(frame, app, input);
    draw_status(frame, app, status);
}

fn draw_queries(frame: &mut Frame, app: &App, area: Rect) {
    // Buttons are disabled while a reply is on its way
    let item_style = if app.view.pending_reply {
        Style::default().fg(DIM)
    } else {
        Style::default()
    };
    let items: Vec<ListItem> = app
        .questions
        .iter()
        .map(|q| ListItem::new(q.as_str()).style(item_style))
        .collect();
    let list = List::new(items)
        .block(Block::bordered().title(" // QUICK_QUERIES ").border_style(Style::default().fg(DIM)))
        .highlight_symbol("> ")
        .highlight_style(Style::default().fg(AMBER));
    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_chat(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for message in &app.transcript {
        let label_color = match message.sender {
            Sender::System => GREEN,
            Sender::User => AMBER,
        };
        lines.push(Line::from(vec![
            Span::styled(message.sender.label(), Style::default().fg(label_color).bold()),
            Span::styled(format!(" {}", message.display_time()), Style::default().fg(DIM)),
        ]));
        lines.push(Line::from(message.text.clone()));
        lines.push(Line::default());
    }
    if app.view.pending_reply {
        lines.push(Line::styled(
            "Thinking...",
            Style::default().fg(GREEN).add_modifier(Modifier::ITALIC),
        ));
    }

    let block = Block::bordered()
        .title(" File  Edit  View  Help ")
        .border_style(Style::default().fg(DIM));
    let inner_height = usize::from(block.inner(area).height);
    let scroll = lines.len().saturating_sub(inner_height);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
        area,
    );

    if app.view.toast_visible {
        draw_toast(frame, area);
    }
}

fn draw_toast(frame: &mut Frame, area: Rect) {
    let width = 26_u16.min(area.width);
    let height = 4_u16.min(area.height);
    let toast = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1_u16.min(area.height),
        width,
        height,
    };
    frame.render_widget(Clear, toast);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from("MESSAGE SENT").bold(),
            Line::from("Check your mail client").fg(DIM),
        ])
        .block(Block::bordered().border_style(Style::default().fg(GREEN))),
        toast,
    );
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.view.draft.is_empty() {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(AMBER)),
            Span::styled(INPUT_PLACEHOLDER, Style::default().fg(DIM)),
        ])
    } else {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(AMBER)),
            Span::raw(app.view.draft.clone()),
        ])
    };
    frame.render_widget(
        Paragraph::new(line).block(
            Block::bordered().border_style(border_style(app.focus == Focus::Support)),
        ),
        area,
    );
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.error {
        Some(error) => Line::from(format!(" ERROR: {error}")).fg(Color::Red),
        None => Line::from(vec![
            Span::styled(" ● SUPPORT_ONLINE", Style::default().fg(GREEN)),
            Span::styled("   Tab focus  Esc quit", Style::default().fg(DIM)),
        ]),
    };
    frame.render_widget(Paragraph::new(line), area);
}
