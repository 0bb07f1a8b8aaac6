use crate::app::{App, FormField, Screen, TaskForm, MENU_ITEMS};
use crate::analysis::Analysis;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

pub const TITLE: &str = "कर्म - To-Do List App";

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key(key);
            if app.should_quit {
                return Ok(());
            }
        }
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled(
        TITLE,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, chunks[0]);

    draw_menu(f, app, chunks[1]);

    let help = match app.screen {
        Screen::Menu => "←/→ select  Enter open  q quit",
        Screen::AddTask(_) => "Tab next field  Space toggle  Enter save  Esc cancel",
        Screen::ViewTasks => "↑/↓ move  Enter toggle done  Esc back",
        Screen::Analysis(_) => "Esc back",
    };
    let status = match &app.message {
        Some(message) => Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Yellow))),
        None => Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
    };
    f.render_widget(Paragraph::new(status), chunks[3]);

    match &app.screen {
        Screen::Menu => {}
        Screen::AddTask(form) => draw_form(f, form),
        Screen::ViewTasks => draw_tasks(f, app),
        Screen::Analysis(report) => draw_analysis(f, report),
    }
}

fn draw_menu(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    for (i, item) in MENU_ITEMS.iter().enumerate() {
        let selected = app.selected_menu == i;
        let button = Paragraph::new(*item)
            .alignment(Alignment::Center)
            .style(if selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(if selected {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    }),
            );
        f.render_widget(button, columns[i]);
    }
}

fn draw_form(f: &mut Frame, form: &TaskForm) {
    let area = popup_area(f.area(), 80, 60);
    f.render_widget(Clear, area);
    let block = Block::default().title("Add Task").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let fields = [
        (FormField::Task, form.task.clone()),
        (FormField::Time, form.time.clone()),
        (FormField::Date, form.date.clone()),
        (
            FormField::RepeatDaily,
            if form.repeat_daily { "[x]" } else { "[ ]" }.to_string(),
        ),
    ];
    for (i, (field, value)) in fields.into_iter().enumerate() {
        let focused = form.focus == field;
        let input = Paragraph::new(value).block(
            Block::default()
                .title(format!("{}:", field.label()))
                .borders(Borders::ALL)
                .border_style(if focused {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                }),
        );
        f.render_widget(input, rows[i]);
    }

    if let Some(error) = &form.error {
        let error = Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
            .wrap(Wrap { trim: true });
        f.render_widget(error, rows[4]);
    }
}

fn draw_tasks(f: &mut Frame, app: &App) {
    let area = popup_area(f.area(), 80, 80);
    f.render_widget(Clear, area);

    let items: Vec<ListItem> = if app.tasks.is_empty() {
        vec![ListItem::new("No tasks yet")]
    } else {
        app.tasks
            .iter()
            .map(|t| {
                let color = if t.is_pending() { Color::White } else { Color::Green };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("[#{}] ", t.id)),
                    Span::styled(t.to_string(), Style::default().fg(color)),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().title("View Tasks").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.tasks.is_empty() {
        state.select(Some(app.selected_task));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_analysis(f: &mut Frame, report: &Analysis) {
    let area = popup_area(f.area(), 80, 80);
    f.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Analysis Report:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(report.lines().into_iter().map(Line::from));

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Analysis Report").borders(Borders::ALL));
    f.render_widget(body, area);
}

// Rect covering the given percentages of `area`, centered.
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
