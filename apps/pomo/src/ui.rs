//! UI rendering for the pomodoro timer.

use crate::app::App;
use crate::digits;
use crate::models::Mode;
use crate::store::SessionStore;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

pub fn draw<S: SessionStore>(f: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Mode header
            Constraint::Min(9),     // Timer face
            Constraint::Length(3),  // Progress
            Constraint::Length(4),  // Today
            Constraint::Length(3),  // Footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_timer(f, app, chunks[1]);
    draw_progress(f, app, chunks[2]);
    draw_today(f, app, chunks[3]);
    draw_footer(f, app, chunks[4]);

    if app.show_help {
        draw_help(f);
    }

    if app.editing {
        draw_input(f, app);
    }

    if let Some(msg) = &app.message {
        draw_message(f, msg);
    }
}

fn mode_color(mode: Mode) -> Color {
    match mode {
        Mode::Focus => Color::Red,
        Mode::ShortBreak => Color::Green,
        Mode::LongBreak => Color::Blue,
    }
}

fn draw_header<S: SessionStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let current = app.cycle.mode();
    let tabs: Vec<Span> = [Mode::Focus, Mode::ShortBreak, Mode::LongBreak]
        .into_iter()
        .flat_map(|mode| {
            let span = if mode == current {
                Span::styled(
                    format!("[{}]", mode.name()),
                    Style::default().fg(mode_color(mode)).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(format!(" {} ", mode.name()), Style::default().fg(Color::Gray))
            };
            [span, Span::raw(" ")]
        })
        .collect();

    let header = Paragraph::new(Line::from(tabs))
        .block(Block::default().borders(Borders::ALL).title(" pomo "))
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

fn draw_timer<S: SessionStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let color = mode_color(app.cycle.mode());
    let mut lines: Vec<Line> = digits::render(&app.cycle.format_time())
        .into_iter()
        .map(|row| Line::from(Span::styled(row, Style::default().fg(color))))
        .collect();

    let engine = app.cycle.engine();
    let status = if engine.is_running() {
        let since = engine
            .started_at()
            .map(|t| format!(" since {}", t.format("%H:%M")))
            .unwrap_or_default();
        Span::styled(format!("▶ RUNNING{since}"), Style::default().fg(Color::Cyan))
    } else {
        Span::styled("⏸ PAUSED".to_string(), Style::default().fg(Color::DarkGray))
    };

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        app.cycle.activity().to_string(),
        Style::default().fg(Color::Yellow),
    )));
    lines.push(Line::from(status));

    let timer = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", app.cycle.format_time())))
        .alignment(Alignment::Center);
    f.render_widget(timer, area);
}

fn draw_progress<S: SessionStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let engine = app.cycle.engine();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .ratio(engine.progress())
        .label(format!("{:.0}%", engine.progress() * 100.0))
        .gauge_style(Style::default().fg(mode_color(app.cycle.mode())));
    f.render_widget(gauge, area);
}

fn draw_today<S: SessionStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let (hours, mins) = app.summary.focus_time();
    let lines = vec![
        Line::from(format!(
            "Sessions Today: {}  |  Long break in {}",
            app.cycle.sessions_today(),
            app.cycle.until_long_break()
        )),
        Line::from(Span::styled(
            format!(
                "Focus {}h {:02}m  |  Completed {}%  |  Abandoned {}  |  Breaks {}",
                hours,
                mins,
                app.summary.completion_rate(),
                app.summary.abandoned_focus,
                app.summary.breaks
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let today = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Today "))
        .alignment(Alignment::Center);
    f.render_widget(today, area);
}

fn draw_footer<S: SessionStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let toggle = if app.cycle.mode().is_break() {
        "t:Skip break"
    } else {
        "t:Take a break"
    };
    let help = format!("s:Start  p:Pause  r:Reset  {toggle}  a:Activity  ?:Help  q:Quit");
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let help = r#"
Pomodoro Keybindings

Timer:
  s               Start a fresh countdown
  p               Pause
  r               Reset current interval
  t               Switch to the next mode

Activity:
  a               Set what you are working on
  Enter / Esc     Save / cancel

General:
  ?               Show this help
  q, Ctrl-C       Quit

Press any key to close
"#;

    let popup = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

fn draw_input<S: SessionStore>(f: &mut Frame, app: &App<S>) {
    let area = centered_rect(50, 15, f.area());
    f.render_widget(Clear, area);

    let input = Paragraph::new(app.input_buffer.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(" Enter activity "));
    f.render_widget(input, area);

    f.set_cursor_position((area.x + 1 + app.input_buffer.chars().count() as u16, area.y + 1));
}

fn draw_message(f: &mut Frame, msg: &str) {
    let frame = f.area();
    if frame.height < 3 {
        return;
    }
    let area = Rect::new(
        frame.x + 2,
        frame.y + frame.height.saturating_sub(5),
        frame.width.saturating_sub(4),
        3,
    )
    .intersection(frame);
    f.render_widget(Clear, area);

    let message = Paragraph::new(msg)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
