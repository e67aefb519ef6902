use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ratatui::text::{Line, Span};

use crate::app::{App, RegisterFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

use super::login::{field_line, submit_line};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let height = if app.register_error.is_some() { 14 } else { 12 };
    let panel = centered_rect_fixed(46, height, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "           L I G H T B O X",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "            create an account",
            styles::muted_style(),
        )),
        Line::from(""),
    ];

    lines.push(field_line(
        "Username: ",
        &app.register_username,
        false,
        app.register_focus == RegisterFocus::Username,
    ));
    lines.push(field_line(
        "Email:    ",
        &app.register_email,
        false,
        app.register_focus == RegisterFocus::Email,
    ));
    lines.push(field_line(
        "Password: ",
        &app.register_password,
        true,
        app.register_focus == RegisterFocus::Password,
    ));

    lines.push(Line::from(""));
    lines.push(submit_line(
        "Register",
        app.register_focus == RegisterFocus::Submit,
    ));

    if let Some(ref error) = app.register_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), panel);
}
