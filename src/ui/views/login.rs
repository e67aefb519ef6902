use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let height = if app.login_error.is_some() { 13 } else { 11 };
    let panel = centered_rect_fixed(46, height, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "           L I G H T B O X",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "            sign in to continue",
            styles::muted_style(),
        )),
        Line::from(""),
    ];

    lines.push(field_line(
        "Username: ",
        &app.login_username,
        false,
        app.login_focus == LoginFocus::Username,
    ));
    lines.push(field_line(
        "Password: ",
        &app.login_password,
        true,
        app.login_focus == LoginFocus::Password,
    ));

    lines.push(Line::from(""));
    lines.push(submit_line("Login", app.login_focus == LoginFocus::Submit));

    if let Some(ref error) = app.login_error {
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

/// One labeled input field, rendered like `Label: [value▌   ]`
pub(super) fn field_line(
    label: &'static str,
    value: &str,
    masked: bool,
    focused: bool,
) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };

    let shown = if masked {
        "*".repeat(value.chars().count().min(16))
    } else {
        let count = value.chars().count();
        if count > 16 {
            value.chars().skip(count - 16).collect()
        } else {
            value.to_string()
        }
    };
    let display = format!("{:<16}", shown);
    let cursor = if focused { "▌" } else { "" };

    Line::from(vec![
        Span::raw("      "),
        Span::styled(format!("{}[", label), styles::muted_style()),
        Span::styled(format!("{}{}", display, cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

pub(super) fn submit_line(label: &'static str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    if focused {
        Line::from(vec![
            Span::raw("            ["),
            Span::styled(format!(" ▶ {} ◀ ", label), style),
            Span::raw("]"),
        ])
    } else {
        Line::from(vec![
            Span::raw("            ["),
            Span::styled(format!("   {}   ", label), style),
            Span::raw("]"),
        ])
    }
}
