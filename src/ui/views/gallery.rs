use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let images = app.filtered_images();

    let header = Row::new([
        Cell::from(" "),
        Cell::from("Name"),
        Cell::from("Size"),
        Cell::from("Resolution"),
        Cell::from("Uploaded"),
        Cell::from("Tags"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = images
        .iter()
        .enumerate()
        .map(|(i, image)| {
            let style = if i == app.gallery_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            let marker = if app.selected.contains(&image.id) {
                "✓"
            } else {
                " "
            };

            Row::new([
                Cell::from(marker),
                Cell::from(truncate_string(&image.original_filename, 40)),
                Cell::from(image.size_display()),
                Cell::from(image.resolution_display().to_string()),
                Cell::from(image.uploaded_display()),
                Cell::from(image.tags_display()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(1),
        Constraint::Percentage(35),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(13),
        Constraint::Fill(1),
    ];

    let filter = match app.tag_filter_name() {
        Some(name) => format!("tag: {}", name),
        None => "all".to_string(),
    };
    let title = format!(
        " Gallery ({}, {}) - [space] select  [enter] slideshow  [t] filter ",
        images.len(),
        filter
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.gallery_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
