use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.is_authenticated() {
        render_welcome(frame, area);
        return;
    }
    render_slideshow(frame, app, area);
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Welcome to Lightbox",
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Your photo gallery lives on your own server.",
            styles::help_desc_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("[3]", styles::help_key_style()),
            Span::styled(" to sign in or ", styles::muted_style()),
            Span::styled("[4]", styles::help_key_style()),
            Span::styled(" to create an account.", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Home ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_slideshow(frame: &mut Frame, app: &App, area: Rect) {
    let images = app.slideshow_images();

    let source = if app.slideshow.has_custom_selection() {
        format!("{} selected", images.len())
    } else {
        format!("full gallery, {} images", images.len())
    };
    let title = format!(" Slideshow ({}) ", source);

    let lines = if images.is_empty() {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No images yet.",
                styles::help_desc_style(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Press ", styles::muted_style()),
                Span::styled("[2]", styles::help_key_style()),
                Span::styled(" to open the gallery, ", styles::muted_style()),
                Span::styled("[u]", styles::help_key_style()),
                Span::styled(" to refresh.", styles::muted_style()),
            ]),
        ]
    } else {
        let index = app.slideshow_index.min(images.len() - 1);
        let image = &images[index];

        vec![
            Line::from(""),
            Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    truncate_string(&image.original_filename, 48),
                    styles::title_style(),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Taken/uploaded: ", styles::muted_style()),
                Span::styled(image.uploaded_display(), styles::help_desc_style()),
            ]),
            Line::from(vec![
                Span::styled("  Resolution:     ", styles::muted_style()),
                Span::styled(
                    image.resolution_display().to_string(),
                    styles::help_desc_style(),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Size:           ", styles::muted_style()),
                Span::styled(image.size_display(), styles::help_desc_style()),
            ]),
            Line::from(vec![
                Span::styled("  Tags:           ", styles::muted_style()),
                Span::styled(image.tags_display(), styles::help_desc_style()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("{} / {}", index + 1, images.len()),
                    styles::highlight_style(),
                ),
                Span::styled("   [n]ext  [p]revious", styles::muted_style()),
            ]),
        ]
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
