/// Thumbnail grid
use iced::alignment::Horizontal;
use iced::widget::{button, container, image, mouse_area, scrollable, stack, text, Column, Row};
use iced::{Background, Border, Color, ContentFit, Element, Length, Theme};

use super::{GALLERY_PADDING, GRID_SPACING};
use graph_gallery::state::catalog::ImageCatalog;
use graph_gallery::state::selection::SelectionController;
use graph_gallery::state::thumbnails::{Thumbnail, ThumbnailLoader};
use crate::Message;

pub fn view<'a>(
    catalog: &'a ImageCatalog,
    thumbnails: &'a ThumbnailLoader,
    selection: &'a SelectionController,
) -> Element<'a, Message> {
    if catalog.is_loading() {
        return centered(text("Loading images...").size(16));
    }
    if let Some(error) = catalog.error() {
        return centered(text(format!("Could not reach the image service: {error}")).size(14));
    }
    if thumbnails.is_empty() {
        let message = if catalog.query().is_empty() {
            "No images found"
        } else {
            "No images match the search"
        };
        return centered(text(message).size(16));
    }

    let size = thumbnails.layout().cell;
    let columns = thumbnails.columns();

    let mut grid = Column::new().spacing(GRID_SPACING);
    let mut current = Row::new().spacing(GRID_SPACING);
    let mut in_row = 0;

    for (filename, thumbnail) in thumbnails.thumbnails() {
        current = current.push(cell(filename, thumbnail, selection.is_selected(filename), size));
        in_row += 1;
        if in_row == columns {
            grid = grid.push(current);
            current = Row::new().spacing(GRID_SPACING);
            in_row = 0;
        }
    }
    if in_row > 0 {
        grid = grid.push(current);
    }

    container(
        scrollable(grid)
            .on_scroll(|viewport| Message::GalleryScrolled(viewport.into()))
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .padding(GALLERY_PADDING)
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

/// One clickable thumbnail with its expand button
fn cell<'a>(filename: &'a str, thumbnail: &'a Thumbnail, selected: bool, size: f32) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match thumbnail {
        Thumbnail::Loaded(handle) => image(handle.clone())
            .width(size)
            .height(size)
            .content_fit(ContentFit::Cover)
            .into(),
        Thumbnail::Failed => placeholder("Unavailable", size),
        Thumbnail::Unassigned | Thumbnail::Requested => placeholder("", size),
    };

    // The button captures its own press, so the cell is not selected twice
    let expand = button(text("🔍").size(12))
        .on_press(Message::Expand(filename.to_string()))
        .padding(4)
        .style(button::secondary);

    let content = stack![
        picture,
        container(expand)
            .width(Length::Fill)
            .align_x(Horizontal::Right)
            .padding(4),
    ];

    let framed = container(content)
        .width(size)
        .height(size)
        .style(move |theme: &Theme| cell_style(theme, selected));

    mouse_area(framed)
        .on_press(Message::Select(filename.to_string()))
        .into()
}

fn placeholder<'a>(label: &'a str, size: f32) -> Element<'a, Message> {
    container(text(label).size(12))
        .width(size)
        .height(size)
        .center_x(size)
        .center_y(size)
        .into()
}

fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn cell_style(theme: &Theme, selected: bool) -> container::Style {
    let palette = theme.extended_palette();
    let border_color = if selected {
        palette.primary.strong.color
    } else {
        Color::TRANSPARENT
    };

    container::Style {
        background: Some(Background::Color(palette.background.weak.color)),
        border: Border {
            color: border_color,
            width: 2.0,
            radius: 4.0.into(),
        },
        ..container::Style::default()
    }
}
