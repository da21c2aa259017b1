/// Details panel: preview, generation summary and raw metadata
use iced::widget::{column, container, horizontal_rule, image, mouse_area, row, scrollable, text, Column};
use iced::{Background, Border, Element, Font, Length, Theme};

use super::DETAILS_WIDTH;
use graph_gallery::metadata::display::{MetadataEntry, MetadataView};
use graph_gallery::metadata::extract::ExtractionSummary;
use graph_gallery::state::catalog::ImageCatalog;
use graph_gallery::state::data::ImageState;
use graph_gallery::state::selection::{Details, SelectionController};
use crate::Message;

const PREVIEW_HEIGHT: f32 = 280.0;

pub fn view<'a>(selection: &'a SelectionController, catalog: &'a ImageCatalog) -> Element<'a, Message> {
    let Some(filename) = selection.selected() else {
        return panel(text("Select an image to view details").size(14));
    };

    let mut content = Column::new().spacing(12).push(text(filename).size(18));

    if let Some(modified) = catalog.get(filename).and_then(|record| record.modified()) {
        content = content.push(text(format!("Modified {}", modified.format("%Y-%m-%d %H:%M UTC"))).size(12));
    }

    content = content.push(preview(selection.preview()));

    let metadata: Element<'a, Message> = match selection.details() {
        Details::Empty => text("").into(),
        Details::Loading => text("Loading metadata...").size(14).into(),
        Details::Failed(message) => column![
            text("Error loading metadata").size(14).style(text::danger),
            text(message.as_str()).size(12),
        ]
        .spacing(4)
        .into(),
        Details::Ready(view) => metadata_view(view),
    };

    panel(content.push(metadata))
}

fn panel<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(scrollable(container(content).padding(16)).height(Length::Fill))
        .width(DETAILS_WIDTH)
        .height(Length::Fill)
        .style(container::bordered_box)
        .into()
}

/// Clicking the preview opens the full-size overlay
fn preview<'a>(state: Option<&'a ImageState>) -> Element<'a, Message> {
    match state {
        Some(ImageState::Ready(handle)) => mouse_area(
            image(handle.clone())
                .width(Length::Fill)
                .height(PREVIEW_HEIGHT),
        )
        .on_press(Message::PreviewClicked)
        .into(),
        Some(ImageState::Failed(_)) => text("Preview unavailable").size(12).into(),
        Some(ImageState::Loading) | None => container(text("Loading preview...").size(12))
            .height(PREVIEW_HEIGHT)
            .center_y(PREVIEW_HEIGHT)
            .into(),
    }
}

fn metadata_view(view: &MetadataView) -> Element<'_, Message> {
    if view.is_empty() {
        return text("No metadata found.").size(14).into();
    }

    let mut content = Column::new().spacing(10);

    if let Some(summary) = &view.summary {
        content = content.push(summary_view(summary)).push(horizontal_rule(1));
    }

    for entry in &view.entries {
        content = content.push(entry_view(entry));
    }

    content.into()
}

fn summary_view(summary: &ExtractionSummary) -> Element<'_, Message> {
    let mut section = Column::new().spacing(8).push(text("Generation Info").size(16));

    if !summary.prompts.is_empty() {
        let prompts = summary
            .prompts
            .iter()
            .fold(Column::new().spacing(6), |prompts, prompt| {
                prompts.push(text(prompt.as_str()).size(13))
            });
        section = section.push(labelled("Prompts Found", prompts));
    }

    // Two parameters per row
    let params = summary.parameters();
    for pair in params.chunks(2) {
        let cells = pair.iter().fold(row![].spacing(8), |cells, param| {
            cells.push(
                container(labelled(param.field.label(), text(param.display_value()).size(13)))
                    .width(Length::FillPortion(1)),
            )
        });
        section = section.push(cells);
    }

    section.into()
}

fn entry_view(entry: &MetadataEntry) -> Element<'_, Message> {
    labelled(
        entry.label.as_str(),
        text(entry.value.as_str()).size(12).font(Font::MONOSPACE),
    )
}

fn labelled<'a>(label: &'a str, value: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    column![
        text(label).size(11).style(text::secondary),
        container(value)
            .width(Length::Fill)
            .padding([4, 8])
            .style(value_style),
    ]
    .spacing(2)
    .into()
}

fn value_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(Background::Color(palette.background.weak.color)),
        border: Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: 4.0.into(),
        },
        ..container::Style::default()
    }
}
