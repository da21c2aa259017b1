/// Full-size image overlay
use iced::alignment::Horizontal;
use iced::widget::{button, column, container, image, mouse_area, opaque, text};
use iced::{Background, Color, ContentFit, Element, Length};

use graph_gallery::state::data::ImageState;
use graph_gallery::state::modal::{ModalController, ModalEvent, ModalState};
use crate::Message;

/// The overlay, or `None` while closed
pub fn view(modal: &ModalController) -> Option<Element<'_, Message>> {
    let ModalState::Open { filename, image: state } = modal.state() else {
        return None;
    };

    // Clicks on the picture are swallowed so only the backdrop closes it
    let picture: Element<'_, Message> = match state {
        ImageState::Ready(handle) => mouse_area(image(handle.clone()).content_fit(ContentFit::Contain))
            .on_press(Message::Modal(ModalEvent::ImageClicked))
            .into(),
        ImageState::Loading => text("Loading...").size(16).color(Color::WHITE).into(),
        ImageState::Failed(message) => text(format!("Could not load image: {message}"))
            .size(14)
            .color(Color::WHITE)
            .into(),
    };

    let close = button(text("×").size(28).color(Color::WHITE))
        .on_press(Message::Modal(ModalEvent::CloseClicked))
        .style(button::text);

    let layout = column![
        container(close).width(Length::Fill).align_x(Horizontal::Right),
        container(picture)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill),
        container(text(filename.as_str()).size(14).color(Color::WHITE))
            .width(Length::Fill)
            .center_x(Length::Fill),
    ]
    .spacing(8)
    .padding(20);

    let backdrop = container(layout)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.9))),
            ..container::Style::default()
        });

    Some(opaque(
        mouse_area(backdrop).on_press(Message::Modal(ModalEvent::BackdropClicked)),
    ))
}
