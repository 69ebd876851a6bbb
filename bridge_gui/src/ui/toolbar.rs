//! Toolbar component
//!
//! Validate and generate actions, output format picker, reset and clipboard
//! transfer.

use iced::widget::{button, pick_list, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use bridge_core::form::{ButtonState, Emphasis, FormModel};
use bridge_core::OutputFormat;

use crate::Message;

/// Render the application header with the server address
pub fn view_header(server_url: &str) -> Element<'_, Message> {
    row![
        text("Bridge Parameters").size(28),
        Space::new().width(Length::Fill),
        text(server_url).size(12).color([0.5, 0.5, 0.5]),
    ]
    .align_y(Alignment::Center)
    .into()
}

/// Button driven by a controller-owned [`ButtonState`]
fn action_button(state: &ButtonState, on_press: Message) -> Element<'_, Message> {
    button(text(state.label.as_str()).size(11))
        .on_press_maybe(state.enabled.then_some(on_press))
        .padding(Padding::from([4, 8]))
        .style(match state.emphasis {
            Emphasis::Primary => button::primary,
            Emphasis::Secondary => button::secondary,
        })
        .into()
}

/// Render the toolbar
pub fn view_toolbar(form: &FormModel, selected_format: OutputFormat) -> Element<'_, Message> {
    let form_actions = row![
        action_button(&form.validate_button, Message::ValidatePressed),
        pick_list(OutputFormat::ALL, Some(selected_format), Message::FormatSelected)
            .text_size(11)
            .padding(Padding::from([4, 8])),
        action_button(&form.generate_button, Message::GeneratePressed),
    ]
    .spacing(4)
    .align_y(Alignment::Center);

    let utility_actions = row![
        button(text("Copy").size(11))
            .on_press(Message::CopyPressed)
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
        button(text("Paste").size(11))
            .on_press(Message::PastePressed)
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
        button(text("Reset").size(11))
            .on_press(Message::ResetPressed)
            .padding(Padding::from([4, 8]))
            .style(button::danger),
    ]
    .spacing(4);

    row![
        form_actions,
        Space::new().width(Length::Fill),
        utility_actions,
    ]
    .padding(Padding::from([4, 0]))
    .align_y(Alignment::Center)
    .into()
}
