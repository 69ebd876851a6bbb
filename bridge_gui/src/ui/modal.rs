//! Modal dialog component
//!
//! Overlay used to confirm destructive actions before the controller runs
//! them.

use iced::widget::{button, column, container, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use bridge_core::controller::RESET_PROMPT;

use crate::Message;

/// Types of modal dialogs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalType {
    /// Confirm restoring every parameter to its default
    ConfirmReset,
}

/// Render a modal backdrop (semi-transparent overlay that catches clicks)
pub fn view_backdrop() -> Element<'static, Message> {
    button(Space::new())
        .on_press(Message::ModalCancel)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_, _| {
            iced::widget::button::Style::default()
                .with_background(iced::Color::from_rgba(0.0, 0.0, 0.0, 0.5))
        })
        .into()
}

/// Render a modal dialog based on its type
pub fn view_modal(modal_type: &ModalType) -> Element<'_, Message> {
    match modal_type {
        ModalType::ConfirmReset => view_confirm_reset_modal(),
    }
}

fn view_confirm_reset_modal() -> Element<'static, Message> {
    let title = text("Reset Parameters?").size(18);
    let description = text(RESET_PROMPT).size(12);

    let buttons = row![
        Space::new().width(Length::Fill),
        button(text("Cancel").size(11))
            .on_press(Message::ModalCancel)
            .padding(Padding::from([6, 16]))
            .style(button::secondary),
        Space::new().width(8),
        button(text("Reset").size(11))
            .on_press(Message::ModalConfirm)
            .padding(Padding::from([6, 16]))
            .style(button::danger),
    ]
    .align_y(Alignment::Center);

    let content = column![
        title,
        Space::new().height(12),
        description,
        Space::new().height(20),
        buttons,
    ]
    .width(Length::Fixed(400.0));

    let modal_box = container(content)
        .padding(20)
        .style(container::bordered_box);

    // Center the modal in the screen
    container(modal_box)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(iced::alignment::Horizontal::Center)
        .align_y(iced::alignment::Vertical::Center)
        .into()
}
