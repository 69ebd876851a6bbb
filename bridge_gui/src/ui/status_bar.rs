//! Status Bar (Bottom)
//!
//! Displays:
//! - Active toasts, newest last, colored by kind
//! - Last save location or settings warning

use iced::widget::{row, text, Row, Space};
use iced::{Element, Length, Padding};

use bridge_core::form::Toast;
use bridge_core::ToastKind;

use crate::Message;

fn toast_color(kind: ToastKind) -> [f32; 3] {
    match kind {
        ToastKind::Info => [0.2, 0.4, 0.7],
        ToastKind::Success => [0.2, 0.6, 0.2],
        ToastKind::Error => [0.8, 0.2, 0.2],
    }
}

/// Render the status bar
pub fn view_status_bar<'a>(toasts: &'a [Toast], status: &'a str) -> Element<'a, Message> {
    let mut toast_row: Row<'a, Message> = row![].spacing(12);
    for toast in toasts {
        toast_row = toast_row.push(text(toast.message.as_str()).size(11).color(toast_color(toast.kind)));
    }

    row![
        toast_row,
        Space::new().width(Length::Fill),
        text(status).size(10),
    ]
    .padding(Padding::from([4, 0]))
    .into()
}
