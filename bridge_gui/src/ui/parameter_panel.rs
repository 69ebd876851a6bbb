//! Parameter Panel (Left)
//!
//! One section per parameter group, each input followed by its unit and the
//! inline validation state. Parameters outside every group are listed under
//! "Other".

use iced::widget::{column, container, row, rule, scrollable, text, text_input, tooltip, Column, Space};
use iced::{Alignment, Element, Length};

use bridge_core::form::{FieldState, FormModel};
use bridge_core::parameters::ParameterGroup;
use bridge_core::UiState;

use crate::Message;

pub fn view_parameter_panel(form: &FormModel) -> Element<'_, Message> {
    let mut panel: Column<'_, Message> = column![].spacing(6);

    for group in ParameterGroup::ALL {
        let fields: Vec<&FieldState> = group.keys().iter().filter_map(|key| form.field(key)).collect();
        if fields.is_empty() {
            continue;
        }
        panel = panel.push(view_section(group.display_name(), fields));
    }

    let other: Vec<&FieldState> = form
        .fields
        .iter()
        .filter(|f| ParameterGroup::of(&f.key).is_none())
        .collect();
    if !other.is_empty() {
        panel = panel.push(view_section("Other", other));
    }

    container(scrollable(panel.padding(8)))
        .width(Length::FillPortion(60))
        .style(container::bordered_box)
        .padding(5)
        .into()
}

fn view_section<'a>(title: &'a str, fields: Vec<&'a FieldState>) -> Element<'a, Message> {
    let mut section: Column<'a, Message> = column![text(title).size(14), rule::horizontal(1)].spacing(4);
    for field in fields {
        section = section.push(labeled_input(field));
    }
    section.push(Space::new().height(8)).into()
}

/// Field label; hovering shows the parameter description
fn field_label(field: &FieldState) -> Element<'_, Message> {
    let label = text(field.label.as_str()).size(11).width(Length::Fixed(200.0));
    if field.description.is_empty() {
        return label.into();
    }
    tooltip(
        label,
        container(text(field.description.as_str()).size(10)).padding(4),
        tooltip::Position::Top,
    )
    .style(container::bordered_box)
    .into()
}

/// Labeled input with unit and validation feedback
fn labeled_input(field: &FieldState) -> Element<'_, Message> {
    let changed_key = field.key.clone();
    let submitted_key = field.key.clone();

    let marker = match &field.ui {
        UiState::Valid => text("✓").size(11).color([0.2, 0.6, 0.2]),
        UiState::Invalid(_) => text("✗").size(11).color([0.8, 0.2, 0.2]),
        UiState::Neutral => text("").size(11),
    };

    let input_row = row![
        field_label(field),
        text_input(field.key.as_str(), &field.value)
            .on_input(move |value| Message::FieldChanged(changed_key.clone(), value))
            .on_submit(Message::FieldSubmitted(submitted_key))
            .width(Length::Fill)
            .padding(4)
            .size(11),
        text(field.unit.as_str()).size(10).width(Length::Fixed(30.0)),
        marker.width(Length::Fixed(14.0)),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    match &field.ui {
        UiState::Invalid(message) => column![
            input_row,
            row![
                Space::new().width(Length::Fixed(206.0)),
                text(message.as_str()).size(10).color([0.8, 0.2, 0.2]),
            ],
        ]
        .spacing(2)
        .into(),
        _ => input_row.into(),
    }
}
