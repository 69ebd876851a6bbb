//! Results Panel (Right Side)
//!
//! Shows the last validation outcome: headline, error list and the time it
//! was produced. Hidden (placeholder text) until the first validation and
//! again after a reset.

use iced::widget::{column, container, scrollable, text, Column, Space};
use iced::{Element, Length};

use bridge_core::form::ResultsPanel;

use crate::Message;

pub fn view_results_panel(results: &ResultsPanel) -> Element<'_, Message> {
    let content: Column<'_, Message> = match (&results.outcome, results.visible) {
        (Some(outcome), true) => {
            let headline_color = if outcome.valid { [0.2, 0.6, 0.2] } else { [0.8, 0.2, 0.2] };
            let mut content = column![
                text("Validation Results").size(14),
                Space::new().height(8),
                text(results.status_text()).size(13).color(headline_color),
            ]
            .spacing(4);

            for error in &outcome.errors {
                let line = match &error.field {
                    Some(field) => format!("• {}: {}", field, error.message),
                    None => format!("• {}", error.message),
                };
                content = content.push(text(line).size(11));
            }

            if let Some(shown_at) = results.shown_at {
                let local = shown_at.with_timezone(&chrono::Local);
                content = content.push(Space::new().height(8));
                content = content.push(
                    text(format!("Checked at {}", local.format("%H:%M:%S")))
                        .size(10)
                        .color([0.5, 0.5, 0.5]),
                );
            }
            content
        }
        _ => column![
            text("Validation Results").size(14),
            Space::new().height(8),
            text("Validate the parameters to see results here").size(11).color([0.5, 0.5, 0.5]),
        ],
    };

    container(scrollable(content.padding(8)))
        .width(Length::FillPortion(40))
        .style(container::bordered_box)
        .padding(5)
        .into()
}
