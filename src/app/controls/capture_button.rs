// SPDX-License-Identifier: GPL-3.0-only

//! Capture button widget implementation

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Background, Border, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the capture button widget
    ///
    /// White disc inside a white ring. While a capture is in flight the disc
    /// turns gray, shrinks slightly and stops reacting to presses.
    pub fn build_capture_button(&self, capture_pending: bool) -> Element<'_, Message> {
        let disc_color = if capture_pending {
            Color::from_rgb(0.7, 0.7, 0.7)
        } else {
            Color::WHITE
        };

        let inner_size = if capture_pending {
            ui::CAPTURE_BUTTON_INNER * 0.85
        } else {
            ui::CAPTURE_BUTTON_INNER
        };

        let disc = widget::container(widget::Space::new(
            Length::Fixed(inner_size),
            Length::Fixed(inner_size),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(disc_color)),
            border: Border {
                radius: (inner_size / 2.0).into(),
                ..Default::default()
            },
            ..Default::default()
        });

        let ring = widget::container(disc)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_x(ui::CAPTURE_BUTTON_OUTER)
            .center_y(ui::CAPTURE_BUTTON_OUTER)
            .style(|_theme| widget::container::Style {
                border: Border {
                    color: Color::WHITE,
                    width: ui::CAPTURE_BUTTON_BORDER,
                    radius: (ui::CAPTURE_BUTTON_OUTER / 2.0).into(),
                },
                ..Default::default()
            });

        let mut button = widget::button::custom(ring)
            .padding(0)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .class(cosmic::theme::Button::Text);

        if !capture_pending {
            button = button.on_press(Message::Capture);
        }

        let button = widget::tooltip(
            button,
            widget::text(fl!("take-photo")),
            widget::tooltip::Position::Top,
        );

        widget::container(button)
            .width(Length::Fill)
            .center_x(Length::Fill)
            .padding([0, 0, ui::BOTTOM_CONTROLS_MARGIN, 0])
            .into()
    }
}
