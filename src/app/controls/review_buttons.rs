// SPDX-License-Identifier: GPL-3.0-only

//! Retake and save buttons of the review view

use crate::app::state::{AppModel, Message};
use crate::app::view::overlay_container_style;
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

impl AppModel {
    /// Retake on the left, save on the right; both disabled while saving
    pub fn build_review_buttons(&self, save_pending: bool) -> Element<'_, Message> {
        let retake = review_button(
            "edit-undo-symbolic",
            fl!("retake"),
            (!save_pending).then_some(Message::Retake),
        );
        let save = review_button(
            "document-save-symbolic",
            fl!("save-to-gallery"),
            (!save_pending).then_some(Message::Save),
        );

        widget::row()
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(retake)
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(save)
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .align_y(Alignment::Center)
            .width(Length::Fill)
            .padding([0, 0, ui::BOTTOM_CONTROLS_MARGIN, 0])
            .into()
    }
}

fn review_button<'a>(
    icon_name: &'static str,
    label: String,
    on_press: Option<Message>,
) -> Element<'a, Message> {
    let content = widget::column()
        .push(widget::icon::from_name(icon_name).size(ui::CONTROL_ICON_SIZE))
        .push(widget::text(label).size(12))
        .spacing(4)
        .align_x(Alignment::Center);

    let button = widget::button::custom(
        widget::container(content)
            .width(Length::Fixed(ui::REVIEW_BUTTON_SIZE))
            .height(Length::Fixed(ui::REVIEW_BUTTON_SIZE))
            .center(Length::Fixed(ui::REVIEW_BUTTON_SIZE)),
    )
    .padding(0)
    .class(cosmic::theme::Button::Text)
    .on_press_maybe(on_press);

    widget::container(button)
        .style(overlay_container_style)
        .into()
}
