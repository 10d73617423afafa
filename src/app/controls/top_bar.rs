// SPDX-License-Identifier: GPL-3.0-only

//! Flash and lens toggles shown above the live preview

use crate::app::state::{AppModel, Message};
use crate::app::view::overlay_container_style;
use crate::constants::ui;
use crate::fl;
use crate::flash::FlashMode;
use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

/// Flash icon SVG (lightning bolt)
const FLASH_ICON: &[u8] = include_bytes!("../../../resources/button_icons/flash.svg");
/// Flash off icon SVG (lightning bolt with strike-through)
const FLASH_OFF_ICON: &[u8] = include_bytes!("../../../resources/button_icons/flash-off.svg");
/// Camera switch icon SVG (camera with circular arrows)
const CAMERA_SWITCH_ICON: &[u8] =
    include_bytes!("../../../resources/button_icons/camera-switch.svg");

impl AppModel {
    pub fn build_top_bar(&self, flash: FlashMode) -> Element<'_, Message> {
        let (flash_icon, flash_label) = match flash {
            FlashMode::On => (FLASH_ICON, fl!("flash-on")),
            FlashMode::Off => (FLASH_OFF_ICON, fl!("flash-off")),
        };

        let flash_button = overlay_icon_button(flash_icon, flash_label, Message::ToggleFlash);
        let switch_button =
            overlay_icon_button(CAMERA_SWITCH_ICON, fl!("flip-camera"), Message::ToggleFacing);

        widget::row()
            .push(flash_button)
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(switch_button)
            .align_y(Alignment::Center)
            .width(Length::Fill)
            .padding([ui::TOP_CONTROLS_PADDING, ui::TOP_CONTROLS_PADDING])
            .into()
    }
}

/// Themed icon button on a translucent background
fn overlay_icon_button<'a>(
    svg: &'static [u8],
    tooltip: String,
    message: Message,
) -> Element<'a, Message> {
    let handle = widget::icon::from_svg_bytes(svg).symbolic(true);
    let icon = widget::icon(handle).size(ui::CONTROL_ICON_SIZE);

    let button = widget::button::custom(
        widget::container(icon)
            .width(Length::Fixed(52.0))
            .height(Length::Fixed(52.0))
            .center(Length::Fixed(52.0)),
    )
    .padding(0)
    .class(cosmic::theme::Button::Text)
    .on_press(message);

    widget::tooltip(
        widget::container(button).style(overlay_container_style),
        widget::text(tooltip),
        widget::tooltip::Position::Bottom,
    )
    .into()
}
