// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! Renders whatever [`ScreenView`] the camera screen reports:
//! - Blank while camera permission is undetermined
//! - Permission prompt when camera access was denied
//! - Live preview with flash/lens toggles and the capture button
//! - Review of the captured photo with retake and save
//!
//! Notices (saved, capture/save failures) are shown through the application
//! dialog.

use crate::app::screen::{Notice, ScreenView};
use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::errors::{Capability, ScreenError};
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget;

/// Translucent themed background for controls drawn over the preview
pub fn overlay_container_style(theme: &cosmic::Theme) -> widget::container::Style {
    let cosmic = theme.cosmic();
    let mut background: Color = cosmic.bg_color().into();
    background.a = ui::OVERLAY_BACKGROUND_ALPHA;

    widget::container::Style {
        background: Some(Background::Color(background)),
        text_color: Some(cosmic.on_bg_color().into()),
        border: cosmic::iced::Border {
            radius: cosmic.corner_radii.radius_m.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn black_background(_theme: &cosmic::Theme) -> widget::container::Style {
    widget::container::Style {
        background: Some(Background::Color(Color::BLACK)),
        ..Default::default()
    }
}

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match self.screen.view() {
            ScreenView::Blank => widget::Space::new(Length::Fill, Length::Fill).into(),
            ScreenView::PermissionPrompt { requesting } => self.build_permission_prompt(requesting),
            ScreenView::Live {
                flash,
                capture_pending,
                ..
            } => {
                let preview = self.build_camera_preview();

                // Screen flash: only the preview under a white overlay, no controls
                if self.screen_flash_active {
                    let flash_overlay =
                        widget::container(widget::Space::new(Length::Fill, Length::Fill))
                            .width(Length::Fill)
                            .height(Length::Fill)
                            .style(|_theme| widget::container::Style {
                                background: Some(Background::Color(Color::WHITE)),
                                ..Default::default()
                            });
                    cosmic::iced::widget::stack![preview, flash_overlay]
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .into()
                } else {
                    let controls = widget::column()
                        .push(self.build_top_bar(flash))
                        .push(widget::Space::new(Length::Fill, Length::Fill))
                        .push(self.build_capture_button(capture_pending))
                        .width(Length::Fill)
                        .height(Length::Fill);

                    cosmic::iced::widget::stack![preview, controls]
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .into()
                }
            }
            ScreenView::Reviewing { save_pending, .. } => {
                let controls = widget::column()
                    .push(widget::Space::new(Length::Fill, Length::Fill))
                    .push(self.build_review_buttons(save_pending))
                    .width(Length::Fill)
                    .height(Length::Fill);

                cosmic::iced::widget::stack![self.build_review_image(), controls]
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .into()
            }
        };

        widget::container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(black_background)
            .into()
    }

    fn build_permission_prompt(&self, requesting: bool) -> Element<'_, Message> {
        let column = widget::column()
            .push(widget::icon::from_name("camera-disabled-symbolic").size(ui::PERMISSION_ICON_SIZE))
            .push(widget::text(fl!("camera-access-required")).size(18))
            .push(
                widget::button::suggested(fl!("grant-camera-access"))
                    .on_press_maybe((!requesting).then_some(Message::RequestCameraPermission)),
            )
            .spacing(16)
            .align_x(Alignment::Center);

        widget::container(column)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(cosmic::iced::alignment::Horizontal::Center)
            .align_y(cosmic::iced::alignment::Vertical::Center)
            .style(|theme| widget::container::Style {
                background: Some(Background::Color(theme.cosmic().bg_color().into())),
                text_color: Some(theme.cosmic().on_bg_color().into()),
                ..Default::default()
            })
            .into()
    }

    /// Latest preview frame, or a waiting message until the first frame arrives
    fn build_camera_preview(&self) -> Element<'_, Message> {
        let Some(frame) = &self.current_frame else {
            return widget::container(widget::text(fl!("waiting-for-camera")).size(16))
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(cosmic::iced::alignment::Horizontal::Center)
                .align_y(cosmic::iced::alignment::Vertical::Center)
                .style(|_theme| widget::container::Style {
                    text_color: Some(Color::WHITE),
                    ..Default::default()
                })
                .into();
        };

        let handle =
            widget::image::Handle::from_rgba(frame.width, frame.height, frame.data.to_vec());

        widget::container(
            widget::image(handle)
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center(Length::Fill)
        .into()
    }

    fn build_review_image(&self) -> Element<'_, Message> {
        match &self.review_image {
            Some(review) => widget::container(
                widget::image(review.handle.clone())
                    .content_fit(ContentFit::Contain)
                    .width(Length::Fill)
                    .height(Length::Fill),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .center(Length::Fill)
            .into(),
            None => widget::Space::new(Length::Fill, Length::Fill).into(),
        }
    }

    /// Dialog for the current notice, if any
    pub fn notice_dialog(&self) -> Option<Element<'_, Message>> {
        let notice = self.screen.notice()?;

        let (title, body) = match notice {
            Notice::Saved(_) => (fl!("saved-title"), fl!("saved-body")),
            Notice::CaptureFailed(e) => (
                fl!("capture-failed-title"),
                ScreenError::Capture(e.clone()).to_string(),
            ),
            Notice::SaveFailed(crate::errors::SaveError::PermissionDenied) => (
                fl!("save-failed-title"),
                ScreenError::PermissionDenied(Capability::MediaLibrary).to_string(),
            ),
            Notice::SaveFailed(e) => (
                fl!("save-failed-title"),
                ScreenError::Save(e.clone()).to_string(),
            ),
        };

        Some(
            widget::dialog()
                .title(title)
                .body(body)
                .primary_action(
                    widget::button::suggested(fl!("ok")).on_press(Message::DismissNotice),
                )
                .into(),
        )
    }
}
