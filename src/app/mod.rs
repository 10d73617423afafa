// SPDX-License-Identifier: GPL-3.0-only

//! Main application module for Snapcam
//!
//! # Architecture
//!
//! - `screen`: the camera screen state machine (pure, no I/O)
//! - `effects`: runs screen effects against the camera and gallery capabilities
//! - `state`: Application state types (AppModel, Message)
//! - `controls`: capture button, live toggles, review buttons
//! - `view`: Main view rendering
//! - `update`: Message handling
//!
//! The preview pipeline runs as a subscription that only exists while the
//! screen is Live with camera access, so the camera is released while
//! reviewing.

mod controls;
pub mod effects;
mod handlers;
pub mod screen;
mod state;
mod update;
mod view;

use crate::backends::camera::{
    CameraDevice, Facing, FrameSlot, PipeWireCamera, PreviewPipeline, enumerate_cameras,
};
use crate::backends::gallery::GalleryStore;
use crate::config::Config;
use crate::constants::{self, pipeline, timing};
use crate::fl;
use crate::flash::FlashHardware;
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
use effects::Capabilities;
use screen::CameraScreen;
pub use state::{AppModel, ContextPage, Message, ReviewImage};
use std::os::fd::RawFd;
use std::sync::Arc;
use tracing::{error, info, warn};

const REPOSITORY: &str = "https://github.com/snapcam/snapcam";
const APP_ICON: &[u8] =
    include_bytes!("../../resources/icons/hicolor/scalable/apps/io.github.snapcam.Snapcam.svg");

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = constants::APP_ID;

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        // Initialize GStreamer early (required before any GStreamer calls)
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let camera = Arc::new(PipeWireCamera::new(FrameSlot::new(), FlashHardware::detect()));
        let library = Arc::new(GalleryStore::for_album(&config.gallery_album));
        info!(gallery = %library.dir().display(), "Gallery folder");

        let capabilities = Capabilities::new(camera.clone(), library);
        let screen = CameraScreen::new().with_quality(config.capture_quality);

        let mut app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            screen,
            camera,
            capabilities,
            cameras: None,
            current_frame: None,
            review_image: None,
            screen_flash_active: false,
        };

        let enumerate_task = Task::perform(
            async {
                tokio::task::spawn_blocking(enumerate_cameras)
                    .await
                    .unwrap_or_default()
            },
            |cameras| cosmic::Action::App(Message::CamerasEnumerated(cameras)),
        );

        let mount_effects = app.screen.mount();
        let mount_task = app.run_effects(mount_effects);

        (app, Task::batch([enumerate_task, mount_task]))
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::tooltip(
                widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                    .on_press(Message::ToggleContextPage(ContextPage::About)),
                widget::text(fl!("about")),
                widget::tooltip::Position::Bottom,
            )
            .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
        })
    }

    /// Notice dialog (saved / failure)
    fn dialog(&self) -> Option<Element<'_, Self::Message>> {
        self.notice_dialog()
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        let camera_sub = match (self.screen.is_live(), self.active_device()) {
            (true, Some(device)) => preview_subscription(
                device.clone(),
                self.screen.facing(),
                self.mirror_preview(),
                self.camera.pipewire_remote_fd(),
                self.camera.frame_slot(),
            ),
            _ => Subscription::none(),
        };

        Subscription::batch([config_sub, camera_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}

/// Preview feed for one camera; restarts whenever device, facing, mirroring
/// or the portal remote changes
fn preview_subscription(
    device: CameraDevice,
    facing: Facing,
    mirror: bool,
    remote_fd: Option<RawFd>,
    slot: Arc<FrameSlot>,
) -> Subscription<Message> {
    use cosmic::iced::futures::StreamExt;

    Subscription::run_with_id(
        ("camera", device.path.clone(), facing, mirror, remote_fd),
        cosmic::iced::stream::channel(
            pipeline::PREVIEW_CHANNEL_CAPACITY,
            move |mut output| async move {
                info!(name = %device.name, path = %device.path, %facing, mirror, "Camera subscription started");

                loop {
                    let (sender, mut receiver) =
                        futures::channel::mpsc::channel(pipeline::PREVIEW_CHANNEL_CAPACITY);

                    let preview = match PreviewPipeline::new(
                        &device,
                        mirror,
                        remote_fd,
                        sender,
                        Arc::clone(&slot),
                    ) {
                        Ok(preview) => preview,
                        Err(e) => {
                            error!(error = %e, "Failed to start preview pipeline");
                            tokio::time::sleep(std::time::Duration::from_secs(
                                timing::PIPELINE_RETRY_SECS,
                            ))
                            .await;
                            continue;
                        }
                    };

                    let mut frame_count = 0u64;
                    loop {
                        match tokio::time::timeout(
                            std::time::Duration::from_millis(250),
                            receiver.next(),
                        )
                        .await
                        {
                            Ok(Some(frame)) => {
                                frame_count += 1;
                                if let Err(e) = output.try_send(Message::CameraFrame(frame)) {
                                    if e.is_disconnected() {
                                        info!("Output channel closed - camera subscription ending");
                                        return;
                                    }
                                    if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
                                        warn!(frame = frame_count, "Frame dropped (UI channel full)");
                                    }
                                }
                            }
                            Ok(None) => {
                                info!("Preview frame stream ended");
                                break;
                            }
                            Err(_) => {
                                if output.is_closed() {
                                    info!("Output channel closed - camera subscription ending");
                                    return;
                                }
                                if let Some(message) = preview.poll_error() {
                                    error!(error = %message, "Preview pipeline error");
                                    break;
                                }
                            }
                        }
                    }

                    drop(preview);
                    tokio::time::sleep(std::time::Duration::from_secs(timing::PIPELINE_RETRY_SECS))
                        .await;
                }
            },
        ),
    )
}
