//! # Bridge Parameter Form
//!
//! Desktop front end for the bridge drawing server. The window shows every
//! bridge parameter grouped by section, validates fields as they are edited,
//! validates the whole set against the server and saves the generated drawing
//! through a native file dialog.
//!
//! All form logic lives in [`bridge_core::FormController`]. This crate turns
//! its effects into Iced tasks and renders its document model.
//!
//! Settings are read from the JSON file given as the first argument, if any.

mod ui;

use std::path::PathBuf;

use iced::widget::{column, row, rule, stack};
use iced::{Element, Length, Task};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use bridge_core::client::GeneratedDrawing;
use bridge_core::clipboard::{
    clipboard_write_finished, copy_parameters_to_clipboard, load_parameters_from_clipboard,
};
use bridge_core::debounce::Cancel;
use bridge_core::{
    resolve_settings, BridgeError, BridgeResult, DrawingClient, Effect, Effects, FormController, FormSettings,
    OutputFormat, ValidationOutcome,
};

use ui::modal::ModalType;

pub fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    iced::application(App::new, App::update, App::view)
        .title("Bridge Parameters")
        .window_size((1200.0, 820.0))
        .run()
}

#[derive(Debug, Clone)]
pub enum Message {
    // Field events
    FieldChanged(String, String),
    /// Enter pressed inside a field
    FieldSubmitted(String),
    FieldSettled(String),

    // Toolbar
    ValidatePressed,
    FormatSelected(OutputFormat),
    GeneratePressed,
    ResetPressed,
    CopyPressed,
    PastePressed,

    // Modal
    ModalConfirm,
    ModalCancel,

    // Async results
    ValidationFinished(BridgeResult<ValidationOutcome>),
    DrawingReceived(BridgeResult<GeneratedDrawing>),
    DrawingSaved(BridgeResult<Option<PathBuf>>),
    ClipboardWritten,
    ClipboardRead(Option<String>),
    ToastExpired(Uuid),
}

/// Iced task handle usable as a debounce timer handle
struct TaskHandle(iced::task::Handle);

impl Cancel for TaskHandle {
    fn cancel(&self) {
        self.0.abort();
    }
}

pub struct App {
    controller: FormController,
    client: BridgeResult<DrawingClient>,
    selected_format: OutputFormat,
    modal: Option<ModalType>,
    /// Last save location or settings problem, shown in the status bar
    status: String,
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
        let (settings, status) = match resolve_settings(settings_path.as_deref()) {
            Ok(settings) => (settings, String::new()),
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default settings");
                (FormSettings::default().with_env_overrides(), e.to_string())
            }
        };

        let client = DrawingClient::from_settings(&settings);
        if let Err(e) = &client {
            tracing::error!(error = %e, "drawing server client unavailable");
        }
        tracing::info!(server = %settings.server_url, "bridge form started");

        let app = App {
            controller: FormController::with_bridge_parameters(settings),
            client,
            selected_format: OutputFormat::default(),
            modal: None,
            status,
        };
        (app, Task::none())
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FieldChanged(key, value) => {
                let effects = self.controller.field_input(&key, value);
                self.run_effects(effects)
            }
            Message::FieldSubmitted(_) | Message::ValidatePressed => {
                let effects = self.controller.validate_parameters();
                self.run_effects(effects)
            }
            // text_input has no focus-lost event, so the settle timer stands
            // in for blur validation.
            Message::FieldSettled(key) => {
                self.controller.field_settled(&key);
                Task::none()
            }
            Message::FormatSelected(format) => {
                self.selected_format = format;
                Task::none()
            }
            Message::GeneratePressed => {
                let effects = self.controller.handle_form_submit(self.selected_format);
                self.run_effects(effects)
            }
            Message::ResetPressed => {
                let effects = self.controller.request_reset();
                self.run_effects(effects)
            }
            Message::CopyPressed => {
                let effects = copy_parameters_to_clipboard(&mut self.controller);
                self.run_effects(effects)
            }
            Message::PastePressed => iced::clipboard::read().map(Message::ClipboardRead),

            Message::ModalConfirm => match self.modal.take() {
                Some(ModalType::ConfirmReset) => {
                    let effects = self.controller.reset_to_defaults();
                    self.run_effects(effects)
                }
                None => Task::none(),
            },
            Message::ModalCancel => {
                self.modal = None;
                Task::none()
            }

            Message::ValidationFinished(result) => {
                self.controller.finish_remote_validation(result);
                Task::none()
            }
            Message::DrawingReceived(Ok(drawing)) => Task::perform(save_drawing(drawing), Message::DrawingSaved),
            Message::DrawingReceived(Err(e)) => {
                let effects = self.controller.finish_submission(Err(e));
                self.run_effects(effects)
            }
            Message::DrawingSaved(result) => {
                let result = match result {
                    Ok(Some(path)) => {
                        self.status = format!("Saved {}", path.display());
                        Ok(())
                    }
                    Ok(None) => {
                        self.status = "Save cancelled".to_string();
                        Ok(())
                    }
                    Err(e) => {
                        tracing::error!(details = %serde_json::to_string(&e).unwrap_or_default(), "saving drawing failed");
                        Err(e)
                    }
                };
                let effects = self.controller.finish_submission(result);
                self.run_effects(effects)
            }
            Message::ClipboardWritten => {
                let effects = clipboard_write_finished(&mut self.controller, Ok(()));
                self.run_effects(effects)
            }
            Message::ClipboardRead(text) => {
                let text = text.ok_or_else(|| BridgeError::clipboard_unavailable("read", "Clipboard is empty"));
                let effects = load_parameters_from_clipboard(&mut self.controller, text);
                self.run_effects(effects)
            }
            Message::ToastExpired(id) => {
                self.controller.expire_toast(id);
                Task::none()
            }
        }
    }

    /// Turn controller effects into Iced tasks
    fn run_effects(&mut self, effects: Effects) -> Task<Message> {
        let tasks: Vec<Task<Message>> = effects.into_iter().map(|effect| self.run_effect(effect)).collect();
        Task::batch(tasks)
    }

    fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::ScheduleFieldSettle { key, delay } => {
                let settled = key.clone();
                let (task, handle) =
                    Task::perform(tokio::time::sleep(delay), move |_| Message::FieldSettled(settled)).abortable();
                self.controller.arm_settle_timer(&key, Box::new(TaskHandle(handle)));
                task
            }
            Effect::ScheduleToastExpiry { id, delay } => {
                Task::perform(tokio::time::sleep(delay), move |_| Message::ToastExpired(id))
            }
            Effect::RemoteValidate(parameters) => {
                let client = self.client.clone();
                Task::perform(async move { client?.validate(&parameters).await }, Message::ValidationFinished)
            }
            Effect::Submit { parameters, format } => {
                let client = self.client.clone();
                Task::perform(
                    async move { client?.generate(&parameters, format).await },
                    Message::DrawingReceived,
                )
            }
            Effect::ConfirmReset => {
                self.modal = Some(ModalType::ConfirmReset);
                Task::none()
            }
            Effect::WriteClipboard(text) => {
                // iced reports no write failure; only the CLI clipboard file
                // can reach the copy-failed toast.
                iced::clipboard::write::<Message>(text).chain(Task::done(Message::ClipboardWritten))
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let form = self.controller.form();

        let content = column![
            ui::toolbar::view_header(&self.controller.settings().server_url),
            ui::toolbar::view_toolbar(form, self.selected_format),
            rule::horizontal(1),
            row![
                ui::parameter_panel::view_parameter_panel(form),
                ui::results_panel::view_results_panel(&form.results),
            ]
            .spacing(5)
            .height(Length::Fill),
            ui::status_bar::view_status_bar(&form.toasts, &self.status),
        ]
        .spacing(4)
        .padding(8);

        match &self.modal {
            Some(modal_type) => stack![content, ui::modal::view_backdrop(), ui::modal::view_modal(modal_type)].into(),
            None => content.into(),
        }
    }
}

/// Ask where to save the drawing and write it there.
///
/// `Ok(None)` when the user cancels the dialog.
async fn save_drawing(drawing: GeneratedDrawing) -> BridgeResult<Option<PathBuf>> {
    let Some(handle) = rfd::AsyncFileDialog::new()
        .set_title("Save Drawing")
        .set_file_name(&drawing.file_name)
        .add_filter(drawing.format.to_string(), &[drawing.format.extension()])
        .save_file()
        .await
    else {
        return Ok(None);
    };

    let path = handle.path().to_path_buf();
    std::fs::write(&path, &drawing.bytes)
        .map_err(|e| BridgeError::file_error("write", path.display().to_string(), e.to_string()))?;

    tracing::info!(path = %path.display(), size = drawing.bytes.len(), "drawing saved");
    Ok(Some(path))
}
