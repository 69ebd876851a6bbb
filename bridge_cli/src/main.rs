//! # Bridge Parameter CLI
//!
//! Interactive terminal front end for the bridge parameter form. It drives the
//! same [`FormController`] as the GUI: values typed with `set` are checked
//! after the debounce pause, `validate` asks the server, `generate` saves the
//! drawing, and `copy`/`paste` use a JSON file as the clipboard.

mod command;

use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use bridge_core::clipboard::{
    clipboard_write_finished, copy_parameters_to_clipboard, load_parameters_from_clipboard,
};
use bridge_core::form::{FieldState, ToastKind};
use bridge_core::parameters::{format_number, ParameterGroup};
use bridge_core::{
    resolve_settings, BridgeError, BridgeResult, DrawingClient, Effect, Effects, FormController, GeneratedDrawing,
    UiState, ValidationOutcome,
};

use command::{parse_command, Command, HELP};

#[derive(Parser)]
#[command(name = "bridge_cli")]
#[command(about = "Bridge parameter form - validate parameters and generate drawings", long_about = None)]
struct Cli {
    /// Settings JSON file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Drawing server URL (overrides settings and BRIDGE_SERVER_URL)
    #[arg(long)]
    server: Option<String>,
}

/// Results of background work, fed back into the prompt loop
#[derive(Debug)]
enum Event {
    FieldSettled(String),
    ToastExpired(Uuid),
    Validation(BridgeResult<ValidationOutcome>),
    Drawing(BridgeResult<GeneratedDrawing>, Option<PathBuf>),
}

struct Shell {
    controller: FormController,
    client: DrawingClient,
    events: UnboundedSender<Event>,
    /// Waiting for the answer to the reset prompt
    confirming_reset: bool,
}

fn print_error(e: &BridgeError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = match resolve_settings(cli.settings.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    };
    if let Some(server) = cli.server {
        settings.server_url = server;
    }

    let client = match DrawingClient::from_settings(&settings) {
        Ok(client) => client,
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    };

    println!("Bridge Parameter Form");
    println!("=====================");
    println!("Server: {}", client.base_url());
    println!("Type 'help' for commands.");
    println!();

    let (tx, rx) = unbounded_channel();
    let shell = Shell {
        controller: FormController::with_bridge_parameters(settings),
        client,
        events: tx,
        confirming_reset: false,
    };
    shell.run(rx).await;
}

impl Shell {
    async fn run(mut self, mut events: UnboundedReceiver<Event>) {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if !self.handle_line(&line) {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to read stdin");
                        break;
                    }
                },
                Some(event) = events.recv() => self.handle_event(event),
            }
        }
    }

    /// Returns `false` when the user asked to quit
    fn handle_line(&mut self, line: &str) -> bool {
        if self.confirming_reset {
            self.confirming_reset = false;
            if matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                let effects = self.controller.reset_to_defaults();
                self.run_effects(effects);
            } else {
                println!("Reset cancelled");
            }
            return true;
        }

        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return true,
            Err(message) => {
                eprintln!("{}", message);
                return true;
            }
        };

        let effects = match command {
            Command::Help => {
                println!("{}", HELP);
                Vec::new()
            }
            Command::Show(filter) => {
                self.show(filter.as_deref());
                Vec::new()
            }
            Command::Set { key, value } => {
                if self.controller.form().field(&key).is_none() {
                    eprintln!("Unknown parameter '{}'", key);
                }
                self.controller.field_input(&key, value)
            }
            Command::Blur(key) => {
                if self.controller.validate_single_field(&key).is_none() {
                    eprintln!("Unknown parameter '{}'", key);
                } else {
                    self.print_field_state(&key);
                }
                Vec::new()
            }
            Command::Validate => {
                let effects = self.controller.validate_parameters();
                if self.controller.is_validating() && effects.is_empty() {
                    println!("Validation already in progress");
                } else if effects.is_empty() {
                    self.print_results();
                }
                effects
            }
            Command::Results => {
                self.print_results();
                Vec::new()
            }
            Command::Generate { format, path } => {
                let effects = self.controller.handle_form_submit(format);
                if effects.is_empty() {
                    println!("Generation is disabled until the parameters validate");
                }
                self.run_submission(effects, path);
                return true;
            }
            Command::Reset => self.controller.request_reset(),
            Command::Copy(path) => {
                let path = path.unwrap_or_else(|| self.controller.settings().clipboard_path.clone());
                let effects = copy_parameters_to_clipboard(&mut self.controller);
                self.run_clipboard_writes(effects, &path)
            }
            Command::Paste(path) => {
                let path = path.unwrap_or_else(|| self.controller.settings().clipboard_path.clone());
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| BridgeError::clipboard_unavailable("read", format!("{}: {}", path.display(), e)));
                load_parameters_from_clipboard(&mut self.controller, text)
            }
            Command::Quit => return false,
        };

        self.run_effects(effects);
        true
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::FieldSettled(key) => {
                self.controller.field_settled(&key);
                self.print_field_state(&key);
            }
            Event::ToastExpired(id) => {
                self.controller.expire_toast(id);
            }
            Event::Validation(result) => {
                if let Err(e) = &result {
                    print_error(e);
                }
                self.controller.finish_remote_validation(result);
                self.print_results();
            }
            Event::Drawing(result, path) => {
                let result = result.and_then(|drawing| save_drawing(&drawing, path.as_deref()));
                if let Err(e) = &result {
                    print_error(e);
                }
                let effects = self.controller.finish_submission(result);
                self.run_effects(effects);
            }
        }
    }

    /// Run submission effects, carrying the output path into the request task
    fn run_submission(&mut self, effects: Effects, path: Option<PathBuf>) {
        for effect in effects {
            match effect {
                Effect::Submit { parameters, format } => {
                    println!("{}", format.loading_label());
                    let client = self.client.clone();
                    let events = self.events.clone();
                    let path = path.clone();
                    tokio::spawn(async move {
                        let result = client.generate(&parameters, format).await;
                        let _ = events.send(Event::Drawing(result, path));
                    });
                }
                other => self.run_effects(vec![other]),
            }
        }
    }

    /// Write clipboard effects to the clipboard file
    fn run_clipboard_writes(&mut self, effects: Effects, path: &Path) -> Effects {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::WriteClipboard(text) => {
                    let result = std::fs::write(path, text).map_err(|e| {
                        BridgeError::clipboard_unavailable("write", format!("{}: {}", path.display(), e))
                    });
                    if result.is_ok() {
                        println!("Wrote {}", path.display());
                    }
                    follow_up.extend(clipboard_write_finished(&mut self.controller, result));
                }
                other => follow_up.push(other),
            }
        }
        follow_up
    }

    fn run_effects(&mut self, effects: Effects) {
        for effect in effects {
            match effect {
                Effect::ScheduleFieldSettle { key, delay } => {
                    let events = self.events.clone();
                    let settled = key.clone();
                    let task = tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = events.send(Event::FieldSettled(settled));
                    });
                    self.controller.arm_settle_timer(&key, Box::new(task.abort_handle()));
                }
                Effect::ScheduleToastExpiry { id, delay } => {
                    if let Some(toast) = self.controller.form().toast(id) {
                        print_toast(toast.kind, &toast.message);
                    }
                    let events = self.events.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = events.send(Event::ToastExpired(id));
                    });
                }
                Effect::RemoteValidate(parameters) => {
                    println!("Validating with {}...", self.client.base_url());
                    let client = self.client.clone();
                    let events = self.events.clone();
                    tokio::spawn(async move {
                        let result = client.validate(&parameters).await;
                        let _ = events.send(Event::Validation(result));
                    });
                }
                effect @ Effect::Submit { .. } => {
                    self.run_submission(vec![effect], None);
                }
                Effect::ConfirmReset => {
                    println!("{} (y/N)", bridge_core::controller::RESET_PROMPT);
                    self.confirming_reset = true;
                }
                effect @ Effect::WriteClipboard(_) => {
                    let path = self.controller.settings().clipboard_path.clone();
                    let follow_up = self.run_clipboard_writes(vec![effect], &path);
                    self.run_effects(follow_up);
                }
            }
        }
    }

    // ===== Output =====

    fn show(&self, filter: Option<&str>) {
        let form = self.controller.form();
        let filter = filter.map(|f| f.to_ascii_lowercase());

        if let Some(field) = filter.as_deref().and_then(|f| form.field(&f.to_ascii_uppercase())) {
            print_field(field);
            for line in field_details(field) {
                println!("           {}", line);
            }
            return;
        }

        let mut printed = 0;
        for group in ParameterGroup::ALL {
            if let Some(f) = &filter {
                if !group.display_name().to_ascii_lowercase().contains(f.as_str()) {
                    continue;
                }
            }
            println!("[{}]", group.display_name());
            for key in group.keys() {
                if let Some(field) = form.field(key) {
                    print_field(field);
                    printed += 1;
                }
            }
        }

        if filter.is_none() {
            let others: Vec<&FieldState> = form.fields.iter().filter(|f| ParameterGroup::of(&f.key).is_none()).collect();
            if !others.is_empty() {
                println!("[Other]");
                for field in others {
                    print_field(field);
                    printed += 1;
                }
            }
        }

        if printed == 0 {
            println!("No parameter or group matches");
        }
    }

    fn print_field_state(&self, key: &str) {
        if let Some(field) = self.controller.form().field(key) {
            match &field.ui {
                UiState::Invalid(message) => println!("  {} ✗ {}", key, message),
                UiState::Valid => println!("  {} ✓", key),
                UiState::Neutral => {}
            }
        }
    }

    fn print_results(&self) {
        let results = &self.controller.form().results;
        let Some(outcome) = results.outcome.as_ref().filter(|_| results.visible) else {
            println!("No validation results yet");
            return;
        };

        println!("{}", results.status_text());
        for error in &outcome.errors {
            match &error.field {
                Some(field) => println!("  - {}: {}", field, error.message),
                None => println!("  - {}", error.message),
            }
        }

        let generate = &self.controller.form().generate_button;
        println!(
            "Generate: {}",
            if generate.enabled { "enabled" } else { "disabled" }
        );
    }
}

fn print_field(field: &FieldState) {
    let marker = match &field.ui {
        UiState::Neutral => String::new(),
        UiState::Valid => " ✓".to_string(),
        UiState::Invalid(message) => format!(" ✗ {}", message),
    };
    println!(
        "  {:<8} {:<34} {:>12} {:<3}{}",
        field.key, field.label, field.value, field.unit, marker
    );
}

/// Extra lines for `show KEY`: help text, kind, accepted range and default
fn field_details(field: &FieldState) -> Vec<String> {
    let mut lines = Vec::new();
    if !field.description.is_empty() {
        lines.push(field.description.clone());
    }

    let c = &field.constraints;
    let bound = |b: Option<f64>| b.map(format_number).unwrap_or_else(|| "-".to_string());
    if let Some(kind) = c.kind {
        let mut line = format!("{}, {} to {}", kind.display_name(), bound(c.min), bound(c.max));
        if c.required {
            line.push_str(", required");
        }
        lines.push(line);
    }

    if let Some(default) = &field.default_value {
        lines.push(format!("default {}", default));
    }
    lines
}

fn print_toast(kind: ToastKind, message: &str) {
    match kind {
        ToastKind::Error => eprintln!("! {}", message),
        ToastKind::Success => println!("✓ {}", message),
        ToastKind::Info => println!("  {}", message),
    }
}

/// Write the drawing to `path`, or to its suggested file name
fn save_drawing(drawing: &GeneratedDrawing, path: Option<&Path>) -> BridgeResult<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&drawing.file_name));

    std::fs::write(&path, &drawing.bytes)
        .map_err(|e| BridgeError::file_error("write", path.display().to_string(), e.to_string()))?;

    println!("Saved {} ({} bytes)", path.display(), drawing.bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::FormModel;

    #[test]
    fn test_field_details_for_catalogue_field() {
        let form = FormModel::bridge_parameters();
        let details = field_details(form.field("NSPAN").unwrap());
        assert_eq!(
            details,
            vec![
                "Total number of bridge spans".to_string(),
                "integer, 1 to 10, required".to_string(),
                "default 1".to_string(),
            ]
        );
    }

    #[test]
    fn test_field_details_for_free_text() {
        assert!(field_details(&FieldState::text("NOTE", "Note")).is_empty());
    }
}
