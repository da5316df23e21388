use crate::device_display::interface::{take_receiver, DeviceDisplay, UserEvent};
use crate::error::DisplayError;
use crate::library::logger::interface::Logger;
use crate::view::screen::{PredictionView, Screen};
use std::io::{BufRead, Write};
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};

const BAR_WIDTH: usize = 20;

/// Prints the screen as a text box whenever its text changes and reads
/// commands from stdin.
pub struct DeviceDisplayConsole {
    logger: Arc<dyn Logger + Send + Sync>,
    last_text: Option<String>,
    event_receiver: Mutex<Option<Receiver<UserEvent>>>,
}

impl DeviceDisplayConsole {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        let logger = logger.with_namespace("display").with_namespace("console");
        let (event_sender, event_receiver) = channel();

        let stdin_logger = logger.clone();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match parse_command(&line) {
                    Some(event) => {
                        if event_sender.send(event).is_err() {
                            break;
                        }
                    }
                    None => {
                        let _ = stdin_logger.warn(&format!(
                            "Unknown command {:?}, expected start, stop, reload or quit",
                            line.trim()
                        ));
                    }
                }
            }
        });

        Self {
            logger,
            last_text: None,
            event_receiver: Mutex::new(Some(event_receiver)),
        }
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn show(&mut self, screen: &Screen) -> Result<(), DisplayError> {
        let text = format_screen(screen);
        if self.last_text.as_deref() == Some(text.as_str()) {
            return Ok(());
        }

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        stdout.flush()?;
        let _ = self.logger.debug("Screen updated");

        self.last_text = Some(text);
        Ok(())
    }

    fn user_events(&self) -> Receiver<UserEvent> {
        take_receiver(&self.event_receiver)
    }
}

pub fn parse_command(line: &str) -> Option<UserEvent> {
    match line.trim().to_lowercase().as_str() {
        "start" => Some(UserEvent::Start),
        "stop" => Some(UserEvent::Stop),
        "reload" => Some(UserEvent::ReloadModel),
        "quit" | "exit" | "q" => Some(UserEvent::Quit),
        _ => None,
    }
}

pub fn format_screen(screen: &Screen) -> String {
    let mut lines = vec![];

    let mut control = format!("[{}]", screen.control.label);
    if screen.control.action.is_none() {
        control.push_str(" (busy)");
    }
    if let Some(detail) = &screen.control.detail {
        control.push_str(&format!(" {}", detail));
    }
    lines.push(control);

    let mut status = screen.model_status.text.clone();
    if screen.model_status.can_reload {
        status.push_str(" [reload]");
    }
    lines.push(status);

    if let Some(count) = screen.class_count {
        lines.push(format!("Classes: {}", count));
    }

    if let Some(frame) = &screen.preview {
        let resolution = frame.resolution();
        lines.push(format!("Preview: {}x{}", resolution.width, resolution.height));
    }

    match &screen.predictions {
        PredictionView::Empty => {}
        PredictionView::RankedList(rows) => {
            let label_width = rows.iter().map(|row| row.label.chars().count()).max().unwrap_or(0);
            for row in rows {
                let filled = ((row.percent / 100.0) * BAR_WIDTH as f32).round() as usize;
                let filled = filled.min(BAR_WIDTH);
                lines.push(format!(
                    "{:<width$} {}{} {:>3.0}%",
                    row.label,
                    "█".repeat(filled),
                    "░".repeat(BAR_WIDTH - filled),
                    row.percent,
                    width = label_width
                ));
            }
        }
        PredictionView::BestGuess(glyph) => lines.push(format!(">> {} <<", glyph)),
    }

    let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    let mut text = format!("┌{}┐\n", "─".repeat(width + 2));
    for line in &lines {
        let padding = width - line.chars().count();
        text.push_str(&format!("│ {}{} │\n", line, " ".repeat(padding)));
    }
    text.push_str(&format!("└{}┘", "─".repeat(width + 2)));
    text
}
