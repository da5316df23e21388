use crate::config::Color;
use crate::device_display::interface::{take_receiver, DeviceDisplay, UserEvent};
use crate::error::DisplayError;
use crate::library::logger::interface::Logger;
use crate::view::screen::{ControlTone, PredictionView, Screen};
use image::{imageops, RgbImage};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const START_BLUE: egui::Color32 = egui::Color32::from_rgb(0x25, 0x63, 0xeb);
const STOP_RED: egui::Color32 = egui::Color32::from_rgb(0xdc, 0x26, 0x26);
const BUSY_GRAY: egui::Color32 = egui::Color32::from_rgb(0x6b, 0x72, 0x80);
const BAR_TRACK: egui::Color32 = egui::Color32::from_rgb(0x37, 0x41, 0x51);
const REPAINT_INTERVAL: Duration = Duration::from_millis(16);

/// Hands screens to an egui window running on the main thread.
pub struct DeviceDisplayGui {
    logger: Arc<dyn Logger + Send + Sync>,
    screen: Arc<Mutex<Option<Screen>>>,
    event_sender: Sender<UserEvent>,
    event_receiver: Mutex<Option<Receiver<UserEvent>>>,
}

impl DeviceDisplayGui {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        let (event_sender, event_receiver) = channel();
        Self {
            logger: logger.with_namespace("display").with_namespace("gui"),
            screen: Arc::new(Mutex::new(None)),
            event_sender,
            event_receiver: Mutex::new(Some(event_receiver)),
        }
    }

    /// The window that draws whatever this display was last shown.
    pub fn window(&self, capture_size: u32, flip: bool) -> DisplayWindow {
        DisplayWindow {
            logger: self.logger.clone(),
            screen: Arc::clone(&self.screen),
            event_sender: self.event_sender.clone(),
            capture_size,
            flip,
            texture: None,
            texture_sequence: None,
            quit_sent: false,
        }
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn show(&mut self, screen: &Screen) -> Result<(), DisplayError> {
        let mut current = self.screen.lock().map_err(|_| DisplayError::Poisoned)?;
        *current = Some(screen.clone());
        Ok(())
    }

    fn user_events(&self) -> Receiver<UserEvent> {
        take_receiver(&self.event_receiver)
    }
}

pub struct DisplayWindow {
    logger: Arc<dyn Logger + Send + Sync>,
    screen: Arc<Mutex<Option<Screen>>>,
    event_sender: Sender<UserEvent>,
    capture_size: u32,
    flip: bool,
    texture: Option<egui::TextureHandle>,
    texture_sequence: Option<u64>,
    quit_sent: bool,
}

impl DisplayWindow {
    /// Blocks until the window is closed. Must be called on the main thread.
    pub fn run(self) -> Result<(), DisplayError> {
        let side = self.capture_size as f32;
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([side + 40.0, side + 320.0])
                .with_min_inner_size([side + 40.0, side + 200.0]),
            ..Default::default()
        };

        eframe::run_native(
            "Webcam Classifier",
            options,
            Box::new(|_cc| Box::new(self)),
        )
        .map_err(|e| DisplayError::Window(e.to_string()))
    }

    fn send(&mut self, event: UserEvent) {
        if self.event_sender.send(event).is_err() {
            let _ = self.logger.warn(&format!("Dropped {:?}, app has stopped", event));
        }
    }

    fn preview(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, screen: &Screen) {
        let side = self.capture_size as f32;

        let Some(frame) = &screen.preview else {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(side, side), egui::Sense::hover());
            ui.painter().rect_filled(rect, 4.0, egui::Color32::BLACK);
            self.texture = None;
            self.texture_sequence = None;
            return;
        };

        if self.texture_sequence != Some(frame.sequence()) {
            let color_image = preview_image(frame.image(), self.flip);
            match &mut self.texture {
                Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
                None => {
                    self.texture = Some(ctx.load_texture(
                        "preview",
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ))
                }
            }
            self.texture_sequence = Some(frame.sequence());
        }

        if let Some(texture) = &self.texture {
            ui.image((texture.id(), egui::vec2(side, side)));
        }
    }

    fn control(&mut self, ui: &mut egui::Ui, screen: &Screen) {
        let control = &screen.control;
        let fill = match control.tone {
            ControlTone::Start | ControlTone::Failed => START_BLUE,
            ControlTone::Stop => STOP_RED,
            ControlTone::Busy => BUSY_GRAY,
        };
        let button = egui::Button::new(
            egui::RichText::new(&control.label)
                .color(egui::Color32::WHITE)
                .size(18.0),
        )
        .fill(fill)
        .min_size(egui::vec2(160.0, 36.0));

        let clicked = ui.add_enabled(control.action.is_some(), button).clicked();
        if let Some(detail) = &control.detail {
            ui.label(egui::RichText::new(detail).color(STOP_RED));
        }
        if clicked {
            if let Some(action) = control.action {
                self.send(action);
            }
        }
    }

    fn model_status(&mut self, ui: &mut egui::Ui, screen: &Screen) {
        ui.horizontal(|ui| {
            ui.label(screen.model_status.text.as_str());
            if screen.model_status.can_reload && ui.button("Reload").clicked() {
                self.send(UserEvent::ReloadModel);
            }
        });
        if let Some(count) = screen.class_count {
            ui.label(format!("Classes: {}", count));
        }
    }

    fn predictions(&self, ui: &mut egui::Ui, screen: &Screen) {
        match &screen.predictions {
            PredictionView::Empty => {}
            PredictionView::RankedList(rows) => {
                let width = self.capture_size as f32;
                for row in rows {
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(width, 22.0), egui::Sense::hover());
                    let painter = ui.painter();
                    painter.rect_filled(rect, 3.0, BAR_TRACK);
                    let filled = egui::Rect::from_min_size(
                        rect.min,
                        egui::vec2(rect.width() * row.percent / 100.0, rect.height()),
                    );
                    painter.rect_filled(filled, 3.0, to_color32(row.color));
                    painter.text(
                        rect.left_center() + egui::vec2(6.0, 0.0),
                        egui::Align2::LEFT_CENTER,
                        format!("{}  {:.0}%", row.label, row.percent),
                        egui::FontId::proportional(14.0),
                        egui::Color32::WHITE,
                    );
                }
            }
            PredictionView::BestGuess(glyph) => {
                ui.label(egui::RichText::new(glyph).size(96.0).strong());
            }
        }
    }
}

impl eframe::App for DisplayWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) && !self.quit_sent {
            self.quit_sent = true;
            self.send(UserEvent::Quit);
        }

        let screen = self.screen.lock().ok().and_then(|screen| screen.clone());

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                let Some(screen) = screen else {
                    ui.label("Starting up…");
                    return;
                };
                self.preview(ctx, ui, &screen);
                ui.add_space(8.0);
                self.control(ui, &screen);
                ui.add_space(8.0);
                self.model_status(ui, &screen);
                ui.add_space(8.0);
                self.predictions(ui, &screen);
            });
        });

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}

fn preview_image(image: &RgbImage, flip: bool) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    if flip {
        egui::ColorImage::from_rgb(size, imageops::flip_horizontal(image).as_raw())
    } else {
        egui::ColorImage::from_rgb(size, image.as_raw())
    }
}

fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}
