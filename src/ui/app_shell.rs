use eframe::egui;
use log::{error, warn};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

use crate::app::{AppEvent, FormController, Notice, NoticeLevel, StudentForm};
use crate::imaging::{is_supported_extension, RenderedImage, SUPPORTED_EXTENSIONS};
use crate::infra::config::AppConfig;

const WINDOW_TITLE: &str = "Student Database";
const CLICK_TO_VIEW: &str = "Click to View";

const VIEWER_MARGIN: [f32; 2] = [24.0, 48.0];

struct ViewerTexture {
    picture_path: String,
    texture: egui::TextureHandle,
}

impl ViewerTexture {
    fn show(&self, ui: &mut egui::Ui) {
        ui.image((self.texture.id(), self.texture.size_vec2()));
        ui.small(&self.picture_path);
    }
}

pub struct StudentRecordsApp {
    controller: Option<FormController>,
    form: StudentForm,
    thumbnails: Vec<Option<egui::TextureHandle>>,
    thumbnails_generation: u64,
    viewer: Option<ViewerTexture>,
    viewer_generation: u64,
}

impl StudentRecordsApp {
    fn new(controller: FormController) -> Self {
        Self {
            controller: Some(controller),
            form: StudentForm::default(),
            thumbnails: Vec::new(),
            thumbnails_generation: 0,
            viewer: None,
            viewer_generation: 0,
        }
    }

    /// Rebuilds GPU textures whenever the presenter re-rendered or the full
    /// view changed.
    fn sync_textures(&mut self, ctx: &egui::Context) {
        let Some(controller) = self.controller.as_ref() else {
            return;
        };
        let presenter = controller.presenter();

        if presenter.generation() != self.thumbnails_generation {
            self.thumbnails = presenter
                .rows()
                .iter()
                .map(|row| {
                    row.thumbnail.as_ref().map(|image| {
                        upload(ctx, &format!("thumb-{}", row.record_id), image)
                    })
                })
                .collect();
            self.thumbnails_generation = presenter.generation();
        }

        if presenter.viewer_generation() != self.viewer_generation {
            self.viewer = presenter.viewer().map(|view| ViewerTexture {
                picture_path: view.picture_path.clone(),
                texture: upload(ctx, &format!("full-{}", view.record_id), &view.image),
            });
            self.viewer_generation = presenter.viewer_generation();
        }
    }

    fn form_panel(&mut self, ui: &mut egui::Ui, events: &mut Vec<AppEvent>) {
        egui::Grid::new("student_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Name:");
                ui.add(egui::TextEdit::singleline(&mut self.form.name).desired_width(240.0));
                ui.end_row();

                ui.label("ID:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.form.student_id).desired_width(240.0),
                );
                ui.end_row();

                ui.label("Semester:");
                ui.add(egui::TextEdit::singleline(&mut self.form.semester).desired_width(240.0));
                ui.end_row();

                ui.label("Picture:");
                ui.horizontal(|ui| {
                    if ui.button("Upload").clicked() {
                        self.pick_picture();
                    }
                    ui.small(&self.form.picture_path);
                });
                ui.end_row();
            });

        ui.add_space(8.0);
        if ui.button("Save").clicked() {
            events.push(AppEvent::Submit(self.form.clone()));
        }
    }

    fn pick_picture(&mut self) {
        let Some(path) = FileDialog::new()
            .set_title("Select an image")
            .add_filter("Image Files", SUPPORTED_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        if !is_supported_extension(&path) {
            warn!("selected picture has an unexpected extension: {}", path.display());
        }
        self.form.picture_path = path.to_string_lossy().to_string();
    }

    fn records_panel(&self, ui: &mut egui::Ui, events: &mut Vec<AppEvent>) {
        ui.horizontal(|ui| {
            ui.heading("Saved Records:");
            if ui.button("Refresh").clicked() {
                events.push(AppEvent::Refresh);
            }
        });
        ui.separator();

        let Some(controller) = self.controller.as_ref() else {
            return;
        };

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("student_records")
                .num_columns(4)
                .striped(true)
                .min_col_width(100.0)
                .show(ui, |ui| {
                    ui.strong("Name");
                    ui.strong("ID");
                    ui.strong("Semester");
                    ui.strong("Picture");
                    ui.end_row();

                    let presenter = controller.presenter();
                    for (index, row) in presenter.rows().iter().enumerate() {
                        ui.label(&row.name);
                        ui.label(&row.student_id);
                        ui.label(&row.semester);

                        let clicked = match self.thumbnails.get(index).and_then(Option::as_ref) {
                            Some(texture) => ui
                                .add(
                                    egui::Image::new((texture.id(), texture.size_vec2()))
                                        .sense(egui::Sense::click()),
                                )
                                .on_hover_text(CLICK_TO_VIEW)
                                .clicked(),
                            None => ui
                                .link(CLICK_TO_VIEW)
                                .on_hover_text(presenter.picture_path(index).unwrap_or_default())
                                .clicked(),
                        };
                        if clicked {
                            events.push(AppEvent::OpenImage(index));
                        }
                        ui.end_row();
                    }
                });
        });
    }

    fn viewer_window(&self, ctx: &egui::Context, events: &mut Vec<AppEvent>) {
        let Some(viewer) = self.viewer.as_ref() else {
            return;
        };

        let close_requested = ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("full_image"),
            egui::ViewportBuilder::default()
                .with_title("Full Image")
                .with_inner_size(viewer_inner_size(viewer.texture.size()))
                .with_resizable(false),
            |ctx, class| {
                // Backends without multi-viewport support embed it instead.
                if class == egui::ViewportClass::Embedded {
                    let mut open = true;
                    egui::Window::new("Full Image")
                        .open(&mut open)
                        .resizable(false)
                        .collapsible(false)
                        .show(ctx, |ui| viewer.show(ui));
                    return !open;
                }

                egui::CentralPanel::default().show(ctx, |ui| viewer.show(ui));
                ctx.input(|input| input.viewport().close_requested())
            },
        );

        if close_requested {
            events.push(AppEvent::CloseViewer);
        }
    }
}

impl eframe::App for StudentRecordsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_textures(ctx);
        let mut events = Vec::new();

        egui::TopBottomPanel::top("student_form_panel").show(ctx, |ui| {
            ui.add_space(12.0);
            self.form_panel(ui, &mut events);
            ui.add_space(12.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.records_panel(ui, &mut events);
        });

        self.viewer_window(ctx, &mut events);

        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        for event in events {
            if let Some(notice) = controller.dispatch(event) {
                show_notice(&notice);
            }
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(controller) = self.controller.take() {
            if let Err(error) = controller.shutdown() {
                error!("failed to close student database: {error}");
            }
        }
    }
}

fn upload(ctx: &egui::Context, name: &str, image: &RenderedImage) -> egui::TextureHandle {
    let color_image = egui::ColorImage::from_rgba_unmultiplied(image.size(), &image.pixels);
    ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)
}

fn viewer_inner_size(image_size: [usize; 2]) -> [f32; 2] {
    [
        image_size[0] as f32 + VIEWER_MARGIN[0],
        image_size[1] as f32 + VIEWER_MARGIN[1],
    ]
}

pub fn show_notice(notice: &Notice) {
    let level = match notice.level {
        NoticeLevel::Info => MessageLevel::Info,
        NoticeLevel::Warning => MessageLevel::Warning,
        NoticeLevel::Error => MessageLevel::Error,
    };

    let _ = MessageDialog::new()
        .set_level(level)
        .set_title(notice.title)
        .set_description(notice.message.as_str())
        .set_buttons(MessageButtons::Ok)
        .show();
}

pub fn launch_window(config: &AppConfig, controller: FormController) -> Result<(), String> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([config.window_width, config.window_height]),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(StudentRecordsApp::new(controller)))),
    )
    .map_err(|error| format!("failed to start UI: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_window_fits_the_full_view_plus_caption() {
        assert_eq!(viewer_inner_size([300, 300]), [324.0, 348.0]);
        assert_eq!(viewer_inner_size([40, 10]), [64.0, 58.0]);
    }
}
