use super::{DxfUploader, FormPhase};
use crate::upload::ResponseContract;
use crate::utils::file_size::human_size;
use eframe::egui::{self, Color32, RichText};
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(220, 53, 69);

impl DxfUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        if self.state.busy {
            ctx.output_mut(|o| o.cursor_icon = egui::CursorIcon::Progress);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading(RichText::new("DXF Grid Converter").color(ACCENT).size(28.0));
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Send a DXF drawing to the conversion service")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(20.0);
                self.render_contract(ui);
                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        let can_pick = !self.state.busy;
                        if ui
                            .add_enabled(can_pick, egui::Button::new("📁 Choose File"))
                            .clicked()
                        {
                            match FileDialog::new().set_title("Choose DXF drawing").pick_file() {
                                Some(path) => self.select_path(&path),
                                None => self.select_file(None),
                            }
                        }

                        if let Some(file) = &self.state.selected_file {
                            ui.label(format!(
                                "Selected File: {} ({})",
                                file.name,
                                human_size(file.size())
                            ));
                        }
                    });
                });

                ui.add_space(20.0);

                ui.vertical_centered(|ui| {
                    let button =
                        egui::Button::new("📤 Upload DXF").min_size(egui::vec2(200.0, 40.0));
                    if ui.add_enabled(!self.state.busy, button).clicked() {
                        if let Err(e) = self.submit() {
                            if !e.is_user_facing() {
                                log::debug!("Submit rejected: {}", e);
                            }
                        }
                    }

                    if self.state().phase() == FormPhase::Submitting {
                        ui.add_space(10.0);
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(format!(
                                "Uploading {} to {}",
                                self.state().selected_file_name().unwrap_or_default(),
                                self.config().endpoint()
                            ));
                        });
                    }
                });

                ui.add_space(20.0);
                self.render_results(ui);
            });
        });

        self.render_notice(ctx);
    }

    fn render_contract(&mut self, ui: &mut egui::Ui) {
        let mut contract = self.config.contract;

        ui.group(|ui| {
            ui.add_enabled_ui(!self.state.busy, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Response:");
                    for option in ResponseContract::all() {
                        ui.radio_value(&mut contract, *option, option.label());
                    }
                });
            });
            ui.label(
                RichText::new(format!("Endpoint: {}", self.config.endpoint()))
                    .monospace()
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
        });

        if contract != self.config.contract {
            self.set_contract(contract);
        }
    }

    fn render_results(&mut self, ui: &mut egui::Ui) {
        if let Some(output) = self.visible_polylines() {
            let mut output = output;
            ui.heading("LWPOLYLINE Data:");
            ui.add_space(5.0);
            egui::ScrollArea::vertical()
                .max_height(400.0)
                .id_source("polylines")
                .show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut output)
                            .font(egui::TextStyle::Monospace)
                            .desired_width(ui.available_width()),
                    );
                });
        }

        if self.config.contract != ResponseContract::Spreadsheet {
            return;
        }

        let mut open_clicked = false;
        if let Some(download) = &self.state.last_download {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(
                        Color32::from_rgb(0, 180, 0),
                        format!(
                            "✅ Saved {} ({})",
                            download.path.display(),
                            human_size(download.size)
                        ),
                    );
                    open_clicked = ui.button("📂 Open").clicked();
                });
            });
        }
        if open_clicked {
            self.open_download();
        }
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.state.notice.clone() else {
            return;
        };

        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(notice);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    self.dismiss_notice();
                }
            });
    }
}
