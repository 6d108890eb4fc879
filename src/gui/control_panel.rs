//! Control Panel Widget
//! Left side panel with the page title, year range selection and exports.

use crate::data::YearRange;
use egui::{Color32, RichText};

/// Left side control panel with the year range slider and export buttons.
pub struct ControlPanel {
    /// Years present in the data, `None` when no valid year exists.
    pub domain: Option<YearRange>,
    pub range: YearRange,
    pub status: String,
}

impl ControlPanel {
    /// Start with the full year domain selected.
    pub fn new(domain: Option<YearRange>) -> Self {
        Self {
            domain,
            range: domain.unwrap_or(YearRange::new(0, 0)),
            status: "Ready".to_string(),
        }
    }

    /// Draw the title and the year range sliders.
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📄 CORD-19 Research Papers Explorer")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Explore trends in COVID-19 scientific literature.")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        let Some(domain) = self.domain else {
            return action;
        };

        // ===== Year Range Section =====
        ui.label(RichText::new("📅 Select Year Range").size(14.0).strong());
        ui.add_space(5.0);

        let mut start = self.range.start;
        let mut end = self.range.end;
        ui.add(egui::Slider::new(&mut start, domain.start..=domain.end).text("From"));
        ui.add(egui::Slider::new(&mut end, domain.start..=domain.end).text("To"));

        // Dragging one bound past the other pushes the other along.
        if start != self.range.start && start > end {
            end = start;
        } else if end < start {
            start = end;
        }

        let selected = YearRange::new(start, end).clamp_to(domain);
        if selected != self.range {
            self.range = selected;
            action = ControlPanelAction::RangeChanged;
        }

        ui.horizontal(|ui| {
            if ui.small_button("Full Range").clicked() && self.range != domain {
                self.range = domain;
                action = ControlPanelAction::RangeChanged;
            }
        });

        action
    }

    /// Draw the paper count, export buttons and status line. `shown` is the
    /// size of the filtered set for the current range.
    pub fn show_exports(&mut self, ui: &mut egui::Ui, shown: usize) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        if self.domain.is_none() {
            return action;
        }

        ui.add_space(8.0);
        ui.label(
            RichText::new(format!("Showing {} papers from {}", shown, self.range))
                .size(13.0)
                .strong(),
        );

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.label(RichText::new("💾 Export").size(14.0).strong());
        ui.add_space(5.0);

        ui.vertical_centered(|ui| {
            let csv_button =
                egui::Button::new(RichText::new("⬇ Download Filtered Data as CSV").size(14.0))
                    .min_size(egui::vec2(240.0, 32.0));
            if ui.add(csv_button).clicked() {
                action = ControlPanelAction::ExportCsv;
            }

            ui.add_space(8.0);

            let png_button = egui::Button::new(RichText::new("🖼 Save Charts as PNG").size(14.0))
                .min_size(egui::vec2(240.0, 32.0));
            if ui.add(png_button).clicked() {
                action = ControlPanelAction::ExportReport;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Saved") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set the status line.
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    RangeChanged,
    ExportCsv,
    ExportReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_full_domain() {
        let panel = ControlPanel::new(Some(YearRange::new(1990, 2022)));
        assert_eq!(panel.range, YearRange::new(1990, 2022));
        assert_eq!(panel.status, "Ready");
    }

    #[test]
    fn test_without_domain() {
        let panel = ControlPanel::new(None);
        assert_eq!(panel.domain, None);
        assert_eq!(panel.range, YearRange::new(0, 0));
    }
}
