use eframe::egui::{Align, Layout, Ui};

use super::super::{Sources, ViewModel};

impl ViewModel {
    pub(in crate::app) fn draw_top_bar(&mut self, ui: &mut Ui, sources: &Sources) {
        ui.horizontal(|ui| {
            ui.heading("charnet");
            ui.separator();
            ui.label(format!("names: {}", sources.names.display()));
            ui.label(format!("interactions: {}", sources.interactions.display()));
            ui.label(format!("characters: {}", self.network.entity_count()));
            ui.label(format!("relationships: {}", self.network.edge_count()));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(format!(
                    "visible: {} characters / {} relationships",
                    self.visible.node_count(),
                    self.visible.edge_count()
                ));
            });
        });
    }
}
