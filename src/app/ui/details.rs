use eframe::egui::{self, RichText, Ui};

use charnet::ThresholdMode;
use charnet::payload::edge_tooltip;
use charnet::util::{format_percentage, format_signed};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        egui::ScrollArea::vertical()
            .id_salt("details_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.draw_selection(ui);
                ui.separator();
                self.draw_top_characters(ui);
                ui.separator();
                self.draw_top_relationships(ui);
            });
    }

    fn draw_selection(&mut self, ui: &mut Ui) {
        ui.heading("Selection");
        ui.add_space(6.0);

        let Some(id) = self.selected else {
            ui.label("Select a character from the graph or rankings.");
            return;
        };

        let Some(aggregate) = self.network.aggregate(id).copied() else {
            ui.label("Selected character no longer exists.");
            return;
        };

        ui.label(RichText::new(self.network.name(id)).strong());
        ui.label(format!("Interactions: {}", self.network.total(id)));
        ui.label(format!("Relationships: {}", aggregate.degree));
        ui.label(format!("Strongest relationship: {}", aggregate.max_weight));
        ui.label(format!(
            "Largest share: {}",
            format_percentage(aggregate.max_share)
        ));
        if !self.visible.contains_node(id) {
            ui.small("Hidden at the current threshold.");
        }

        let state = self.session.state();
        let relationships = self.network.relationships_of(id, state.mode());
        if relationships.is_empty() {
            return;
        }

        ui.add_space(6.0);
        ui.label(RichText::new("Relationships").strong());
        let mut next_selection = None;
        for index in relationships {
            let Some(edge) = self.network.edge(index) else {
                continue;
            };
            let Some(other) = edge.other(id) else {
                continue;
            };

            let mut label = format!("{}  ({})", self.network.name(other), edge.weight);
            if state.show_sentiment() {
                label.push_str("  ");
                label.push_str(&format_signed(edge.sentiment));
            }
            let text = if state.edge_passes(edge) {
                RichText::new(label)
            } else {
                RichText::new(label).weak()
            };

            if ui
                .link(text)
                .on_hover_text(edge_tooltip(&self.network, edge, state.show_sentiment()))
                .clicked()
            {
                next_selection = Some(other);
            }
        }

        if next_selection.is_some() {
            self.selected = next_selection;
        }
    }

    fn draw_top_characters(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Most active characters").strong());

        let mut next_selection = None;
        for (rank, &id) in self.top_characters.iter().enumerate() {
            let label = format!(
                "{}. {}  ({})",
                rank + 1,
                self.network.name(id),
                self.network.total(id)
            );
            let text = if self.visible.contains_node(id) {
                RichText::new(label)
            } else {
                RichText::new(label).weak()
            };
            if ui.link(text).clicked() {
                next_selection = Some(id);
            }
        }

        if next_selection.is_some() {
            self.selected = next_selection;
        }
    }

    fn draw_top_relationships(&mut self, ui: &mut Ui) {
        let state = self.session.state();
        let (title, ranking) = match state.mode() {
            ThresholdMode::Absolute => ("Strongest relationships", &self.top_by_weight),
            ThresholdMode::Share => ("Closest relationships", &self.top_by_share),
        };
        ui.label(RichText::new(title).strong());

        let mut next_selection = None;
        for &index in ranking {
            let Some(edge) = self.network.edge(index) else {
                continue;
            };
            let metric = match state.mode() {
                ThresholdMode::Absolute => edge.weight.to_string(),
                ThresholdMode::Share => format_percentage(edge.share),
            };
            let visible = state.edge_passes(edge);
            let label = format!(
                "{} - {}  ({metric}) [{}]",
                self.network.name(edge.from),
                self.network.name(edge.to),
                if visible { "shown" } else { "hidden" }
            );
            let text = if visible {
                RichText::new(label)
            } else {
                RichText::new(label).weak()
            };

            if ui
                .link(text)
                .on_hover_text(edge_tooltip(&self.network, edge, state.show_sentiment()))
                .clicked()
            {
                next_selection = Some(edge.from);
            }
        }

        if next_selection.is_some() {
            self.selected = next_selection;
        }
    }
}
