use eframe::egui::{self, Key, Response, RichText, Ui};

use charnet::util::format_threshold;
use charnet::{CommitPolicy, ThresholdMode, ViewEvent};

use super::super::ViewModel;

const SLIDER_KEY_BASE_RATE: f64 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f64 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f64 = 40.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    secs: f64,
    carry: f64,
}

fn slider_key_accel_multiplier(hold_secs: f64) -> f64 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

/// Holding an arrow key on a focused slider moves it in whole steps,
/// faster the longer the key is held.
fn apply_slider_arrow_acceleration(
    ui: &Ui,
    response: &Response,
    value: &mut f64,
    min: f64,
    max: f64,
    step: f64,
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui
        .ctx()
        .data(|data| data.get_temp::<SliderKeyHoldState>(state_id).unwrap_or_default());

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            f64::from(input.stable_dt.min(0.1)),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    let direction = f64::from(increase_down as i8 - decrease_down as i8);
    if !response.has_focus() || direction == 0.0 {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return false;
    }

    hold_state.secs += delta_time;
    hold_state.carry +=
        direction * SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_state.secs) * delta_time;
    let whole_steps = hold_state.carry.trunc();
    hold_state.carry -= whole_steps;

    let old_value = *value;
    *value = (*value + whole_steps * step).clamp(min, max);
    ui.ctx().request_repaint();
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));
    *value != old_value
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Filter");
        ui.separator();
        ui.add_space(4.0);

        let mut mode = self.session.pending_mode();
        let mut mode_changed = false;
        ui.horizontal(|ui| {
            let absolute = ui
                .radio_value(&mut mode, ThresholdMode::Absolute, "Interactions")
                .on_hover_text("Keep relationships with at least this many interactions.");
            let share = ui
                .radio_value(&mut mode, ThresholdMode::Share, "Share")
                .on_hover_text(
                    "Keep relationships whose share of both characters' interactions is at least this large.",
                );
            mode_changed = absolute.changed() || share.changed();
        });
        if mode_changed {
            self.dispatch(ViewEvent::SetMode(mode));
        }

        let mut events = Vec::new();

        let preset = *self.config.preset(mode);
        let mut threshold = self.session.pending_threshold();
        let slider = ui.add(
            egui::Slider::new(&mut threshold, preset.min..=preset.max)
                .step_by(preset.step)
                .show_value(false),
        );
        if slider.hovered() {
            slider.request_focus();
        }
        let mut threshold_changed = slider.changed();
        threshold_changed |= apply_slider_arrow_acceleration(
            ui,
            &slider,
            &mut threshold,
            preset.min,
            preset.max,
            preset.step,
        );
        ui.label(format!("Minimum: {}", format_threshold(mode, threshold)));
        if threshold_changed {
            events.push(ViewEvent::SetThreshold(threshold));
        }

        let mut show_sentiment = self.session.state().show_sentiment();
        if ui
            .checkbox(&mut show_sentiment, "Color by sentiment")
            .on_hover_text("Red for hostile relationships, green for friendly ones.")
            .changed()
        {
            events.push(ViewEvent::SetSentiment(show_sentiment));
        }

        if self.session.policy() == CommitPolicy::OnSubmit {
            ui.add_space(4.0);
            let apply = ui.add_enabled(
                self.session.has_pending_changes(),
                egui::Button::new("Apply"),
            );
            let submitted = ui.input(|input| input.key_pressed(Key::Enter));
            if apply.clicked() || (submitted && self.session.has_pending_changes()) {
                events.push(ViewEvent::Commit);
            }
        }

        for event in events {
            self.dispatch(event);
        }

        ui.separator();
        let state = self.session.state();
        ui.label(RichText::new("Showing").strong());
        ui.label(format!(
            "{} >= {}",
            state.mode(),
            format_threshold(state.mode(), state.threshold())
        ));
        ui.label(format!(
            "{} characters, {} relationships",
            self.visible.node_count(),
            self.visible.edge_count()
        ));
        if self.session.has_pending_changes() {
            ui.small("Unapplied changes.");
        }

        if let Some(error) = &self.last_error {
            ui.add_space(6.0);
            ui.colored_label(egui::Color32::from_rgb(220, 90, 90), error.as_str());
        }

        ui.separator();
        if ui.button("Reset view").clicked() {
            self.pan = egui::Vec2::ZERO;
            self.zoom = 1.0;
        }
    }
}
