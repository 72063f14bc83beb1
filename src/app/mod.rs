use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use tracing::warn;

use charnet::{
    Dataset, DisplayConfig, GraphPayload, Network, ThresholdMode, ViewError, ViewEvent,
    ViewSession, VisibleGraph, compute_visible,
};

mod graph;
mod render_utils;
mod ui;

pub struct Sources {
    pub names: PathBuf,
    pub interactions: PathBuf,
}

pub struct CharnetApp {
    sources: Sources,
    config: DisplayConfig,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Network, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    network: Network,
    config: DisplayConfig,
    session: ViewSession,
    visible: VisibleGraph,
    /// What the canvas draws; rebuilt whenever the session revision moves.
    payload: GraphPayload,
    rendered_revision: u64,
    /// World position per character, fixed for the lifetime of the model.
    positions: Vec<Vec2>,
    node_radii: Vec<f32>,
    max_weight: u64,
    selected: Option<usize>,
    pan: Vec2,
    zoom: f32,
    top_by_weight: Vec<usize>,
    top_by_share: Vec<usize>,
    top_characters: Vec<usize>,
    last_error: Option<String>,
}

impl CharnetApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, sources: Sources, config: DisplayConfig) -> Self {
        let state = Self::start_load(&sources);
        Self {
            sources,
            config,
            state,
        }
    }

    fn start_load(sources: &Sources) -> AppState {
        let (tx, rx) = mpsc::channel();
        let names = sources.names.clone();
        let interactions = sources.interactions.clone();

        thread::spawn(move || {
            // The network is only built from a fully loaded dataset.
            let result = Dataset::load(&names, &interactions)
                .map(|dataset| Network::build(&dataset))
                .map_err(|error| format!("{:#}", anyhow::Error::new(error)));
            let _ = tx.send(result);
        });

        AppState::Loading { rx }
    }
}

impl eframe::App for CharnetApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => {
                        transition = Some(match result {
                            Ok(network) => match ViewModel::new(network, self.config.clone()) {
                                Ok(model) => AppState::Ready(Box::new(model)),
                                Err(error) => AppState::Error(error.to_string()),
                            },
                            Err(error) => AppState::Error(error),
                        });
                    }
                    Err(mpsc::TryRecvError::Empty) => ctx.request_repaint(),
                    Err(mpsc::TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading character network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load character data");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.sources));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx, &self.sources),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}

impl ViewModel {
    const RANKING_ROWS: usize = 25;

    fn new(network: Network, config: DisplayConfig) -> Result<Self, ViewError> {
        let session = ViewSession::new(&config)?;
        let state = session.state();
        let visible = compute_visible(&network, &state);
        let payload = GraphPayload::build(&network, &visible, &state, &config.colors);
        let node_radii = render_utils::node_radii(&network);
        let positions = graph::layout_positions(&network, &node_radii);
        let max_weight = network
            .edges()
            .iter()
            .map(|edge| edge.weight)
            .max()
            .unwrap_or(1);

        Ok(Self {
            top_by_weight: network.top_edges(ThresholdMode::Absolute, Self::RANKING_ROWS),
            top_by_share: network.top_edges(ThresholdMode::Share, Self::RANKING_ROWS),
            top_characters: network.top_entities(Self::RANKING_ROWS),
            rendered_revision: session.revision(),
            network,
            config,
            session,
            visible,
            payload,
            positions,
            node_radii,
            max_weight,
            selected: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            last_error: None,
        })
    }

    /// Routes a user event through the session, then refreshes the render
    /// cache if a new state was committed.
    fn dispatch(&mut self, event: ViewEvent) {
        match self.session.apply(event) {
            Ok(_) => self.last_error = None,
            Err(error) => {
                warn!(?event, "rejected view change: {error}");
                self.last_error = Some(error.to_string());
            }
        }
        self.refresh_if_stale();
    }

    fn refresh_if_stale(&mut self) {
        if self.session.revision() == self.rendered_revision {
            return;
        }

        let state = self.session.state();
        self.visible = compute_visible(&self.network, &state);
        self.payload =
            GraphPayload::build(&self.network, &self.visible, &state, &self.config.colors);
        self.rendered_revision = self.session.revision();
    }

    fn show(&mut self, ctx: &Context, sources: &Sources) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui, sources));

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }
}
