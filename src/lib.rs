//! Character interaction networks: derives weighted relationships from a
//! pairwise interaction matrix and filters them by a user-chosen threshold.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod network;
pub mod payload;
pub mod session;
pub mod util;
pub mod view;

pub use config::DisplayConfig;
pub use data::{Dataset, Interaction, InteractionMatrix};
pub use error::{LoadError, LoadErrorKind, MalformedData, ViewError};
pub use network::{EdgeRecord, Network, NodeAggregate, aggregate};
pub use payload::GraphPayload;
pub use session::{CommitPolicy, ViewEvent, ViewSession};
pub use view::{ThresholdMode, ViewState, VisibleGraph, compute_visible};
