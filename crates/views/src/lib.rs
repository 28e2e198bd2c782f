//! Renderer-agnostic presentation state for the three view variants. Each
//! implements [`playback::View`]; the desktop shell only draws what they hold.

pub mod assembly;
pub mod catalogue;
pub mod chart;
pub mod state_diagram;
pub mod transition_edges;

pub use assembly::ViewSet;
pub use catalogue::{StateCatalogue, StateNode, StateOccupancy};
pub use chart::ChartView;
pub use state_diagram::{AgentFlight, StateDiagramOptions, StateDiagramView};
pub use transition_edges::{Edge, TransitionEdgesView};
