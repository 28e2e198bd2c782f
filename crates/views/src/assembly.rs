use std::{cell::RefCell, rc::Rc, sync::Arc};

use playback::{share, Clock, PlaybackConfig, SharedView, SystemClock};
use shared::{domain::SimulationData, settings::ViewerSettings};
use tracing::{info, warn};

use crate::{
    catalogue::StateCatalogue,
    chart::ChartView,
    state_diagram::{StateDiagramOptions, StateDiagramView},
    transition_edges::TransitionEdgesView,
};

/// The views built for one loaded simulation. Concrete handles are kept so a
/// renderer can read them; `registered` hands the same views to the
/// controller in tick order.
pub struct ViewSet {
    pub charts: Vec<Rc<RefCell<ChartView>>>,
    pub diagram: Option<Rc<RefCell<StateDiagramView>>>,
    pub edges: Option<Rc<RefCell<TransitionEdgesView>>>,
    pub catalogue: Option<Arc<StateCatalogue>>,
}

impl ViewSet {
    pub fn assemble(data: &SimulationData, settings: &ViewerSettings) -> Self {
        Self::assemble_with_clock(data, settings, Rc::new(SystemClock))
    }

    /// As `assemble`, with agent flights timed by `clock`.
    pub fn assemble_with_clock(
        data: &SimulationData,
        settings: &ViewerSettings,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let charts = settings
            .charts
            .iter()
            .filter_map(|spec| match data.abundance.series(&spec.columns) {
                Ok(series) => Some(share(ChartView::new(
                    spec.title.clone(),
                    spec.y_label.clone(),
                    spec.kind,
                    series,
                ))),
                Err(err) => {
                    warn!(chart = %spec.title, error = %err, "chart left out");
                    None
                }
            })
            .collect::<Vec<_>>();

        let Some(transitions) = data.transitions.clone() else {
            info!(charts = charts.len(), "assembled views without transition log");
            return Self {
                charts,
                diagram: None,
                edges: None,
                catalogue: None,
            };
        };

        let catalogue = Arc::new(StateCatalogue::new(&settings.states, &data.abundance));
        let diagram = share(StateDiagramView::with_clock(
            catalogue.clone(),
            transitions.clone(),
            StateDiagramOptions {
                transition_duration: settings.transition_duration(),
                ..StateDiagramOptions::default()
            },
            clock,
        ));
        let edges = share(TransitionEdgesView::new(
            catalogue.clone(),
            transitions,
            settings.edge_window_ticks,
        ));
        info!(
            charts = charts.len(),
            states = catalogue.len(),
            "assembled views with transition log"
        );

        Self {
            charts,
            diagram: Some(diagram),
            edges: Some(edges),
            catalogue: Some(catalogue),
        }
    }

    /// Charts first, then the state diagram and the transition edges.
    pub fn registered(&self) -> Vec<SharedView> {
        let mut views: Vec<SharedView> = Vec::new();
        for chart in &self.charts {
            views.push(chart.clone());
        }
        if let Some(diagram) = &self.diagram {
            views.push(diagram.clone());
        }
        if let Some(edges) = &self.edges {
            views.push(edges.clone());
        }
        views
    }

    pub fn playback_config(&self, data: &SimulationData, settings: &ViewerSettings) -> PlaybackConfig {
        PlaybackConfig {
            views: self.registered(),
            interval: settings.playback_interval(),
            max_ticks: data.max_ticks(),
        }
    }

    pub fn len(&self) -> usize {
        self.charts.len() + usize::from(self.diagram.is_some()) + usize::from(self.edges.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "tests/assembly_tests.rs"]
mod tests;
