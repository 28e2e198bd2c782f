use playback::{View, ViewError};
use shared::{domain::TickIndex, series::NamedSeries, settings::ChartKind};

/// Line or stacked-area chart that grows one point per tick.
#[derive(Debug, Clone)]
pub struct ChartView {
    title: String,
    y_label: String,
    kind: ChartKind,
    series: Vec<NamedSeries>,
    y_max: f64,
    len: usize,
    revealed: usize,
}

impl ChartView {
    pub fn new(
        title: impl Into<String>,
        y_label: impl Into<String>,
        kind: ChartKind,
        series: Vec<NamedSeries>,
    ) -> Self {
        let maxima = series.iter().map(NamedSeries::max);
        let y_max = match kind {
            ChartKind::Area => maxima.sum(),
            ChartKind::Line => maxima.fold(0.0, f64::max),
        };
        let len = series.iter().map(NamedSeries::len).min().unwrap_or(0);

        Self {
            title: title.into(),
            y_label: y_label.into(),
            kind,
            series,
            y_max,
            len,
            revealed: len.min(1),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn series(&self) -> &[NamedSeries] {
        &self.series
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Number of points per series.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of leading points currently on screen.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Revealed `(tick, value)` points of one series.
    pub fn visible_points(&self, series: usize) -> Vec<[f64; 2]> {
        self.series
            .get(series)
            .map(|s| {
                s.data[..self.revealed]
                    .iter()
                    .enumerate()
                    .map(|(tick, &value)| [tick as f64, value])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Revealed area bands, bottom to top: `(lower, upper)` edges per series.
    /// NaN cells stack as zero.
    pub fn stacked_bands(&self) -> Vec<(Vec<[f64; 2]>, Vec<[f64; 2]>)> {
        let mut baseline = vec![0.0; self.revealed];
        self.series
            .iter()
            .map(|s| {
                let lower: Vec<[f64; 2]> = baseline
                    .iter()
                    .enumerate()
                    .map(|(tick, &y)| [tick as f64, y])
                    .collect();
                for (base, &value) in baseline.iter_mut().zip(&s.data[..self.revealed]) {
                    if value.is_finite() {
                        *base += value;
                    }
                }
                let upper = baseline
                    .iter()
                    .enumerate()
                    .map(|(tick, &y)| [tick as f64, y])
                    .collect();
                (lower, upper)
            })
            .collect()
    }
}

impl View for ChartView {
    fn tick(&mut self, tick: TickIndex) -> Result<(), ViewError> {
        if tick >= self.len {
            return Err(ViewError::TickOutOfRange {
                tick,
                len: self.len,
            });
        }
        self.revealed = tick + 1;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ViewError> {
        self.revealed = self.len.min(1);
        Ok(())
    }
}
