use serde::Serialize;

use super::{ChartPoint, TransformError};

/// Least-squares line of consumption against position in the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn value_at(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    #[serde(flatten)]
    pub point: ChartPoint,
    pub trend: f64,
}

/// Fit `y = intercept + slope * i` where `i` is the index of each value.
pub fn fit_line(values: &[f64]) -> Result<TrendLine, TransformError> {
    // The denominator n·Σi² − (Σi)² is zero for fewer than two points.
    if values.len() < 2 {
        return Err(TransformError::InsufficientPoints(values.len()));
    }

    let n = values.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    Ok(TrendLine { slope, intercept })
}

/// Attach the fitted value to every point, keeping order and cardinality.
pub fn fit(points: Vec<ChartPoint>) -> Result<(TrendLine, Vec<TrendPoint>), TransformError> {
    let values: Vec<f64> = points.iter().map(|p| p.consumption).collect();
    let line = fit_line(&values)?;

    let fitted = points
        .into_iter()
        .enumerate()
        .map(|(i, point)| TrendPoint {
            point,
            trend: line.value_at(i),
        })
        .collect();

    Ok((line, fitted))
}
