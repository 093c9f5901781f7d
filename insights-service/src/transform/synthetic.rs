use std::time::{SystemTime, UNIX_EPOCH};

use utility_client::domain::{CalendarMonth, MonthlyPredictions};

const BASE_KWH: f64 = 1000.0;

/// Sample monthly predictions shown when the prediction service is unavailable.
///
/// The seasonal shape is fixed (summer highest, winter raised); each month gets a ±10%
/// jitter derived from the seed. The numbers are illustrative only and carry no information
/// about the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticFallback {
    seed: u64,
}

fn seasonal_factor(month: CalendarMonth) -> f64 {
    match month {
        CalendarMonth::June | CalendarMonth::July | CalendarMonth::August => 1.5,
        CalendarMonth::December | CalendarMonth::January | CalendarMonth::February => 1.3,
        _ => 1.0,
    }
}

impl SyntheticFallback {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeded from the wall clock, so consecutive requests see different samples.
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(nanos)
    }

    /// Uniform factor in [0.9, 1.1).
    fn jitter(&self, month: CalendarMonth) -> f64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(&[month.index() as u8]);

        let mut word = [0u8; 8];
        word.copy_from_slice(&hasher.finalize().as_bytes()[..8]);
        let unit = (u64::from_le_bytes(word) >> 11) as f64 / (1u64 << 53) as f64;

        0.9 + unit * 0.2
    }

    pub fn generate(&self) -> MonthlyPredictions {
        CalendarMonth::ALL
            .into_iter()
            .map(|month| {
                let kwh = (BASE_KWH * seasonal_factor(month) * self.jitter(month)).round();
                (month, kwh)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_every_month_within_seasonal_bounds() {
        let predictions = SyntheticFallback::with_seed(42).generate();
        assert_eq!(predictions.len(), 12);

        for (month, kwh) in predictions.iter() {
            let centre = BASE_KWH * seasonal_factor(month);
            assert!(kwh >= (centre * 0.9).floor() && kwh <= (centre * 1.1).ceil(), "{month:?}: {kwh}");
            assert_eq!(kwh, kwh.round());
        }
    }

    #[test]
    fn same_seed_same_sample() {
        assert_eq!(
            SyntheticFallback::with_seed(7).generate(),
            SyntheticFallback::with_seed(7).generate()
        );
        assert_ne!(
            SyntheticFallback::with_seed(7).generate(),
            SyntheticFallback::with_seed(8).generate()
        );
    }
}
