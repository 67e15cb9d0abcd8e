use crate::error::AnalyticsError;

/// A stateless calculator for trailing simple moving averages.
#[derive(Debug, Default, Clone, Copy)]
pub struct MovingAverageEngine {}

impl MovingAverageEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the trailing simple moving average of `amounts`.
    ///
    /// # Arguments
    ///
    /// * `amounts` - The user's amounts, already in record order.
    /// * `window` - The number of consecutive amounts averaged per output value.
    ///
    /// # Returns
    ///
    /// One value per fully populated window, in input order. The result has
    /// `max(0, amounts.len() - window + 1)` elements, so an empty or short input
    /// yields an empty series rather than an error. Only a window below 1 fails.
    pub fn compute(&self, amounts: &[f64], window: i64) -> Result<Vec<f64>, AnalyticsError> {
        let window = Self::validate_window(window)?;

        if amounts.len() < window {
            return Ok(Vec::new());
        }

        let divisor = window as f64;
        let averages = amounts
            .windows(window)
            .map(|w| w.iter().sum::<f64>() / divisor)
            .collect();

        Ok(averages)
    }

    /// Returns the most recent moving average, if any window is fully populated.
    pub fn latest(&self, amounts: &[f64], window: i64) -> Result<Option<f64>, AnalyticsError> {
        let window = Self::validate_window(window)?;

        if amounts.len() < window {
            return Ok(None);
        }

        let tail = &amounts[amounts.len() - window..];
        Ok(Some(tail.iter().sum::<f64>() / window as f64))
    }

    /// Converts a requested window into a usable length.
    pub fn validate_window(window: i64) -> Result<usize, AnalyticsError> {
        if window < 1 {
            return Err(AnalyticsError::InvalidWindow(window));
        }
        // Larger than the address space means no window can ever be populated.
        Ok(usize::try_from(window).unwrap_or(usize::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> MovingAverageEngine {
        MovingAverageEngine::new()
    }

    #[test]
    fn pairs_are_averaged_in_order() {
        let out = engine().compute(&[10.0, 20.0, 30.0, 40.0], 2).unwrap();
        assert_eq!(out, vec![15.0, 25.0, 35.0]);
    }

    #[test]
    fn window_equal_to_length_yields_single_mean() {
        assert_eq!(engine().compute(&[5.0, 5.0, 5.0], 3).unwrap(), vec![5.0]);
        assert_eq!(engine().compute(&[1.0, 2.0, 6.0], 3).unwrap(), vec![3.0]);
    }

    #[test]
    fn short_input_yields_empty_series() {
        assert!(engine().compute(&[1.0, 2.0, 3.0], 5).unwrap().is_empty());
    }

    #[test]
    fn empty_input_is_not_an_error() {
        assert!(engine().compute(&[], 1).unwrap().is_empty());
        assert!(engine().compute(&[], 7).unwrap().is_empty());
    }

    #[test]
    fn non_positive_window_is_rejected() {
        for window in [0, -1, i64::MIN] {
            match engine().compute(&[1.0, 2.0], window) {
                Err(AnalyticsError::InvalidWindow(w)) => assert_eq!(w, window),
                other => panic!("expected InvalidWindow, got {other:?}"),
            }
        }
        assert!(matches!(
            engine().compute(&[], 0),
            Err(AnalyticsError::InvalidWindow(0))
        ));
    }

    #[test]
    fn huge_window_yields_empty_series() {
        assert!(engine().compute(&[1.0, 2.0], i64::MAX).unwrap().is_empty());
    }

    #[test]
    fn duplicates_are_averaged_normally() {
        let out = engine().compute(&[2.0, 2.0, 4.0, 4.0], 2).unwrap();
        assert_eq!(out, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn latest_matches_last_element_of_series() {
        let amounts = [3.0, 9.0, 6.0, 12.0, 0.0];
        let series = engine().compute(&amounts, 3).unwrap();
        assert_eq!(engine().latest(&amounts, 3).unwrap(), series.last().copied());
        assert_eq!(engine().latest(&amounts, 6).unwrap(), None);
        assert!(engine().latest(&amounts, 0).is_err());
    }
}
