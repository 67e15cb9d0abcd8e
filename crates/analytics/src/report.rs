use core_types::UserId;
use serde::{Deserialize, Serialize};

/// The result of a moving-average request.
///
/// This struct is the final output of the `AnalyticsService` and doubles as the
/// JSON body returned by the web server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageReport {
    pub user_id: UserId,
    pub window_size: usize,
    /// Always equal to `moving_averages.len()`.
    pub count: usize,
    pub moving_averages: Vec<f64>,
}

impl MovingAverageReport {
    pub fn new(user_id: UserId, window_size: usize, moving_averages: Vec<f64>) -> Self {
        Self {
            user_id,
            window_size,
            count: moving_averages.len(),
            moving_averages,
        }
    }

    /// The most recent average, which the dashboard shows as its headline figure.
    pub fn latest(&self) -> Option<f64> {
        self.moving_averages.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_to_the_wire_shape() {
        let report = MovingAverageReport::new(UserId(100), 2, vec![15.0, 25.0]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "user_id": 100,
                "window_size": 2,
                "count": 2,
                "moving_averages": [15.0, 25.0]
            })
        );
        assert_eq!(report.latest(), Some(25.0));
    }
}
