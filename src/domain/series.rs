// Bounded chart window for the power graph
use serde::Serialize;
use std::collections::VecDeque;

/// Number of points visible on the power chart.
pub const CHART_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: String, value: f64) -> Self {
        Self { label, value }
    }
}

/// FIFO window: once full, every push evicts the oldest point.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    points: VecDeque<SeriesPoint>,
    capacity: usize,
}

impl SeriesBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, returning the evicted one if the window was full.
    pub fn push(&mut self, label: impl Into<String>, value: f64) -> Option<SeriesPoint> {
        let point = SeriesPoint::new(label.into(), value);
        if self.capacity == 0 {
            return Some(point);
        }

        let evicted = if self.points.len() == self.capacity {
            self.points.pop_front()
        } else {
            None
        };
        self.points.push_back(point);
        evicted
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<SeriesPoint> {
        self.points.iter().cloned().collect()
    }
}

impl Default for SeriesBuffer {
    fn default() -> Self {
        Self::with_capacity(CHART_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_exceeds_capacity() {
        let mut buffer = SeriesBuffer::default();
        for i in 0..50 {
            buffer.push(format!("t{i}"), i as f64);
            assert!(buffer.len() <= CHART_CAPACITY);
        }
        assert_eq!(buffer.len(), CHART_CAPACITY);
    }

    #[test]
    fn test_twenty_first_push_evicts_oldest() {
        let mut buffer = SeriesBuffer::default();
        for i in 0..20 {
            assert!(buffer.push(format!("t{i}"), i as f64).is_none());
        }

        let evicted = buffer.push("t20", 20.0).unwrap();
        assert_eq!(evicted, SeriesPoint::new("t0".to_string(), 0.0));
        assert_eq!(buffer.len(), 20);

        let labels: Vec<&str> = buffer.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels.first(), Some(&"t1"));
        assert_eq!(labels.last(), Some(&"t20"));
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut buffer = SeriesBuffer::with_capacity(0);
        assert!(buffer.push("a", 1.0).is_some());
        assert!(buffer.is_empty());
    }
}
