use std::collections::VecDeque;

/// Bounded record of the most recent answers, oldest dropped first.
#[derive(Clone, Debug)]
pub struct RollingWindow {
    results: VecDeque<bool>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            results: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, correct: bool) {
        if self.results.len() == self.capacity {
            self.results.pop_front();
        }
        self.results.push_back(correct);
    }

    pub fn accuracy(&self) -> Option<f64> {
        if self.results.is_empty() {
            return None;
        }
        let correct = self.results.iter().filter(|&&c| c).count();
        Some(correct as f64 / self.results.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_has_no_accuracy() {
        assert_eq!(RollingWindow::new(5).accuracy(), None);
    }

    #[test]
    fn test_window_drops_oldest() {
        let mut window = RollingWindow::new(3);
        window.push(false);
        window.push(true);
        window.push(true);
        window.push(true);
        assert_eq!(window.len(), 3);
        assert_eq!(window.accuracy(), Some(1.0));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut window = RollingWindow::new(0);
        window.push(true);
        window.push(false);
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.accuracy(), Some(0.0));
    }
}
