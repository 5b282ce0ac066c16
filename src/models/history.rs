use std::collections::VecDeque;
use std::sync::Mutex;

/// Fixed-capacity FIFO of the most recent CPU load samples.
pub struct CpuHistory {
    capacity: usize,
    samples: Mutex<VecDeque<String>>,
}

impl CpuHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: Mutex::new(VecDeque::with_capacity(capacity + 1)),
        }
    }

    /// Appends `sample`, drops the oldest entries past capacity and returns
    /// a copy of what remains, oldest first.
    pub fn record(&self, sample: impl Into<String>) -> Vec<String> {
        let mut samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        samples.push_back(sample.into());
        while samples.len() > self.capacity {
            samples.pop_front();
        }
        samples.iter().cloned().collect()
    }

    pub fn snapshot(&self) -> Vec<String> {
        let samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        samples.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let history = CpuHistory::new(10);
        assert!(history.is_empty());
        assert!(history.snapshot().is_empty());
    }

    #[test]
    fn keeps_only_the_most_recent_samples_in_order() {
        let history = CpuHistory::new(10);
        let mut last = Vec::new();
        for i in 0..15 {
            last = history.record(format!("{i}.00"));
        }

        let expected: Vec<String> = (5..15).map(|i| format!("{i}.00")).collect();
        assert_eq!(last.len(), 10);
        assert_eq!(last, expected);
        assert_eq!(history.snapshot(), expected);
    }

    #[test]
    fn returned_snapshot_is_detached() {
        let history = CpuHistory::new(3);
        let mut snapshot = history.record("1.00");
        snapshot.push("tampered".to_string());
        snapshot.clear();

        assert_eq!(history.snapshot(), vec!["1.00".to_string()]);
        assert_eq!(history.len(), 1);
    }
}
