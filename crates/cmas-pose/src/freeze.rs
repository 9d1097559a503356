//! Hesitation detection over a scalar body signal.

/// Counts near-still samples with a bounded increment/decrement rule and
/// latches once the count passes its limit.
///
/// Each sample that moves less than `epsilon` from the previous one adds one
/// to the count; any other sample takes one away, never going below zero.
/// The latch is one-way for the life of the tracker.
#[derive(Debug, Clone)]
pub struct FreezeTracker {
    epsilon: f64,
    limit: u32,
    count: u32,
    previous: Option<f64>,
    latched: bool,
}

impl FreezeTracker {
    pub fn new(epsilon: f64, limit: u32) -> Self {
        Self {
            epsilon,
            limit,
            count: 0,
            previous: None,
            latched: false,
        }
    }

    /// Feed one sample; returns whether the latch is set.
    pub fn update(&mut self, value: f64) -> bool {
        match self.previous {
            Some(prev) if (value - prev).abs() < self.epsilon => self.count += 1,
            _ => self.count = self.count.saturating_sub(1),
        }
        self.previous = Some(value);

        if self.count > self.limit && !self.latched {
            self.latched = true;
            tracing::debug!(count = self.count, limit = self.limit, "freeze latched");
        }
        self.latched
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
