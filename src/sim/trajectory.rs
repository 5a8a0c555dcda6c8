//! Trajectory trail sampling
//!
//! Keeps a bounded, chronological history of body positions. Positions are
//! only recorded every `interval` steps so the trail stays readable at high
//! frame rates.

use std::collections::VecDeque;

use glam::Vec2;

/// Decimating FIFO of sampled body positions (surface coordinates)
#[derive(Debug, Clone)]
pub struct TrajectorySampler {
    points: VecDeque<Vec2>,
    capacity: usize,
    interval: u32,
    /// Steps since the last recorded sample
    counter: u32,
}

impl TrajectorySampler {
    /// Create a sampler. `interval` of 0 is treated as 1 (sample every step).
    pub fn new(capacity: usize, interval: u32) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
            interval: interval.max(1),
            counter: 0,
        }
    }

    /// Count one step and record `pos` if the interval has elapsed.
    /// Returns true if a point was appended.
    pub fn observe(&mut self, pos: Vec2) -> bool {
        self.counter += 1;
        if self.counter < self.interval {
            return false;
        }
        self.counter = 0;
        self.push(pos);
        true
    }

    fn push(&mut self, pos: Vec2) {
        if self.capacity == 0 {
            return;
        }
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(pos);
    }

    /// Drop every point and restart the step counter
    pub fn clear(&mut self) {
        self.points.clear();
        self.counter = 0;
    }

    /// Oldest first
    pub fn points(&self) -> impl ExactSizeIterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }

    /// Contiguous copy of the trail, oldest first
    pub fn to_vec(&self) -> Vec<Vec2> {
        self.points.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Change capacity, evicting the oldest points if the trail is now too long
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.points.len() > capacity {
            self.points.pop_front();
        }
    }

    /// Change the sampling interval. Does not reset the step counter.
    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval.max(1);
    }

    /// Most recently recorded point
    pub fn last(&self) -> Option<Vec2> {
        self.points.back().copied()
    }
}
