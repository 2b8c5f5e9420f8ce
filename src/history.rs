use crate::bbox::{BBox, Ltrb};
use crate::math::Decay;

use nalgebra as na;
use std::collections::VecDeque;
use std::fmt;

/// Bounded, most-recent-first record of one track's raw boxes.
#[derive(Clone)]
pub struct TrackHistory {
    deque: VecDeque<na::Vector4<f32>>,
    capacity: usize,
}

impl fmt::Debug for TrackHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.deque.fmt(f)
    }
}

impl TrackHistory {
    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            deque: VecDeque::with_capacity(cap),
            capacity: cap,
        }
    }

    /// Records `bbox` as the newest entry, returning the evicted oldest one.
    #[inline]
    pub fn push(&mut self, bbox: &BBox<Ltrb>) -> Option<BBox<Ltrb>> {
        if self.capacity == 0 {
            return None;
        }

        let poped = if self.is_full() {
            self.deque.pop_back()
        } else {
            None
        };

        self.deque.push_front(bbox.as_vector());

        poped.map(|v| BBox::from_vector(&v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.deque.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.deque.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.deque.len() >= self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn clear(&mut self) {
        self.deque.clear()
    }

    #[inline]
    pub fn latest(&self) -> Option<BBox<Ltrb>> {
        self.deque.front().map(BBox::from_vector)
    }

    /// Entries newest first.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = BBox<Ltrb>> + '_ {
        self.deque.iter().map(BBox::from_vector)
    }

    /// Weighted blend of `current` with the recorded entries.
    ///
    /// `current` weighs `1 - factor`, the entry at lag `k` weighs
    /// `decay.weight(factor, k, len)`. Every coordinate is blended on its own.
    /// An empty history returns `current` unchanged.
    pub fn smooth(&self, current: &BBox<Ltrb>, factor: f32, decay: Decay) -> BBox<Ltrb> {
        if self.deque.is_empty() {
            return *current;
        }

        let len = self.deque.len() as f32;
        let mut sum = current.as_vector() * (1.0 - factor);
        let mut weight_sum = 1.0 - factor;

        for (lag, entry) in self.deque.iter().enumerate() {
            let weight = decay.weight(factor, lag as f32, len);

            sum += entry * weight;
            weight_sum += weight;
        }

        if weight_sum <= f32::EPSILON {
            return *current;
        }

        BBox::from_vector(&(sum / weight_sum))
    }
}
