//! Bag randomizer - shuffled draw queue of shapes
//!
//! Each refill enqueues one permutation of the seven playable shapes, so every
//! shape appears exactly once per bag. Nothing is guaranteed across bag
//! boundaries: the last shape of one bag may repeat as the first of the next.
//!
//! Also provides a small LCG so a seed fully determines the sequence.

use std::collections::VecDeque;

use crate::types::ShapeId;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// FIFO of upcoming shapes, refilled one bag at a time when empty
#[derive(Debug, Clone)]
pub struct DrawQueue {
    queue: VecDeque<ShapeId>,
    rng: SimpleRng,
    bags_filled: u32,
}

impl DrawQueue {
    /// Create an empty queue; the first draw fills the first bag
    pub fn new(seed: u32) -> Self {
        Self {
            queue: VecDeque::with_capacity(ShapeId::PLAYABLE.len()),
            rng: SimpleRng::new(seed),
            bags_filled: 0,
        }
    }

    /// Create a queue that plays `sequence` first, then falls back to bags.
    ///
    /// `Ghost` entries are dropped since they can never be spawned.
    pub fn scripted(seed: u32, sequence: impl IntoIterator<Item = ShapeId>) -> Self {
        let mut queue = Self::new(seed);
        queue
            .queue
            .extend(sequence.into_iter().filter(ShapeId::is_real));
        queue
    }

    /// Enqueue one shuffled permutation of every playable shape
    fn refill(&mut self) {
        let mut bag = ShapeId::PLAYABLE;
        self.rng.shuffle(&mut bag);
        self.queue.extend(bag);
        self.bags_filled = self.bags_filled.wrapping_add(1);
    }

    /// Dequeue the front shape, refilling first if the queue is empty
    pub fn draw(&mut self) -> ShapeId {
        if self.queue.is_empty() {
            self.refill();
        }

        match self.queue.pop_front() {
            Some(shape) => shape,
            // refill() always enqueues seven shapes
            None => unreachable!("draw queue empty after refill"),
        }
    }

    /// Shape the next `draw` will return, if already enqueued
    pub fn peek(&self) -> Option<ShapeId> {
        self.queue.front().copied()
    }

    /// Shapes currently enqueued
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of bags generated so far
    pub fn bags_filled(&self) -> u32 {
        self.bags_filled
    }

    /// Drop everything enqueued; the RNG keeps its state
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Current RNG state (for replaying the same sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for DrawQueue {
    fn default() -> Self {
        Self::new(1)
    }
}
