//! RNG module - piece sources
//!
//! The engine never decides which piece comes next; it asks a [`PieceSource`].
//! Two sources ship with the crate:
//!
//! - [`BagSource`]: the "7-bag" generator, shuffled with a seeded LCG
//! - [`SequenceSource`]: a fixed cycle, for scripted games and tests
//!
//! [`SimpleRng`] is also reused by the planner's pacing policy.

use crate::types::PieceKind;

/// Supplies the id of the next piece to spawn.
pub trait PieceSource {
    fn next_piece(&mut self) -> PieceKind;
}

impl<F> PieceSource for F
where
    F: FnMut() -> PieceKind,
{
    fn next_piece(&mut self) -> PieceKind {
        self()
    }
}

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
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Uniform value in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct BagSource {
    /// Current bag of pieces
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
    /// RNG for shuffling
    rng: SimpleRng,
}

impl BagSource {
    /// Create a new bag source with the given seed
    pub fn new(seed: u32) -> Self {
        let mut source = Self {
            bag: PieceKind::ALL,
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        source.refill_bag();
        source
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next piece from the bag
    pub fn draw(&mut self) -> PieceKind {
        if self.bag_index >= 7 {
            self.refill_bag();
        }

        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// Pieces left in the current bag
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.bag_index..]
    }
}

impl Default for BagSource {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PieceSource for BagSource {
    fn next_piece(&mut self) -> PieceKind {
        self.draw()
    }
}

/// Repeats a fixed list of pieces forever.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    pieces: Vec<PieceKind>,
    index: usize,
}

impl SequenceSource {
    /// Panics if `pieces` is empty.
    pub fn new(pieces: impl Into<Vec<PieceKind>>) -> Self {
        let pieces = pieces.into();
        assert!(!pieces.is_empty(), "sequence source needs at least one piece");
        Self { pieces, index: 0 }
    }

    /// The same kind every time
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new(vec![kind])
    }
}

impl PieceSource for SequenceSource {
    fn next_piece(&mut self) -> PieceKind {
        let piece = self.pieces[self.index];
        self.index = (self.index + 1) % self.pieces.len();
        piece
    }
}
