//! RNG module - injectable sources for shape draws
//!
//! Every random decision in the engine is "pick one of `len` pool entries".
//! [`ShapeSource`] abstracts that so callers choose the generator:
//!
//! - [`SimpleRng`]: seeded LCG, deterministic and allocation-free
//! - [`RandSource`]: adapter over any `rand` generator (entropy-seeded play)
//! - [`ScriptedSource`]: replays a fixed list of picks, then falls back to a seeded LCG

use rand::Rng;

/// Source of uniform pool indices.
pub trait ShapeSource {
    /// Return an index in `0..len`. Callers never pass `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

impl<S: ShapeSource + ?Sized> ShapeSource for &mut S {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

impl<S: ShapeSource + ?Sized> ShapeSource for Box<S> {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
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
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Takes the high bits: the low bits of a power-of-two LCG cycle with a
    /// short period, which shows up as visible patterns on small pools.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state (re-seeding with it continues the sequence).
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ShapeSource for SimpleRng {
    fn pick(&mut self, len: usize) -> usize {
        self.next_range(len as u32) as usize
    }
}

/// Wraps any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandSource<R>(pub R);

impl RandSource<rand::rngs::StdRng> {
    /// Seed a `StdRng` from operating-system entropy.
    pub fn from_entropy() -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::from_os_rng())
    }
}

impl<R: Rng> ShapeSource for RandSource<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Replays scripted picks in order, then continues with a seeded [`SimpleRng`].
///
/// Each scripted value is reduced modulo the requested `len`.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: Vec<usize>,
    cursor: usize,
    fallback: SimpleRng,
}

impl ScriptedSource {
    pub fn new(script: Vec<usize>, fallback_seed: u32) -> Self {
        Self {
            script,
            cursor: 0,
            fallback: SimpleRng::new(fallback_seed),
        }
    }

    /// Scripted picks not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len().saturating_sub(self.cursor)
    }
}

impl ShapeSource for ScriptedSource {
    fn pick(&mut self, len: usize) -> usize {
        match self.script.get(self.cursor) {
            Some(&v) => {
                self.cursor += 1;
                v % len
            }
            None => self.fallback.pick(len),
        }
    }
}
