//! Pacing - how fast (and how sloppily) a plan is executed
//!
//! The autoplay client asks its [`Pacing`] for a think delay before each
//! plan, a delay before each command, and whether to actually send it.

use std::time::Duration;

use crate::core::SimpleRng;

pub trait Pacing: Send {
    fn think_delay(&mut self) -> Duration;
    fn action_delay(&mut self) -> Duration;
    /// `false` means the command is silently skipped
    fn keep_action(&mut self) -> bool;
}

/// No delays, nothing skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacing for NoPacing {
    fn think_delay(&mut self) -> Duration {
        Duration::ZERO
    }

    fn action_delay(&mut self) -> Duration {
        Duration::ZERO
    }

    fn keep_action(&mut self) -> bool {
        true
    }
}

/// Human-like timing: a pause to think, uneven keypresses, the odd missed key.
#[derive(Debug, Clone)]
pub struct HumanPacing {
    rng: SimpleRng,
    think_ms: (u32, u32),
    action_ms: (u32, u32),
    skip_chance: f32,
}

impl HumanPacing {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            think_ms: (1000, 2000),
            action_ms: (300, 600),
            skip_chance: 0.02,
        }
    }

    pub fn with_think_ms(mut self, min: u32, max: u32) -> Self {
        self.think_ms = (min, max.max(min));
        self
    }

    pub fn with_action_ms(mut self, min: u32, max: u32) -> Self {
        self.action_ms = (min, max.max(min));
        self
    }

    pub fn with_skip_chance(mut self, chance: f32) -> Self {
        self.skip_chance = chance.clamp(0.0, 1.0);
        self
    }

    fn uniform_ms(&mut self, (min, max): (u32, u32)) -> Duration {
        let ms = min + self.rng.next_range((max - min).saturating_add(1));
        Duration::from_millis(ms as u64)
    }
}

impl Pacing for HumanPacing {
    fn think_delay(&mut self) -> Duration {
        self.uniform_ms(self.think_ms)
    }

    fn action_delay(&mut self) -> Duration {
        self.uniform_ms(self.action_ms)
    }

    fn keep_action(&mut self) -> bool {
        self.rng.next_f32() >= self.skip_chance
    }
}

impl<P: Pacing + ?Sized> Pacing for Box<P> {
    fn think_delay(&mut self) -> Duration {
        (**self).think_delay()
    }

    fn action_delay(&mut self) -> Duration {
        (**self).action_delay()
    }

    fn keep_action(&mut self) -> bool {
        (**self).keep_action()
    }
}
