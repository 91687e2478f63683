//! Agent factory
//!
//! Builds new agent records from caller input. Everything the caller does not
//! supply is generated: age, speed and strength come from an
//! [`AttributeSource`], timestamps from the wall clock.

use crate::agent::{Agent, AGE_RANGE, RATING_RANGE};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use tracing::debug;

/// Source of generated agent attributes.
///
/// Implementations draw a value from `range` (inclusive on both ends).
pub trait AttributeSource: Send + Sync {
    fn roll(&self, range: RangeInclusive<u16>) -> u16;
}

/// Uniform draws from the thread-local generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl AttributeSource for ThreadRngSource {
    fn roll(&self, range: RangeInclusive<u16>) -> u16 {
        if range.is_empty() {
            return *range.start();
        }
        rand::thread_rng().gen_range(range)
    }
}

/// Reproducible draws from a fixed seed
#[derive(Debug)]
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl AttributeSource for SeededSource {
    fn roll(&self, range: RangeInclusive<u16>) -> u16 {
        if range.is_empty() {
            return *range.start();
        }
        self.rng.lock().gen_range(range)
    }
}

/// Builds an unsaved agent stamped with the current time.
///
/// `name` and `gender` are copied verbatim; callers reject empty values.
pub fn new_agent(
    name: impl Into<String>,
    gender: impl Into<String>,
    source: &dyn AttributeSource,
) -> Agent {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    new_agent_at(name, gender, source, now)
}

/// Builds an unsaved agent created at `now` (Unix seconds).
pub fn new_agent_at(
    name: impl Into<String>,
    gender: impl Into<String>,
    source: &dyn AttributeSource,
    now: u64,
) -> Agent {
    let agent = Agent {
        id: 0,
        name: name.into(),
        age: roll_within(source, AGE_RANGE),
        gender: gender.into(),
        speed: roll_within(source, RATING_RANGE),
        strength: roll_within(source, RATING_RANGE),
        busy: false,
        created_at: now,
        updated_at: now,
    };
    debug!(
        name = %agent.name,
        age = agent.age,
        speed = agent.speed,
        strength = agent.strength,
        "Generated agent attributes"
    );
    agent
}

// Sources are external; the bounds hold no matter what they return.
fn roll_within(source: &dyn AttributeSource, range: RangeInclusive<u16>) -> u16 {
    let (low, high) = (*range.start(), *range.end());
    source.roll(range).clamp(low, high)
}
