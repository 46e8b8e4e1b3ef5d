use rand::Rng;

use crate::{
    decay::{self, Decay},
    ensure_interval,
    error::Result,
};

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    ///
    /// **Errors** if the schedule can leave the interval `[0,1]`
    pub fn new(decay: D) -> Result<Self> {
        let bounds = decay.bounds();
        for epsilon in [*bounds.start(), *bounds.end()] {
            ensure_interval!(epsilon, 0.0, 1.0);
        }
        Ok(Self { epsilon: decay })
    }

    /// The exploration probability at the given episode
    pub fn epsilon(&self, episode: u32) -> f64 {
        self.epsilon.evaluate(f64::from(episode))
    }

    /// Invoke epsilon greedy policy for current episode
    pub fn choose(&self, episode: u32, rng: &mut impl Rng) -> Choice {
        if rng.gen::<f64>() < self.epsilon(episode) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

impl EpsilonGreedy<decay::Constant> {
    /// Epsilon greedy policy with a fixed exploration probability
    pub fn constant(epsilon: f64) -> Result<Self> {
        Self::new(decay::Constant::new(epsilon))
    }
}
