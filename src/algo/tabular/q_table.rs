use log::debug;
use rand::Rng;

use crate::{
    decay::{self, Decay},
    ensure_interval,
    env::{Environment, Exp},
    error::{Error, Result},
    exploration::{Choice, EpsilonGreedy},
    space::{ActionGrid, StateBins},
};

/// Dense action-value table indexed by `[state_bin, action_index]`
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Vec<f64>,
    num_actions: usize,
}

impl QTable {
    /// A zero-initialized table of shape `state_bins × num_actions`
    fn zeros(state_bins: usize, num_actions: usize) -> Self {
        Self {
            values: vec![0.0; state_bins * num_actions],
            num_actions,
        }
    }

    /// `(state_bins, num_actions)`
    pub fn shape(&self) -> (usize, usize) {
        (self.values.len() / self.num_actions, self.num_actions)
    }

    /// Action values for a state bin
    pub fn row(&self, state: usize) -> &[f64] {
        let start = state * self.num_actions;
        &self.values[start..start + self.num_actions]
    }

    pub fn get(&self, state: usize, action: usize) -> f64 {
        self.row(state)[action]
    }

    fn set(&mut self, state: usize, action: usize, value: f64) {
        self.values[state * self.num_actions + action] = value;
    }

    /// Largest action value in a state bin, NaN if any value is NaN
    pub fn max(&self, state: usize) -> f64 {
        self.row(state).iter().copied().fold(f64::NEG_INFINITY, |max, q| {
            if max.is_nan() || q.is_nan() {
                f64::NAN
            } else {
                max.max(q)
            }
        })
    }

    /// Index of the largest action value in a state bin, ties resolved to the lowest index
    pub fn argmax(&self, state: usize) -> usize {
        let row = self.row(state);
        (1..row.len()).fold(0, |best, a| if row[a] > row[best] { a } else { best })
    }
}

/// Configuration for the [`QTableAgent`]
pub struct QTableAgentConfig<D: Decay> {
    pub exploration: EpsilonGreedy<D>,
    /// Learning rate, in `[0,1]`
    pub alpha: f64,
    /// Discount factor, in `[0,1]`
    pub gamma: f64,
    pub num_actions: usize,
    pub state_bins: usize,
    /// Span of the continuous state mapped onto `state_bins`
    pub state_range: f64,
}

impl Default for QTableAgentConfig<decay::Constant> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::constant(0.1).expect("0.1 is a valid exploration rate"),
            alpha: 0.1,
            gamma: 0.9,
            num_actions: 100,
            state_bins: 100,
            state_range: 1.0,
        }
    }
}

/// A Q-learning agent over a discretized 1-D continuous state
///
/// The agent picks action *indices*; callers translate them into concrete actions, e.g.
/// through an [`ActionGrid`].
///
/// ### Generics
/// - `R` - The source of randomness for exploration, injected so runs can be seeded
/// - `D` - The [`Decay`] schedule of the exploration rate, constant by default
pub struct QTableAgent<R, D = decay::Constant>
where
    R: Rng,
    D: Decay,
{
    q_table: QTable,
    bins: StateBins,
    exploration: EpsilonGreedy<D>,
    alpha: f64,   // learning rate
    gamma: f64,   // discount factor
    episode: u32, // current episode
    rng: R,
}

impl<R, D> QTableAgent<R, D>
where
    R: Rng,
    D: Decay,
{
    /// Initialize a new `QTableAgent` with a zeroed table
    ///
    /// **Errors** if `alpha` or `gamma` is not in the interval `[0,1]`, if there are no
    /// actions or no state bins, or if `state_range` is not finite and positive
    pub fn new(config: QTableAgentConfig<D>, rng: R) -> Result<Self> {
        let QTableAgentConfig {
            exploration,
            alpha,
            gamma,
            num_actions,
            state_bins,
            state_range,
        } = config;
        ensure_interval!(alpha, 0.0, 1.0);
        ensure_interval!(gamma, 0.0, 1.0);
        if num_actions == 0 {
            return Err(Error::EmptySpace("action"));
        }
        let bins = StateBins::new(state_bins, state_range)?;

        debug!(
            "q-table agent: {state_bins}x{num_actions} table, alpha = {alpha}, gamma = {gamma}, epsilon = {}",
            exploration.epsilon(0)
        );

        Ok(Self {
            q_table: QTable::zeros(state_bins, num_actions),
            bins,
            exploration,
            alpha,
            gamma,
            episode: 0,
            rng,
        })
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn state_bins(&self) -> &StateBins {
        &self.bins
    }

    pub fn num_actions(&self) -> usize {
        self.q_table.num_actions
    }

    /// Number of learning episodes completed through [`go`](Self::go)
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Asserts that `actions` maps every action index of the table and nothing more
    pub fn check_actions(&self, actions: &ActionGrid) {
        assert_eq!(
            actions.len(),
            self.num_actions(),
            "Action grid size must match the agent's number of actions"
        );
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon(self.episode)
    }

    /// The action with the highest value for `state`, ties resolved to the lowest index
    pub fn greedy_action(&self, state: f64) -> usize {
        self.q_table.argmax(self.bins.index(state))
    }

    /// Choose an action index for `state` according to the exploration policy
    pub fn choose_action(&mut self, state: f64) -> usize {
        match self.exploration.choose(self.episode, &mut self.rng) {
            Choice::Explore => self.rng.gen_range(0..self.q_table.num_actions),
            Choice::Exploit => self.greedy_action(state),
        }
    }

    /// Apply the one-step Q-learning update for an observed transition
    ///
    /// `Q[s,a] <- (1 - alpha) * Q[s,a] + alpha * (reward + gamma * max_a' Q[s',a'])`
    ///
    /// **Panics** if `experience.action` is not a valid action index
    pub fn update_q_table(&mut self, experience: Exp<f64, usize>) {
        let Exp {
            state,
            action,
            reward,
            next_state,
            done: _,
        } = experience;
        let s = self.bins.index(state);
        let next_s = self.bins.index(next_state);

        let q_value = self.q_table.get(s, action);
        let max_next_q = self.q_table.max(next_s);
        let new_q_value = reward + self.gamma * max_next_q;
        let weighted_q_value = (1.0 - self.alpha) * q_value + self.alpha * new_q_value;

        self.q_table.set(s, action, weighted_q_value);
    }

    /// Run one learning episode, mapping action indices through `actions`
    ///
    /// **Returns** the total reward of the episode
    ///
    /// **Panics** if `actions` does not hold exactly one value per action index
    pub fn go<E>(&mut self, env: &mut E, actions: &ActionGrid) -> f64
    where
        E: Environment<State = f64, Action = f64>,
    {
        self.check_actions(actions);
        let mut state = env.reset();
        let mut total = 0.0;
        loop {
            let action = self.choose_action(state);
            let (next_state, reward, done) = env.step(actions.value(action));
            self.update_q_table(Exp {
                state,
                action,
                reward,
                next_state,
                done,
            });
            total += reward;
            state = next_state;
            if done {
                break;
            }
        }

        self.episode += 1;
        total
    }
}
