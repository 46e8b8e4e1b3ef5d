use log::{debug, info, trace};
use rand::Rng;

use crate::{
    algo::tabular::QTableAgent,
    decay::Decay,
    env::Environment,
    space::ActionGrid,
};

/// Reward threshold at which an episode counts as solved
pub const SOLVED_THRESHOLD: f64 = -0.01;

/// Which policy drives the agent during [`evaluate`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Policy {
    /// The exploring policy used for training
    #[default]
    Behavior,
    /// Always exploit the learned table
    Greedy,
}

/// Train `agent` in `env` for `num_episodes` episodes
///
/// The agent's table is the only state carried from one episode to the next.
///
/// **Returns** the total reward of every episode, in order
///
/// **Panics** if `actions` does not hold exactly one value per agent action
pub fn train<R, D, E>(
    agent: &mut QTableAgent<R, D>,
    env: &mut E,
    actions: &ActionGrid,
    num_episodes: usize,
) -> Vec<f64>
where
    R: Rng,
    D: Decay,
    E: Environment<State = f64, Action = f64>,
{
    let report_every = (num_episodes / 10).max(1);
    let rewards = (0..num_episodes)
        .map(|episode| {
            let reward = agent.go(env, actions);
            trace!("episode {episode}: reward {reward}");
            if (episode + 1) % report_every == 0 {
                debug!(
                    "episode {}/{num_episodes}: reward {reward:.4}, epsilon {:.3}",
                    episode + 1,
                    agent.epsilon()
                );
            }
            reward
        })
        .collect::<Vec<_>>();

    if let Some(last) = rewards.last() {
        info!(
            "trained {num_episodes} episodes, last reward {last:.4}, solved after {:?}",
            episodes_to_solve(&rewards, SOLVED_THRESHOLD)
        );
    }
    rewards
}

/// Run `num_trials` episodes without learning
///
/// **Returns** the mean reward per episode
///
/// **Panics** if `num_trials` is zero or `actions` does not hold exactly one value per agent
/// action
pub fn evaluate<R, D, E>(
    agent: &mut QTableAgent<R, D>,
    env: &mut E,
    actions: &ActionGrid,
    num_trials: usize,
    policy: Policy,
) -> f64
where
    R: Rng,
    D: Decay,
    E: Environment<State = f64, Action = f64>,
{
    assert!(num_trials > 0, "Evaluation needs at least one trial");
    agent.check_actions(actions);

    let mut total_reward = 0.0;
    for _ in 0..num_trials {
        let mut state = env.reset();
        loop {
            let action = match policy {
                Policy::Behavior => agent.choose_action(state),
                Policy::Greedy => agent.greedy_action(state),
            };
            let (next_state, reward, done) = env.step(actions.value(action));
            total_reward += reward;
            state = next_state;
            if done {
                break;
            }
        }
    }

    let mean = total_reward / num_trials as f64;
    info!("evaluated {num_trials} trials ({policy:?}): mean reward {mean:.4}");
    mean
}

/// The 1-based number of episodes it took to first reach `threshold`, or `None` if it never did
pub fn episodes_to_solve(rewards: &[f64], threshold: f64) -> Option<usize> {
    rewards
        .iter()
        .position(|&reward| reward >= threshold)
        .map(|i| i + 1)
}
