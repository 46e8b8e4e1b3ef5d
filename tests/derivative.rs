use deriv_rl::{
    algo::tabular::{QTableAgent, QTableAgentConfig},
    env::Environment,
    gym::DerivativeEnv,
    run::{self, Policy},
    space::ActionGrid,
};
use rand::{rngs::StdRng, SeedableRng};
use statrs::statistics::Statistics;

const NUM_EPISODES: usize = 5000;
const NUM_TRIALS: usize = 5;

fn square(x: f64) -> f64 {
    x * x
}

#[test]
fn learns_derivative_of_square() {
    let mut env = DerivativeEnv::new(square, 1.0);
    let actions = ActionGrid::linspace(-10.0, 10.0, 100).unwrap();
    let config = QTableAgentConfig {
        num_actions: actions.len(),
        ..Default::default()
    };

    let mut untrained: QTableAgent<StdRng> =
        QTableAgent::new(config, StdRng::seed_from_u64(11)).unwrap();
    let baseline = run::evaluate(
        &mut untrained,
        &mut env,
        &actions,
        NUM_TRIALS,
        Policy::Greedy,
    );

    let config = QTableAgentConfig {
        num_actions: actions.len(),
        ..Default::default()
    };
    let mut agent: QTableAgent<StdRng> =
        QTableAgent::new(config, StdRng::seed_from_u64(11)).unwrap();
    let rewards = run::train(&mut agent, &mut env, &actions, NUM_EPISODES);
    assert_eq!(rewards.len(), NUM_EPISODES);

    let derivative = env.true_derivative().unwrap();
    assert!((derivative - 2.0000000000333).abs() < 1e-9);

    let estimate = actions.value(agent.greedy_action(1.0));
    assert!(
        (estimate - 2.0).abs() <= actions.resolution(),
        "estimate {estimate} is too far from 2"
    );

    let greedy = run::evaluate(&mut agent, &mut env, &actions, NUM_TRIALS, Policy::Greedy);
    assert!(greedy > baseline, "{greedy} <= {baseline}");
    assert!(greedy > -actions.resolution());

    // late episodes are mostly greedy, so on average far better than the first ones
    let early = rewards[..100].mean();
    let late = rewards[NUM_EPISODES - 100..].mean();
    assert!(late > early, "late {late} <= early {early}");
}

#[test]
fn state_boundaries_stay_in_table() {
    let actions = ActionGrid::linspace(-1.0, 1.0, 5).unwrap();
    let config = QTableAgentConfig {
        num_actions: actions.len(),
        state_bins: 8,
        state_range: 4.0,
        ..Default::default()
    };
    let mut agent: QTableAgent<StdRng> =
        QTableAgent::new(config, StdRng::seed_from_u64(3)).unwrap();

    for point in [0.0, 4.0, -1.0, 9.0] {
        let mut env = DerivativeEnv::new(f64::cos, point);
        run::train(&mut agent, &mut env, &actions, 20);
        assert!(agent.choose_action(point) < actions.len());
        assert!(!env.is_active());
    }
    assert_eq!(agent.state_bins().index(0.0), 0);
    assert_eq!(agent.state_bins().index(4.0), 7);
}
