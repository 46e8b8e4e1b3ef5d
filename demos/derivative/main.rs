use std::{error::Error, path::PathBuf};

use clap::{Parser, ValueEnum};
use deriv_rl::{
    algo::tabular::{QTableAgent, QTableAgentConfig},
    exploration::EpsilonGreedy,
    gym::DerivativeEnv,
    run::{self, Policy, SOLVED_THRESHOLD},
    space::ActionGrid,
};
use rand::{rngs::StdRng, SeedableRng};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Function {
    Square,
    Cube,
    Sin,
    Exp,
}

impl Function {
    fn eval(self, x: f64) -> f64 {
        match self {
            Self::Square => x * x,
            Self::Cube => x * x * x,
            Self::Sin => x.sin(),
            Self::Exp => x.exp(),
        }
    }

    fn formula(self) -> &'static str {
        match self {
            Self::Square => "x^2",
            Self::Cube => "x^3",
            Self::Sin => "sin(x)",
            Self::Exp => "e^x",
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    /// Function to differentiate
    #[arg(long, value_enum, default_value_t = Function::Square)]
    function: Function,
    /// Point at which to differentiate
    #[arg(long, default_value_t = 1.0)]
    point: f64,
    /// Central difference step size
    #[arg(long, default_value_t = 1e-5)]
    step_size: f64,
    /// Smallest derivative estimate
    #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
    min_action: f64,
    /// Largest derivative estimate
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    max_action: f64,
    /// Number of derivative estimates on the grid
    #[arg(long, default_value_t = 100)]
    num_actions: usize,
    #[arg(long, default_value_t = 100)]
    state_bins: usize,
    #[arg(long, default_value_t = 1.0)]
    state_range: f64,
    #[arg(long, default_value_t = 0.1)]
    alpha: f64,
    #[arg(long, default_value_t = 0.9)]
    gamma: f64,
    #[arg(long, default_value_t = 0.1)]
    epsilon: f64,
    #[arg(long, default_value_t = 5000)]
    episodes: usize,
    /// Evaluation episodes
    #[arg(long, default_value_t = 5)]
    trials: usize,
    /// Evaluate without exploration
    #[arg(long)]
    greedy: bool,
    #[arg(long)]
    seed: Option<u64>,
    /// Reward at which an episode counts as solved
    #[arg(long, default_value_t = SOLVED_THRESHOLD, allow_hyphen_values = true)]
    threshold: f64,
    /// Write per-episode rewards to this CSV file
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let function = args.function;
    let mut env =
        DerivativeEnv::with_step_size(move |x: f64| function.eval(x), args.point, args.step_size)?;
    let actions = ActionGrid::linspace(args.min_action, args.max_action, args.num_actions)?;
    let config = QTableAgentConfig {
        exploration: EpsilonGreedy::constant(args.epsilon)?,
        alpha: args.alpha,
        gamma: args.gamma,
        num_actions: actions.len(),
        state_bins: args.state_bins,
        state_range: args.state_range,
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut agent = QTableAgent::new(config, rng)?;

    let rewards = run::train(&mut agent, &mut env, &actions, args.episodes);
    let policy = if args.greedy {
        Policy::Greedy
    } else {
        Policy::Behavior
    };
    let average_reward = run::evaluate(&mut agent, &mut env, &actions, args.trials, policy);

    if let Some(path) = &args.out {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["episode", "reward"])?;
        for (i, reward) in rewards.iter().enumerate() {
            wtr.write_record([(i + 1).to_string(), reward.to_string()])?;
        }
        wtr.flush()?;
    }

    println!(
        "Problem: Find the derivative of f(x) = {} at x = {}",
        function.formula(),
        args.point
    );
    if let Some(solution) = env.true_derivative() {
        println!("Solution: f'({}) = {solution}", args.point);
    }
    println!(
        "Estimate: {}",
        actions.value(agent.greedy_action(args.point))
    );
    println!("Average reward: {average_reward:.2}");
    match run::episodes_to_solve(&rewards, args.threshold) {
        Some(episodes) => println!("Episodes to solve: {episodes}"),
        None => println!("Episodes to solve: not solved in {} episodes", args.episodes),
    }

    Ok(())
}
