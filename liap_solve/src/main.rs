use efg_lite::game::{GameResult, GameTree};
use efg_lite::strategy::BehaviorProfile;
use game_generators::{centipede, entry, pennies, rps};
use liap::{solve, solve_decomposed, CancellationToken, LiapParams, Solution};
use log::{debug, error, info, warn};
use structopt::StructOpt;

use std::process;
use std::str::FromStr;

#[derive(StructOpt, Debug)]
#[structopt(name = "LiapSolver")]
struct Opt {
    // Game to solve: pennies, rps, entry or centipede:<stages>
    #[structopt(short = "g", long = "game")]
    game: GameType,

    // Number of minimization attempts
    #[structopt(short = "n", long = "n_tries", default_value = "10")]
    n_tries: usize,

    // Stop once this many solutions are found, 0 for never
    #[structopt(short = "s", long = "stop_after", default_value = "1")]
    stop_after: usize,

    #[structopt(long = "maxits1", default_value = "100")]
    maxits1: usize,

    #[structopt(long = "tol1", default_value = "2e-10")]
    tol1: f64,

    #[structopt(long = "maxitsN", default_value = "20")]
    maxits_n: usize,

    #[structopt(long = "tolN", default_value = "1e-10")]
    tol_n: f64,

    // Seed for restarts; drawn from entropy if not provided
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(short = "t", long = "trace", default_value = "0")]
    trace: u8,

    // Solve marked subgames bottom-up
    #[structopt(short = "d", long = "decompose")]
    decompose: bool,

    // Deepest subgame solved separately when decomposing, 0 for all
    #[structopt(long = "max_depth", default_value = "0")]
    max_depth: usize,
}

#[derive(Debug, Clone)]
enum GameType {
    Pennies,
    Rps,
    Entry,
    Centipede(usize),
}

impl FromStr for GameType {
    type Err = String;
    fn from_str(game_type: &str) -> Result<Self, Self::Err> {
        match game_type {
            "pennies" => Ok(GameType::Pennies),
            "rps" => Ok(GameType::Rps),
            "entry" => Ok(GameType::Entry),
            "centipede" => Ok(GameType::Centipede(4)),
            g if g.starts_with("centipede:") => g["centipede:".len()..]
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(GameType::Centipede)
                .ok_or_else(|| format!("Invalid number of stages in {}", g)),
            g => Err(format!("Unknown game {}", g)),
        }
    }
}

impl GameType {
    fn build(&self) -> GameResult<GameTree> {
        match self {
            GameType::Pennies => pennies::game(),
            GameType::Rps => rps::game(),
            GameType::Entry => entry::game(),
            GameType::Centipede(n) => centipede::game(*n),
        }
    }
}

fn print_solution(game: &GameTree, solution: &Solution) {
    println!("{:?} --- liap value {:e}", solution.creator(), solution.value());
    for player in game.players() {
        for infoset in 0..game.num_infosets(player) {
            println!(
                "  {:?} infoset {}: {:?}",
                player,
                infoset,
                solution.profile().infoset(player, infoset)
            );
        }
    }
}

fn main() {
    env_logger::init();

    let opt = Opt::from_args();
    let params = LiapParams {
        trace: opt.trace,
        n_tries: opt.n_tries,
        stop_after: opt.stop_after,
        maxits1: opt.maxits1,
        tol1: opt.tol1,
        maxits_n: opt.maxits_n,
        tol_n: opt.tol_n,
        seed: opt.seed,
    };

    let game = match opt.game.build() {
        Ok(game) => game,
        Err(err) => {
            error!("Could not build {:?}: {}", opt.game, err);
            process::exit(1);
        }
    };
    info!(
        "Game has {} nodes and {} marked subgame roots",
        game.num_nodes(),
        game.marked_subgame_roots().len()
    );

    let start = BehaviorProfile::uniform(game.shape());
    let token = CancellationToken::new();

    if opt.decompose {
        match solve_decomposed(&game, &start, &params, opt.max_depth, &token) {
            Ok(outcome) => {
                info!(
                    "Solved {} subgames with {} evaluations",
                    outcome.per_subgame.len(),
                    outcome.num_evals
                );
                for (k, solutions) in outcome.per_subgame.iter().enumerate() {
                    debug!("Subgame {}: {} solutions", k + 1, solutions.len());
                }
                match outcome.solution {
                    Some(ref solution) => print_solution(&game, solution),
                    None => warn!("No equilibrium found for some subgame"),
                }
            }
            Err(err) => {
                error!("{}", err);
                process::exit(1);
            }
        }
    } else {
        match solve(&game, &start, &params, &token) {
            Ok(outcome) => {
                info!(
                    "{} tries, {} iterations, {} evaluations",
                    outcome.num_tries, outcome.num_iters, outcome.num_evals
                );
                if !outcome.found() {
                    warn!("No equilibrium found");
                }
                for solution in outcome.solutions.iter() {
                    print_solution(&game, solution);
                }
            }
            Err(err) => {
                error!("{}", err);
                process::exit(1);
            }
        }
    }
}
