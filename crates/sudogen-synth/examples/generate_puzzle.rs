//! Example synthesizing puzzles from the command line.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example generate_puzzle
//! ```
//!
//! Require a unique solution and a hidden-cell range:
//!
//! ```sh
//! cargo run --example generate_puzzle -- --unique --min-hidden 40 --max-hidden 50
//! ```
//!
//! Require the puzzle to be solved by a set of rules (names are matched
//! ignoring case and punctuation; "Solved" is added automatically):
//!
//! ```sh
//! cargo run --example generate_puzzle -- --grid six --rule "naked singles" --rule "hidden singles"
//! ```
//!
//! Variant grids and named clue layouts:
//!
//! ```sh
//! cargo run --example generate_puzzle -- --grid x --anti-knight --unique
//! cargo run --example generate_puzzle -- --mask rotational-18 --unique
//! ```
//!
//! Synthesize several puzzles in parallel, each with a different random set
//! of pinned clues:
//!
//! ```sh
//! cargo run --example generate_puzzle -- --unique --count 4 --pinned 8
//! ```

use std::{error::Error, process, time::Duration};

use clap::{Parser, ValueEnum};
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;
use rayon::prelude::*;
use sudogen_core::{Grid, MASK_LIBRARY, MaskPattern, MaskSymbol, Variant};
use sudogen_deduce::{BoxedRule, Stage, Strategy, StrategyRequirement, rule};
use sudogen_synth::{Constraint, PuzzleResult, Synthesizer};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GridKind {
    /// 4x4 with 2x2 blocks.
    Four,
    /// 6x6 with 3x2 blocks.
    Six,
    /// 9x9 with 3x3 blocks.
    Nine,
    /// 12x12 with 4x3 blocks.
    Twelve,
    /// 9x9 with both diagonals.
    X,
    /// 9x9 with a Y.
    Y,
    /// 9x9 with four extra windows.
    FourSquare,
    /// 5x5 with irregular regions.
    Cross,
    /// 6x6 with irregular regions.
    Triangle,
}

impl GridKind {
    fn variant(self) -> Variant {
        match self {
            Self::Four => Variant::Regular(4),
            Self::Six => Variant::ROKUDOKU,
            Self::Nine => Variant::Regular(9),
            Self::Twelve => Variant::DOZENDOKU,
            Self::X => Variant::X(9),
            Self::Y => Variant::Y(9),
            Self::FourSquare => Variant::FourSquare,
            Self::Cross => Variant::CrossDoku,
            Self::Triangle => Variant::TriangleDoku,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Grid to synthesize on.
    #[arg(long, value_name = "KIND", default_value = "nine")]
    grid: GridKind,

    /// Forbid equal values a king's move apart.
    #[arg(long)]
    anti_king: bool,

    /// Forbid equal values a knight's move apart.
    #[arg(long)]
    anti_knight: bool,

    /// Named 9x9 layout of clues the puzzle must follow.
    #[arg(long, value_name = "NAME")]
    mask: Option<String>,

    /// Minimum number of hidden cells.
    #[arg(long, value_name = "COUNT")]
    min_hidden: Option<usize>,

    /// Maximum number of hidden cells.
    #[arg(long, value_name = "COUNT")]
    max_hidden: Option<usize>,

    /// Require a unique solution.
    #[arg(long)]
    unique: bool,

    /// Hide as many cells as possible.
    #[arg(long)]
    maximize: bool,

    /// Rule the puzzle must be solvable with. Repeatable.
    #[arg(short, long = "rule", value_name = "RULE", num_args = 1..)]
    rules: Vec<String>,

    /// Number of puzzles to synthesize.
    #[arg(long, value_name = "COUNT", default_value_t = 1)]
    count: u64,

    /// Random cells pinned as clues in each puzzle.
    #[arg(long, value_name = "COUNT", default_value_t = 0)]
    pinned: usize,

    /// Seed of the first puzzle; later puzzles use the following seeds.
    #[arg(long, value_name = "SEED", default_value_t = 0)]
    seed: u64,

    /// Time limit per puzzle, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    timeout: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let grid = args.grid.variant().builder().and_then(|mut builder| {
        if args.anti_king {
            builder = builder.anti_king();
        }
        if args.anti_knight {
            builder = builder.anti_knight();
        }
        builder.build()
    });
    let grid = match grid {
        Ok(grid) => grid,
        Err(err) => {
            eprintln!("Failed to build the grid: {err}");
            process::exit(1);
        }
    };

    let mut constraints = Vec::new();
    if args.min_hidden.is_some() || args.max_hidden.is_some() {
        constraints.push(Constraint::HiddenCount {
            min: args.min_hidden.unwrap_or(0),
            max: args.max_hidden.unwrap_or(grid.num_cells()),
        });
    }
    if let Some(name) = &args.mask {
        let Some(pattern) = MaskPattern::named(name) else {
            let names = MASK_LIBRARY.map(|(n, _)| n).join(", ");
            eprintln!("Unknown mask {name:?}; expected one of {names}.");
            process::exit(1);
        };
        constraints.push(Constraint::Pattern(pattern));
    }
    if args.unique {
        constraints.push(Constraint::UniqueSolution);
    }
    if args.maximize {
        constraints.push(Constraint::MaximizeHidden);
    }
    if !args.rules.is_empty() {
        constraints.push(Constraint::Strategy(StrategyRequirement::holds(
            build_strategy(&args.rules),
        )));
    }

    if args.count == 0 {
        eprintln!("--count must be at least 1.");
        process::exit(1);
    }

    let synthesizer = Synthesizer::new();
    let timeout = Duration::from_secs(args.timeout);
    let results = (args.seed..args.seed + args.count)
        .into_par_iter()
        .map(|seed| {
            let mut rng = Pcg64Mcg::seed_from_u64(seed);
            let mut constraints = constraints.clone();
            if args.pinned > 0 {
                let pattern = MaskPattern::random(
                    grid.size(),
                    &mut rng,
                    MaskSymbol::Free,
                    &[(args.pinned, MaskSymbol::Visible)],
                );
                constraints.push(Constraint::Pattern(pattern));
            }
            let result = synthesizer.synthesize(&grid, &constraints, Some(timeout))?;
            let result = result.map(|r| r.shuffled(&grid, &mut rng)).transpose()?;
            Ok((seed, result))
        })
        .collect::<Result<Vec<_>, Box<dyn Error + Send + Sync>>>();

    let results = match results {
        Ok(results) => results,
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };

    let mut found = false;
    for (seed, result) in results {
        match result {
            Some(result) => {
                print_puzzle(seed, &grid, &result);
                found = true;
            }
            None => eprintln!("Seed {seed}: no puzzle found."),
        }
    }
    if !found {
        process::exit(1);
    }
}

fn build_strategy(names: &[String]) -> Strategy {
    let mut rules = Vec::<BoxedRule>::new();
    let mut unknown = Vec::new();
    for name in names {
        match rule::rule_by_name(name) {
            Some(rule) => rules.push(rule),
            None => unknown.push(name.as_str()),
        }
    }
    if !unknown.is_empty() {
        eprintln!("Unknown rule(s): {}", unknown.join(", "));
        eprintln!("Available techniques:");
        for rule in rule::all_rules() {
            eprintln!("  {}", rule.name());
        }
        process::exit(2);
    }
    rules.push(Box::new(rule::Solved::new()));

    match Stage::new("requested", rules) {
        Ok(stage) => Strategy::single(stage),
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    }
}

fn print_puzzle(seed: u64, grid: &Grid, result: &PuzzleResult) {
    println!("Seed:");
    println!("  {seed}");
    println!();
    println!("Problem:");
    println!("  {}", result.to_short_string());
    println!();
    for line in result.to_pretty_string(grid).lines() {
        println!("  {line}");
    }
    println!();
    println!("Solution:");
    println!("  {}", result.solution.to_short_string());
    println!();
    println!("Stats:");
    println!("  hidden: {}", result.hidden_count());
    println!("  fingerprint: {}", result.fingerprint());
    println!();
}
