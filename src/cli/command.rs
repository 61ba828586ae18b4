use super::*;
use crate::*;
use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub enum Command {
    #[command(
        about = "Solve the base game and measure the deception of a fixed placement",
        alias = "dec"
    )]
    Solve {
        #[arg(required = true)]
        problem: PathBuf,
        #[arg(long, value_enum, default_value_t = Concept::Sure)]
        concept: Concept,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    #[command(
        about = "Greedily place fake targets and traps among the candidates",
        alias = "alloc"
    )]
    Allocate {
        #[arg(required = true)]
        problem: PathBuf,
        #[arg(long, default_value_t = 1)]
        fakes: usize,
        #[arg(long, default_value_t = 1)]
        traps: usize,
        #[arg(long, value_enum, default_value_t = Concept::Sure)]
        concept: Concept,
        #[arg(long, default_value_t = num_cpus::get())]
        threads: usize,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    #[command(
        about = "Write a random turn-based problem file",
        alias = "rng"
    )]
    Random {
        #[arg(long, default_value_t = RANDOM_NODES)]
        nodes: usize,
        #[arg(long, default_value_t = RANDOM_OUTDEGREE)]
        outdegree: usize,
        #[arg(long, default_value_t = RANDOM_FINALS)]
        finals: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

impl Command {
    pub fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Solve {
                problem,
                concept,
                output,
            } => Self::solve(Problem::read(&problem)?, concept)?.pipe(|w| Self::write(w, output)),
            Self::Allocate {
                problem,
                fakes,
                traps,
                concept,
                threads,
                output,
            } => {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build_global()
                    .context("initialize thread pool")?;
                Self::allocate(Problem::read(&problem)?, fakes, traps, concept)?
                    .pipe(|w| Self::write(w, output))
            }
            Self::Random {
                nodes,
                outdegree,
                finals,
                seed,
                output,
            } => {
                let problem = Problem::random(&RandomGame::new(nodes, outdegree, finals, seed))?;
                let json = serde_json::to_string_pretty(&problem)?;
                Self::emit(json, output)
            }
        }
    }

    fn solve(problem: Problem, concept: Concept) -> anyhow::Result<Wire> {
        let setup = problem.setup()?;
        let base = setup.solve_base()?;
        let contested = base.winning(Player::P2).len() - setup.finals().len();
        let evaluation = concept.evaluate(setup.with_base(base.clone())?)?;
        Self::summary("base game", format!("{} contested states", contested));
        Self::summary("concept", concept.to_string());
        Self::summary("value of deception", format!("{:.4}", evaluation.vod));
        Self::warnings(&evaluation.diagnostics);
        Ok(Wire::Map {
            entries: vec![
                ("ranks".to_string().encode(), base.ranks().encode()),
                ("winning".to_string().encode(), evaluation.winning.encode()),
                ("vod".to_string().encode(), evaluation.vod.encode()),
            ],
        })
    }

    fn allocate(problem: Problem, fakes: usize, traps: usize, concept: Concept) -> anyhow::Result<Wire> {
        let game = Arc::new(problem.game()?);
        let finals = problem.finals(&game)?;
        let candidates = match problem.candidates.is_empty() {
            false => problem.candidates.clone(),
            true => Candidates::singletons(game.states().filter(|s| !finals.contains(*s)).cloned()),
        };
        let mut allocator = DecoyAllocator::new(game, finals, candidates, fakes, traps, concept)?
            .with_fakes(problem.fakes.iter().cloned())?
            .with_traps(problem.traps.iter().cloned())?;
        allocator.solve(false)?;
        for round in allocator.allocation().rounds.iter() {
            Self::summary(
                &format!("round {} {}", round.index, round.decoy),
                format!("{} ({:.4})", round.chosen, round.vod),
            );
        }
        Self::summary("value of deception", format!("{:.4}", allocator.vod()));
        Self::summary("deception runs", allocator.runs().to_string());
        Self::warnings(allocator.diagnostics());
        Ok(allocator.allocation().encode())
    }

    fn summary(key: &str, value: String) {
        println!("{:<24}{}", key.bold(), value.green());
    }
    fn warnings(diagnostics: &Diagnostics) {
        let counts = diagnostics
            .iter()
            .filter(|d| d.severity != Severity::Info)
            .fold(BTreeMap::new(), |mut counts, d| {
                *counts.entry(format!("{:?}", d.event)).or_insert(0usize) += 1;
                counts
            });
        for (event, count) in counts {
            println!("{:<24}{}", event.yellow(), count);
        }
    }

    fn write(wire: Wire, output: Option<PathBuf>) -> anyhow::Result<()> {
        Self::emit(wire.to_json()?, output)
    }
    fn emit(json: String, output: Option<PathBuf>) -> anyhow::Result<()> {
        match output {
            Some(path) => {
                std::fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
                log::info!("{:<32}{:<32}", "wrote       output", path.display());
                Ok(())
            }
            None => Ok(println!("{}", json)),
        }
    }
}

/// Postfix application, for chaining a value into a function.
trait Pipe: Sized {
    fn pipe<T>(self, f: impl FnOnce(Self) -> T) -> T {
        f(self)
    }
}
impl<T> Pipe for T {}
