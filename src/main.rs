use std::collections::HashSet;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use iterconform::{
    Candidate, FeatureSet, IteratorTester, LegacyRemovalDefect, OrderMode, StdIter,
    TesterConfig, TesterError, VecCursor,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "iterconform", about = "Bounded exhaustive conformance tester for iterators")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG applies otherwise.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a built-in candidate against the expected elements.
    Check {
        /// Expected elements, comma separated (e.g. 1,2,3).
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        elements: Vec<i64>,
        /// Order contract to check.
        #[arg(long, value_enum, default_value_t = OrderArg::Known)]
        order: OrderArg,
        /// Operations per explored sequence.
        #[arg(long, default_value_t = 3)]
        steps: usize,
        /// Built-in candidate built over the expected elements.
        #[arg(long, value_enum, default_value_t = CandidateKind::Vec)]
        candidate: CandidateKind,
        /// Do not explore removal.
        #[arg(long)]
        unmodifiable: bool,
        /// Accept the exhausted-then-illegal-removal legacy defect.
        #[arg(long)]
        tolerate_legacy_defect: bool,
        /// Also explore removals the reference rejects.
        #[arg(long)]
        explore_illegal_removals: bool,
        /// Skip sequences with more removals than this.
        #[arg(long)]
        removal_cap: Option<usize>,
    },
    /// Print the explored sequence space.
    Enumerate {
        /// Operations per sequence.
        #[arg(long, default_value_t = 3)]
        steps: usize,
        /// Number of expected elements.
        #[arg(long, default_value_t = 2)]
        elements_count: usize,
        /// Do not explore removal.
        #[arg(long)]
        unmodifiable: bool,
        /// Also explore removals the reference rejects.
        #[arg(long)]
        explore_illegal_removals: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrderArg {
    /// Exact production order is checked.
    Known,
    /// Only the multiset of elements is checked.
    Unknown,
}

impl From<OrderArg> for OrderMode {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Known => OrderMode::Determinate,
            OrderArg::Unknown => OrderMode::Indeterminate,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CandidateKind {
    /// Removable cursor over a vector.
    Vec,
    /// Read-only standard iterator over a vector.
    ReadOnly,
    /// Removable cursor over the reversed elements.
    Reversed,
    /// Read-only iterator over a hash set of the elements.
    HashSet,
    /// Removable cursor with the legacy exhausted-then-remove defect.
    LegacyDefect,
}

fn build_candidate(kind: CandidateKind, elements: &[i64]) -> Box<dyn Candidate<Item = i64>> {
    match kind {
        CandidateKind::Vec => Box::new(VecCursor::new(elements.to_vec())),
        CandidateKind::ReadOnly => Box::new(StdIter::new(elements.to_vec())),
        CandidateKind::Reversed => {
            Box::new(VecCursor::new(elements.iter().rev().copied().collect()))
        }
        CandidateKind::HashSet => {
            Box::new(StdIter::new(elements.iter().copied().collect::<HashSet<_>>()))
        }
        CandidateKind::LegacyDefect => {
            Box::new(LegacyRemovalDefect::new(VecCursor::new(elements.to_vec())))
        }
    }
}

fn features(unmodifiable: bool) -> FeatureSet {
    if unmodifiable {
        FeatureSet::UNMODIFIABLE
    } else {
        FeatureSet::MODIFIABLE
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check {
            elements,
            order,
            steps,
            candidate,
            unmodifiable,
            tolerate_legacy_defect,
            explore_illegal_removals,
            removal_cap,
        } => {
            let config = TesterConfig::new(order.into())
                .with_steps(steps)
                .with_features(features(unmodifiable))
                .with_legacy_removal_tolerance(tolerate_legacy_defect)
                .with_illegal_removals(explore_illegal_removals)
                .with_removal_cap(removal_cap);
            run_check(elements, candidate, config)?
        }
        Commands::Enumerate {
            steps,
            elements_count,
            unmodifiable,
            explore_illegal_removals,
        } => {
            let config = TesterConfig::new(OrderMode::Determinate)
                .with_steps(steps)
                .with_features(features(unmodifiable))
                .with_illegal_removals(explore_illegal_removals);
            run_enumerate(config, elements_count)?
        }
    }

    Ok(())
}

fn run_check(elements: Vec<i64>, kind: CandidateKind, config: TesterConfig) -> Result<()> {
    let tester = IteratorTester::new(elements.clone(), config);

    match tester.test(|| build_candidate(kind, &elements)) {
        Ok(summary) => {
            println!("PASS {:?}: {}", kind, summary);
            Ok(())
        }
        Err(err @ TesterError::Diverged(_)) => {
            Err(err).with_context(|| format!("candidate {:?} failed conformance", kind))
        }
        Err(err) => Err(err).context("conformance run not started"),
    }
}

fn run_enumerate(config: TesterConfig, elements_count: usize) -> Result<()> {
    config
        .validate::<i64>()
        .context("invalid enumeration parameters")?;

    let space = config.enumerator(elements_count);
    let mut total = 0;
    for (idx, sequence) in space.iter().enumerate() {
        println!("{}\t{}", idx + 1, sequence);
        total += 1;
    }
    println!("{} sequences, space {}", total, space.fingerprint().to_hex());

    Ok(())
}
