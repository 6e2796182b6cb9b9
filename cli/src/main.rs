use chan_assign::gap_order::GapOrder;
use chan_assign::{Algorithm, AssignOutcome};
use chan_common::db::core::NetList;
use chan_common::db::gap::Gap;
use chan_common::util::config::Config;
use chan_common::util::metrics::{self, AlgorithmReport, InputReport};
use chan_common::util::profiler::ScopedTimer;
use chan_common::util::{check, generator, logger, visualization};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    /// Overrides `generator.seed`.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Overrides `generator.n_nets`.
    #[arg(short, long)]
    nets: Option<usize>,

    /// Overrides `assignment.gap_order`.
    #[arg(short = 'o', long)]
    gap_order: Option<String>,

    /// Writes a PNG of the last assignment.
    #[arg(long, value_name = "FILE")]
    figure: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs every algorithm on a chip sized by unbounded Left Edge.
    Compare,
    /// Runs CCAP alone with the density lower bound as gap budget.
    Ccap,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let mut config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };

    if let Some(seed) = args.seed {
        config.generator.seed = seed;
    }
    if let Some(n) = args.nets {
        config.generator.n_nets = n;
    }
    if let Some(order) = args.gap_order {
        config.assignment.gap_order = order;
    }
    if args.figure.is_some() {
        config.output.figure = args.figure;
    }

    config.channel.validate()?;
    let gap_order: GapOrder = config
        .assignment
        .gap_order
        .parse::<GapOrder>()?
        .with_seed(config.assignment.shuffle_seed);

    if let Some(figure) = &config.output.figure {
        prepare_output_dir(figure)?;
    }

    match args.command.unwrap_or(Commands::Compare) {
        Commands::Compare => run_compare(&config, gap_order),
        Commands::Ccap => run_ccap(&config, gap_order),
    }
}

fn prepare_output_dir(path_str: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path_str).parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            log::info!("Creating output directory: {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Runs one algorithm, verifies the result and turns it into a report line.
fn run_and_report(
    label: &str,
    algorithm: Algorithm,
    nets: &NetList,
    config: &Config,
    n_gaps: Option<usize>,
    input: &InputReport,
) -> anyhow::Result<(AlgorithmReport, Option<Vec<Gap>>)> {
    let outcome = {
        let _t = ScopedTimer::new(label);
        chan_assign::run(algorithm, nets, &config.channel, n_gaps)?
    };

    match outcome {
        AssignOutcome::Routed(gaps) => {
            check::run_assignment_check(nets, &gaps)
                .map_err(|e| anyhow::anyhow!("{} produced an invalid assignment: {}", label, e))?;
            Ok((AlgorithmReport::routed(label, &gaps, input), Some(gaps)))
        }
        AssignOutcome::Infeasible {
            gaps_used,
            unassigned,
        } => {
            log::warn!(
                "{}: infeasible, {} nets left after {} gaps",
                label,
                unassigned,
                gaps_used
            );
            Ok((AlgorithmReport::infeasible(label), None))
        }
    }
}

fn draw(config: &Config, gaps: Option<&[Gap]>) -> anyhow::Result<()> {
    if let (Some(figure), Some(gaps)) = (&config.output.figure, gaps) {
        visualization::draw_assignment(gaps, figure, 1600, 1000)?;
    }
    Ok(())
}

fn run_compare(config: &Config, gap_order: GapOrder) -> anyhow::Result<()> {
    // Size the chip with an unbounded Left Edge run on a unit-height dummy.
    let dummy = generator::generate_netlist(&config.generator, None)?;
    let n_gaps = chan_assign::left_edge::left_edge(&dummy, &config.channel, None)?.len();
    let chip_height = metrics::chip_height(n_gaps, &config.channel);
    log::info!("Chip sized to {} gaps (height {})", n_gaps, chip_height);

    let nets = generator::generate_netlist(&config.generator, Some(chip_height))?;
    let input = InputReport::new(&nets, &config.channel, chip_height);

    let runs = [
        ("Left Edge", Algorithm::LeftEdge, None),
        ("Left Edge with CGO", Algorithm::LeftEdge, Some(n_gaps)),
        ("CAP", Algorithm::Cap, None),
        ("CAP with CGO", Algorithm::Cap, Some(n_gaps)),
        ("CCAP", Algorithm::Ccap(gap_order), Some(n_gaps)),
    ];

    println!("{}", input);
    let mut last = None;
    for (label, algorithm, budget) in runs {
        let (report, gaps) = run_and_report(label, algorithm, &nets, config, budget, &input)?;
        println!("{}", report);
        last = gaps;
    }

    draw(config, last.as_deref())
}

fn run_ccap(config: &Config, gap_order: GapOrder) -> anyhow::Result<()> {
    let dummy = generator::generate_netlist(&config.generator, None)?;
    let n_gaps = metrics::lower_bound_gaps(&dummy, &config.channel);
    let chip_height = metrics::chip_height(n_gaps, &config.channel);
    log::info!("Gap budget from density lower bound: {}", n_gaps);

    let nets = generator::generate_netlist(&config.generator, Some(chip_height))?;
    let input = InputReport::new(&nets, &config.channel, chip_height);

    let label = format!("CCAP with {} gap order", gap_order);
    let (report, gaps) = run_and_report(
        &label,
        Algorithm::Ccap(gap_order),
        &nets,
        config,
        Some(n_gaps),
        &input,
    )?;

    println!("{}", input);
    println!("{}", report);

    draw(config, gaps.as_deref())
}
