// main.rs - Command-line runner for the Game of Life engine
//
// Examples:
//   conway-life -w 80 --height 40 -g 200 --strategy shared --workers 8
//   conway-life --pattern glider --print -g 3
//   conway-life --config life.json --verbose

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use conway::patterns;
use conway::prelude::*;
use tracing::{Level, error, info};

struct Args {
    config: SimulationConfig,
    pattern: Option<String>,
    print: bool,
    verbose: bool,
}

fn usage() -> ! {
    eprintln!("Usage: conway-life [options]\n");
    eprintln!("Options:");
    eprintln!("  -w, --width <n>          Grid width (default 50)");
    eprintln!("      --height <n>         Grid height (default 50)");
    eprintln!("  -g, --generations <n>    Generation limit; runs n + 1 steps (default 50)");
    eprintln!("  -s, --strategy <name>    sequential | shared | isolated | cooperative");
    eprintln!("      --workers <n>        Threads/processes for pooled strategies (default 5)");
    eprintln!("      --worker <path>      Worker executable for the isolated strategy");
    eprintln!("      --seed <n>           Seed for the random starting grid");
    eprintln!("      --pattern <name>     Start from a named pattern instead of random cells");
    eprintln!("      --config <file>      Load settings from a JSON file (flags override it)");
    eprintln!("      --stop-on-cycle      Stop once the grid repeats a recent generation");
    eprintln!("      --print              Print the final grid");
    eprintln!("  -v, --verbose            Log every generation step");
    eprintln!();
    eprintln!("Patterns: {}", pattern_names());
    eprintln!("CONWAY_STRATEGY overrides the strategy from the config file.");
    process::exit(1);
}

fn pattern_names() -> String {
    patterns::PATTERNS.iter().map(|p| p.name).collect::<Vec<_>>().join(", ")
}

fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    process::exit(1);
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> T {
    let Some(raw) = value else {
        fail(&format!("{flag} needs a value"));
    };
    raw.parse()
        .unwrap_or_else(|_| fail(&format!("{flag}: invalid value '{raw}'")))
}

fn parse_args() -> Args {
    let mut raw: Vec<String> = std::env::args().skip(1).collect();

    // The config file is the base layer, so it is read before any other flag.
    let mut config = match raw.iter().position(|a| a == "--config") {
        Some(i) => {
            let Some(path) = raw.get(i + 1).cloned() else {
                fail("--config needs a value");
            };
            raw.drain(i..i + 2);
            SimulationConfig::from_json_file(&PathBuf::from(path))
                .unwrap_or_else(|e| fail(&e.to_string()))
        }
        None => SimulationConfig::default(),
    }
    .apply_env();

    let mut pattern = None;
    let mut print = false;
    let mut verbose = false;

    let mut it = raw.into_iter();
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "-w" | "--width" => config.width = parse_value(&flag, it.next()),
            "--height" => config.height = parse_value(&flag, it.next()),
            "-g" | "--generations" => config.generations = parse_value(&flag, it.next()),
            "-s" | "--strategy" => {
                let value: String = parse_value(&flag, it.next());
                config.strategy = value.parse().unwrap_or_else(|e: LifeError| fail(&e.to_string()));
            }
            "--workers" => config.workers = parse_value(&flag, it.next()),
            "--worker" => config.worker_program = Some(parse_value::<PathBuf>(&flag, it.next())),
            "--seed" => config.seed = Some(parse_value(&flag, it.next())),
            "--pattern" => pattern = Some(parse_value::<String>(&flag, it.next())),
            "--stop-on-cycle" => config.stop_on_cycle = true,
            "--print" => print = true,
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => usage(),
            other => {
                eprintln!("unknown option: {other}\n");
                usage();
            }
        }
    }

    Args { config, pattern, print, verbose }
}

fn build_simulation(args: &Args) -> Result<Simulation, LifeError> {
    let config = &args.config;
    config.validate()?;
    match &args.pattern {
        Some(name) => {
            let pattern = patterns::find(name).ok_or_else(|| {
                LifeError::InvalidConfig(format!(
                    "unknown pattern '{name}' (known: {})",
                    pattern_names()
                ))
            })?;
            Simulation::with_grid(pattern.centred(config.width, config.height)?, config)
        }
        None => {
            let seed = config.resolved_seed();
            info!(seed, "random starting grid");
            let grid = Grid::random(config.width, config.height, seed)?;
            Simulation::with_grid(grid, config)
        }
    }
}

fn main() {
    let args = parse_args();

    tracing_subscriber::fmt()
        // Quiet unless asked: only warnings and errors without --verbose.
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let mut sim = match build_simulation(&args) {
        Ok(sim) => sim,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let started = Instant::now();
    let grid = match sim.run(args.config.generations) {
        Ok(grid) => grid.clone(),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    if args.print {
        print!("{grid}");
    }
    println!(
        "generation {} | strategy {} | population {}/{} | {:.3}s",
        sim.generation(),
        sim.strategy_name(),
        grid.population(),
        grid.cell_count(),
        started.elapsed().as_secs_f64()
    );
    if sim.cycle_detected() {
        println!("stopped early: cycle detected");
    }
}
