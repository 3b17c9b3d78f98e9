//! Command-line front end for the `mcquad` engine.
//!
//! The binary is a thin collaborator around the library: it validates the
//! arguments, looks the integrand up in the registry, times the computation
//! phase and prints the result. All diagnostics printing lives here; the
//! engine only returns values.
//!
//! Diagnostics are opt-in through the environment: setting `MCQUAD_DEBUG`
//! echoes the inputs and both timing measurements, and additionally setting
//! `MCQUAD_VERBOSE` retains and prints the raw per-worker sample arrays
//! along with a JSON dump of the full run outcome.

use std::env;
use std::process;
use std::time::{Duration, Instant, SystemTime};

use mcquad::integrators::replicate;
use mcquad::registry;
use rand_pcg::Pcg64;

const USAGE: &str = "usage: mcquad SAMPLES FUNCTION_ID N_THREADS [SEED]";

/// The validated command-line arguments.
struct Args {
    /// Sample budget per worker.
    samples: usize,
    /// Index into the integrand registry.
    function_id: usize,
    /// Worker count, at least 1.
    threads: usize,
    /// Explicit run seed; wall-clock seeded when absent.
    seed: Option<u64>,
}

fn parse_args(argv: &[String]) -> Result<Args, String> {
    if argv.len() < 3 || argv.len() > 4 {
        return Err("expected SAMPLES, FUNCTION_ID and N_THREADS".to_string());
    }

    let samples = argv[0]
        .parse::<usize>()
        .map_err(|_| format!("SAMPLES must be a non-negative integer, got `{}`", argv[0]))?;

    let function_id = argv[1]
        .parse::<usize>()
        .map_err(|_| format!("FUNCTION_ID must be a non-negative integer, got `{}`", argv[1]))?;

    let threads = argv[2]
        .parse::<usize>()
        .map_err(|_| format!("N_THREADS must be a positive integer, got `{}`", argv[2]))?;
    if threads < 1 {
        return Err("at least 1 thread is required".to_string());
    }

    let seed = match argv.get(3) {
        Some(raw) => Some(
            raw.parse::<u64>()
                .map_err(|_| format!("SEED must be a non-negative integer, got `{}`", raw))?,
        ),
        None => None,
    };

    Ok(Args {
        samples,
        function_id,
        threads,
        seed,
    })
}

/// Wall-clock seed for runs without an explicit override.
fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

fn print_array(values: &[f64]) {
    let body = values
        .iter()
        .map(|v| format!("{:.6}", v))
        .collect::<Vec<_>>()
        .join(", ");
    println!("array of size [{}]: [{}]", values.len(), body);
}

fn main() {
    env_logger::init();

    let argv = env::args().skip(1).collect::<Vec<_>>();
    let args = parse_args(&argv).unwrap_or_else(|message| {
        eprintln!("error: {}", message);
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    let debug_mode = env::var_os("MCQUAD_DEBUG").is_some();
    // verbose output only makes sense on top of the debug echo
    let verbose = debug_mode && env::var_os("MCQUAD_VERBOSE").is_some();

    let integrand = registry::lookup::<f64>(args.function_id).unwrap_or_else(|err| {
        eprintln!("error: {}", err);
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    let seed = args.seed.unwrap_or_else(seed_from_clock);

    if debug_mode {
        println!("running on: [debug mode]");
        println!("samples: [{}]", args.samples);
        println!("function id: [{}]", args.function_id);
        println!("threads: [{}]", args.threads);
        println!("seed: [{}]", seed);
        println!(
            "per-worker buffer size on memory: [{:.2}GB]",
            args.samples as f64 * 8.0 / 1e9
        );
        println!(
            "running {} version",
            if args.threads == 1 { "sequential" } else { "parallel" }
        );
    }

    let monotonic = Instant::now();
    let calendar = SystemTime::now();

    let outcome = replicate::integrate::<f64, Pcg64, _>(
        integrand.as_ref(),
        args.samples,
        args.threads,
        seed,
        verbose,
    )
    .unwrap_or_else(|err| {
        eprintln!("error: {}", err);
        process::exit(1);
    });

    let elapsed = monotonic.elapsed();
    let calendar_elapsed = calendar.elapsed().unwrap_or_else(|_| Duration::from_secs(0));

    if verbose {
        if let Some(buffers) = outcome.samples() {
            for buffer in buffers {
                print_array(buffer);
            }
        }
        print_array(outcome.partial_means());
        println!("estimate: [{:.33}]", outcome.estimate());
        if let Ok(json) = serde_json::to_string(&outcome) {
            println!("run outcome: {}", json);
        }
    }

    if debug_mode {
        println!(
            "{:.16}, [{:.6}, monotonic], [{:.6}, calendar]",
            outcome.estimate(),
            elapsed.as_secs_f64(),
            calendar_elapsed.as_secs_f64()
        );
    } else {
        println!(
            "{:.16}, {:.6}",
            outcome.estimate(),
            elapsed.as_secs_f64()
        );
    }
}
