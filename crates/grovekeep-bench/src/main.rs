use std::path::PathBuf;
use std::process;

use grovekeep_bench::report;
use grovekeep_bench::runner::BenchmarkRunner;
use grovekeep_bench::scenes;
use grovekeep_sim::SimConfig;

fn usage() {
    eprintln!("Usage: bench-runner [OPTIONS]");
    eprintln!("  --baseline <path>              Load baseline JSON for comparison");
    eprintln!("  --output <path>                Save current results as JSON baseline");
    eprintln!("  --regression-threshold <pct>   Regression threshold percentage (default: 10)");
    eprintln!("  --ticks <n>                    Ticks per scene (default: 600)");
    eprintln!("  --seed <n>                     Session seed (default: 1)");
    eprintln!("  --config <path>                Session tuning RON (default: built-in)");
    eprintln!("  --map <path>                   Also bench a saved map JSON");
}

/// Value following a flag, or exit with a usage error.
fn flag_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).and_then(|v| v.parse().ok()) {
        Some(v) => v,
        None => {
            eprintln!("Missing or invalid value for {flag}");
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut map_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut tick_count = 600u32;
    let mut seed = 1u64;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--baseline" => {
                i += 1;
                baseline_path = Some(flag_value(&args, i, "--baseline"));
            }
            "--output" => {
                i += 1;
                output_path = Some(flag_value(&args, i, "--output"));
            }
            "--config" => {
                i += 1;
                config_path = Some(flag_value(&args, i, "--config"));
            }
            "--map" => {
                i += 1;
                map_path = Some(flag_value(&args, i, "--map"));
            }
            "--regression-threshold" => {
                i += 1;
                regression_threshold = flag_value(&args, i, "--regression-threshold");
            }
            "--ticks" => {
                i += 1;
                tick_count = flag_value(&args, i, "--ticks");
            }
            "--seed" => {
                i += 1;
                seed = flag_value(&args, i, "--seed");
            }
            "--help" | "-h" => {
                usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|text| SimConfig::from_ron(&text).map_err(|e| e.to_string()));
            match loaded {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Failed to load config {}: {e}", path.display());
                    process::exit(1);
                }
            }
        }
        None => SimConfig::default(),
    };

    let runner = BenchmarkRunner::new(tick_count, config, seed);
    let mut results = Vec::new();

    for scene in scenes::standard_scenes() {
        results.push(runner.run_map(scene.name, scenes::build_map(&scene)));
    }

    if let Some(path) = map_path {
        match grovekeep_persist::load_file(&path) {
            Ok(loaded) => {
                for w in &loaded.warnings {
                    log::warn!("{}: {w}", path.display());
                }
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "map".to_string());
                results.push(runner.run_map(&name, loaded.map));
            }
            Err(e) => {
                eprintln!("Failed to load map {}: {e}", path.display());
                process::exit(1);
            }
        }
    }

    println!("\n## Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            label: format!("bench-{}", process::id()),
            results: results.clone(),
        };
        match report::write_baseline(path, &baseline) {
            Ok(()) => log::info!("Saved baseline to {}", path.display()),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    }

    if let Some(ref path) = baseline_path {
        match report::read_baseline(path) {
            Ok(baseline) => {
                let found = report::regressions(&results, &baseline, regression_threshold);
                println!("{}", report::format_regressions(&found, regression_threshold));
                if !found.is_empty() {
                    process::exit(1);
                }
            }
            Err(e) => log::warn!("Skipping comparison: {e}"),
        }
    }

    log::info!("Benchmark complete.");
}
