//! Equivalence suite for the rejection-sampling kernels.
//!
//! Usage:
//!   rej_uniform_test
//!
//! Runs the reference battery through the fixed-width kernel and the
//! variable-length kernel at every vector length, printing one report per
//! run. The configured backend and vector length only affect the dispatch
//! layer (`rej_uniform`, `ExpandA`), not the battery. Diagnostics go to
//! stderr; the exit code is always 0.

use mldsa_rej::{
    Config,
    harness::{self, Kernel},
};
use tracing::{Level, warn};
use tracing_subscriber::FmtSubscriber;

const RULE: &str = "==============================================";

fn main() {
    let (config, config_err) = match Config::from_env() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(config.log_level);
    if let Some(e) = config_err {
        warn!("ignoring configuration: {e}");
    }
    config.apply();

    let kernels: Vec<Kernel> = Kernel::all().collect();

    println!("{RULE}");
    println!("ML-DSA rej_uniform equivalence suite");
    println!("{}", harness::kernel_banner(&kernels));
    println!(
        "dispatch layer only: backend {}, vector length {}",
        config.backend, config.vector_length
    );
    println!("{RULE}\n");

    let summary = harness::run_battery(&harness::battery(), &kernels);
    for report in &summary.reports {
        println!("{report}");
    }

    println!("{RULE}");
    println!("{summary}");
    println!("All tests completed!");
    println!("{RULE}");
}

fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");
}
