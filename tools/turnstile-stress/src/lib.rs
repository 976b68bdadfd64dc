///
/// # turnstile-stress - Load harness for turnstile primitives
///
/// Library side of the `turnstile-stress` binary. Workloads take a validated
/// settings struct, run to completion on OS threads, and return either a
/// report or the first law violation they caught.
///
/// ## Library Usage
///
/// ```rust,ignore
/// use turnstile_stress::{parse_config, run};
///
/// let config = parse_config(Path::new("stress.toml"))?;
/// let report = run(&config)?;
/// println!("{report}");
/// ```
///

pub mod config;
pub mod errors;
pub mod report;
pub mod workload;

pub use config::{parse_config, parse_config_str, LockWorkload, QueueWorkload, StressConfig};
pub use errors::StressError;
pub use report::{LockReport, QueueReport, StressReport};
pub use workload::{run_lock_workload, run_queue_workload};

/// Run the queue workload and then the lock workload.
pub fn run(config: &StressConfig) -> Result<StressReport, StressError> {
    config.validate()?;
    Ok(StressReport {
        queue: run_queue_workload(&config.queue)?,
        lock: run_lock_workload(&config.lock)?,
    })
}
