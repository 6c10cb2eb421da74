use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info};

use crate::application::use_cases::renewal_sweep::RenewalSweep;

/// Drives the periodic sweep. The first tick fires immediately so a
/// restarted service catches up on overdue work without waiting a full
/// interval.
pub async fn run_renewal_sweep_loop(sweep: Arc<RenewalSweep>, interval_secs: u64) {
    let mut ticker = interval(Duration::from_secs(interval_secs));

    info!("Renewal sweep worker started (every {}s)", interval_secs);

    loop {
        ticker.tick().await;
        match sweep.run_sweep().await {
            Ok(summary) => {
                if summary.due > 0 || summary.errors > 0 {
                    info!(
                        due = summary.due,
                        renewed = summary.renewed,
                        expired = summary.expired,
                        errors = summary.errors,
                        "Sweep pass done"
                    );
                }
            }
            Err(e) => error!(error = %e, "Sweep pass failed"),
        }
    }
}
