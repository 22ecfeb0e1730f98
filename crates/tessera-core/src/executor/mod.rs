//! Background execution of approved steps.
//!
//! Each sweep walks every plan in creation order and every step in plan
//! order. A step is dispatched only when [`Step::is_eligible`] holds; it is
//! marked completed only after its dispatch returned successfully. A failed
//! dispatch or store call aborts the sweep, and the loop backs off before
//! trying again.

use std::{sync::Arc, time::Duration};

use log::{debug, error, info};
use tokio::{sync::watch, time};

use crate::{
    config::LoopConfig,
    dispatch::Dispatcher,
    error::Result,
    models::Step,
    store::PlanStore,
};

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub plans_scanned: usize,
    pub steps_dispatched: usize,
}

/// Periodically dispatches approved steps.
pub struct ExecutionLoop {
    store: Arc<dyn PlanStore>,
    dispatcher: Arc<dyn Dispatcher>,
    config: LoopConfig,
}

impl ExecutionLoop {
    pub fn new(store: Arc<dyn PlanStore>, dispatcher: Arc<dyn Dispatcher>, config: LoopConfig) -> Self {
        Self {
            store,
            dispatcher,
            config,
        }
    }

    /// Runs a single pass over all plans.
    pub async fn run_sweep(&self) -> Result<SweepReport> {
        let mut report = SweepReport::default();

        for plan in self.store.get_all_plans().await? {
            report.plans_scanned += 1;

            for step in self.store.get_steps_by_plan(plan.id).await? {
                if !step.is_eligible() {
                    continue;
                }
                self.dispatch_step(&plan.session_id, step).await?;
                report.steps_dispatched += 1;
            }
        }

        Ok(report)
    }

    async fn dispatch_step(&self, session_id: &str, mut step: Step) -> Result<()> {
        let agent_name = step.agent.dispatch_name();
        debug!("Sending step {} ({}) to {agent_name}", step.id, step.action);

        self.dispatcher.send(&agent_name, session_id, &step).await?;

        step.mark_completed();
        self.store.update_step(&step).await
    }

    /// Sweeps until `shutdown` carries `true` or its sender goes away.
    ///
    /// A successful sweep is followed by the poll interval, a failed one by
    /// the failure backoff. Shutdown is observed between sweeps and during
    /// sleeps, never in the middle of a dispatch.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Execution loop starting (poll every {:?}, backoff {:?})",
            self.config.poll_interval, self.config.failure_backoff
        );

        loop {
            let stop = *shutdown.borrow();
            if stop {
                break;
            }

            let pause = match self.run_sweep().await {
                Ok(report) => {
                    if report.steps_dispatched > 0 {
                        info!(
                            "Sweep dispatched {} steps across {} plans",
                            report.steps_dispatched, report.plans_scanned
                        );
                    }
                    self.config.poll_interval
                }
                Err(e) => {
                    error!("Error in execution loop: {e}");
                    self.config.failure_backoff
                }
            };

            if !sleep_unless_shutdown(&mut shutdown, pause).await {
                break;
            }
        }

        info!("Execution loop stopped");
    }
}

/// Sleeps for `pause`, waking early only for a shutdown.
///
/// Returns `false` when the loop should stop: `true` was sent or the sender
/// was dropped. Other values sent meanwhile do not cut the sleep short.
async fn sleep_unless_shutdown(shutdown: &mut watch::Receiver<bool>, pause: Duration) -> bool {
    let deadline = time::Instant::now() + pause;
    loop {
        tokio::select! {
            _ = time::sleep_until(deadline) => return true,
            changed = shutdown.changed() => {
                if changed.is_err() {
                    return false;
                }
                let stop = *shutdown.borrow_and_update();
                if stop {
                    return false;
                }
            }
        }
    }
}
