use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tickdag::dag::StepId;
use tickdag::exec::{StepExecutor, StepOutcome};

/// A fake executor that:
/// - records which steps were dispatched (in settlement order)
/// - fails any step whose id starts with `"fail"` or was registered via
///   [`failing`](Self::failing)
/// - optionally sleeps per step so tests can exercise the join barrier
///   with staggered completion times.
pub struct FakeExecutor {
    executed: Arc<Mutex<Vec<StepId>>>,
    failing: HashSet<StepId>,
    delay: Option<Duration>,
    per_step_delays: Vec<(StepId, Duration)>,
}

impl FakeExecutor {
    pub fn new(executed: Arc<Mutex<Vec<StepId>>>) -> Self {
        Self {
            executed,
            failing: HashSet::new(),
            delay: None,
            per_step_delays: Vec::new(),
        }
    }

    /// Register additional step ids that should fail, beyond the
    /// `"fail"` prefix convention.
    pub fn failing(mut self, ids: impl IntoIterator<Item = impl Into<StepId>>) -> Self {
        self.failing.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Sleep this long before settling every step.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sleep this long before settling one specific step.
    pub fn with_step_delay(mut self, id: impl Into<StepId>, delay: Duration) -> Self {
        self.per_step_delays.push((id.into(), delay));
        self
    }

    fn delay_for(&self, step: &str) -> Option<Duration> {
        self.per_step_delays
            .iter()
            .find(|(id, _)| id == step)
            .map(|(_, d)| *d)
            .or(self.delay)
    }

    fn should_fail(&self, step: &str) -> bool {
        step.starts_with("fail") || self.failing.contains(step)
    }
}

impl StepExecutor for FakeExecutor {
    fn execute(&self, step: StepId) -> Pin<Box<dyn Future<Output = StepOutcome> + Send + '_>> {
        let executed = Arc::clone(&self.executed);
        let delay = self.delay_for(&step);
        let fail = self.should_fail(&step);

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            {
                let mut guard = executed.lock().unwrap();
                guard.push(step.clone());
            }

            if fail {
                StepOutcome::Failed(1)
            } else {
                StepOutcome::Success
            }
        })
    }
}
