use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use crate::train::cycle_stats::CycleStats;

/// Callback invoked once after every completed training cycle.
///
/// Returning `ControlFlow::Break` stops training; the cycle that just
/// finished still counts.
pub trait TrainingObserver {
    fn cycle_trained(&mut self, stats: &CycleStats) -> ControlFlow<()>;
}

impl<F> TrainingObserver for F
where
    F: FnMut(&CycleStats) -> ControlFlow<()>,
{
    fn cycle_trained(&mut self, stats: &CycleStats) -> ControlFlow<()> {
        self(stats)
    }
}

/// Reports progress to another thread and listens for a stop request.
///
/// - `progress_tx`: one `CycleStats` is sent per cycle; a dropped receiver
///   stops training.
/// - `stop_flag`: setting it to `true` from another thread stops training
///   after the current cycle.
#[derive(Debug, Default)]
pub struct ChannelObserver {
    pub progress_tx: Option<mpsc::Sender<CycleStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl ChannelObserver {
    pub fn new() -> ChannelObserver {
        ChannelObserver::default()
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<CycleStats>) -> ChannelObserver {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> ChannelObserver {
        self.stop_flag = Some(flag);
        self
    }
}

impl TrainingObserver for ChannelObserver {
    fn cycle_trained(&mut self, stats: &CycleStats) -> ControlFlow<()> {
        if let Some(ref tx) = self.progress_tx {
            if tx.send(stats.clone()).is_err() {
                return ControlFlow::Break(());
            }
        }
        if let Some(ref flag) = self.stop_flag {
            if flag.load(Ordering::Relaxed) {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}
