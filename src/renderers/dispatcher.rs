// Copyright @yucwang 2026

use crate::core::context::{RenderPass, RuntimeContext, ShadingStats};
use crate::core::error::RenderError;
use crate::core::progress::ProgressCallback;
use crate::renderers::sequence::{Tile, TileSequence};
use std::sync::{mpsc, Mutex};
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub total: usize,
    pub completed: usize,
    pub aborted: bool,
    pub stats: ShadingStats,
}

struct ClaimState {
    claimed: usize,
    aborted: bool,
}

/// Hands the tiles of a sequence to a pool of workers. Tiles are claimed in
/// sequence order and their results are delivered to a sink on the calling
/// thread.
pub struct WorkDispatcher<'p> {
    threads: usize,
    progress: Option<&'p dyn ProgressCallback>,
}

impl<'p> WorkDispatcher<'p> {
    pub fn new(threads: usize, progress: Option<&'p dyn ProgressCallback>) -> Self {
        Self { threads: threads.max(1), progress }
    }

    /// Runs `work` over every tile of `region` in the order given by `sequence`.
    /// Each worker owns one `RuntimeContext` for the whole pass.
    pub fn dispatch<T, W, S>(&self,
                             sequence: &mut dyn TileSequence,
                             region: &Tile,
                             pass: RenderPass,
                             work: W,
                             mut sink: S) -> Result<DispatchSummary, RenderError>
    where
        T: Send,
        W: Fn(&mut RuntimeContext, &Tile) -> T + Sync,
        S: FnMut(&Tile, T),
    {
        sequence.begin(region);
        let mut tiles = Vec::with_capacity(sequence.num_regions());
        while let Some(tile) = sequence.next_region() {
            tiles.push(tile);
        }

        let total = tiles.len();
        let claims = Mutex::new(ClaimState { claimed: 0, aborted: false });
        let mut summary = DispatchSummary { total, completed: 0, aborted: false, stats: ShadingStats::default() };

        if self.threads == 1 {
            let mut rc = RuntimeContext::new(pass, false);
            while let Some(idx) = self.claim(&claims, total) {
                let result = work(&mut rc, &tiles[idx]);
                sink(&tiles[idx], result);
                summary.completed += 1;
            }
            summary.stats = rc.stats;
            summary.aborted = self.was_aborted(&claims);
            return Ok(summary);
        }

        let (tx, rx) = mpsc::channel::<(usize, T)>();
        let tiles_ref = &tiles;
        let claims_ref = &claims;
        let work_ref = &work;

        let worker_stats: Vec<thread::Result<ShadingStats>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..self.threads)
                .map(|_| {
                    let tx = tx.clone();
                    scope.spawn(move || {
                        let mut rc = RuntimeContext::new(pass, true);
                        while let Some(idx) = self.claim(claims_ref, total) {
                            let result = work_ref(&mut rc, &tiles_ref[idx]);
                            if tx.send((idx, result)).is_err() {
                                break;
                            }
                        }
                        rc.stats
                    })
                })
                .collect();

            drop(tx);
            for (idx, result) in rx.iter() {
                sink(&tiles_ref[idx], result);
                summary.completed += 1;
            }

            handles.into_iter().map(|h| h.join()).collect()
        });

        let mut panicked = false;
        for result in worker_stats {
            match result {
                Ok(stats) => summary.stats.merge(&stats),
                Err(_) => panicked = true,
            }
        }
        if panicked {
            log::error!("WorkDispatcher: a worker panicked after {} of {} tiles.", summary.completed, total);
            return Err(RenderError::WorkerPanicked);
        }

        summary.aborted = self.was_aborted(&claims);
        Ok(summary)
    }

    /// Next tile index, or `None` when the work is exhausted or cancelled.
    /// Progress is reported inside the lock so cancellation is seen by all workers.
    fn claim(&self, claims: &Mutex<ClaimState>, total: usize) -> Option<usize> {
        let mut state = match claims.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.aborted || state.claimed >= total {
            return None;
        }
        if let Some(progress) = self.progress {
            if state.claimed > 0 && !progress.progress(state.claimed, total - 1) {
                log::info!("WorkDispatcher: cancelled after {} of {} tiles.", state.claimed, total);
                state.aborted = true;
                return None;
            }
        }
        let idx = state.claimed;
        state.claimed += 1;
        Some(idx)
    }

    fn was_aborted(&self, claims: &Mutex<ClaimState>) -> bool {
        match claims.lock() {
            Ok(guard) => guard.aborted,
            Err(poisoned) => poisoned.into_inner().aborted,
        }
    }
}
