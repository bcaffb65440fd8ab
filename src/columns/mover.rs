//! Timed column mover.
//!
//! Wraps a [`ColumnBoard`] with the selection behavior of the board UI:
//! selecting an item in Main sends it to its category and schedules a
//! return after a fixed delay; selecting an item in a category returns it
//! at once. Fired timers arrive on a channel and are applied by the owner
//! of the mover, one at a time, so the board itself needs no lock.

use crate::columns::board::{BoardError, ColumnBoard, ReturnOutcome};
use crate::models::{Bucket, FoodItem};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Delay before a moved item returns to Main on its own.
#[allow(dead_code)] // Config carries the same default in milliseconds
pub const DEFAULT_RETURN_DELAY: Duration = Duration::from_millis(5000);

/// Handle to a scheduled return.
///
/// Dropping the handle leaves the timer running.
#[derive(Debug)]
pub struct PendingReturn {
    item_name: String,
    handle: JoinHandle<()>,
}

#[allow(dead_code)] // The CLI never cancels; callers embedding the mover may
impl PendingReturn {
    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    /// Stop the timer before it fires. Has no effect once it has fired.
    pub fn cancel(self) {
        debug!("Cancelling scheduled return of {}", self.item_name);
        self.handle.abort();
    }
}

/// Result of [`TimedMover::select`].
#[derive(Debug)]
pub enum Selection {
    /// The item left Main for its category; a return is scheduled.
    Moved {
        item: FoodItem,
        pending: PendingReturn,
    },
    /// The item was taken from its category back to Main.
    Returned {
        item: FoodItem,
        outcome: ReturnOutcome,
    },
}

/// A column board driven by selections and return timers.
pub struct TimedMover {
    board: ColumnBoard,
    delay: Duration,
    due_tx: mpsc::UnboundedSender<FoodItem>,
    due_rx: mpsc::UnboundedReceiver<FoodItem>,
}

impl TimedMover {
    pub fn new(board: ColumnBoard, delay: Duration) -> Self {
        let (due_tx, due_rx) = mpsc::unbounded_channel();

        Self {
            board,
            delay,
            due_tx,
            due_rx,
        }
    }

    pub fn board(&self) -> &ColumnBoard {
        &self.board
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Handle a user selecting the item called `name`.
    ///
    /// Must be called from within a Tokio runtime: moving an item spawns
    /// its return timer.
    pub fn select(&mut self, name: &str) -> Result<Selection, BoardError> {
        match self.board.locate(name) {
            Some(Bucket::Main) => {
                let item = self.board.move_to_category(name)?;
                let pending = self.schedule_return(item.clone());
                Ok(Selection::Moved { item, pending })
            }
            Some(Bucket::Category(_)) => {
                let item = self
                    .board
                    .item(name)
                    .cloned()
                    .ok_or_else(|| BoardError::UnknownItem(name.to_string()))?;
                let outcome = self.board.return_to_main(&item);
                info!("Returned {} to main list", item.name);
                Ok(Selection::Returned { item, outcome })
            }
            None => Err(BoardError::UnknownItem(name.to_string())),
        }
    }

    fn schedule_return(&self, item: FoodItem) -> PendingReturn {
        let item_name = item.name.clone();
        let delay = self.delay;
        let due_tx = self.due_tx.clone();

        debug!("Scheduling return of {} in {:?}", item_name, delay);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver only goes away with the mover itself
            let _ = due_tx.send(item);
        });

        PendingReturn { item_name, handle }
    }

    /// Wait for the next return timer to fire.
    pub async fn next_due(&mut self) -> Option<FoodItem> {
        self.due_rx.recv().await
    }

    /// Take a fired timer without waiting, if one is queued.
    #[allow(dead_code)]
    pub fn try_next_due(&mut self) -> Option<FoodItem> {
        self.due_rx.try_recv().ok()
    }

    /// Apply the return transition for a fired timer.
    ///
    /// If the item was already returned by hand this is a no-op.
    pub fn apply_due(&mut self, item: &FoodItem) -> ReturnOutcome {
        let outcome = self.board.return_to_main(item);

        if outcome.is_noop() {
            debug!("Return timer for {} fired after manual return", item.name);
        } else {
            info!("{} returned to main list after {:?}", item.name, self.delay);
        }

        outcome
    }
}
