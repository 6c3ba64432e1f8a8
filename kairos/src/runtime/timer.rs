use crate::runtime::pool::Task;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Commands sent from pool handles to the timer thread.
pub(crate) enum Command {
    /// Run `action` on the timer thread once `deadline` is reached.
    Schedule { deadline: Instant, action: Task },

    /// Stop the timer. Entries that have not fired are dropped.
    Shutdown,
}

/// An entry in the timer queue.
///
/// Entries are kept in a `BinaryHeap` ordered by deadline. The sequence
/// number keeps entries with equal deadlines in scheduling order.
struct TimerEntry {
    deadline: Instant,
    seq: u64,
    action: Task,
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Ord for TimerEntry {
    /// Reversed so that `BinaryHeap<TimerEntry>` pops the earliest
    /// deadline first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Background thread firing deadline-based actions.
///
/// Actions run on the timer thread itself and must not block; the pool only
/// schedules actions that push a task onto its queue.
pub(crate) struct Timer {
    receiver: Receiver<Command>,
    entries: BinaryHeap<TimerEntry>,
    next_seq: u64,
}

/// Sending side of the timer, shared by every pool handle.
#[derive(Clone)]
pub(crate) struct TimerHandle {
    sender: Sender<Command>,
}

impl Timer {
    /// Spawns the timer thread.
    pub(crate) fn start(name: String) -> io::Result<(TimerHandle, JoinHandle<()>)> {
        let (sender, receiver) = mpsc::channel();

        let mut timer = Timer {
            receiver,
            entries: BinaryHeap::new(),
            next_seq: 0,
        };

        let thread = thread::Builder::new().name(name).spawn(move || timer.run())?;

        Ok((TimerHandle { sender }, thread))
    }

    fn run(&mut self) {
        tracing::debug!("timer started");

        loop {
            let received = match self.entries.peek() {
                Some(next) => {
                    let wait = next.deadline.saturating_duration_since(Instant::now());
                    self.receiver.recv_timeout(wait)
                }
                None => self
                    .receiver
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };

            match received {
                Ok(Command::Schedule { deadline, action }) => {
                    let seq = self.next_seq;
                    self.next_seq += 1;

                    self.entries.push(TimerEntry {
                        deadline,
                        seq,
                        action,
                    });
                }
                Ok(Command::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            self.fire_expired();
        }

        tracing::debug!(dropped = self.entries.len(), "timer stopped");
    }

    fn fire_expired(&mut self) {
        let now = Instant::now();

        while self.entries.peek().is_some_and(|entry| entry.deadline <= now) {
            if let Some(entry) = self.entries.pop() {
                (entry.action)();
            }
        }
    }
}

impl TimerHandle {
    /// Schedules `action` to run at `deadline`.
    ///
    /// If the timer has already stopped, the action is dropped.
    pub(crate) fn schedule(&self, deadline: Instant, action: Task) {
        if self
            .sender
            .send(Command::Schedule { deadline, action })
            .is_err()
        {
            tracing::trace!("timer stopped, scheduled action dropped");
        }
    }

    /// Asks the timer thread to stop.
    pub(crate) fn shutdown(&self) {
        let _ = self.sender.send(Command::Shutdown);
    }
}
