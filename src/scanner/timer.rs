use std::time::{Duration, Instant};

/// The result of polling something that changes over time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PollableState {
    /// Nothing changed since the last poll.
    Unmodified,
    /// State changed and needs to be rendered again.
    Modified,
    /// The task was cancelled and will never fire again.
    Done,
}

/// A task that fires once every `interval` until it's cancelled.
///
/// The task doesn't own a thread: whoever drives it asks for the time until it's due, sleeps or
/// waits for input that long, and polls it again.
#[derive(Debug)]
pub(crate) struct RepeatingTask {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RepeatingTask {
    /// Start a task whose first run is due one interval after `now`.
    pub(crate) fn start(interval: Duration, now: Instant) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        Self { interval, next_due: Some(now + interval) }
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.next_due.is_none()
    }

    /// How long until this task wants to run, or `None` if it was cancelled.
    pub(crate) fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Check whether the task fired.
    ///
    /// At most one run is reported per poll. If the caller fell more than an interval behind, the
    /// schedule restarts from `now` rather than replaying every missed run.
    pub(crate) fn poll(&mut self, now: Instant) -> PollableState {
        let Some(due) = self.next_due else {
            return PollableState::Done;
        };
        if now < due {
            return PollableState::Unmodified;
        }
        let mut next = due + self.interval;
        if next <= now {
            next = now + self.interval;
        }
        self.next_due = Some(next);
        PollableState::Modified
    }

    /// Stop the task. Polling it afterwards always returns [PollableState::Done].
    pub(crate) fn cancel(&mut self) {
        self.next_due = None;
    }
}
