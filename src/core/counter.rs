//! Live workout counter.
//!
//! `Idle → Running ⇄ Paused → Finished`. Time only accrues while running;
//! a finished counter with zero reps produces nothing to save.

use crate::models::session::{NewSession, SetRecord};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterState {
    Idle,
    Running,
    Paused,
    Finished,
}

#[derive(Debug, Clone)]
pub struct Counter {
    state: CounterState,
    started_at: Option<DateTime<Utc>>,
    /// Start of the current running stretch.
    resumed_at: Option<DateTime<Utc>>,
    /// Seconds accumulated by completed running stretches.
    active_secs: i64,
    reps: u32,
    reps_in_set: u32,
    last_set_end: Option<DateTime<Utc>>,
    sets: Vec<SetRecord>,
    goal: Option<u32>,
}

impl Counter {
    pub fn new(goal: Option<u32>) -> Self {
        Self {
            state: CounterState::Idle,
            started_at: None,
            resumed_at: None,
            active_secs: 0,
            reps: 0,
            reps_in_set: 0,
            last_set_end: None,
            sets: Vec::new(),
            goal,
        }
    }

    pub fn state(&self) -> CounterState {
        self.state
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn sets(&self) -> &[SetRecord] {
        &self.sets
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.state == CounterState::Idle {
            self.state = CounterState::Running;
            self.started_at = Some(now);
            self.resumed_at = Some(now);
            self.last_set_end = Some(now);
        }
    }

    /// Adds reps; the first rep starts an idle counter. Ignored unless running.
    pub fn add_reps(&mut self, n: u32, now: DateTime<Utc>) {
        if self.state == CounterState::Idle {
            self.start(now);
        }
        if self.state == CounterState::Running {
            self.reps = self.reps.saturating_add(n);
            self.reps_in_set = self.reps_in_set.saturating_add(n);
        }
    }

    /// Closes the current set. Empty sets are not recorded.
    pub fn complete_set(&mut self, now: DateTime<Utc>) {
        if self.state != CounterState::Running || self.reps_in_set == 0 {
            return;
        }
        let rest = match (self.sets.is_empty(), self.last_set_end) {
            (false, Some(prev)) => (now - prev).num_seconds().max(0) as u32,
            _ => 0,
        };
        self.sets.push(SetRecord {
            reps: self.reps_in_set,
            rest_time: rest,
            timestamp: now,
        });
        self.reps_in_set = 0;
        self.last_set_end = Some(now);
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.state == CounterState::Running {
            // A pause ends the set in progress.
            self.complete_set(now);
            self.bank_running_time(now);
            self.state = CounterState::Paused;
        }
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        if self.state == CounterState::Paused {
            self.resumed_at = Some(now);
            self.state = CounterState::Running;
        }
    }

    /// Seconds spent running so far.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        let running = match (self.state, self.resumed_at) {
            (CounterState::Running, Some(r)) => (now - r).num_seconds().max(0),
            _ => 0,
        };
        (self.active_secs + running).clamp(0, u32::MAX as i64) as u32
    }

    /// Stops the counter. Returns the session to save, or `None` with no reps.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Option<NewSession> {
        match self.state {
            CounterState::Finished | CounterState::Idle => {
                self.state = CounterState::Finished;
                return None;
            }
            CounterState::Running => {
                self.complete_set(now);
                self.bank_running_time(now);
            }
            CounterState::Paused => {}
        }
        self.state = CounterState::Finished;

        if self.reps == 0 {
            return None;
        }

        let mut session = NewSession::new(self.started_at.unwrap_or(now), self.reps, self.active_secs as u32)
            .with_sets(std::mem::take(&mut self.sets));
        session.goal = self.goal;
        Some(session)
    }

    fn bank_running_time(&mut self, now: DateTime<Utc>) {
        if let Some(r) = self.resumed_at.take() {
            self.active_secs += (now - r).num_seconds().max(0);
        }
    }
}
