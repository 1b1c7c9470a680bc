// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structured progress sink contract. Generation code reports phases through
// this trait only; `NullSink` is the default when nobody is listening.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome severity of a phase or a whole run. Ordered `Ok < Warn < Fail`;
/// a run's status is the maximum observed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStatus {
    #[default]
    Ok,
    Warn,
    Fail,
}

impl PhaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }

    /// Combine two severities, keeping the worse one.
    pub fn escalate(self, other: Self) -> Self {
        self.max(other)
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source position attached to an error event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLocation {
    pub file: String,
    pub line: u32,
    pub col: u32,
}

impl ErrorLocation {
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Self {
            file: file.into(),
            line,
            col,
        }
    }
}

/// Receiver of structured progress events.
pub trait ProgressSink {
    /// Open a phase. Starting an already started phase is a no-op.
    fn start_phase(&self, phase: &str, total: Option<u64>);

    /// Advance a phase counter by `amount`.
    fn tick(&self, phase: &str, amount: u64);

    /// Set a phase counter to an absolute value.
    fn set(&self, phase: &str, current: u64, total: Option<u64>);

    /// Close a phase with the given status.
    fn end_phase(&self, phase: &str, status: PhaseStatus);

    /// Record a non-fatal problem; raises the run status to at least `Warn`.
    fn warning(&self, message: &str);

    /// Record a failure; sets the run status to `Fail`.
    fn error(&self, code: &str, message: &str, location: Option<ErrorLocation>);

    /// Emit the run summary and return the aggregated status.
    fn finalize(&self, summary: Map<String, Value>) -> PhaseStatus;

    /// Scoped handle for one phase.
    fn phase<'a>(&'a self, name: &str, total: Option<u64>) -> Phase<'a>
    where
        Self: Sized,
    {
        Phase::new(self, name, total)
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn start_phase(&self, _phase: &str, _total: Option<u64>) {}
    fn tick(&self, _phase: &str, _amount: u64) {}
    fn set(&self, _phase: &str, _current: u64, _total: Option<u64>) {}
    fn end_phase(&self, _phase: &str, _status: PhaseStatus) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _code: &str, _message: &str, _location: Option<ErrorLocation>) {}

    fn finalize(&self, _summary: Map<String, Value>) -> PhaseStatus {
        PhaseStatus::Ok
    }
}

/// Scoped phase handle: `start`, `tick`, `set`, `end`.
///
/// A handle dropped without an explicit `end` closes its phase as `Fail`, so
/// an early `?` return is visible in the event log.
pub struct Phase<'a> {
    sink: &'a dyn ProgressSink,
    name: String,
    total: Option<u64>,
    started: bool,
    ended: bool,
}

impl<'a> Phase<'a> {
    pub fn new(sink: &'a dyn ProgressSink, name: &str, total: Option<u64>) -> Self {
        Self {
            sink,
            name: name.to_owned(),
            total,
            started: false,
            ended: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&mut self) {
        self.sink.start_phase(&self.name, self.total);
        self.started = true;
    }

    pub fn tick(&self, amount: u64) {
        self.sink.tick(&self.name, amount);
    }

    pub fn set(&mut self, current: u64, total: Option<u64>) {
        if total.is_some() {
            self.total = total;
        }
        self.sink.set(&self.name, current, total);
    }

    pub fn end(mut self, status: PhaseStatus) {
        self.sink.end_phase(&self.name, status);
        self.ended = true;
    }
}

impl Drop for Phase<'_> {
    fn drop(&mut self) {
        if self.started && !self.ended {
            self.sink.end_phase(&self.name, PhaseStatus::Fail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        events: RefCell<Vec<String>>,
    }

    impl ProgressSink for RecordingSink {
        fn start_phase(&self, phase: &str, total: Option<u64>) {
            self.events.borrow_mut().push(format!("start {phase} {total:?}"));
        }
        fn tick(&self, phase: &str, amount: u64) {
            self.events.borrow_mut().push(format!("tick {phase} {amount}"));
        }
        fn set(&self, phase: &str, current: u64, _total: Option<u64>) {
            self.events.borrow_mut().push(format!("set {phase} {current}"));
        }
        fn end_phase(&self, phase: &str, status: PhaseStatus) {
            self.events.borrow_mut().push(format!("end {phase} {status}"));
        }
        fn warning(&self, message: &str) {
            self.events.borrow_mut().push(format!("warn {message}"));
        }
        fn error(&self, code: &str, _message: &str, _location: Option<ErrorLocation>) {
            self.events.borrow_mut().push(format!("error {code}"));
        }
        fn finalize(&self, _summary: Map<String, Value>) -> PhaseStatus {
            PhaseStatus::Ok
        }
    }

    #[test]
    fn status_ordering_escalates() {
        assert!(PhaseStatus::Ok < PhaseStatus::Warn);
        assert!(PhaseStatus::Warn < PhaseStatus::Fail);
        assert_eq!(PhaseStatus::Warn.escalate(PhaseStatus::Ok), PhaseStatus::Warn);
        assert_eq!(PhaseStatus::Warn.escalate(PhaseStatus::Fail), PhaseStatus::Fail);
    }

    #[test]
    fn phase_handle_forwards_to_sink() {
        let sink = RecordingSink::default();
        let mut phase = sink.phase("render", Some(16));
        phase.start();
        phase.tick(1);
        phase.set(5, None);
        phase.end(PhaseStatus::Ok);
        assert_eq!(
            *sink.events.borrow(),
            vec!["start render Some(16)", "tick render 1", "set render 5", "end render ok"]
        );
    }

    #[test]
    fn dropped_phase_ends_as_fail() {
        let sink = RecordingSink::default();
        {
            let mut phase = sink.phase("assemble", None);
            phase.start();
        }
        assert_eq!(sink.events.borrow().last().unwrap(), "end assemble fail");
    }

    #[test]
    fn null_sink_reports_ok() {
        assert_eq!(NullSink.finalize(Map::new()), PhaseStatus::Ok);
    }
}
