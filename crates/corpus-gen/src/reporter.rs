// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run reporter — append-only JSONL event log of a generation run, plus an
// optional human-readable console stream.
//
// Event shape (one JSON object per line):
//   { eventVersion: "1", ts, runId, tool, phase, kind, counters, ms, attrs }
// where kind is one of start | progress | end | warning | error | metric.

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{Local, Utc};
use corpus_core::progress::ErrorLocation;
use corpus_core::{PhaseStatus, ProgressSink};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

/// Default event log root, relative to the working directory.
pub const DEFAULT_OBS_DIR: &str = "artifacts/observability";

const EVENT_VERSION: &str = "1";
const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// `<tool>-<unix seconds>`.
pub fn default_run_id(tool: &str) -> String {
    format!("{}-{}", tool, Utc::now().timestamp())
}

/// Human-readable duration: `850ms`, `12.34s`, `2m 5.0s`.
pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        return format!("{ms}ms");
    }
    let seconds = ms as f64 / 1000.0;
    if seconds < 60.0 {
        return format!("{seconds:.2}s");
    }
    let minutes = (seconds / 60.0).floor();
    format!("{}m {:.1}s", minutes as u64, seconds - minutes * 60.0)
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum EventKind {
    Start,
    Progress,
    End,
    Warning,
    Error,
    Metric,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct Counters {
    current: u64,
    total: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Event<'a> {
    event_version: &'static str,
    ts: String,
    run_id: &'a str,
    tool: &'a str,
    phase: &'a str,
    kind: EventKind,
    counters: Option<Counters>,
    ms: Option<u64>,
    attrs: Option<Value>,
}

#[derive(Debug)]
struct PhaseRecord {
    name: String,
    started: Instant,
    total: Option<u64>,
    current: u64,
    last_emit: Option<Instant>,
    duration_ms: Option<u64>,
    status: Option<PhaseStatus>,
}

impl PhaseRecord {
    fn counters(&self) -> Counters {
        Counters {
            current: self.current,
            total: self.total.unwrap_or(0),
        }
    }
}

#[derive(Debug, Default)]
struct RunState {
    status: PhaseStatus,
    phases: Vec<PhaseRecord>,
    warnings: Vec<String>,
}

impl RunState {
    fn phase_mut(&mut self, name: &str) -> Option<&mut PhaseRecord> {
        self.phases.iter_mut().find(|p| p.name == name)
    }
}

/// [`ProgressSink`] that records a run as JSONL events.
///
/// Single-threaded by construction; state lives behind `RefCell`.
pub struct RunReporter {
    tool: String,
    run_id: String,
    log_path: PathBuf,
    mirror_paths: Vec<PathBuf>,
    min_progress_interval: Duration,
    started: Instant,
    state: RefCell<RunState>,
    console: Option<RefCell<Box<dyn Write>>>,
}

impl RunReporter {
    /// Reporter writing to `<base_dir>/<tool>/<run_id>.jsonl`.
    ///
    /// A directory that cannot be created is logged, not returned: the event
    /// log is diagnostic and never stops a run.
    pub fn new(tool: &str, run_id: &str, base_dir: &Path) -> Self {
        let log_dir = base_dir.join(tool);
        if let Err(err) = std::fs::create_dir_all(&log_dir) {
            warn!(dir = %log_dir.display(), error = %err, "Cannot create event log directory");
        }
        Self {
            tool: tool.to_owned(),
            run_id: run_id.to_owned(),
            log_path: log_dir.join(format!("{run_id}.jsonl")),
            mirror_paths: Vec::new(),
            min_progress_interval: DEFAULT_PROGRESS_INTERVAL,
            started: Instant::now(),
            state: RefCell::new(RunState::default()),
            console: None,
        }
    }

    /// Mirror phase transitions and the final summary to `out`.
    pub fn with_console(mut self, out: Box<dyn Write>) -> Self {
        self.console = Some(RefCell::new(out));
        self
    }

    /// Also append every event line to `path`. Duplicates of an existing
    /// output are ignored; the parent directory is created on a best-effort
    /// basis.
    pub fn with_mirror(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path == self.log_path || self.mirror_paths.contains(&path) {
            return self;
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(err) = std::fs::create_dir_all(parent) {
                warn!(dir = %parent.display(), error = %err, "Cannot create mirror log directory");
            }
        }
        self.mirror_paths.push(path);
        self
    }

    /// Minimum spacing between progress events of one phase.
    pub fn with_min_progress_interval(mut self, interval: Duration) -> Self {
        self.min_progress_interval = interval;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Aggregated status so far.
    pub fn status(&self) -> PhaseStatus {
        self.state.borrow().status
    }

    fn emit(
        &self,
        kind: EventKind,
        phase: &str,
        counters: Option<Counters>,
        ms: Option<u64>,
        attrs: Option<Value>,
    ) {
        let event = Event {
            event_version: EVENT_VERSION,
            ts: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            run_id: &self.run_id,
            tool: &self.tool,
            phase,
            kind,
            counters,
            ms,
            attrs,
        };
        let line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "Cannot serialise run event");
                return;
            }
        };
        for path in std::iter::once(&self.log_path).chain(&self.mirror_paths) {
            let written = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .and_then(|mut file| writeln!(file, "{line}"));
            if let Err(err) = written {
                warn!(path = %path.display(), error = %err, "Cannot append run event");
            }
        }
    }

    fn say(&self, line: &str) {
        if let Some(console) = &self.console {
            if let Err(err) = writeln!(console.borrow_mut(), "{line}") {
                debug!(error = %err, "Console stream write failed");
            }
        }
    }

    fn clock() -> String {
        Local::now().format("%H:%M:%S").to_string()
    }
}

impl ProgressSink for RunReporter {
    fn start_phase(&self, phase: &str, total: Option<u64>) {
        {
            let mut state = self.state.borrow_mut();
            if state.phase_mut(phase).is_some() {
                return;
            }
            state.phases.push(PhaseRecord {
                name: phase.to_owned(),
                started: Instant::now(),
                total,
                current: 0,
                last_emit: None,
                duration_ms: None,
                status: None,
            });
        }
        let counters = total.map(|total| Counters { current: 0, total });
        self.emit(EventKind::Start, phase, counters, None, None);
        self.say(&format!("{} [start] {}", Self::clock(), phase));
    }

    fn tick(&self, phase: &str, amount: u64) {
        let current = {
            let state = self.state.borrow();
            state.phases.iter().find(|p| p.name == phase).map_or(0, |p| p.current)
        };
        self.set(phase, current + amount, None);
    }

    fn set(&self, phase: &str, current: u64, total: Option<u64>) {
        let counters = {
            let mut state = self.state.borrow_mut();
            let Some(record) = state.phase_mut(phase) else {
                debug!(phase, "Progress for a phase that was never started");
                return;
            };
            record.current = current;
            if total.is_some() {
                record.total = total;
            }
            let now = Instant::now();
            if let Some(last) = record.last_emit {
                if now.duration_since(last) < self.min_progress_interval {
                    return;
                }
            }
            record.last_emit = Some(now);
            record.counters()
        };
        self.emit(EventKind::Progress, phase, Some(counters), None, None);
    }

    fn end_phase(&self, phase: &str, status: PhaseStatus) {
        let (duration_ms, counters) = {
            let mut state = self.state.borrow_mut();
            let Some(record) = state.phase_mut(phase) else {
                return;
            };
            let duration_ms = record.started.elapsed().as_millis() as u64;
            record.duration_ms = Some(duration_ms);
            record.status = Some(status);
            let counters = record.counters();
            state.status = state.status.escalate(status);
            (duration_ms, counters)
        };
        self.emit(EventKind::End, phase, Some(counters), Some(duration_ms), None);
        self.say(&format!(
            "{} [{}] {} ({})",
            Self::clock(),
            status,
            phase,
            format_duration(duration_ms)
        ));
    }

    fn warning(&self, message: &str) {
        {
            let mut state = self.state.borrow_mut();
            state.status = state.status.escalate(PhaseStatus::Warn);
            state.warnings.push(message.to_owned());
        }
        self.emit(EventKind::Warning, "warning", None, None, Some(json!({ "message": message })));
        self.say(&format!("{} [warn] {}", Self::clock(), message));
    }

    fn error(&self, code: &str, message: &str, location: Option<ErrorLocation>) {
        self.state.borrow_mut().status = PhaseStatus::Fail;
        let location = location.unwrap_or_else(|| {
            let cwd = std::env::current_dir().unwrap_or_default();
            ErrorLocation::new(cwd.join("UNKNOWN").display().to_string(), 0, 0)
        });
        eprintln!(
            "CORPUS_ERROR {}:{}:{} {} {}",
            location.file, location.line, location.col, code, message
        );
        self.emit(
            EventKind::Error,
            "error",
            None,
            None,
            Some(json!({
                "code": code,
                "message": message,
                "file": location.file,
                "line": location.line,
                "col": location.col,
            })),
        );
    }

    fn finalize(&self, summary: Map<String, Value>) -> PhaseStatus {
        let total_ms = self.started.elapsed().as_millis() as u64;
        let state = self.state.borrow();

        let mut phases = Map::new();
        let mut totals = Map::new();
        for record in &state.phases {
            if let Some(ms) = record.duration_ms {
                phases.insert(record.name.clone(), json!(ms));
            }
            if let Some(total) = record.total {
                totals.insert(record.name.clone(), json!(total));
            }
        }
        let mut attrs = Map::new();
        attrs.insert("status".into(), json!(state.status));
        attrs.insert("phases".into(), Value::Object(phases));
        attrs.insert("totals".into(), Value::Object(totals));
        attrs.insert("warnings".into(), json!(state.warnings));
        attrs.extend(summary);
        self.emit(EventKind::Metric, "summary", None, Some(total_ms), Some(Value::Object(attrs)));

        if self.console.is_some() {
            let rule = "-".repeat(40);
            self.say("");
            self.say(&rule);
            self.say("GOLDEN CORPUS RUN SUMMARY");
            self.say(&rule);
            self.say(&format!("  Status: {}", state.status.as_str().to_uppercase()));
            self.say(&format!("  Run ID: {}", self.run_id));
            self.say(&format!("  Duration: {}", format_duration(total_ms)));
            self.say(&format!("  JSONL: {}", self.log_path.display()));
            let finished: Vec<&PhaseRecord> = state.phases.iter().filter(|p| p.duration_ms.is_some()).collect();
            if !finished.is_empty() {
                self.say("  Phases:");
                for record in finished {
                    let status = record.status.unwrap_or_default();
                    self.say(&format!(
                        "   - {}: {} {}",
                        record.name,
                        status.as_str().to_uppercase(),
                        format_duration(record.duration_ms.unwrap_or(0))
                    ));
                }
            }
            self.say(&rule);
        }
        state.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_core::Phase;
    use std::rc::Rc;

    /// Console sink that keeps what was written.
    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    fn events(reporter: &RunReporter) -> Vec<Value> {
        std::fs::read_to_string(reporter.log_path())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn durations_format_like_a_stopwatch() {
        assert_eq!(format_duration(0), "0ms");
        assert_eq!(format_duration(999), "999ms");
        assert_eq!(format_duration(1234), "1.23s");
        assert_eq!(format_duration(59_990), "59.99s");
        assert_eq!(format_duration(125_000), "2m 5.0s");
    }

    #[test]
    fn run_id_carries_tool_name() {
        let id = default_run_id("golden-corpus");
        let secs = id.strip_prefix("golden-corpus-").unwrap();
        assert!(secs.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn events_land_in_tool_directory() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = RunReporter::new("golden-corpus", "run-1", dir.path());
        assert_eq!(reporter.log_path(), dir.path().join("golden-corpus/run-1.jsonl"));

        reporter.start_phase("render", Some(16));
        reporter.end_phase("render", PhaseStatus::Ok);

        let events = events(&reporter);
        assert_eq!(events.len(), 2);
        let start = &events[0];
        assert_eq!(start["eventVersion"], "1");
        assert_eq!(start["runId"], "run-1");
        assert_eq!(start["tool"], "golden-corpus");
        assert_eq!(start["phase"], "render");
        assert_eq!(start["kind"], "start");
        assert_eq!(start["counters"], json!({ "current": 0, "total": 16 }));
        assert!(start["ms"].is_null());
        assert!(start["ts"].as_str().unwrap().ends_with('Z'));
        assert_eq!(events[1]["kind"], "end");
        assert!(events[1]["ms"].is_u64());
    }

    #[test]
    fn starting_twice_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = RunReporter::new("t", "r", dir.path());
        reporter.start_phase("setup", None);
        reporter.start_phase("setup", None);
        assert_eq!(events(&reporter).len(), 1);
        assert!(events(&reporter)[0]["counters"].is_null());
    }

    #[test]
    fn progress_is_rate_limited_but_counts_stay_exact() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = RunReporter::new("t", "r", dir.path()).with_min_progress_interval(Duration::from_secs(3600));
        let mut phase = Phase::new(&reporter, "render", Some(16));
        phase.start();
        for _ in 0..16 {
            phase.tick(1);
        }
        phase.end(PhaseStatus::Ok);

        let events = events(&reporter);
        let progress = events.iter().filter(|e| e["kind"] == "progress").count();
        assert_eq!(progress, 1);
        let end = events.last().unwrap();
        assert_eq!(end["counters"], json!({ "current": 16, "total": 16 }));
    }

    #[test]
    fn warnings_and_failures_escalate_status() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = RunReporter::new("t", "r", dir.path());
        assert_eq!(reporter.status(), PhaseStatus::Ok);
        reporter.warning("gutter missed");
        assert_eq!(reporter.status(), PhaseStatus::Warn);
        reporter.start_phase("render", None);
        reporter.end_phase("render", PhaseStatus::Ok);
        assert_eq!(reporter.status(), PhaseStatus::Warn);
        reporter.error("E_IO", "disk full", Some(ErrorLocation::new("main.rs", 3, 7)));
        assert_eq!(reporter.status(), PhaseStatus::Fail);

        let events = events(&reporter);
        let error = events.iter().find(|e| e["kind"] == "error").unwrap();
        assert_eq!(error["phase"], "error");
        assert_eq!(error["attrs"]["code"], "E_IO");
        assert_eq!(error["attrs"]["line"], 3);
    }

    #[test]
    fn dropped_phase_is_recorded_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = RunReporter::new("t", "r", dir.path());
        {
            let mut phase = Phase::new(&reporter, "render", None);
            phase.start();
        }
        assert_eq!(reporter.status(), PhaseStatus::Fail);
    }

    #[test]
    fn finalize_emits_summary_metric() {
        let dir = tempfile::tempdir().unwrap();
        let console = SharedBuffer::default();
        let reporter = RunReporter::new("t", "r", dir.path()).with_console(Box::new(console.clone()));
        reporter.start_phase("render", Some(2));
        reporter.end_phase("render", PhaseStatus::Warn);

        let mut summary = Map::new();
        summary.insert("pages".into(), json!(2));
        let status = reporter.finalize(summary);
        assert_eq!(status, PhaseStatus::Warn);

        let events = events(&reporter);
        let metric = events.last().unwrap();
        assert_eq!(metric["kind"], "metric");
        assert_eq!(metric["phase"], "summary");
        assert_eq!(metric["attrs"]["status"], "warn");
        assert_eq!(metric["attrs"]["totals"], json!({ "render": 2 }));
        assert_eq!(metric["attrs"]["pages"], 2);
        assert!(metric["attrs"]["phases"]["render"].is_u64());

        let text = console.text();
        assert!(text.contains("[start] render"));
        assert!(text.contains("[warn] render ("));
        assert!(text.contains("Status: WARN"));
        assert!(text.contains("   - render: WARN "));
    }

    #[test]
    fn unwritable_log_never_panics() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        // The tool directory would have to live under a regular file.
        let reporter = RunReporter::new("t", "r", &blocker);
        reporter.start_phase("setup", None);
        reporter.end_phase("setup", PhaseStatus::Ok);
        assert_eq!(reporter.finalize(Map::new()), PhaseStatus::Ok);
    }

    #[test]
    fn mirrors_receive_every_event_once() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = dir.path().join("ci/latest.jsonl");
        let reporter = RunReporter::new("golden-corpus", "run-2", dir.path())
            .with_mirror(&mirror)
            .with_mirror(&mirror)
            .with_mirror(dir.path().join("golden-corpus/run-2.jsonl"));

        reporter.start_phase("setup", None);
        reporter.warning("font fell back to bitmap glyphs");
        reporter.end_phase("setup", PhaseStatus::Warn);

        let main = std::fs::read_to_string(reporter.log_path()).unwrap();
        let copy = std::fs::read_to_string(&mirror).unwrap();
        assert_eq!(main.lines().count(), 3);
        assert_eq!(main, copy);
    }
}
