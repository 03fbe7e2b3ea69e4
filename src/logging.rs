//! Structured logging for sphere runs.
//!
//! Design goals:
//! 1. Multi-level granularity (TRACE → FATAL)
//! 2. Domain categories for filtering
//! 3. Replay/audit support via state digests on every ingest
//!
//! Records are JSON lines on stderr and, unless `LOG_DIR=-`, in
//! `<LOG_DIR>/<RUN_ID>/{events,trace}.jsonl`. Stdout stays free for the
//! human-readable rendering.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::engine::reducer::IngestOutput;
use crate::engine::regulation::Damping;
use crate::state::Snapshot;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            Ok("fatal") => Level::Fatal,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

// =============================================================================
// Log Domains
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Sphere,     // Ingest steps, snapshots
    Regulation, // Damping branches, rest venting
    Config,     // Threshold sanity
    Verify,     // Invariant checks
    System,     // Startup, shutdown, summaries
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Sphere => "sphere",
            Domain::Regulation => "regulation",
            Domain::Config => "config",
            Domain::Verify => "verify",
            Domain::System => "system",
        }
    }

    pub fn is_enabled(&self) -> bool {
        // LOG_DOMAINS: comma-separated list or "all"
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    events: Option<Mutex<BufWriter<File>>>,
    trace: Option<Mutex<BufWriter<File>>>,
}

fn open_sink(path: PathBuf) -> Option<Mutex<BufWriter<File>>> {
    match File::create(&path) {
        Ok(f) => Some(Mutex::new(BufWriter::new(f))),
        Err(err) => {
            eprintln!("[log] failed to create {}: {}", path.display(), err);
            None
        }
    }
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let base = std::env::var("LOG_DIR").unwrap_or_else(|_| "out/runs".to_string());
        if base == "-" {
            return RunContext {
                run_id,
                events: None,
                trace: None,
            };
        }

        let mut run_dir = PathBuf::from(base);
        run_dir.push(&run_id);
        if let Err(err) = create_dir_all(&run_dir) {
            eprintln!("[log] failed to create run dir: {}", err);
        }

        let _ = std::fs::write(
            run_dir.join("manifest.json"),
            json!({
                "run_id": run_id,
                "ts": ts_now(),
                "pid": process::id(),
                "log_dir": run_dir.to_string_lossy(),
                "crate": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            })
            .to_string(),
        );

        RunContext {
            run_id,
            events: open_sink(run_dir.join("events.jsonl")),
            trace: open_sink(run_dir.join("trace.jsonl")),
        }
    })
}

fn write_line(writer: &Option<Mutex<BufWriter<File>>>, line: &str) {
    if let Some(Ok(mut w)) = writer.as_ref().map(|m| m.lock()) {
        let _ = writeln!(w, "{}", line);
    }
}

fn flush_sink(writer: &Option<Mutex<BufWriter<File>>>) {
    if let Some(Ok(mut w)) = writer.as_ref().map(|m| m.lock()) {
        let _ = w.flush();
    }
}

/// Run identifier shared by every record of this process.
pub fn run_id() -> &'static str {
    &ensure_run_context().run_id
}

/// Flush file sinks. Call before exit.
pub fn flush() {
    let ctx = ensure_run_context();
    flush_sink(&ctx.events);
    flush_sink(&ctx.trace);
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    let min_level = Level::from_env();
    if level < min_level || !domain.is_enabled() {
        return;
    }

    emit_record(level, domain.as_str(), event, fields);
}

fn emit_record(level: Level, component: &str, event: &str, mut fields: Map<String, Value>) {
    let ctx = ensure_run_context();
    let line = render_record(&ctx.run_id, next_seq(), level, component, event, &mut fields);

    match level {
        Level::Trace | Level::Debug => write_line(&ctx.trace, &line),
        _ => write_line(&ctx.events, &line),
    }
    eprintln!("{}", line);
}

fn render_record(
    run_id: &str,
    seq: u64,
    level: Level,
    component: &str,
    event: &str,
    fields: &mut Map<String, Value>,
) -> String {
    let msg = fields.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(run_id));
    entry.insert("seq".to_string(), json!(seq));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    // "sphere" is promoted to the top level for grepping
    if let Some(name) = fields.remove("sphere") {
        entry.insert("sphere".to_string(), name);
    }
    entry.insert("data".to_string(), Value::Object(std::mem::take(fields)));
    Value::Object(entry).to_string()
}

// =============================================================================
// Sphere Logging Helpers
// =============================================================================

fn snapshot_value(snap: &Snapshot) -> Value {
    serde_json::to_value(snap).unwrap_or(Value::Null)
}

/// Log a full snapshot, e.g. the initial sphere.
pub fn log_snapshot(label: &str, snap: &Snapshot) {
    log(
        Level::Info,
        Domain::Sphere,
        "snapshot",
        obj(&[
            ("sphere", v_str(&snap.name)),
            ("label", v_str(label)),
            ("msg", v_str(&snap.to_string())),
            ("snapshot", snapshot_value(snap)),
            ("state_hash", v_str(&snap.digest())),
        ]),
    );
}

/// Log one ingest step. State changes log at info, quiet steps at debug.
pub fn log_ingest(index: usize, before: &Snapshot, output: &IngestOutput, after: &Snapshot) {
    let level = if output.changed_state() || output.damping.is_some() {
        Level::Info
    } else {
        Level::Debug
    };
    log(
        level,
        Domain::Sphere,
        "ingest",
        obj(&[
            ("sphere", v_str(&after.name)),
            ("msg", v_str(&format!("{} -> {}", output.event, output.state))),
            ("index", json!(index)),
            ("kind", v_str(output.event.kind.as_str())),
            ("intensity", json!(output.event.intensity)),
            ("prev_state", v_str(before.state.as_str())),
            ("state", v_str(output.state.as_str())),
            ("signals_before", json!(before.signals)),
            ("signals_after", json!(after.signals)),
            ("state_hash", v_str(&output.state_hash)),
        ]),
    );

    if let Some(damping) = output.damping {
        log_boundary(index, damping, &after.name);
    }
}

/// Log a boundary crossing: the first-pass classification hit a risky
/// state and automatic damping fired.
pub fn log_boundary(index: usize, damping: Damping, sphere: &str) {
    log(
        Level::Info,
        Domain::Regulation,
        "boundary",
        obj(&[
            ("sphere", v_str(sphere)),
            ("msg", v_str(&format!("{} damping at step {}", damping.as_str(), index))),
            ("branch", v_str(damping.as_str())),
            ("strength", json!(damping.strength())),
            ("index", json!(index)),
        ]),
    );
}

pub fn log_warning(domain: Domain, event: &str, msg: &str) {
    log(Level::Warn, domain, event, obj(&[("msg", v_str(msg))]));
}

/// Session summary on shutdown
pub fn log_session_summary(
    sphere: &str,
    events: u64,
    dampings: &[(&str, u64)],
    final_state: &str,
) {
    let damp_json: Map<String, Value> = dampings
        .iter()
        .map(|(k, n)| ((*k).to_string(), json!(n)))
        .collect();
    log(
        Level::Info,
        Domain::System,
        "session_summary",
        obj(&[
            ("sphere", v_str(sphere)),
            ("events", json!(events)),
            ("dampings", Value::Object(damp_json)),
            ("final_state", v_str(final_state)),
        ]),
    );
}

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_obj_helper() {
        let m = obj(&[("key", v_str("value")), ("num", json!(42))]);
        assert_eq!(m.get("key").unwrap(), "value");
        assert_eq!(m.get("num").unwrap(), 42);
    }

    #[test]
    fn test_render_record_shape() {
        let mut fields = obj(&[
            ("msg", v_str("hello")),
            ("sphere", v_str("S")),
            ("x", json!(1)),
        ]);
        let line = render_record("r-1", 7, Level::Warn, "config", "check", &mut fields);
        let v: Value = serde_json::from_str(&line).unwrap();

        assert_eq!(v["run_id"], "r-1");
        assert_eq!(v["seq"], 7);
        assert_eq!(v["lvl"], "WARN");
        assert_eq!(v["msg"], "hello");
        assert_eq!(v["sphere"], "S");
        assert_eq!(v["data"]["x"], 1);
        assert!(v["data"].get("msg").is_none());
    }

    #[test]
    fn test_seq_increments() {
        let s1 = next_seq();
        let s2 = next_seq();
        assert!(s2 > s1);
    }
}
