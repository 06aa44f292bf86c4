//! Structured JSON event logging.
//!
//! Every log line is a single JSON object on stderr carrying a timestamp, a
//! monotonic sequence number, and a module tag, so refresh behavior can be
//! reconstructed after the fact (tick skipped vs. stale response dropped vs.
//! fallback engaged).

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde_json::{json, Map, Value};

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

pub fn ts_now() -> String {
    Utc::now().to_rfc3339()
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

pub fn v_bool(b: bool) -> Value {
    Value::Bool(b)
}

pub fn obj(fields: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in fields {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn json_log(module: &str, fields: Map<String, Value>) {
    let mut all = Map::new();
    all.insert("ts".to_string(), v_str(&ts_now()));
    all.insert("seq".to_string(), json!(next_seq()));
    all.insert("module".to_string(), v_str(module));
    all.extend(fields);
    eprintln!("{}", Value::Object(all));
}
