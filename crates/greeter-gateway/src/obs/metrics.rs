//! Labeled counter registry for the gateway.
//!
//! Labels are flattened into key-sorted vectors so the same label set always
//! maps to one series regardless of the order the caller passes them in.
//! Rendering sorts series as well, which keeps two scrapes with no traffic in
//! between byte-identical.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the request counter.
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Helper to escape help text (quotes are legal there).
fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &[(String, String)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn unix_now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

struct Series {
    value: AtomicU64,
    // Unix seconds at which the label set was first seen.
    created: f64,
}

/// Monotonic counter family keyed by label set.
pub struct CounterVec {
    help: &'static str,
    map: DashMap<Vec<(String, String)>, Series>,
}

impl CounterVec {
    pub fn new(help: &'static str) -> Self {
        Self {
            help,
            map: DashMap::new(),
        }
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let key = label_key(labels);

        // Fast path: existing series only needs a shard read lock.
        if let Some(series) = self.map.get(&key) {
            series.value.fetch_add(v, Ordering::Relaxed);
            return;
        }
        let series = self.map.entry(key).or_insert_with(|| Series {
            value: AtomicU64::new(0),
            created: unix_now_secs(),
        });
        series.value.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of a series, 0 if it was never incremented.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|s| s.value.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Creation time of a series in unix seconds, if it exists.
    pub fn created(&self, labels: &[(&str, &str)]) -> Option<f64> {
        self.map.get(&label_key(labels)).map(|s| s.created)
    }

    /// Number of distinct label sets observed so far.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Render in Prometheus text exposition format.
    ///
    /// The sample family comes first, followed by a `<base>_created` gauge
    /// family holding each series' creation time, where `<base>` is `name`
    /// without its `_total` suffix.
    pub fn render(&self, name: &str, out: &mut String) {
        let mut samples: Vec<(Vec<(String, String)>, u64, f64)> = self
            .map
            .iter()
            .map(|r| {
                let s = r.value();
                (r.key().clone(), s.value.load(Ordering::Relaxed), s.created)
            })
            .collect();
        samples.sort_by(|a, b| a.0.cmp(&b.0));

        let help = escape_help(self.help);
        let _ = writeln!(out, "# HELP {} {}", name, help);
        let _ = writeln!(out, "# TYPE {} counter", name);
        for (key, val, _) in &samples {
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(key), val);
        }

        let created_name = format!("{}_created", name.strip_suffix("_total").unwrap_or(name));
        let _ = writeln!(out, "# HELP {} {}", created_name, help);
        let _ = writeln!(out, "# TYPE {} gauge", created_name);
        for (key, _, created) in &samples {
            let _ = writeln!(out, "{}{{{}}} {}", created_name, label_str(key), created);
        }
    }
}

/// Metrics registry owned by the application state.
pub struct HttpMetrics {
    /// `http_requests_total{method, endpoint}`.
    pub requests: CounterVec,
    started_at_secs: f64,
}

impl Default for HttpMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpMetrics {
    pub fn new() -> Self {
        Self {
            requests: CounterVec::new("Total HTTP requests"),
            started_at_secs: unix_now_secs(),
        }
    }

    /// Count one request for (method, endpoint).
    pub fn observe_request(&self, method: &str, endpoint: &str) {
        self.requests.inc(&[("method", method), ("endpoint", endpoint)]);
    }

    /// Current count for (method, endpoint).
    pub fn requests_for(&self, method: &str, endpoint: &str) -> u64 {
        self.requests.get(&[("method", method), ("endpoint", endpoint)])
    }

    /// Render every registered metric.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.requests.render(HTTP_REQUESTS_TOTAL, &mut out);

        let _ = writeln!(
            out,
            "# HELP process_start_time_seconds Start time of the process since unix epoch in seconds.\n\
             # TYPE process_start_time_seconds gauge\n\
             process_start_time_seconds {}",
            self.started_at_secs
        );
        out
    }
}
