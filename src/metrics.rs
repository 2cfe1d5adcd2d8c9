//! Prometheus metrics for tool invocations.

use std::time::Duration;

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Label used for calls naming a tool that is not registered.
pub const UNKNOWN_TOOL_LABEL: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Ok,
    Error,
    UnknownTool,
}

impl CallOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::UnknownTool => "unknown_tool",
        }
    }
}

#[derive(Clone)]
pub struct ToolMetrics {
    registry: Registry,
    calls: IntCounterVec,
    duration: HistogramVec,
}

impl ToolMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let calls = IntCounterVec::new(
            Opts::new("tool_calls_total", "Tool calls by tool and outcome"),
            &["tool", "outcome"],
        )?;
        let duration = HistogramVec::new(
            HistogramOpts::new("tool_call_duration_seconds", "Tool call latency")
                .buckets(vec![0.01, 0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0]),
            &["tool"],
        )?;

        registry.register(Box::new(calls.clone()))?;
        registry.register(Box::new(duration.clone()))?;

        Ok(Self {
            registry,
            calls,
            duration,
        })
    }

    pub fn record(&self, tool: &str, outcome: CallOutcome, elapsed: Duration) {
        let tool = match outcome {
            CallOutcome::UnknownTool => UNKNOWN_TOOL_LABEL,
            _ => tool,
        };
        self.calls.with_label_values(&[tool, outcome.label()]).inc();
        if outcome != CallOutcome::UnknownTool {
            self.duration
                .with_label_values(&[tool])
                .observe(elapsed.as_secs_f64());
        }
    }

    pub fn call_count(&self, tool: &str, outcome: CallOutcome) -> u64 {
        self.calls.with_label_values(&[tool, outcome.label()]).get()
    }

    /// Text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }
}
