use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated by the engine loop and its workers.
#[derive(Debug, Default, Clone)]
pub struct EngineMetrics {
    frames: u64,
    payloads: u64,
    actions: u64,
    renders: u64,
    arrangements: u64,
    toggles: u64,
    generator_failures: u64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    pub fn record_payloads(&mut self, count: usize) {
        self.payloads = self.payloads.saturating_add(count as u64);
    }

    pub fn record_action(&mut self) {
        self.actions = self.actions.saturating_add(1);
    }

    pub fn record_render(&mut self, tiles: usize) {
        if tiles > 0 {
            self.renders = self.renders.saturating_add(1);
        }
    }

    pub fn record_arrangement(&mut self) {
        self.arrangements = self.arrangements.saturating_add(1);
    }

    pub fn record_toggle(&mut self) {
        self.toggles = self.toggles.saturating_add(1);
    }

    pub fn record_generator_failure(&mut self) {
        self.generator_failures = self.generator_failures.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            frames: self.frames,
            payloads: self.payloads,
            actions: self.actions,
            renders: self.renders,
            arrangements: self.arrangements,
            toggles: self.toggles,
            generator_failures: self.generator_failures,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub frames: u64,
    pub payloads: u64,
    pub actions: u64,
    pub renders: u64,
    pub arrangements: u64,
    pub toggles: u64,
    pub generator_failures: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "engine_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("frames".to_string(), json!(self.frames));
        map.insert("payloads".to_string(), json!(self.payloads));
        map.insert("actions".to_string(), json!(self.actions));
        map.insert("renders".to_string(), json!(self.renders));
        map.insert("arrangements".to_string(), json!(self.arrangements));
        map.insert("toggles".to_string(), json!(self.toggles));
        map.insert(
            "generator_failures".to_string(),
            json!(self.generator_failures),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_renders_are_not_counted() {
        let mut metrics = EngineMetrics::new();
        metrics.record_render(0);
        metrics.record_render(3);
        metrics.record_frame();
        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.renders, 1);
        assert_eq!(snapshot.frames, 1);
        assert_eq!(snapshot.uptime_ms, 1500);
    }

    #[test]
    fn snapshot_becomes_log_event() {
        let mut metrics = EngineMetrics::new();
        metrics.record_payloads(2);
        metrics.record_generator_failure();
        let event = metrics
            .snapshot(Duration::ZERO)
            .to_log_event("tiles::engine.metrics");
        assert_eq!(event.message, "engine_metrics");
        assert_eq!(event.field("payloads"), Some(&json!(2)));
        assert_eq!(event.field("generator_failures"), Some(&json!(1)));
    }
}
