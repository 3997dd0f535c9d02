//! Optional resource sampling around the analysis phases.

#[cfg(feature = "cli")]
use std::cell::RefCell;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Resource usage observed right after one phase finished.
#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseSample {
    pub phase: String,
    pub cpu_percent: f32,
    pub resident_mb: u64,
    /// Time spent in this phase alone.
    pub duration: Duration,
}

#[cfg(feature = "cli")]
pub struct SystemMonitor {
    probe: Option<(RefCell<System>, Pid)>,
    started: Instant,
    last_mark: RefCell<Instant>,
    samples: RefCell<Vec<PhaseSample>>,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let probe = if enabled {
            sysinfo::get_current_pid()
                .map_err(|e| tracing::warn!("⚠️ Cannot resolve current PID, monitoring disabled: {}", e))
                .ok()
                .map(|pid| (RefCell::new(System::new()), pid))
        } else {
            None
        };

        let now = Instant::now();
        Self {
            probe,
            started: now,
            last_mark: RefCell::new(now),
            samples: RefCell::new(Vec::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.probe.is_some()
    }

    /// Sample the process and log it under `phase`.
    pub fn record(&self, phase: &str) {
        let Some((system, pid)) = &self.probe else {
            return;
        };

        let now = Instant::now();
        let duration = now.duration_since(self.last_mark.replace(now));

        let mut system = system.borrow_mut();
        system.refresh_processes(ProcessesToUpdate::Some(&[*pid]), true);
        let Some(process) = system.process(*pid) else {
            return;
        };

        let sample = PhaseSample {
            phase: phase.to_string(),
            cpu_percent: process.cpu_usage(),
            resident_mb: process.memory() / 1024 / 1024,
            duration,
        };
        tracing::info!(
            "📊 {} - CPU: {:.1}%, Memory: {}MB, Took: {:?}",
            sample.phase,
            sample.cpu_percent,
            sample.resident_mb,
            sample.duration
        );
        self.samples.borrow_mut().push(sample);
    }

    pub fn samples(&self) -> Vec<PhaseSample> {
        self.samples.borrow().clone()
    }

    /// Total time, peak memory and the slowest phase.
    pub fn log_summary(&self) {
        if !self.is_enabled() {
            return;
        }
        let samples = self.samples.borrow();
        let peak = samples.iter().map(|s| s.resident_mb).max().unwrap_or(0);
        let slowest = samples.iter().max_by_key(|s| s.duration);

        match slowest {
            Some(slowest) => tracing::info!(
                "📊 Total: {:?}, Peak Memory: {}MB, Slowest phase: {} ({:?})",
                self.started.elapsed(),
                peak,
                slowest.phase,
                slowest.duration
            ),
            None => tracing::info!("📊 Total: {:?}", self.started.elapsed()),
        }
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 沒有 sysinfo 時監控一律關閉
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn record(&self, _phase: &str) {}

    pub fn log_summary(&self) {}
}
