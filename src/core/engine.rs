use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct AnalysisEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> AnalysisEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting analysis");

        // Extract
        tracing::debug!("Extracting input...");
        let extracted = self.pipeline.extract()?;
        self.monitor.record("Extract");

        // Transform
        tracing::debug!("Running analysis passes...");
        let transformed = self.pipeline.transform(extracted)?;
        self.monitor.record("Transform");

        // Load
        tracing::debug!("Writing results...");
        let location = self.pipeline.load(transformed)?;
        self.monitor.record("Load");
        self.monitor.log_summary();

        tracing::info!("✅ Analysis finished, results in {}", location);
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AnalyzerError;
    use std::cell::RefCell;

    struct RecordingPipeline {
        calls: RefCell<Vec<&'static str>>,
        fail_extract: bool,
    }

    impl Pipeline for RecordingPipeline {
        type Extracted = usize;
        type Transformed = String;

        fn extract(&self) -> Result<usize> {
            self.calls.borrow_mut().push("extract");
            if self.fail_extract {
                return Err(AnalyzerError::InvalidInputError {
                    message: "bad".to_string(),
                });
            }
            Ok(2)
        }

        fn transform(&self, data: usize) -> Result<String> {
            self.calls.borrow_mut().push("transform");
            Ok(format!("{} modules", data))
        }

        fn load(&self, result: String) -> Result<String> {
            self.calls.borrow_mut().push("load");
            Ok(result)
        }
    }

    #[test]
    fn test_phases_run_in_order() {
        let engine = AnalysisEngine::new(RecordingPipeline {
            calls: RefCell::new(Vec::new()),
            fail_extract: false,
        });
        assert_eq!(engine.run().unwrap(), "2 modules");
        assert_eq!(
            *engine.pipeline().calls.borrow(),
            vec!["extract", "transform", "load"]
        );
    }

    #[test]
    fn test_extract_failure_stops_run() {
        let engine = AnalysisEngine::new(RecordingPipeline {
            calls: RefCell::new(Vec::new()),
            fail_extract: true,
        });
        let err = engine.run().unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(*engine.pipeline().calls.borrow(), vec!["extract"]);
    }
}
