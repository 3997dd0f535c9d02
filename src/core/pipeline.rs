use crate::core::depth::{seeded_rng, DepthEstimator};
use crate::core::graph::DependencyGraph;
use crate::core::{coupling, cycles::CycleDetector, impact, isolation, report, visualize};
use crate::core::{ConfigProvider, DependencyReport, Pipeline, StageOutcome, Storage};
use crate::utils::error::Result;

/// Graph plus the report computed from it; the graph is kept for plotting.
pub struct AnalysisResult {
    pub graph: DependencyGraph,
    pub report: DependencyReport,
}

pub struct DependencyPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    cycle_detector: CycleDetector,
    depth_estimator: DepthEstimator,
}

impl<S: Storage, C: ConfigProvider> DependencyPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            cycle_detector: CycleDetector::new(),
            depth_estimator: DepthEstimator::new(),
        }
    }

    pub fn with_cycle_detector(mut self, detector: CycleDetector) -> Self {
        self.cycle_detector = detector;
        self
    }

    pub fn with_depth_estimator(mut self, estimator: DepthEstimator) -> Self {
        self.depth_estimator = estimator;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn analyze(&self, graph: &DependencyGraph) -> DependencyReport {
        let coupling = coupling::analyze(graph);

        // 以下兩個階段失敗時降級，不中斷整個分析
        let cycles = match self.cycle_detector.find_cycles(graph) {
            Ok(cycles) => StageOutcome::Completed(cycles),
            Err(e) => {
                tracing::warn!("⚠️ Cycle detection degraded: {}", e);
                StageOutcome::Degraded(e.to_string())
            }
        };

        let isolated = isolation::isolated_modules(graph);

        let mut rng = seeded_rng(self.config.seed());
        let depth = match self.depth_estimator.estimate(graph, &mut rng) {
            Ok(depth) => StageOutcome::Completed(depth),
            Err(e) => {
                tracing::warn!("⚠️ Depth estimation degraded: {}", e);
                StageOutcome::Degraded(e.to_string())
            }
        };

        let impact = impact::assess(graph);

        DependencyReport {
            coupling,
            cycles,
            isolated,
            depth,
            impact,
        }
    }

    /// Render and store the PNG. Returns the message printed under the report.
    pub fn visualize(&self, graph: &DependencyGraph) -> String {
        let image_path = self.config.image_path();
        let mut rng = seeded_rng(self.config.seed());
        let rendered = visualize::render_png(graph, &self.config.plot_options(), &mut rng)
            .and_then(|png| self.storage.write_file(image_path, &png));

        match rendered {
            Ok(()) => {
                tracing::debug!("Graph image written to {}", image_path);
                format!(
                    "\nDependency graph visualization saved as '{}'",
                    image_path
                )
            }
            Err(e) => {
                tracing::warn!("⚠️ Visualization failed: {}", e);
                format!("Error generating visualization: {}", e)
            }
        }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for DependencyPipeline<S, C> {
    type Extracted = DependencyGraph;
    type Transformed = AnalysisResult;

    fn extract(&self) -> Result<DependencyGraph> {
        let input = self.config.input_path();
        tracing::debug!("Reading dependency map from {}", input);
        let bytes = self.storage.read_file(input)?;
        DependencyGraph::from_json_slice(&bytes)
    }

    fn transform(&self, graph: DependencyGraph) -> Result<AnalysisResult> {
        let report = self.analyze(&graph);
        Ok(AnalysisResult { graph, report })
    }

    fn load(&self, result: AnalysisResult) -> Result<String> {
        print!("{}", report::render(&result.report));

        if !self.config.plot_enabled() {
            tracing::info!("🖼️ Visualization disabled");
            return Ok("stdout".to_string());
        }

        println!("{}", self.visualize(&result.graph));
        Ok(self.config.image_path().to_string())
    }
}
