use serde::{Deserialize, Serialize};

/// Canvas and layout settings for the rendered dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    pub iterations: usize,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 1200,
            iterations: 50,
        }
    }
}

/// 分析階段的結果：可降級的階段失敗時只記錄錯誤訊息
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome<T> {
    Completed(T),
    Degraded(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleCoupling {
    pub name: String,
    pub fan_in: usize,
    pub fan_out: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CouplingReport {
    /// Every module, sorted by name.
    pub modules: Vec<ModuleCoupling>,
    /// (module, fan-in) with fan-in above the threshold, highest first.
    pub high_fan_in: Vec<(String, usize)>,
    /// (module, fan-out) with fan-out above the threshold, highest first.
    pub high_fan_out: Vec<(String, usize)>,
}

/// A simple cycle as the ordered chain of modules, without repeating the start.
pub type Cycle = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryPointDepth {
    pub module: String,
    pub depth: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DepthReport {
    pub max_depth: usize,
    pub entry_points: Vec<EntryPointDepth>,
    pub total_entry_points: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreModule {
    pub name: String,
    pub fan_in: usize,
    /// Direct importers, in the order their edges were added.
    pub dependents: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImpactReport {
    pub core_modules: Vec<CoreModule>,
    pub high_risk: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReport {
    pub coupling: CouplingReport,
    pub cycles: StageOutcome<Vec<Cycle>>,
    pub isolated: Vec<String>,
    pub depth: StageOutcome<DepthReport>,
    pub impact: ImpactReport,
}
