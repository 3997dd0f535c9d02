//! Plain-text rendering of a [`DependencyReport`].

use crate::domain::model::{
    CouplingReport, Cycle, DependencyReport, DepthReport, ImpactReport, StageOutcome,
};
use std::fmt::{self, Write};

/// Cycles printed verbatim before the remainder is summarised.
pub const MAX_LISTED_CYCLES: usize = 10;
/// Direct dependents listed under each core module.
pub const MAX_LISTED_DEPENDENTS: usize = 3;

/// Displays every report section in order.
pub struct TextReport<'a>(pub &'a DependencyReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        render_coupling(f, &report.coupling)?;
        render_cycles(f, &report.cycles)?;
        render_isolated(f, &report.isolated)?;
        render_depth(f, &report.depth)?;
        render_impact(f, &report.impact)
    }
}

pub fn render(report: &DependencyReport) -> String {
    TextReport(report).to_string()
}

pub fn render_coupling<W: Write>(out: &mut W, coupling: &CouplingReport) -> fmt::Result {
    writeln!(out, "\n==== Module Fan-in and Fan-out Analysis ====")?;
    writeln!(out, "{:<50} {:<10} {:<10}", "Module", "Fan-in", "Fan-out")?;
    writeln!(out, "{}", "-".repeat(70))?;
    for module in &coupling.modules {
        writeln!(
            out,
            "{:<50} {:<10} {:<10}",
            module.name, module.fan_in, module.fan_out
        )?;
    }

    writeln!(out, "\n==== Highly Coupled Modules ====")?;
    writeln!(
        out,
        "\nHigh Fan-in Modules (many other modules depend on these):"
    )?;
    for (module, count) in &coupling.high_fan_in {
        writeln!(out, "- {}: {} dependent modules", module, count)?;
    }
    writeln!(out, "\nHigh Fan-out Modules (depend on many other modules):")?;
    for (module, count) in &coupling.high_fan_out {
        writeln!(out, "- {}: depends on {} modules", module, count)?;
    }
    Ok(())
}

pub fn format_cycle(cycle: &Cycle) -> String {
    match cycle.first() {
        Some(start) => format!("{} -> {}", cycle.join(" -> "), start),
        None => String::new(),
    }
}

pub fn render_cycles<W: Write>(out: &mut W, cycles: &StageOutcome<Vec<Cycle>>) -> fmt::Result {
    let cycles = match cycles {
        StageOutcome::Completed(cycles) => cycles,
        StageOutcome::Degraded(error) => {
            return writeln!(out, "\nError detecting cycles: {}", error);
        }
    };

    writeln!(out, "\n==== Cyclic Dependencies ====")?;
    if cycles.is_empty() {
        return writeln!(out, "No cyclic dependencies detected.");
    }
    writeln!(out, "Found {} cyclic dependencies:", cycles.len())?;
    for (i, cycle) in cycles.iter().take(MAX_LISTED_CYCLES).enumerate() {
        writeln!(out, "Cycle {}: {}", i + 1, format_cycle(cycle))?;
    }
    if cycles.len() > MAX_LISTED_CYCLES {
        writeln!(
            out,
            "... and {} more cycles",
            cycles.len() - MAX_LISTED_CYCLES
        )?;
    }
    Ok(())
}

pub fn render_isolated<W: Write>(out: &mut W, isolated: &[String]) -> fmt::Result {
    writeln!(out, "\n==== Unused/Disconnected Modules ====")?;
    if isolated.is_empty() {
        return writeln!(out, "No isolated modules detected.");
    }
    writeln!(out, "Found {} isolated modules:", isolated.len())?;
    for module in isolated {
        writeln!(out, "- {}", module)?;
    }
    Ok(())
}

pub fn render_depth<W: Write>(out: &mut W, depth: &StageOutcome<DepthReport>) -> fmt::Result {
    writeln!(out, "\n==== Dependency Depth Analysis ====")?;
    let depth = match depth {
        StageOutcome::Completed(depth) => depth,
        StageOutcome::Degraded(error) => {
            return writeln!(out, "Error calculating dependency depths: {}", error);
        }
    };

    writeln!(out, "Maximum dependency chain length: {}", depth.max_depth)?;
    writeln!(out, "\nEntry points and their maximum dependency depths:")?;
    for entry in &depth.entry_points {
        writeln!(out, "- {}: {} levels deep", entry.module, entry.depth)?;
    }
    if depth.total_entry_points > depth.entry_points.len() {
        writeln!(
            out,
            "... and {} more entry points",
            depth.total_entry_points - depth.entry_points.len()
        )?;
    }
    Ok(())
}

pub fn render_impact<W: Write>(out: &mut W, impact: &ImpactReport) -> fmt::Result {
    writeln!(out, "\n==== Dependency Impact Assessment ====")?;

    writeln!(out, "\nCore Modules (critical dependencies):")?;
    for module in &impact.core_modules {
        writeln!(out, "- {}: {} dependent modules", module.name, module.fan_in)?;
        writeln!(
            out,
            "  Impact if modified: Would affect {} dependent modules:",
            module.fan_in
        )?;
        for dependent in module.dependents.iter().take(MAX_LISTED_DEPENDENTS) {
            writeln!(out, "  - {}", dependent)?;
        }
        if module.dependents.len() > MAX_LISTED_DEPENDENTS {
            writeln!(
                out,
                "  - ... and {} more",
                module.dependents.len() - MAX_LISTED_DEPENDENTS
            )?;
        }
    }

    writeln!(out, "\nHigh-Risk Modules (if modified):")?;
    for (module, count) in &impact.high_risk {
        writeln!(out, "- {}: depends on {} modules", module, count)?;
        writeln!(
            out,
            "  Risk: Changes to any of its dependencies could break this module"
        )?;
    }
    Ok(())
}
