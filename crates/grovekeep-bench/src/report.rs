use std::path::{Path, PathBuf};

use crate::runner::BenchmarkResult;

/// Saved results of one bench run, compared against later runs.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub label: String,
    pub results: Vec<BenchmarkResult>,
}

#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    #[error("baseline {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("baseline {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn read_baseline(path: &Path) -> Result<Baseline, BaselineError> {
    let text = std::fs::read_to_string(path).map_err(|source| BaselineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| BaselineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_baseline(path: &Path, baseline: &Baseline) -> Result<(), BaselineError> {
    let io_err = |source| BaselineError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(|source| BaselineError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(io_err)
}

/// A scene whose mean frame time got slower than the baseline allows.
#[derive(Debug, Clone, PartialEq)]
pub struct Regression {
    pub scene: String,
    pub baseline_ms: f64,
    pub current_ms: f64,
}

impl Regression {
    pub fn change_pct(&self) -> f64 {
        (self.current_ms - self.baseline_ms) / self.baseline_ms * 100.0
    }
}

/// Scenes present in both runs whose mean grew by more than `threshold_pct`.
/// Scenes new to this run, or with a zero baseline, are skipped.
pub fn regressions(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<Regression> {
    current
        .iter()
        .filter_map(|r| {
            let base = baseline.results.iter().find(|b| b.scene_name == r.scene_name)?;
            (base.timings.mean_ms > 0.0).then(|| Regression {
                scene: r.scene_name.clone(),
                baseline_ms: base.timings.mean_ms,
                current_ms: r.timings.mean_ms,
            })
        })
        .filter(|reg| reg.change_pct() > threshold_pct)
        .collect()
}

/// One markdown row per scene.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Ticks | Peak entities | Peak streamed | Enemies | Chunks | Mean (ms) | Median (ms) | P95 (ms) | Max (ms) |\n");
    out.push_str("|-------|-------|---------------|---------------|---------|--------|-----------|-------------|----------|----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {:.3} | {:.3} | {:.3} | {:.3} |\n",
            r.scene_name,
            r.tick_count,
            r.peak_entities,
            r.peak_streamed,
            r.final_enemies,
            r.allocated_chunks,
            r.timings.mean_ms,
            r.timings.median_ms,
            r.timings.p95_ms,
            r.timings.max_ms,
        ));
    }

    out
}

pub fn format_regressions(found: &[Regression], threshold_pct: f64) -> String {
    if found.is_empty() {
        return format!("No scene slowed down by more than {threshold_pct:.0}%.\n");
    }
    let mut out = format!("{} scene(s) slower than the {threshold_pct:.0}% limit:\n", found.len());
    for r in found {
        out.push_str(&format!(
            "  - {}: {:.3} ms -> {:.3} ms (+{:.1}%)\n",
            r.scene,
            r.baseline_ms,
            r.current_ms,
            r.change_pct()
        ));
    }
    out
}
