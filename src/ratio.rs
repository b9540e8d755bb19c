use crate::profile::Dataset;
use tracing::debug;

/// One node's costs expressed relative to its own ARCANE total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRatio {
    pub total_arcane_cost: u128,
    pub cpu_only_cost: u128,
    pub normalized_arcane: f64,
    pub normalized_cpu_easy: f64,
    pub normalized_cpu_only: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatioResult {
    pub nodes: Vec<NodeRatio>,
    pub total_arcane_sum: u128,
    pub total_cpu_only_sum: u128,
    /// Aggregate CPU-only latency relative to ARCANE, i.e. the overall speedup.
    pub improvement: f64,
}

impl RatioResult {
    /// Never divides by zero: `Dataset` guarantees every ARCANE total is positive.
    pub fn compute(dataset: &Dataset<'_>) -> Self {
        let nodes: Vec<NodeRatio> = dataset
            .nodes()
            .enumerate()
            .map(|(i, (profiling, cpu_only))| {
                let total = profiling.total();
                let denom = total as f64;
                let ratio = NodeRatio {
                    total_arcane_cost: total,
                    cpu_only_cost: u128::from(cpu_only.cpu_cost),
                    normalized_arcane: profiling.arcane_cost as f64 / denom,
                    normalized_cpu_easy: profiling.cpu_cost as f64 / denom,
                    normalized_cpu_only: cpu_only.cpu_cost as f64 / denom,
                };
                debug!(
                    node = i,
                    total = %total,
                    arcane = ratio.normalized_arcane,
                    cpu = ratio.normalized_cpu_easy,
                    cpu_only = ratio.normalized_cpu_only,
                    "node ratio"
                );
                ratio
            })
            .collect();

        // u128 sums cannot overflow for any slice of u64 costs that fits in memory
        let total_arcane_sum: u128 = nodes.iter().map(|n| n.total_arcane_cost).sum();
        let total_cpu_only_sum: u128 = nodes.iter().map(|n| n.cpu_only_cost).sum();
        let improvement = total_cpu_only_sum as f64 / total_arcane_sum as f64;

        Self {
            nodes,
            total_arcane_sum,
            total_cpu_only_sum,
            improvement,
        }
    }

    /// Plain-text table of the ratios, one row per node plus the aggregate.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{:<8} {:>12} {:>12} {:>8} {:>8} {:>9}\n",
            "node", "arcane_total", "cpu_only", "nmc", "cpu", "cpu_only"
        );
        for (i, n) in self.nodes.iter().enumerate() {
            out.push_str(&format!(
                "{:<8} {:>12} {:>12} {:>8.4} {:>8.4} {:>8.2}x\n",
                format!("Node {}", i),
                n.total_arcane_cost,
                n.cpu_only_cost,
                n.normalized_arcane,
                n.normalized_cpu_easy,
                n.normalized_cpu_only,
            ));
        }
        out.push_str(&format!(
            "{:<8} {:>12} {:>12} {:>8} {:>8} {:>8.2}x\n",
            "Total", self.total_arcane_sum, self.total_cpu_only_sum, "", "", self.improvement
        ));
        out
    }
}
