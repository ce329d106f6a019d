//! USE-score math: join per-instance series and compute a combined score.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// `instance -> latest value` for one query.
pub type SeriesMap = HashMap<String, f64>;

/// Per-instance utilization/saturation/errors report.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UseReport {
    pub cpu_utilization_percent: f64,
    pub memory_utilization_percent: f64,
    pub cpu_saturation_iowait_percent: f64,
    pub disk_io_error_rate: f64,
    pub use_score: f64,
}

fn round_to(v: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (v * factor).round() / factor
}

/// Join four series over the union of instances; missing series default to
/// 0.0. Memory is reported but not part of the score.
pub fn join_scores(
    cpu: &SeriesMap,
    mem: &SeriesMap,
    sat: &SeriesMap,
    err: &SeriesMap,
) -> BTreeMap<String, UseReport> {
    let mut instances: Vec<&String> = cpu.keys().chain(mem.keys()).chain(sat.keys()).chain(err.keys()).collect();
    instances.sort();
    instances.dedup();

    let mut out = BTreeMap::new();
    for instance in instances {
        let cpu_v = cpu.get(instance).copied().unwrap_or(0.0);
        let mem_v = mem.get(instance).copied().unwrap_or(0.0);
        let sat_v = sat.get(instance).copied().unwrap_or(0.0);
        let err_v = err.get(instance).copied().unwrap_or(0.0);

        out.insert(
            instance.clone(),
            UseReport {
                cpu_utilization_percent: round_to(cpu_v, 2),
                memory_utilization_percent: round_to(mem_v, 2),
                cpu_saturation_iowait_percent: round_to(sat_v, 2),
                disk_io_error_rate: round_to(err_v, 6),
                use_score: round_to(cpu_v + sat_v + err_v, 2),
            },
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(pairs: &[(&str, f64)]) -> SeriesMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn score_sums_cpu_saturation_and_errors() {
        let cpu = series(&[("node1", 40.0)]);
        let mem = series(&[("node1", 70.0)]);
        let sat = series(&[("node1", 5.5)]);
        let err = series(&[("node1", 0.25)]);

        let joined = join_scores(&cpu, &mem, &sat, &err);
        let report = &joined["node1"];
        assert_eq!(report.use_score, 45.75);
        assert_eq!(report.memory_utilization_percent, 70.0);
    }

    #[test]
    fn missing_series_default_to_zero() {
        let cpu = series(&[("node1", 12.345)]);
        let sat = series(&[("node2", 1.0)]);
        let empty = SeriesMap::new();

        let joined = join_scores(&cpu, &empty, &sat, &empty);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined["node1"].cpu_saturation_iowait_percent, 0.0);
        assert_eq!(joined["node1"].use_score, 12.35);
        assert_eq!(joined["node2"].use_score, 1.0);
    }

    #[test]
    fn error_rate_keeps_six_places() {
        let err = series(&[("node1", 0.0000014)]);
        let empty = SeriesMap::new();
        let joined = join_scores(&empty, &empty, &empty, &err);
        assert_eq!(joined["node1"].disk_io_error_rate, 0.000001);
    }
}
