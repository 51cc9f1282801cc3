//! Group-by aggregation of per-second traffic-type counts.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Local};

use qoswatch_types::CountSample;

/// Per-second packet counts pivoted into one column per traffic type.
///
/// Built from scratch on every poll response. Types absent from a sample's
/// count map are filled with zero, so every column has exactly one entry per
/// label and all columns chart against the same x axis.
#[derive(Debug, Clone, Default)]
pub struct CountSeries {
    /// Local-time labels, one per sample, oldest first.
    pub labels: Vec<String>,
    /// Count column per traffic type, aligned with `labels`.
    pub series: BTreeMap<String, Vec<u64>>,
}

impl CountSeries {
    /// Pivot an ordered sample sequence into aligned per-type columns.
    pub fn from_samples(samples: &[CountSample]) -> Self {
        // Union of traffic types across the whole response window
        let types: BTreeSet<&str> = samples
            .iter()
            .flat_map(|s| s.counts.keys().map(String::as_str))
            .collect();

        let mut labels = Vec::with_capacity(samples.len());
        let mut series: BTreeMap<String, Vec<u64>> = types
            .iter()
            .map(|ty| (ty.to_string(), Vec::with_capacity(samples.len())))
            .collect();

        for sample in samples {
            labels.push(format_epoch_label(sample.timestamp));
            for ty in &types {
                let count = sample.counts.get(*ty).copied().unwrap_or(0);
                series
                    .get_mut(*ty)
                    .expect("column created above")
                    .push(count);
            }
        }

        Self { labels, series }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Chart points for one traffic type, x being the sample index.
    pub fn points(&self, traffic_type: &str) -> Vec<(f64, f64)> {
        self.series
            .get(traffic_type)
            .map(|column| {
                column
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (i as f64, *c as f64))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The largest count anywhere in the table, for the y-axis bound.
    pub fn max_count(&self) -> u64 {
        self.series
            .values()
            .flat_map(|column| column.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Format a backend epoch timestamp as a local wall-clock label.
pub fn format_epoch_label(timestamp: f64) -> String {
    let secs = timestamp.trunc() as i64;
    let nanos = (timestamp.fract().abs() * 1e9) as u32;
    match DateTime::from_timestamp(secs, nanos) {
        Some(utc) => utc.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => format!("{:.0}", timestamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample(timestamp: f64, counts: &[(&str, u64)]) -> CountSample {
        CountSample {
            timestamp,
            counts: counts
                .iter()
                .map(|(ty, c)| (ty.to_string(), *c))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let series = CountSeries::from_samples(&[]);
        assert!(series.is_empty());
        assert_eq!(series.max_count(), 0);
    }

    #[test]
    fn missing_types_are_zero_filled() {
        let samples = vec![
            sample(1.0, &[("YouTube", 4), ("WhatsApp", 1)]),
            sample(2.0, &[("YouTube", 2)]),
            sample(3.0, &[("Voice Call", 7)]),
        ];

        let series = CountSeries::from_samples(&samples);
        assert_eq!(series.labels.len(), 3);
        assert_eq!(series.series.len(), 3);

        assert_eq!(series.series["YouTube"], vec![4, 2, 0]);
        assert_eq!(series.series["WhatsApp"], vec![1, 0, 0]);
        assert_eq!(series.series["Voice Call"], vec![0, 0, 7]);
    }

    #[test]
    fn every_column_matches_label_count() {
        let samples = vec![
            sample(1.0, &[("A", 1)]),
            sample(2.0, &[("B", 2)]),
            sample(3.0, &[("C", 3), ("A", 1)]),
            sample(4.0, &[]),
        ];

        let series = CountSeries::from_samples(&samples);
        for (ty, column) in &series.series {
            assert_eq!(column.len(), series.labels.len(), "misaligned column for {}", ty);
        }
    }

    #[test]
    fn points_and_max_count() {
        let samples = vec![
            sample(1.0, &[("A", 1)]),
            sample(2.0, &[("A", 9)]),
        ];

        let series = CountSeries::from_samples(&samples);
        assert_eq!(series.points("A"), vec![(0.0, 1.0), (1.0, 9.0)]);
        assert!(series.points("missing").is_empty());
        assert_eq!(series.max_count(), 9);
    }

    #[test]
    fn epoch_label_is_wall_clock_shaped() {
        let label = format_epoch_label(1_700_000_000.5);
        // HH:MM:SS in local time; only the shape is stable across zones
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }
}
