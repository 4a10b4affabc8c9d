//! Aggregate views over the persona store for dashboards and analytics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::profile::{BuyingStage, ConsumerProfile};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelConversion {
    pub awareness_to_consideration_pct: Option<Decimal>,
    pub consideration_to_decision_pct: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeSummary {
    pub min: u8,
    pub max: u8,
    pub mean: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub profile_count: usize,
    pub interests: Vec<LabelCount>,
    pub pain_points: Vec<LabelCount>,
    pub locations: Vec<LabelCount>,
    /// Always Awareness, Consideration, Decision, including empty stages.
    pub buying_stages: Vec<LabelCount>,
    pub funnel: FunnelConversion,
    pub age: Option<AgeSummary>,
}

impl InsightsReport {
    pub fn from_profiles(profiles: &[ConsumerProfile]) -> Self {
        let interests = count_labels(
            profiles.iter().flat_map(|profile| profile.interests.iter().map(|i| i.label())),
        );
        let pain_points = count_labels(
            profiles.iter().flat_map(|profile| profile.pain_points.iter().map(|p| p.label())),
        );
        let locations = count_labels(profiles.iter().map(|profile| profile.location.label()));

        let stage_counts = BuyingStage::FUNNEL.map(|stage| {
            profiles.iter().filter(|profile| profile.buying_stage == stage).count()
        });
        let buying_stages = BuyingStage::FUNNEL
            .iter()
            .zip(stage_counts)
            .map(|(stage, count)| LabelCount { label: stage.label().to_string(), count })
            .collect();

        let funnel = FunnelConversion {
            awareness_to_consideration_pct: conversion_pct(stage_counts[0], stage_counts[1]),
            consideration_to_decision_pct: conversion_pct(stage_counts[1], stage_counts[2]),
        };

        Self {
            profile_count: profiles.len(),
            interests,
            pain_points,
            locations,
            buying_stages,
            funnel,
            age: age_summary(profiles),
        }
    }
}

/// Descending by count; ties keep first-seen order.
fn count_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|entry| entry.label == label) {
            Some(entry) => entry.count += 1,
            None => counts.push(LabelCount { label: label.to_string(), count: 1 }),
        }
    }
    counts.sort_by(|left, right| right.count.cmp(&left.count));
    counts
}

fn conversion_pct(from: usize, to: usize) -> Option<Decimal> {
    if from == 0 || to == 0 {
        return None;
    }
    let ratio = Decimal::from(to) / Decimal::from(from) * Decimal::ONE_HUNDRED;
    Some(ratio.round_dp(1))
}

fn age_summary(profiles: &[ConsumerProfile]) -> Option<AgeSummary> {
    let min = profiles.iter().map(|profile| profile.age).min()?;
    let max = profiles.iter().map(|profile| profile.age).max()?;
    let total: u32 = profiles.iter().map(|profile| u32::from(profile.age)).sum();
    let mean = (Decimal::from(total) / Decimal::from(profiles.len())).round_dp(1);
    Some(AgeSummary { min, max, mean })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::profile::{BuyingStage, ConsumerProfile, ProfileId};
    use crate::seed;

    use super::{InsightsReport, LabelCount};

    fn count(label: &str, count: usize) -> LabelCount {
        LabelCount { label: label.to_string(), count }
    }

    #[test]
    fn seed_report_summarizes_profiles() {
        let report = InsightsReport::from_profiles(&seed::profiles());

        assert_eq!(report.profile_count, 3);
        assert_eq!(report.interests.len(), 9);
        assert!(report.interests.iter().all(|entry| entry.count == 1));
        assert_eq!(report.interests[0], count("Fitness", 1));
        assert_eq!(report.locations, vec![count("Urban", 2), count("Suburban", 1)]);
        assert_eq!(
            report.buying_stages,
            vec![count("Awareness", 1), count("Consideration", 1), count("Decision", 1)]
        );
        assert_eq!(report.funnel.awareness_to_consideration_pct, Some(Decimal::new(1000, 1)));

        let age = report.age.expect("age summary");
        assert_eq!((age.min, age.max), (28, 42));
        assert_eq!(age.mean, Decimal::new(350, 1));
    }

    #[test]
    fn funnel_conversion_requires_both_stages() {
        let mut profiles = seed::profiles();
        profiles.push(ConsumerProfile::draft(ProfileId(4)));
        profiles.push(ConsumerProfile::draft(ProfileId(5)));
        profiles.retain(|profile| profile.buying_stage != BuyingStage::Decision);

        let report = InsightsReport::from_profiles(&profiles);

        assert_eq!(report.buying_stages[0], count("Awareness", 3));
        assert_eq!(report.funnel.awareness_to_consideration_pct, Some(Decimal::new(333, 1)));
        assert_eq!(report.funnel.consideration_to_decision_pct, None);
    }

    #[test]
    fn empty_store_yields_empty_report() {
        let report = InsightsReport::from_profiles(&[]);

        assert_eq!(report.profile_count, 0);
        assert!(report.interests.is_empty());
        assert!(report.buying_stages.iter().all(|entry| entry.count == 0));
        assert!(report.age.is_none());
        assert_eq!(report.funnel.awareness_to_consideration_pct, None);
    }
}
