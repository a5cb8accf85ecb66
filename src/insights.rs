//! Rule-based descriptive text and conservation recommendations for a reserve.

use serde::{Deserialize, Serialize};

use crate::{catalogue::Reserve, spatial::SpatialSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReserveInsights {
    pub description: String,
    pub status: String,
    pub insights: Vec<String>,
}

impl ReserveInsights {
    pub fn for_reserve(reserve: &Reserve) -> Self {
        let description = format!(
            "{} Tiger Reserve is located in {} with a total area of {} sq km.",
            reserve.name, reserve.region, reserve.total_area
        );
        let status = format!(
            "Tiger density: {} per 100 sq km. Core area: {} sq km. Buffer zone: {} sq km.",
            reserve.tiger_density, reserve.core_area, reserve.buffer_area
        );

        let mut insights = Vec::new();
        // An unreported density says nothing either way.
        if let Some(density) = reserve.tiger_density.value() {
            if density > 30.0 {
                insights.push(
                    "High tiger density suggests excellent prey base and habitat management."
                        .to_string(),
                );
            } else if density < 10.0 {
                insights.push(
                    "Lower tiger density indicates potential for habitat improvement and anti-poaching measures."
                        .to_string(),
                );
            }
        }

        let ratio = reserve.core_to_buffer_ratio();
        if ratio > 1.5 {
            insights.push(
                "Large core area relative to buffer zone may provide better protection for tigers."
                    .to_string(),
            );
        } else if ratio < 0.5 {
            insights.push(
                "Small core area relative to buffer zone may increase human-wildlife conflict."
                    .to_string(),
            );
        }

        if reserve.total_area > 2_000.0 {
            insights.push(
                "Large reserve area supports greater biodiversity and ecosystem resilience."
                    .to_string(),
            );
        }

        insights.push(reserve.notes.clone());

        Self {
            description,
            status,
            insights,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub text: String,
}

impl Recommendation {
    fn new(priority: Priority, text: &str) -> Self {
        Self {
            priority,
            text: text.to_string(),
        }
    }
}

/// Recommendations ordered high to low; ties keep rule order.
pub fn recommendations(reserve: &Reserve, spatial: &SpatialSummary) -> Vec<Recommendation> {
    let density = reserve.tiger_density.or_fallback();
    let ratio = reserve.core_to_buffer_ratio();
    let mut out = Vec::new();

    // Habitat
    if spatial.ndvi.low < 0.4 {
        out.push(Recommendation::new(
            Priority::High,
            "Implement habitat restoration programs to improve vegetation cover",
        ));
    }
    if reserve.core_area < 500.0 {
        out.push(Recommendation::new(
            Priority::High,
            "Expand core area to provide better protection for tiger populations",
        ));
    }

    // Prey base
    if spatial.prey.low < 15.0 {
        out.push(Recommendation::new(
            Priority::High,
            "Enhance prey base through habitat improvement and water management",
        ));
    }
    if spatial.prey.medium < 25.0 {
        out.push(Recommendation::new(
            Priority::Medium,
            "Monitor and manage prey population dynamics",
        ));
    }

    // Tigers
    if density < 10.0 {
        out.push(Recommendation::new(
            Priority::High,
            "Strengthen anti-poaching measures and habitat protection",
        ));
    }
    if density > 40.0 {
        out.push(Recommendation::new(
            Priority::Medium,
            "Consider translocation to maintain optimal tiger density",
        ));
    }

    // Buffer zone
    if ratio < 0.5 {
        out.push(Recommendation::new(
            Priority::High,
            "Improve buffer zone management to reduce human-wildlife conflict",
        ));
    }
    if reserve.buffer_area < 300.0 {
        out.push(Recommendation::new(
            Priority::Medium,
            "Expand buffer zone to provide better habitat connectivity",
        ));
    }

    // Matched case-sensitively against the catalogue notes.
    if reserve.notes.contains("contiguous") || reserve.notes.contains("connects") {
        out.push(Recommendation::new(
            Priority::Medium,
            "Maintain and enhance corridor connectivity with neighboring reserves",
        ));
    }

    if reserve.total_area > 2_000.0 {
        out.push(Recommendation::new(
            Priority::Low,
            "Implement zone-based management for better resource allocation",
        ));
    }
    if reserve.total_area < 1_000.0 {
        out.push(Recommendation::new(
            Priority::Medium,
            "Focus on habitat quality improvement within limited area",
        ));
    }

    out.sort_by_key(|recommendation| recommendation.priority);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalogue::GeoBounds, profile::DensityIndicator};

    fn reserve() -> Reserve {
        Reserve {
            id: 9,
            name: "Nagarhole".into(),
            region: "Karnataka".into(),
            core_area: 643.35,
            buffer_area: 562.41,
            total_area: 1205.76,
            tiger_density: DensityIndicator::Known(12.0),
            notes: "High tiger density; contiguous with Bandipur.".into(),
            bounds: GeoBounds {
                lat_min: 11.75,
                lon_min: 76.08,
                lat_max: 12.25,
                lon_max: 76.42,
            },
        }
    }

    #[test]
    fn description_and_status_use_catalogue_values() {
        let insights = ReserveInsights::for_reserve(&reserve());
        assert_eq!(
            insights.description,
            "Nagarhole Tiger Reserve is located in Karnataka with a total area of 1205.76 sq km."
        );
        assert_eq!(
            insights.status,
            "Tiger density: 12 per 100 sq km. Core area: 643.35 sq km. Buffer zone: 562.41 sq km."
        );
        assert_eq!(
            insights.insights,
            vec!["High tiger density; contiguous with Bandipur.".to_string()]
        );
    }

    #[test]
    fn undetermined_density_skips_density_insights() {
        let mut reserve = reserve();
        reserve.tiger_density = DensityIndicator::Undetermined;
        reserve.core_area = 100.0;
        reserve.buffer_area = 900.0;
        let insights = ReserveInsights::for_reserve(&reserve);
        assert!(insights.status.starts_with("Tiger density: Undetermined per 100 sq km."));
        assert_eq!(insights.insights.len(), 2);
        assert!(insights.insights[0].starts_with("Small core area"));
    }

    #[test]
    fn recommendations_are_sorted_by_priority() {
        let mut reserve = reserve();
        reserve.total_area = 2_500.0;
        reserve.tiger_density = DensityIndicator::Known(5.0);
        let spatial = SpatialSummary::for_reserve(&reserve);
        let recs = recommendations(&reserve, &spatial);
        let priorities: Vec<Priority> = recs.iter().map(|r| r.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert_eq!(recs.first().map(|r| r.priority), Some(Priority::High));
        assert_eq!(
            recs.last().map(|r| r.text.as_str()),
            Some("Implement zone-based management for better resource allocation")
        );
        assert!(recs
            .iter()
            .any(|r| r.text.starts_with("Strengthen anti-poaching")));
    }

    #[test]
    fn connectivity_match_is_case_sensitive() {
        let mut reserve = reserve();
        reserve.notes = "Connects Eastern and Western Ghats.".into();
        let spatial = SpatialSummary::for_reserve(&reserve);
        assert!(!recommendations(&reserve, &spatial)
            .iter()
            .any(|r| r.text.contains("corridor")));
    }
}
