use serde::Serialize;
use std::fmt;

/// One of the five weighted criterion groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Functional,
    Scientific,
    Identity,
    Communication,
    Technical,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Functional,
        Dimension::Scientific,
        Dimension::Identity,
        Dimension::Communication,
        Dimension::Technical,
    ];

    /// Share of the final score in percent. The five shares sum to 100.
    pub fn percent(self) -> u32 {
        match self {
            Dimension::Functional => 25,
            Dimension::Scientific => 25,
            Dimension::Identity => 20,
            Dimension::Communication => 20,
            Dimension::Technical => 10,
        }
    }

    /// Weight of the dimension in the final score, `percent() / 100`.
    pub fn weight(self) -> f64 {
        f64::from(self.percent()) / 100.0
    }

    /// Criteria belonging to this dimension, in canonical order.
    pub fn criteria(self) -> &'static [Criterion] {
        let (start, len) = self.span();
        &Criterion::ALL[start..start + len]
    }

    /// Offset and length of this dimension's criteria in `Criterion::ALL`.
    pub(crate) fn span(self) -> (usize, usize) {
        match self {
            Dimension::Functional => (0, 4),
            Dimension::Scientific => (4, 3),
            Dimension::Identity => (7, 3),
            Dimension::Communication => (10, 3),
            Dimension::Technical => (13, 3),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Functional => "Functional",
            Dimension::Scientific => "Scientific",
            Dimension::Identity => "Identity",
            Dimension::Communication => "Communication",
            Dimension::Technical => "Technical",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single rubric criterion, scored 1..=5 by an evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    // Functional
    Pronunciation,
    InternationalPotential,
    Simplicity,
    NonAmbiguity,
    // Scientific
    Credibility,
    Relevance,
    ProfessionalImage,
    // Identity
    Representation,
    MissionFit,
    Durability,
    // Communication
    EvocativeForce,
    Explainability,
    Impact,
    // Technical
    DataLinkage,
    EntityEvocation,
    TechnicalRelevance,
}

impl Criterion {
    pub const COUNT: usize = 16;

    /// Canonical order. Ordered score input follows this sequence.
    pub const ALL: [Criterion; Criterion::COUNT] = [
        Criterion::Pronunciation,
        Criterion::InternationalPotential,
        Criterion::Simplicity,
        Criterion::NonAmbiguity,
        Criterion::Credibility,
        Criterion::Relevance,
        Criterion::ProfessionalImage,
        Criterion::Representation,
        Criterion::MissionFit,
        Criterion::Durability,
        Criterion::EvocativeForce,
        Criterion::Explainability,
        Criterion::Impact,
        Criterion::DataLinkage,
        Criterion::EntityEvocation,
        Criterion::TechnicalRelevance,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn dimension(self) -> Dimension {
        let idx = self.index();
        Dimension::ALL
            .into_iter()
            .find(|d| {
                let (start, len) = d.span();
                idx >= start && idx < start + len
            })
            .unwrap_or(Dimension::Technical)
    }

    /// Machine key used by named score input and JSON output.
    pub fn key(self) -> &'static str {
        match self {
            Criterion::Pronunciation => "pronunciation",
            Criterion::InternationalPotential => "international_potential",
            Criterion::Simplicity => "simplicity",
            Criterion::NonAmbiguity => "non_ambiguity",
            Criterion::Credibility => "credibility",
            Criterion::Relevance => "relevance",
            Criterion::ProfessionalImage => "professional_image",
            Criterion::Representation => "representation",
            Criterion::MissionFit => "mission_fit",
            Criterion::Durability => "durability",
            Criterion::EvocativeForce => "evocative_force",
            Criterion::Explainability => "explainability",
            Criterion::Impact => "impact",
            Criterion::DataLinkage => "data_linkage",
            Criterion::EntityEvocation => "entity_evocation",
            Criterion::TechnicalRelevance => "technical_relevance",
        }
    }

    /// Human label shown next to sliders.
    pub fn label(self) -> &'static str {
        match self {
            Criterion::Pronunciation => "Ease of pronunciation / recall",
            Criterion::InternationalPotential => "International potential",
            Criterion::Simplicity => "Simplicity of use",
            Criterion::NonAmbiguity => "Non-ambiguity",
            Criterion::Credibility => "Academic credibility",
            Criterion::Relevance => "Research relevance",
            Criterion::ProfessionalImage => "Professional image",
            Criterion::Representation => "Represents the organization",
            Criterion::MissionFit => "Fits the mission",
            Criterion::Durability => "Durability",
            Criterion::EvocativeForce => "Evocative force",
            Criterion::Explainability => "Easy to explain",
            Criterion::Impact => "Potential impact",
            Criterion::DataLinkage => "Link with the data",
            Criterion::EntityEvocation => "Evokes the entity",
            Criterion::TechnicalRelevance => "Technical relevance",
        }
    }

    pub fn from_key(key: &str) -> Option<Criterion> {
        let key = key.trim();
        Criterion::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percents_sum_to_hundred() {
        let total: u32 = Dimension::ALL.iter().map(|d| d.percent()).sum();
        assert_eq!(total, 100);
        assert_eq!(Dimension::Functional.weight(), 0.25);
        assert_eq!(Dimension::Technical.weight(), 0.1);
    }

    #[test]
    fn test_dimension_sizes() {
        let sizes: Vec<usize> = Dimension::ALL.iter().map(|d| d.criteria().len()).collect();
        assert_eq!(sizes, vec![4, 3, 3, 3, 3]);
    }

    #[test]
    fn test_every_criterion_maps_back_to_its_dimension() {
        for dim in Dimension::ALL {
            for criterion in dim.criteria() {
                assert_eq!(criterion.dimension(), dim);
            }
        }
    }

    #[test]
    fn test_index_matches_canonical_order() {
        for (i, criterion) in Criterion::ALL.iter().enumerate() {
            assert_eq!(criterion.index(), i);
        }
    }

    #[test]
    fn test_from_key() {
        assert_eq!(Criterion::from_key("mission_fit"), Some(Criterion::MissionFit));
        assert_eq!(Criterion::from_key(" impact "), Some(Criterion::Impact));
        assert_eq!(Criterion::from_key("charisma"), None);
    }
}
