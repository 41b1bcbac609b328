//! The fixed catalog of ESG offering categories an external analysis
//! service may tag onto a job, plus the per-job flag set.

use serde::{Deserialize, Serialize};

/// One offering category. Keys double as storage column names, so the set
/// is closed: anything referencing a key outside [`OFFERINGS`] is rejected
/// at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offering {
    pub key: &'static str,
    pub label: &'static str,
    pub full_label: &'static str,
}

pub const OFFERINGS: [Offering; 8] = [
    Offering {
        key: "sustainability_reporting",
        label: "Sustainability Reporting",
        full_label: "Sustainability Reporting & Disclosure",
    },
    Offering {
        key: "data_management_esg",
        label: "Data Management",
        full_label: "Data Management & ESG Metrics",
    },
    Offering {
        key: "esg_strategy_roadmapping",
        label: "ESG Strategy",
        full_label: "ESG Strategy & Roadmapping",
    },
    Offering {
        key: "regulatory_compliance",
        label: "Compliance",
        full_label: "Regulatory Compliance & Standards",
    },
    Offering {
        key: "esg_ratings_rankings",
        label: "ESG Ratings",
        full_label: "ESG Ratings & Rankings",
    },
    Offering {
        key: "stakeholder_engagement",
        label: "Stakeholder Engagement",
        full_label: "Stakeholder Engagement & Communication",
    },
    Offering {
        key: "governance_policy",
        label: "Governance",
        full_label: "Governance & Policy Development",
    },
    Offering {
        key: "technology_tools",
        label: "Technology",
        full_label: "Technology & Tools for Sustainability",
    },
];

pub fn get(key: &str) -> Option<&'static Offering> {
    OFFERINGS.iter().find(|o| o.key == key)
}

pub fn is_valid(key: &str) -> bool {
    get(key).is_some()
}

pub fn valid_keys() -> impl Iterator<Item = &'static str> {
    OFFERINGS.iter().map(|o| o.key)
}

/// Per-job classification flags, one per catalog entry. All unset until the
/// analysis callback fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OfferingFlags {
    pub sustainability_reporting: bool,
    pub data_management_esg: bool,
    pub esg_strategy_roadmapping: bool,
    pub regulatory_compliance: bool,
    pub esg_ratings_rankings: bool,
    pub stakeholder_engagement: bool,
    pub governance_policy: bool,
    pub technology_tools: bool,
}

impl OfferingFlags {
    pub fn get(&self, key: &str) -> Option<bool> {
        match key {
            "sustainability_reporting" => Some(self.sustainability_reporting),
            "data_management_esg" => Some(self.data_management_esg),
            "esg_strategy_roadmapping" => Some(self.esg_strategy_roadmapping),
            "regulatory_compliance" => Some(self.regulatory_compliance),
            "esg_ratings_rankings" => Some(self.esg_ratings_rankings),
            "stakeholder_engagement" => Some(self.stakeholder_engagement),
            "governance_policy" => Some(self.governance_policy),
            "technology_tools" => Some(self.technology_tools),
            _ => None,
        }
    }

    /// Returns false when the key is not in the catalog.
    pub fn set(&mut self, key: &str, value: bool) -> bool {
        let slot = match key {
            "sustainability_reporting" => &mut self.sustainability_reporting,
            "data_management_esg" => &mut self.data_management_esg,
            "esg_strategy_roadmapping" => &mut self.esg_strategy_roadmapping,
            "regulatory_compliance" => &mut self.regulatory_compliance,
            "esg_ratings_rankings" => &mut self.esg_ratings_rankings,
            "stakeholder_engagement" => &mut self.stakeholder_engagement,
            "governance_policy" => &mut self.governance_policy,
            "technology_tools" => &mut self.technology_tools,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// (key, flag) pairs in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        OFFERINGS
            .iter()
            .map(move |o| (o.key, self.get(o.key).unwrap_or(false)))
    }

    pub fn any_detected(&self) -> bool {
        self.entries().any(|(_, set)| set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_eight_closed_keys() {
        assert_eq!(OFFERINGS.len(), 8);
        assert!(is_valid("governance_policy"));
        assert!(!is_valid("bogus_key"));
        assert!(!is_valid("Governance_Policy"));
    }

    #[test]
    fn flags_round_trip_by_key() {
        let mut flags = OfferingFlags::default();
        assert!(!flags.any_detected());
        assert!(flags.set("governance_policy", true));
        assert_eq!(flags.get("governance_policy"), Some(true));
        assert!(flags.any_detected());
        assert!(!flags.set("bogus_key", true));
        assert_eq!(flags.entries().filter(|(_, v)| *v).count(), 1);
    }
}
