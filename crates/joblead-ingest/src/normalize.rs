//! Mapping of externally supplied key names onto the canonical field
//! schema. First match wins: canonical-name exact match, then each synonym
//! in declared order, matched case-insensitively against the input keys.

use serde_json::{Map, Value};

/// Canonical field name → accepted synonym spellings.
pub const FIELD_SYNONYMS: &[(&str, &[&str])] = &[
    ("Company", &["company", "Company Name", "Organization"]),
    (
        "Role Title",
        &["role title", "Job Title", "Position", "Title", "role_title"],
    ),
    ("Location", &["location", "Office Location", "Work Location"]),
    (
        "Posted/Updated Date",
        &["posted/updated date", "Posted Date", "Date Posted", "posted_date"],
    ),
    ("Last Seen Date", &["last seen date", "Last Seen", "last_seen_date"]),
    (
        "Employment Type",
        &["employment type", "Job Type", "Type", "employment_type"],
    ),
    ("Why Now", &["why now", "Rationale", "why_now"]),
    (
        "Verification Level",
        &["verification level", "Verification", "verification_level"],
    ),
    ("Confidence", &["confidence", "Confidence Level"]),
    ("Revenue Tier", &["revenue tier", "Tier", "revenue_tier"]),
    ("Revenue Estimate", &["revenue estimate", "Revenue", "revenue_estimate"]),
    ("Revenue Confidence", &["revenue confidence", "revenue_confidence"]),
    ("Fit Score", &["fit score", "Score", "fit_score"]),
    ("Industry", &["industry", "Sector", "Vertical"]),
    (
        "Engagement Type",
        &["engagement type", "Engagement", "engagement_type"],
    ),
    (
        "Job Description",
        &["job description", "Description", "Job Details", "job_description"],
    ),
    ("Job Overview", &["job overview", "Overview", "job_overview"]),
    (
        "Likely Buyers/Managers",
        &["likely buyers/managers", "Contacts", "Buyers", "Managers", "contacts"],
    ),
    (
        "Recommended Angle",
        &["recommended angle", "Angle", "Approach", "recommended_angle"],
    ),
    (
        "Source Link",
        &["source link", "Source", "URL", "Link", "source_link"],
    ),
    ("Parent Company", &["parent company", "Parent", "parent_company"]),
    ("Status", &["status", "Job Status"]),
];

/// Produce a mapping keyed only by canonical names. Fields with no match
/// are absent from the output; the input is never mutated.
pub fn normalize_fields(input: &Map<String, Value>) -> Map<String, Value> {
    let mut normalized = Map::new();

    for (canonical, synonyms) in FIELD_SYNONYMS {
        if let Some(value) = input.get(*canonical) {
            normalized.insert((*canonical).to_string(), value.clone());
            continue;
        }

        'synonyms: for synonym in *synonyms {
            for (key, value) in input {
                if key.eq_ignore_ascii_case(synonym) {
                    normalized.insert((*canonical).to_string(), value.clone());
                    break 'synonyms;
                }
            }
        }
    }

    normalized
}

/// Resolve a contact-level field: exact variant spellings first, then a
/// case-insensitive pass, in variant order.
pub fn lookup_variant<'a>(map: &'a Map<String, Value>, variants: &[&str]) -> Option<&'a Value> {
    for variant in variants {
        if let Some(value) = map.get(*variant) {
            return Some(value);
        }
    }
    for variant in variants {
        for (key, value) in map {
            if key.eq_ignore_ascii_case(variant) {
                return Some(value);
            }
        }
    }
    None
}
