//! Best-effort records produced by the screening stages.
//!
//! Every field is optional: the model does not enforce a schema, so each
//! record accepts whatever subset of keys comes back. Unknown keys, and known
//! keys whose value could not be coerced, are kept verbatim in `extra`, so
//! re-serializing a record never drops model output. A key is either in its
//! typed field or in `extra`, never both.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::screening::lenient::LenientFields;

/// Structured job description, produced by the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct JobDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_qualifications: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_qualifications: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for JobDescription {
    fn from(map: Map<String, Value>) -> Self {
        let mut fields = LenientFields::new(map);
        Self {
            job_title: fields.text("job_title"),
            required_qualifications: fields.strings("required_qualifications"),
            preferred_qualifications: fields.strings("preferred_qualifications"),
            responsibilities: fields.strings("responsibilities"),
            extra: fields.into_extra(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct ContactInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for ContactInfo {
    fn from(map: Map<String, Value>) -> Self {
        let mut fields = LenientFields::new(map);
        Self {
            name: fields.text("name"),
            email: fields.text("email"),
            linkedin_url: fields.text("linkedin_url"),
            extra: fields.into_extra(),
        }
    }
}

/// Structured resume. Owned by the structurer stage, read by the screener,
/// never mutated after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct ResumeProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_experience_years: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_experience: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for ResumeProfile {
    fn from(map: Map<String, Value>) -> Self {
        let mut fields = LenientFields::new(map);
        Self {
            contact_info: fields.object("contact_info"),
            summary: fields.text("summary"),
            total_experience_years: fields.number("total_experience_years"),
            work_experience: fields.values("work_experience"),
            education: fields.values("education"),
            skills: fields.values("skills"),
            extra: fields.into_extra(),
        }
    }
}

impl ResumeProfile {
    /// The extracted candidate name, if the model produced a non-blank one.
    pub fn candidate_name(&self) -> Option<&str> {
        self.contact_info
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// Hiring recommendation label. The three known labels round-trip exactly;
/// anything else the model invents is preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Recommendation {
    StronglyRecommend,
    Consider,
    NotAFit,
    Other(String),
}

impl Recommendation {
    pub const LABELS: [&'static str; 3] = ["Strongly Recommend", "Consider", "Not a Fit"];

    pub fn as_str(&self) -> &str {
        match self {
            Recommendation::StronglyRecommend => "Strongly Recommend",
            Recommendation::Consider => "Consider",
            Recommendation::NotAFit => "Not a Fit",
            Recommendation::Other(label) => label,
        }
    }

    /// Known labels as a quoted, comma-separated list for prompts.
    pub fn prompt_choices() -> String {
        Self::LABELS
            .iter()
            .map(|label| format!("\"{label}\""))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<String> for Recommendation {
    fn from(label: String) -> Self {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "strongly recommend" => Recommendation::StronglyRecommend,
            "consider" => Recommendation::Consider,
            "not a fit" => Recommendation::NotAFit,
            _ => Recommendation::Other(label),
        }
    }
}

impl From<Recommendation> for String {
    fn from(recommendation: Recommendation) -> Self {
        match recommendation {
            Recommendation::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// Only non-blank strings are read as labels.
fn recommendation(value: &Value) -> Option<Recommendation> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(Recommendation::from(s.clone())),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct SkillsAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_skills_found: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_skills: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for SkillsAnalysis {
    fn from(map: Map<String, Value>) -> Self {
        let mut fields = LenientFields::new(map);
        Self {
            required_skills_found: fields.strings("required_skills_found"),
            missing_skills: fields.strings("missing_skills"),
            extra: fields.into_extra(),
        }
    }
}

/// Screening verdict for one (resume, job description) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct ScreeningResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    /// 0–100 as judged by the model; not clamped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strengths: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weaknesses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills_analysis: Option<SkillsAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_recommendation: Option<Recommendation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for ScreeningResult {
    fn from(map: Map<String, Value>) -> Self {
        let mut fields = LenientFields::new(map);
        Self {
            candidate_name: fields.text("candidate_name"),
            match_score: fields.number("match_score"),
            summary: fields.text("summary"),
            strengths: fields.strings("strengths"),
            weaknesses: fields.strings("weaknesses"),
            skills_analysis: fields.object("skills_analysis"),
            final_recommendation: fields.take("final_recommendation", recommendation),
            extra: fields.into_extra(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RankingEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_recommendation: Option<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification_for_rank: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for RankingEntry {
    fn from(map: Map<String, Value>) -> Self {
        let mut fields = LenientFields::new(map);
        Self {
            rank: fields.rank("rank"),
            candidate_name: fields.text("candidate_name"),
            match_score: fields.number("match_score"),
            final_recommendation: fields.take("final_recommendation", recommendation),
            justification_for_rank: fields.text("justification_for_rank"),
            extra: fields.into_extra(),
        }
    }
}

/// Ranking across every successfully screened candidate. Order is the
/// model's; this layer does not re-sort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct CumulativeReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_summary: Option<String>,
    /// `None` when absent, or when any item is not an object (the raw array
    /// is then kept in `extra`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_ranking: Option<Vec<RankingEntry>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for CumulativeReport {
    fn from(map: Map<String, Value>) -> Self {
        let mut fields = LenientFields::new(map);
        Self {
            overall_summary: fields.text("overall_summary"),
            candidate_ranking: fields.objects("candidate_ranking"),
            extra: fields.into_extra(),
        }
    }
}

impl CumulativeReport {
    /// Parsed ranking entries in model order; empty when none parsed.
    pub fn ranking(&self) -> &[RankingEntry] {
        self.candidate_ranking.as_deref().unwrap_or(&[])
    }

    /// Ranking sorted by descending match score for display. Entries without
    /// a score go last; ties keep model order.
    pub fn ranked_by_score(&self) -> Vec<RankingEntry> {
        let mut ranking = self.ranking().to_vec();
        ranking.sort_by(|a, b| match (a.match_score, b.match_score) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        ranking
    }
}
