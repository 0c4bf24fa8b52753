//! Wire and domain types shared by the storefront and analysis collaborators.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use validator::Validate;

/// An autocomplete entry offered under the search box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(default)]
    pub description: String,
}

/// A destination as listed by the storefront API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    /// Category string matched (case-insensitively, by substring) against the category filter.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    /// Fields the storefront does not interpret but keeps for display.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET {base}/search/autocomplete?q=`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

/// `GET {base}/destinations` and `GET {base}/search/destinations?q=`.
/// The listing endpoint omits `success`; it defaults to `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationsResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Destination>,
}

fn default_true() -> bool {
    true
}

/// A tour category button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
}

/// The category that reloads the full destination list instead of filtering.
pub const ALL_CATEGORY: &str = "all";

pub const CATEGORIES: &[Category] = &[
    Category { id: ALL_CATEGORY, name: "All Tours" },
    Category { id: "heritage", name: "Heritage & Culture" },
    Category { id: "nature", name: "Scenic & Nature" },
    Category { id: "desert", name: "Desert & Forts" },
    Category { id: "adventure", name: "Adventure & Wildlife" },
    Category { id: "beach", name: "Beach & Coastal" },
    Category { id: "spiritual", name: "Spiritual & Temples" },
    Category { id: "yoga", name: "Yoga & Ayurveda" },
];

// --- Analysis service ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// One parsed element of a free-text query (destination, duration, theme, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisComponent {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub ambiguous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub understanding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ComponentOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl AnalysisComponent {
    /// Options offered for an ambiguous component; empty for display-only ones.
    pub fn choices(&self) -> &[ComponentOption] {
        match (&self.options, self.ambiguous) {
            (Some(options), true) => options,
            _ => &[],
        }
    }

    /// Whether the user is asked to choose for this component.
    pub fn needs_choice(&self) -> bool {
        !self.choices().is_empty()
    }

    /// The initial selection: the suggested value when it names one of the
    /// options, the first option otherwise.
    pub fn default_choice(&self) -> Option<&str> {
        let choices = self.choices();
        self.suggested
            .as_deref()
            .filter(|s| choices.iter().any(|o| o.value == *s))
            .or_else(|| choices.first().map(|o| o.value.as_str()))
    }
}

/// Structured interpretation of a query. Unknown fields are kept so the
/// analysis can be sent back verbatim to the itinerary generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub components: Vec<AnalysisComponent>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Component key -> chosen option value (or free text).
pub type SelectionMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
    #[default]
    #[serde(other)]
    Unknown,
}

/// The "we'll get back to you" answer for queries the service cannot plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalResponse {
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_message: Option<String>,
    pub reference_id: String,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub priority: Priority,
}

/// Raw `POST {analysis_base}/api/search` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub zero_result: bool,
    #[serde(default)]
    pub professional_response: Option<ProfessionalResponse>,
    #[serde(default)]
    pub analysis: Option<Analysis>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The two shapes an analysis can take.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    ZeroResult(ProfessionalResponse),
    Structured(Analysis),
}

impl TryFrom<AnalysisEnvelope> for AnalysisOutcome {
    type Error = AppError;

    fn try_from(envelope: AnalysisEnvelope) -> Result<Self, Self::Error> {
        if !envelope.success {
            return Err(AppError::Api(
                envelope
                    .error
                    .unwrap_or_else(|| "analysis failed".to_string()),
            ));
        }
        if envelope.zero_result {
            return envelope
                .professional_response
                .map(AnalysisOutcome::ZeroResult)
                .ok_or_else(|| {
                    AppError::Api("zero-result answer without a professional response".to_string())
                });
        }
        envelope
            .analysis
            .map(AnalysisOutcome::Structured)
            .ok_or_else(|| AppError::Api("analysis payload missing".to_string()))
    }
}

/// Body of `POST {analysis_base}/api/generate-itinerary`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryRequest {
    pub analysis: Analysis,
    pub selections: SelectionMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub emoji: String,
    /// Sent as `description` by the itinerary generator.
    #[serde(default, alias = "description")]
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artisan {
    pub name: String,
    #[serde(default)]
    pub specialty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    #[serde(default)]
    pub day: u32,
    pub destination: String,
    #[serde(default)]
    pub hotel: String,
    #[serde(default)]
    pub activities: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artisan: Option<Artisan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default)]
    pub total: String,
    #[serde(default)]
    pub per_person: String,
    #[serde(default)]
    pub flights: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub days: Vec<ItineraryDay>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub pricing: Pricing,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItineraryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub itinerary: Option<Itinerary>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Contact details captured when the analysis service cannot plan a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct ContactDetails {
    #[validate(email)]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Body of `POST {analysis_base}/api/submit-contact`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactRequest {
    pub query: String,
    pub email: String,
    pub phone: String,
    pub reference_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContactResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn component(suggested: Option<&str>) -> AnalysisComponent {
        serde_json::from_value(json!({
            "key": "destination",
            "label": "Spiritual Destination",
            "original": "spirituality",
            "ambiguous": true,
            "suggested": suggested,
            "options": [
                {"value": "varanasi", "label": "Varanasi"},
                {"value": "rishikesh", "label": "Rishikesh"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_default_choice_prefers_valid_suggestion() {
        assert_eq!(component(Some("rishikesh")).default_choice(), Some("rishikesh"));
    }

    #[test]
    fn test_default_choice_falls_back_to_first_option() {
        assert_eq!(component(Some("goa")).default_choice(), Some("varanasi"));
        assert_eq!(component(None).default_choice(), Some("varanasi"));
    }

    #[test]
    fn test_ambiguous_without_options_needs_no_choice() {
        let c: AnalysisComponent = serde_json::from_value(json!({
            "key": "duration", "label": "Duration", "ambiguous": true, "options": []
        }))
        .unwrap();
        assert!(!c.needs_choice());
        assert_eq!(c.default_choice(), None);
    }

    #[test]
    fn test_envelope_variants() {
        let zero: AnalysisEnvelope = serde_json::from_value(json!({
            "success": true,
            "zero_result": true,
            "professional_response": {
                "title": "Custom Itinerary Request",
                "message": "Our specialists will prepare your trip",
                "reference_id": "T2I-42",
                "timeline": "within 4 days",
                "priority": "HIGH"
            }
        }))
        .unwrap();
        match AnalysisOutcome::try_from(zero).unwrap() {
            AnalysisOutcome::ZeroResult(r) => {
                assert_eq!(r.reference_id, "T2I-42");
                assert_eq!(r.priority, Priority::High);
            }
            other => panic!("expected zero result, got {:?}", other),
        }

        let failed: AnalysisEnvelope =
            serde_json::from_value(json!({"success": false, "error": "boom"})).unwrap();
        assert_eq!(
            AnalysisOutcome::try_from(failed).unwrap_err(),
            AppError::Api("boom".to_string())
        );
    }

    #[test]
    fn test_unknown_priority_is_tolerated() {
        let p: Priority = serde_json::from_value(json!("URGENT")).unwrap();
        assert_eq!(p, Priority::Unknown);
    }

    #[test]
    fn test_destination_keeps_unknown_fields() {
        let d: Destination = serde_json::from_value(json!({
            "name": "Jaipur", "type": "Heritage", "state": "Rajasthan"
        }))
        .unwrap();
        assert_eq!(d.kind, "Heritage");
        assert_eq!(d.extra.get("state"), Some(&json!("Rajasthan")));
    }

    #[test]
    fn test_itinerary_from_generator_payload() {
        let it: Itinerary = serde_json::from_value(json!({
            "title": "India in 7 days",
            "theme_title": "Cultural Heritage & Authentic Experiences",
            "introduction": "Embark on an extraordinary 7-day adventure.",
            "photos": [{"emoji": "🏰", "description": "Royal palaces"}]
        }))
        .unwrap();
        assert_eq!(it.photos[0].caption, "Royal palaces");
        assert_eq!(it.theme_title.as_deref(), Some("Cultural Heritage & Authentic Experiences"));
        assert_eq!(it.introduction.as_deref(), Some("Embark on an extraordinary 7-day adventure."));
    }
}
