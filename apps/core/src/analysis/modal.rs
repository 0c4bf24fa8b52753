//! The analysis modal opened for complex queries.
//!
//! One component handles both answers the analysis service can give. The
//! view is a tagged variant chosen by the response payload:
//!
//! - zero result: a professional response with a contact-capture form, then
//!   a confirmation carrying the reference id;
//! - structured analysis: a disambiguation table whose selections drive
//!   itinerary generation. Every selection change regenerates with the whole
//!   selection map.
//!
//! The modal performs no I/O. Methods return the request the owner must send
//! and are handed the response back, stamped with a sequence number so that
//! only the latest itinerary generation lands.

use crate::error::AppError;
use crate::models::{
    Analysis, AnalysisOutcome, ContactDetails, ContactRequest, ContactResponse, Itinerary,
    ItineraryRequest, ItineraryResponse, ProfessionalResponse, SelectionMap,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ModalView {
    /// Waiting for the analysis service.
    Loading,
    /// Zero-result answer; the contact form is open.
    ContactCapture { response: ProfessionalResponse },
    /// Contact details were accepted.
    Confirmed {
        response: ProfessionalResponse,
        confirmed_at: DateTime<Utc>,
    },
    /// Structured analysis with the current selections and latest itinerary.
    Disambiguation {
        analysis: Analysis,
        selections: SelectionMap,
        itinerary: Option<Itinerary>,
        generating: bool,
    },
    /// The analysis failed; only the close affordance is left.
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisModal {
    query: String,
    #[serde(skip)]
    itinerary_seq: u64,
    view: ModalView,
}

impl AnalysisModal {
    pub fn open(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            itinerary_seq: 0,
            view: ModalView::Loading,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn view(&self) -> &ModalView {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, ModalView::Loading)
    }

    /// Applies the analysis answer. For a structured analysis, selections
    /// start at each ambiguous component's default and the first itinerary
    /// request is returned.
    pub fn apply_analysis(
        &mut self,
        result: Result<AnalysisOutcome, AppError>,
    ) -> Option<(u64, ItineraryRequest)> {
        if !self.is_loading() {
            debug!("analysis answer ignored, modal already resolved");
            return None;
        }

        match result {
            Ok(AnalysisOutcome::ZeroResult(response)) => {
                info!(reference_id = %response.reference_id, "Zero-result analysis, opening contact form");
                self.view = ModalView::ContactCapture { response };
                None
            }
            Ok(AnalysisOutcome::Structured(analysis)) => {
                let selections = default_selections(&analysis);
                info!(
                    components = analysis.components.len(),
                    choices = selections.len(),
                    "Structured analysis received"
                );
                self.view = ModalView::Disambiguation {
                    analysis,
                    selections,
                    itinerary: None,
                    generating: false,
                };
                self.next_itinerary_request()
            }
            Err(e) => {
                error!("Analysis error: {}", e);
                self.view = ModalView::Unavailable {
                    reason: e.to_string(),
                };
                None
            }
        }
    }

    /// Records a selection (an option value or free text for "other") and
    /// returns the regeneration request carrying the full selection map.
    pub fn choose(&mut self, key: &str, value: &str) -> Result<(u64, ItineraryRequest), AppError> {
        let ModalView::Disambiguation {
            analysis,
            selections,
            ..
        } = &mut self.view
        else {
            return Err(AppError::State("no analysis is open for selection".to_string()));
        };

        let component = analysis
            .components
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| AppError::Validation(format!("unknown component '{}'", key)))?;
        if !component.needs_choice() {
            return Err(AppError::Validation(format!(
                "component '{}' has no options to choose from",
                key
            )));
        }
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::Validation(format!(
                "a value for '{}' is required",
                component.label
            )));
        }

        selections.insert(key.to_string(), value.to_string());
        self.next_itinerary_request()
            .ok_or_else(|| AppError::State("no analysis is open for selection".to_string()))
    }

    /// Applies an itinerary answer. Returns `false` when it was superseded by
    /// a later selection. A failed generation keeps the previous itinerary.
    pub fn apply_itinerary(&mut self, seq: u64, result: Result<ItineraryResponse, AppError>) -> bool {
        if seq != self.itinerary_seq {
            debug!(seq, latest = self.itinerary_seq, "stale itinerary dropped");
            return false;
        }
        let ModalView::Disambiguation {
            itinerary,
            generating,
            ..
        } = &mut self.view
        else {
            return false;
        };

        *generating = false;
        match result {
            Ok(ItineraryResponse {
                success: true,
                itinerary: Some(generated),
                ..
            }) => {
                info!(title = %generated.title, days = generated.days.len(), "Itinerary generated");
                *itinerary = Some(generated);
            }
            Ok(response) => warn!(
                "Itinerary generation failed: {}",
                response.error.as_deref().unwrap_or("no itinerary returned")
            ),
            Err(e) => error!("Itinerary generation error: {}", e),
        }
        true
    }

    /// Validates the contact form and builds the submission. No request is
    /// produced unless the email is present and well formed.
    pub fn contact_request(&self, email: &str, phone: Option<&str>) -> Result<ContactRequest, AppError> {
        let ModalView::ContactCapture { response } = &self.view else {
            return Err(AppError::State("the contact form is not open".to_string()));
        };

        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::Validation("Email is required".to_string()));
        }
        let phone = phone.map(str::trim).filter(|p| !p.is_empty());
        let details = ContactDetails {
            email: email.to_string(),
            phone: phone.map(str::to_string),
        };
        details
            .validate()
            .map_err(|_| AppError::Validation("Please enter a valid email address".to_string()))?;

        Ok(ContactRequest {
            query: self.query.clone(),
            email: details.email,
            phone: details.phone.unwrap_or_default(),
            reference_id: response.reference_id.clone(),
        })
    }

    /// Applies the contact submission answer. On success the modal shows the
    /// confirmation and the reference id is returned; on failure the form
    /// stays open and the server's error text is returned.
    pub fn apply_contact(&mut self, result: Result<ContactResponse, AppError>) -> Result<String, AppError> {
        let ModalView::ContactCapture { response } = &self.view else {
            return Err(AppError::State("the contact form is not open".to_string()));
        };

        match result {
            Ok(ContactResponse { success: true, .. }) => {
                let response = response.clone();
                let reference_id = response.reference_id.clone();
                info!(reference_id = %reference_id, "Contact details submitted");
                self.view = ModalView::Confirmed {
                    response,
                    confirmed_at: Utc::now(),
                };
                Ok(reference_id)
            }
            Ok(ContactResponse { error, .. }) => Err(AppError::Api(format!(
                "Error submitting contact details: {}",
                error.unwrap_or_else(|| "unknown error".to_string())
            ))),
            Err(e) => {
                error!("Error submitting contact: {}", e);
                Err(AppError::Api(format!("Error submitting contact details: {}", e)))
            }
        }
    }

    /// Reference id of the professional response, once one was received.
    pub fn reference_id(&self) -> Option<&str> {
        match &self.view {
            ModalView::ContactCapture { response } | ModalView::Confirmed { response, .. } => {
                Some(&response.reference_id)
            }
            _ => None,
        }
    }

    fn next_itinerary_request(&mut self) -> Option<(u64, ItineraryRequest)> {
        let ModalView::Disambiguation {
            analysis,
            selections,
            generating,
            ..
        } = &mut self.view
        else {
            return None;
        };
        self.itinerary_seq += 1;
        *generating = true;
        Some((
            self.itinerary_seq,
            ItineraryRequest {
                analysis: analysis.clone(),
                selections: selections.clone(),
            },
        ))
    }
}

fn default_selections(analysis: &Analysis) -> SelectionMap {
    analysis
        .components
        .iter()
        .filter_map(|c| {
            if c.ambiguous && !c.needs_choice() {
                warn!(key = %c.key, "ambiguous component without options, shown as understood");
            }
            c.default_choice().map(|v| (c.key.clone(), v.to_string()))
        })
        .collect()
}
