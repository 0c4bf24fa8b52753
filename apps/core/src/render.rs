//! Plain-text rendering of the storefront view, used by the terminal driver.

use crate::analysis::{AnalysisModal, ModalView};
use crate::models::{
    Analysis, AnalysisComponent, Itinerary, Priority, ProfessionalResponse, SelectionMap, CATEGORIES,
};
use crate::search::{DispatchState, StorefrontView};
use std::fmt::{self, Display, Formatter};

const FLIGHT_PLACEHOLDER: &str = "_______";

/// Renders the whole view.
pub fn render(view: &StorefrontView) -> String {
    ViewText(view).to_string()
}

struct ViewText<'a>(&'a StorefrontView);

impl Display for ViewText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let view = self.0;
        writeln!(f, "Search: [{}]{}", view.query, if view.loading { "  (searching...)" } else { "" })?;

        for (i, s) in view.visible_suggestions().iter().enumerate() {
            writeln!(f, "  {}. {} - {}", i + 1, s.text, s.description)?;
        }

        if view.show_prompt {
            writeln!(f, "Still there? Search now, or add more detail to your query.")?;
        }

        let categories: Vec<String> = CATEGORIES
            .iter()
            .map(|c| {
                if c.id == view.selected_category {
                    format!("[{}]", c.name)
                } else {
                    c.name.to_string()
                }
            })
            .collect();
        writeln!(f, "Categories: {}", categories.join(" | "))?;

        if view.state == DispatchState::ShowingSimpleResults {
            if view.destinations.is_empty() {
                writeln!(f, "No destinations found.")?;
            }
            for d in &view.destinations {
                writeln!(f, "  * {} ({}) {}", d.name, d.kind, d.description)?;
            }
        }

        if let Some(modal) = &view.analysis {
            write!(f, "{}", ModalText(modal))?;
        }
        Ok(())
    }
}

struct ModalText<'a>(&'a AnalysisModal);

impl Display for ModalText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let modal = self.0;
        writeln!(f, "==== Analysis: \"{}\" ====", modal.query())?;
        match modal.view() {
            ModalView::Loading => {
                writeln!(f, "Analyzing your request... building your itinerary.")?;
            }
            ModalView::ContactCapture { response } => {
                professional(f, response)?;
                writeln!(f, "Your query: \"{}\"", modal.query())?;
                writeln!(f, "Email (required) and phone (optional) so our team can reach you.")?;
            }
            ModalView::Confirmed { response, .. } => {
                writeln!(
                    f,
                    "Thank you! Our team has received your contact details and will reach out with your personalized itinerary."
                )?;
                writeln!(f, "Reference: {}", response.reference_id)?;
            }
            ModalView::Disambiguation {
                analysis,
                selections,
                itinerary,
                generating,
            } => {
                components(f, analysis, selections)?;
                if *generating {
                    writeln!(f, "Generating your detailed itinerary based on selected options...")?;
                }
                if let Some(itinerary) = itinerary {
                    write!(f, "{}", ItineraryText(itinerary))?;
                }
            }
            ModalView::Unavailable { .. } => {
                writeln!(f, "We could not analyze this request right now.")?;
            }
        }
        writeln!(f, "[close]")
    }
}

fn professional(f: &mut Formatter<'_>, response: &ProfessionalResponse) -> fmt::Result {
    writeln!(f, "{}", response.title)?;
    writeln!(f, "{}", response.message)?;
    if let Some(sub) = &response.sub_message {
        writeln!(f, "{}", sub)?;
    }
    let priority = match response.priority {
        Priority::High => "HIGH",
        Priority::Medium => "MEDIUM",
        Priority::Low => "LOW",
        Priority::Unknown => "-",
    };
    writeln!(
        f,
        "Reference ID: {} | Response time: {} | Priority: {}",
        response.reference_id, response.timeline, priority
    )
}

fn components(f: &mut Formatter<'_>, analysis: &Analysis, selections: &SelectionMap) -> fmt::Result {
    writeln!(f, "Here's what I've understood:")?;
    for c in &analysis.components {
        component(f, c, selections.get(&c.key).map(String::as_str))?;
    }
    Ok(())
}

fn component(f: &mut Formatter<'_>, c: &AnalysisComponent, selected: Option<&str>) -> fmt::Result {
    writeln!(f, "- {} (\"{}\")", c.label, c.original)?;
    if !c.needs_choice() {
        return writeln!(f, "    {}", c.understanding.as_deref().unwrap_or(""));
    }
    if let Some(label) = &c.suggested_label {
        writeln!(f, "    Suggested: {}", label)?;
    }
    let mut matched = false;
    for option in c.choices() {
        let mark = if selected == Some(option.value.as_str()) {
            matched = true;
            "(x)"
        } else {
            "( )"
        };
        writeln!(f, "    {} {} [{}] {}", mark, option.label, option.value, option.description)?;
    }
    match selected {
        Some(custom) if !matched => writeln!(f, "    (x) Other: {}", custom),
        _ => writeln!(
            f,
            "    ( ) Other: e.g. {}",
            c.example.as_deref().unwrap_or("Custom option")
        ),
    }
}

struct ItineraryText<'a>(&'a Itinerary);

impl Display for ItineraryText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let it = self.0;
        writeln!(f, "---- {} ----", it.title)?;
        if !it.description.is_empty() {
            writeln!(f, "{}", it.description)?;
        }
        if let Some(theme) = &it.theme_title {
            writeln!(f, "* {}", theme)?;
        }
        if let Some(intro) = &it.introduction {
            writeln!(f, "{}", intro)?;
        }
        writeln!(
            f,
            "Flights: landing {} arriving {} / departing {} at {}",
            FLIGHT_PLACEHOLDER, FLIGHT_PLACEHOLDER, FLIGHT_PLACEHOLDER, FLIGHT_PLACEHOLDER
        )?;
        if !it.photos.is_empty() {
            let photos: Vec<String> = it
                .photos
                .iter()
                .map(|p| format!("{} {}", p.emoji, p.caption).trim().to_string())
                .collect();
            writeln!(f, "Photos: {}", photos.join("  "))?;
        }
        for day in &it.days {
            writeln!(
                f,
                "Day {:>2} | {} | {} | {}",
                day.day, day.destination, day.hotel, day.activities
            )?;
            if let Some(artisan) = &day.artisan {
                writeln!(f, "       | Artisan Experience: {} - {}", artisan.name, artisan.specialty)?;
            }
        }
        if !it.inclusions.is_empty() {
            writeln!(f, "Inclusions:")?;
            for item in &it.inclusions {
                writeln!(f, "  + {}", item)?;
            }
        }
        if !it.exclusions.is_empty() {
            writeln!(f, "Exclusions:")?;
            for item in &it.exclusions {
                writeln!(f, "  - {}", item)?;
            }
        }
        writeln!(
            f,
            "Total: {} | Per person: {} | Additional flights: {}",
            it.pricing.total, it.pricing.per_person, it.pricing.flights
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisOutcome, ItineraryResponse, Suggestion};
    use serde_json::json;

    #[test]
    fn test_dropdown_and_categories() {
        let view = StorefrontView {
            query: "Agra".to_string(),
            suggestions: vec![Suggestion {
                text: "Agra Fort".to_string(),
                description: "Mughal fort".to_string(),
            }],
            show_suggestions: true,
            state: DispatchState::Suggesting,
            ..StorefrontView::default()
        };
        let text = render(&view);
        assert!(text.contains("Search: [Agra]"));
        assert!(text.contains("1. Agra Fort - Mughal fort"));
        assert!(text.contains("[All Tours]"));
    }

    #[test]
    fn test_itinerary_sections() {
        let analysis: Analysis = serde_json::from_value(json!({
            "components": [{
                "key": "destination", "label": "Desert Palace Destination", "original": "desert palace",
                "ambiguous": true, "suggested": "jaisalmer", "suggested_label": "Jaisalmer (Golden City)",
                "options": [
                    {"value": "jaisalmer", "label": "Jaisalmer"},
                    {"value": "jodhpur", "label": "Jodhpur"}
                ]
            }]
        }))
        .unwrap();
        let mut modal = AnalysisModal::open("desert palace 5 days");
        let (seq, _) = modal
            .apply_analysis(Ok(AnalysisOutcome::Structured(analysis)))
            .unwrap();
        let response: ItineraryResponse = serde_json::from_value(json!({
            "success": true,
            "itinerary": {
                "title": "Desert Palaces of Rajasthan",
                "theme_title": "Royal Rajasthan",
                "introduction": "Forts, dunes and artisan villages.",
                "photos": [{"emoji": "🏰", "description": "Jaisalmer Fort"}],
                "days": [{"day": 1, "destination": "Jaisalmer", "hotel": "Suryagarh",
                          "activities": "Fort walk",
                          "artisan": {"name": "Ramesh", "specialty": "Miniature painting"}}],
                "inclusions": ["Breakfast"],
                "exclusions": ["Flights"],
                "pricing": {"total": "₹45,000", "per_person": "₹22,500", "flights": "Extra"}
            }
        }))
        .unwrap();
        assert!(modal.apply_itinerary(seq, Ok(response)));

        let view = StorefrontView {
            state: DispatchState::ShowingAnalysis,
            analysis: Some(modal),
            ..StorefrontView::default()
        };
        let text = render(&view);
        assert!(text.contains("(x) Jaisalmer [jaisalmer]"));
        assert!(text.contains("* Royal Rajasthan"));
        assert!(text.contains("Forts, dunes and artisan villages."));
        assert!(text.contains("Photos: 🏰 Jaisalmer Fort"));
        assert!(text.contains("Flights: landing _______"));
        assert!(text.contains("Artisan Experience: Ramesh - Miniature painting"));
        assert!(text.contains("Per person: ₹22,500"));
    }
}
