//! Placeholder building rating.
//!
//! This is not an efficiency model: the score is a stable hash of an identifying
//! string squeezed into [65, 84], so the same address always shows the same number.

use serde::Serialize;

pub const MIN_RATING: u8 = 65;
const RATING_SPAN: u64 = 20;
/// Used when neither an address nor a customer id is available.
pub const DEFAULT_SEED_TEXT: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub fn value(self) -> u8 {
        self.0
    }
}

/// `65 + (Σ UTF-16 code units of text) mod 20`.
pub fn rating_for(text: &str) -> Rating {
    let seed: u64 = text.encode_utf16().map(u64::from).sum();
    // seed % 20 < 20, so the sum stays well inside u8.
    Rating(MIN_RATING + (seed % RATING_SPAN) as u8)
}

/// Rate by address, then customer id, then [`DEFAULT_SEED_TEXT`]; empty strings count as absent.
pub fn estimate(address: Option<&str>, customer_id: Option<&str>) -> Rating {
    let text = [address, customer_id]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SEED_TEXT);
    rating_for(text)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub name: &'static str,
    pub efficiency: u8,
    pub advice: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingReport {
    pub rating: Rating,
    pub headline: &'static str,
    pub categories: Vec<CategoryScore>,
    pub account_connected: bool,
    pub recommendation: &'static str,
}

fn headline(rating: Rating) -> &'static str {
    match rating.value() {
        80.. => "Excellent! Your building is highly energy efficient.",
        70..=79 => "Good! Your building performs better than average.",
        _ => "Your building has potential for energy efficiency improvements.",
    }
}

impl RatingReport {
    pub fn new(rating: Rating, account_connected: bool) -> Self {
        let score = |offset: u8| rating.value().saturating_sub(offset);
        Self {
            rating,
            headline: headline(rating),
            categories: vec![
                CategoryScore {
                    name: "Lighting",
                    efficiency: score(5),
                    advice: "LED lighting upgrades could improve your energy efficiency and reduce costs.",
                },
                CategoryScore {
                    name: "HVAC",
                    efficiency: score(10),
                    advice: "Your HVAC system has room for improvement with modern, energy-efficient upgrades.",
                },
                CategoryScore {
                    name: "Insulation",
                    efficiency: score(8),
                    advice: "Better insulation could significantly reduce your energy consumption.",
                },
            ],
            account_connected,
            recommendation: "View your personalized recommendations to see how you can improve your \
                             building's energy efficiency and reduce costs.",
        }
    }
}
