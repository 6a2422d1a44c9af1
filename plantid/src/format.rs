//! Turns an identification result into the HTML fragment shown under the upload form.

use crate::identification::IdentificationResult;
use html_escape::encode_text;
use std::fmt::Write as _;

pub const NO_RESULTS: &str = "No results found or there was an error.";

/// Format every suggestion as a name / probability / description block.
///
/// Probabilities are rendered as percentages with two decimals. Upstream text is HTML-escaped;
/// the surrounding markup is not, so the output must be inserted into the page unescaped.
pub fn format_results(results: Option<&IdentificationResult>) -> String {
    let Some(results) = results.filter(|r| !r.suggestions.is_empty()) else {
        return NO_RESULTS.to_string();
    };

    let mut text = String::new();
    for suggestion in &results.suggestions {
        // Writing to a String cannot fail
        let _ = write!(
            text,
            "<strong>Plant Name:</strong> {}<br><strong>Probability:</strong> {:.2}%<br>",
            encode_text(&suggestion.plant_name),
            suggestion.probability * 100.0
        );
        if let Some(description) = suggestion.description() {
            let _ = write!(text, "<strong>Description:</strong> {}<br><br>", encode_text(description));
        }
    }
    text
}
