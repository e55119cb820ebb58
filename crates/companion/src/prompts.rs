//! Fixed prompts for the summary and insight workflows.

use readpal_core::reading::UserPreferences;

pub const SUMMARY_PROMPT: &str = "Please provide a comprehensive summary of the document including:
1. Overview of the main content
2. Key points and major arguments
3. Important details and examples
4. Conclusions or final thoughts

Structure the summary in a clear, organized manner and ensure all major sections \
of the document are covered. Include relevant headings or sections if applicable.";

/// Short overview used as context for the insight prompts.
pub const BRIEF_OVERVIEW_PROMPT: &str = "Provide a brief overview of the document content";

const NOT_SPECIFIED: &str = "Not specified";
const DEFAULT_READING_LEVEL: &str = "intermediate";

pub fn insight_prompt(overview: &str) -> String {
    format!(
        "Context of the document: {overview}

Based on this document, please analyze and provide key insights including:
1. Main themes and concepts
2. Key arguments or points
3. Notable findings or conclusions
4. Important relationships or patterns
5. Significant implications

Please base all insights strictly on the document's content."
    )
}

pub fn personalized_insight_prompt(overview: &str, preferences: Option<&UserPreferences>) -> String {
    let interests = preferences
        .map(|p| join_or_unspecified(&p.interests))
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let reading_level = preferences
        .map(|p| p.reading_level.as_str())
        .filter(|level| !level.trim().is_empty())
        .unwrap_or(DEFAULT_READING_LEVEL);
    let focus_areas = preferences
        .map(|p| join_or_unspecified(&p.focus_areas))
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());

    format!(
        "Context of the document: {overview}

User Interests: {interests}
Reading Level: {reading_level}
Focus Areas: {focus_areas}

Based on the document and user preferences:
1. Identify key insights that align with the user's interests
2. Highlight sections particularly relevant to their focus areas
3. Explain concepts at the appropriate reading level
4. Make connections between the content and user's areas of interest
5. Suggest specific areas for deeper exploration"
    )
}

fn join_or_unspecified(items: &[String]) -> String {
    if items.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        items.join(", ")
    }
}
