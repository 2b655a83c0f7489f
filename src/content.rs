//! Content of the Wostup post analytics dashboard brief.

use crate::model::{Report, Section};

/// Default file the brief is written to.
pub const DEFAULT_OUTPUT_FILE: &str = "Wostup_Post_Analytics_Dashboard_MVP.pdf";

/// Title of the brief.
pub const TITLE: &str = "Wostup – Post Analytics Dashboard (MVP)";

/// Headings and body markup of the brief, in document order.
pub const SECTIONS: &[(&str, &str)] = &[
    (
        "Objective",
        "Provide startups with clear, actionable analytics for the posts they publish on Wostup. \
         This dashboard helps companies understand reach, engagement, and content effectiveness \
         without using machine learning.",
    ),
    (
        "Core Post Metrics",
        "• Total Views<br/>\
         • Unique Viewers<br/>\
         • Total Likes<br/>\
         • Total Comments<br/>\
         • Engagement Rate = (Likes + Comments) / Views",
    ),
    (
        "Time-Based Analytics",
        "• Views over time (Last 24h, 7 days, 30 days)<br/>\
         • Engagement in first 1 hour, 6 hours, 24 hours<br/>\
         • Post lifespan and engagement decay",
    ),
    (
        "Content Performance",
        "• Performance by media type (Video / Photo / Text-only)<br/>\
         • Average likes per media type<br/>\
         • Average comments per media type",
    ),
    (
        "Comment Insights",
        "• Total comments per post<br/>\
         • Average comment length<br/>\
         • Questions vs general comments<br/>\
         • Interest signals (\"interested\", \"apply\", \"opening\")",
    ),
    (
        "Startup-Level Insights",
        "• Top performing posts by likes, comments, engagement<br/>\
         • Posting frequency vs engagement trends<br/>\
         • Posting consistency over time",
    ),
    (
        "Recommended Dashboard Widgets",
        "• KPI cards (Views, Likes, Comments, Engagement Rate)<br/>\
         • Line charts for trends<br/>\
         • Bar charts for comparisons<br/>\
         • Ranked lists for top posts",
    ),
    (
        "Why This Is Ideal for MVP",
        "• Uses existing post schema only<br/>\
         • No ML or GPU required<br/>\
         • Easy MongoDB aggregation<br/>\
         • Founder-friendly and actionable",
    ),
    (
        "Future Enhancements",
        "• Sentiment analysis on comments<br/>\
         • Audience segmentation<br/>\
         • ML-based post optimization when scale increases",
    ),
];

/// Builds the post analytics dashboard brief.
pub fn post_analytics_brief() -> Report {
    Report::new(TITLE).with_sections(
        SECTIONS
            .iter()
            .map(|(heading, body)| Section::new(*heading, *body)),
    )
}
