//! Display units: the attachment-shaped envelopes replies are built from.

use serde::{Deserialize, Serialize};

/// Per-attachment envelope cost (fallback text, color bar, JSON framing)
/// counted on top of the visible text.
pub const UNIT_SIZE_OVERHEAD: usize = 50;

/// Default attachment color for summaries.
pub const SUMMARY_COLOR: &str = "#4A90D9";

/// A titled block of text rendered as one Slack attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayUnit {
    title: Option<String>,
    body: Option<String>,
    footer: Option<String>,
    color: String,
}

impl DisplayUnit {
    #[must_use]
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            title: None,
            body: None,
            footer: None,
            color: color.into(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    #[must_use]
    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Characters this unit costs against the per-message budget.
    #[must_use]
    pub fn estimated_size(&self) -> usize {
        let len = |field: &Option<String>| field.as_deref().map_or(0, |s| s.chars().count());
        len(&self.title) + len(&self.body) + len(&self.footer) + UNIT_SIZE_OVERHEAD
    }
}
