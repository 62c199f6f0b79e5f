//! Oracle prompt engineering for completion-date extraction

use epilog_domain::{DocumentRef, EpisodeKind, SearchTask};
use time::macros::format_description;

/// Builds prompts asking the oracle for an episode's completion date
pub struct DatePromptBuilder<'a> {
    task: &'a SearchTask,
    document: &'a DocumentRef,
    text: &'a str,
}

impl<'a> DatePromptBuilder<'a> {
    /// Create a prompt builder for one (task, document) pair
    pub fn new(task: &'a SearchTask, document: &'a DocumentRef, text: &'a str) -> Self {
        Self {
            task,
            document,
            text,
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let format = format_description!("[year]-[month]-[day]");
        let anchor = self
            .task
            .anchor_date
            .format(&format)
            .unwrap_or_else(|_| self.task.anchor_date.to_string());

        let mut prompt = String::new();

        // 1. Instruction and task framing
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Episode context
        prompt.push_str(&format!("Episode type: {}\n", self.describe_kind()));
        prompt.push_str(&format!("Episode start date: {}\n", anchor));
        if !self.task.keywords.is_empty() {
            prompt.push_str(&format!(
                "Episode-specific terms: {}\n",
                self.task.keywords.join(", ")
            ));
        }
        prompt.push_str(&format!(
            "Document: {} ({}, dated {})\n\n",
            self.document.document_id,
            self.document.kind.as_str(),
            self.document.document_date
        ));

        // 3. The document text
        prompt.push_str("Document text:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");

        // 4. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }

    /// Kind-specific wording for the episode context
    fn describe_kind(&self) -> &'static str {
        match self.task.kind {
            EpisodeKind::Therapy => "course of therapy (find the date the course ended)",
            EpisodeKind::Procedure => "procedure follow-up (find the date follow-up was closed)",
        }
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are reading one document to determine whether it states or implies the completion date of a specific episode of care.

Rules:
- Only report a date the document actually supports; never guess
- The completion date can never be earlier than the episode start date
- If the document mentions completion without a date, or no completion at all, report null
- Prefer explicit statements ("completed on", "final", "last dose") over inference
- Dates must be reported in YYYY-MM-DD format"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (single JSON object, no additional text):
{
  "completion_date": "YYYY-MM-DD" or null,
  "confidence": "high" | "medium" | "low",
  "evidence": "the sentence from the document supporting the date, or null"
}"#;
