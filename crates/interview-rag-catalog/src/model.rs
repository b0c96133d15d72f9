use serde::{Deserialize, Serialize};

/// A single interview question with its topic tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionEntry {
    /// Question text as shown to the user
    pub text: String,
    /// Topic tags, kept in definition order for display
    #[serde(default)]
    pub tags: Vec<String>,
}

impl QuestionEntry {
    pub fn new(text: impl Into<String>, tags: &[&str]) -> Self {
        Self {
            text: text.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Lower-cased text the keyword check runs against: question, tags and
    /// the owning company's name.
    pub(crate) fn searchable_text(&self, company_lower: &str) -> String {
        let mut text = self.text.to_lowercase();
        for tag in &self.tags {
            text.push(' ');
            text.push_str(&tag.to_lowercase());
        }
        text.push(' ');
        text.push_str(company_lower);
        text
    }
}

/// All questions known for one company, plus display hints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCatalog {
    /// Unique company name
    pub name: String,
    /// Display color (opaque to retrieval)
    pub accent_color: String,
    /// Short glyph shown next to the name; may be empty
    #[serde(default)]
    pub icon: String,
    /// Questions in definition order
    pub questions: Vec<QuestionEntry>,
}

impl CompanyCatalog {
    pub fn new(name: impl Into<String>, accent_color: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accent_color: accent_color.into(),
            icon: icon.into(),
            questions: Vec::new(),
        }
    }

    pub fn with_question(mut self, question: QuestionEntry) -> Self {
        self.questions.push(question);
        self
    }
}
