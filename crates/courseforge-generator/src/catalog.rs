//! Template catalog
//!
//! Templates are reference data, not code. The built-in catalog is embedded from
//! `templates/catalog.json`; operators can point the server at a replacement file with the
//! same shape:
//!
//! ```json
//! {
//!   "youtube": [ { "title": "...", ... } ],
//!   "pdf": {
//!     "templates": { "javascript": { ... }, "general": { ... } },
//!     "rules": [ { "template": "javascript", "keywords": ["javascript", "js"] } ],
//!     "fallback": "general"
//!   }
//! }
//! ```
//!
//! Every catalog is validated on load, so selection code can index into it without
//! re-checking.

use std::collections::BTreeMap;
use std::path::Path;

use courseforge_common::types::{Category, Difficulty, Flashcard, Note, Question, Quiz};
use serde::Deserialize;

use crate::error::CatalogError;

const BUILTIN_CATALOG: &str = include_str!("../templates/catalog.json");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NoteTemplate {
    pub title: String,
    pub content: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionTemplate {
    pub question: String,
    pub options: [String; 4],
    pub correct_answer: u8,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizTemplate {
    pub title: String,
    pub questions: Vec<QuestionTemplate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlashcardTemplate {
    pub question: String,
    pub answer: String,
    pub category: String,
}

/// A static course bundle used as a stamp for generated courses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CourseTemplate {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub duration: String,
    pub lessons: u32,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Vec<NoteTemplate>,
    pub quizzes: Vec<QuizTemplate>,
    pub flashcards: Vec<FlashcardTemplate>,
}

impl CourseTemplate {
    /// Deep-copied notes numbered from 1
    pub fn numbered_notes(&self) -> Vec<Note> {
        self.notes
            .iter()
            .zip(1..)
            .map(|(note, id)| Note {
                id,
                title: note.title.clone(),
                content: note.content.clone(),
                duration: note.duration.clone(),
            })
            .collect()
    }

    /// Deep-copied quizzes numbered from 1, with questions numbered from 1 within each quiz
    pub fn numbered_quizzes(&self) -> Vec<Quiz> {
        self.quizzes
            .iter()
            .zip(1..)
            .map(|(quiz, id)| Quiz {
                id,
                title: quiz.title.clone(),
                questions: quiz
                    .questions
                    .iter()
                    .zip(1..)
                    .map(|(q, qid)| Question {
                        id: qid,
                        question: q.question.clone(),
                        options: q.options.clone(),
                        correct_answer: q.correct_answer,
                        explanation: q.explanation.clone(),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn numbered_flashcards(&self) -> Vec<Flashcard> {
        self.flashcards
            .iter()
            .zip(1..)
            .map(|(card, id)| Flashcard {
                id,
                question: card.question.clone(),
                answer: card.answer.clone(),
                category: card.category.clone(),
            })
            .collect()
    }

    fn validate(&self, label: &str) -> Result<(), CatalogError> {
        let invalid = |msg: &str| CatalogError::Invalid(format!("template {label}: {msg}"));

        if self.title.trim().is_empty() {
            return Err(invalid("title must not be empty"));
        }
        if self.notes.is_empty() {
            return Err(invalid("at least one note is required"));
        }
        if self.quizzes.is_empty() {
            return Err(invalid("at least one quiz is required"));
        }
        if self.flashcards.is_empty() {
            return Err(invalid("at least one flashcard is required"));
        }

        for quiz in &self.quizzes {
            if quiz.questions.is_empty() {
                return Err(invalid(&format!("quiz '{}' has no questions", quiz.title)));
            }
            for question in &quiz.questions {
                if usize::from(question.correct_answer) >= question.options.len() {
                    return Err(invalid(&format!(
                        "question '{}' has correct_answer {} out of range",
                        question.question, question.correct_answer
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Maps filename keywords to a PDF template key
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeywordRule {
    pub template: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PdfCatalog {
    pub templates: BTreeMap<String, CourseTemplate>,
    /// Tested in order; the first rule with a matching keyword wins
    pub rules: Vec<KeywordRule>,
    pub fallback: String,
}

/// On-disk shape of a catalog, before validation
#[derive(Debug, Deserialize)]
struct CatalogFile {
    youtube: Vec<CourseTemplate>,
    pdf: PdfCatalog,
}

/// Validated set of YouTube and PDF templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCatalog {
    youtube: Vec<CourseTemplate>,
    pdf: PdfCatalog,
}

impl TemplateCatalog {
    /// The catalog compiled into this crate
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let catalog = TemplateCatalog {
            youtube: file.youtube,
            pdf: file.pdf,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load an operator-supplied catalog file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            youtube_templates = catalog.youtube.len(),
            pdf_templates = catalog.pdf.templates.len(),
            "Loaded template catalog"
        );
        Ok(catalog)
    }

    pub fn youtube_templates(&self) -> &[CourseTemplate] {
        &self.youtube
    }

    pub fn pdf(&self) -> &PdfCatalog {
        &self.pdf
    }

    /// Look up a PDF template by key, falling back to the catalog's fallback template
    pub fn pdf_template(&self, key: &str) -> &CourseTemplate {
        // validate() guarantees the fallback key exists
        self.pdf
            .templates
            .get(key)
            .unwrap_or_else(|| &self.pdf.templates[&self.pdf.fallback])
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.youtube.is_empty() {
            return Err(CatalogError::Invalid(
                "at least one YouTube template is required".to_string(),
            ));
        }
        for (index, template) in self.youtube.iter().enumerate() {
            template.validate(&format!("youtube[{index}]"))?;
        }

        for (key, template) in &self.pdf.templates {
            template.validate(&format!("pdf.{key}"))?;
        }

        if !self.pdf.templates.contains_key(&self.pdf.fallback) {
            return Err(CatalogError::Invalid(format!(
                "fallback template '{}' is not defined",
                self.pdf.fallback
            )));
        }

        for rule in &self.pdf.rules {
            if !self.pdf.templates.contains_key(&rule.template) {
                return Err(CatalogError::Invalid(format!(
                    "rule references undefined template '{}'",
                    rule.template
                )));
            }
            if rule.keywords.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "rule for '{}' has no keywords",
                    rule.template
                )));
            }
            for keyword in &rule.keywords {
                if keyword.is_empty() || *keyword != keyword.to_lowercase() {
                    return Err(CatalogError::Invalid(format!(
                        "keyword '{keyword}' must be a non-empty lowercase string"
                    )));
                }
            }
        }

        Ok(())
    }
}
