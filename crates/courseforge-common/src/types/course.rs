//! Course records
//!
//! A [`NewCourse`] is what the generator produces: a template stamped with a source but
//! not yet owned by anyone. [`NewCourse::into_course`] assigns identity and ownership,
//! producing the persisted [`Course`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ForgeError;

/// Upper bound for course progress, in percent
pub const MAX_PROGRESS: u8 = 100;

/// Where a course's material came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Youtube,
    Pdf,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Youtube => "youtube",
            SourceType::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceType {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(SourceType::Youtube),
            "pdf" => Ok(SourceType::Pdf),
            other => Err(ForgeError::UnsupportedSourceType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    Science,
    Business,
    Arts,
    #[default]
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Science => "science",
            Category::Business => "business",
            Category::Arts => "arts",
            Category::General => "general",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technology" => Ok(Category::Technology),
            "science" => Ok(Category::Science),
            "business" => Ok(Category::Business),
            "arts" => Ok(Category::Arts),
            "general" => Ok(Category::General),
            other => Err(ForgeError::InvalidCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(ForgeError::InvalidDifficulty(other.to_string())),
        }
    }
}

/// A lecture note; `id` is local to the owning course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u32,
    pub title: String,
    pub content: String,
    pub duration: String,
}

/// A four-option multiple choice question; `id` is local to the owning quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub question: String,
    pub options: [String; 4],
    pub correct_answer: u8,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: u32,
    pub title: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: u32,
    pub question: String,
    pub answer: String,
    pub category: String,
}

/// Generator output: a fully populated course without identity or owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub duration: String,
    pub lessons: u32,
    pub category: Category,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub source_type: SourceType,
    pub video_url: Option<String>,
    pub original_file_name: Option<String>,
    pub file_size: Option<u64>,
    pub progress: u8,
    pub notes: Vec<Note>,
    pub quizzes: Vec<Quiz>,
    pub flashcards: Vec<Flashcard>,
}

impl NewCourse {
    /// Assign identity and ownership, stamping creation time
    pub fn into_course(self, owner_id: Uuid, now: DateTime<Utc>) -> Course {
        let progress = self.progress.min(MAX_PROGRESS);
        let completed_at = (progress == MAX_PROGRESS).then_some(now);

        Course {
            id: Uuid::new_v4(),
            owner_id,
            title: self.title,
            description: self.description,
            thumbnail: self.thumbnail,
            video_url: self.video_url,
            duration: self.duration,
            lessons: self.lessons,
            progress,
            source_type: self.source_type,
            notes: self.notes,
            quizzes: self.quizzes,
            flashcards: self.flashcards,
            original_file_name: self.original_file_name,
            file_size: self.file_size,
            category: self.category,
            difficulty: self.difficulty,
            tags: self.tags,
            is_public: false,
            completed_at,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A persisted, user-owned course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub duration: String,
    pub lessons: u32,
    pub progress: u8,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub notes: Vec<Note>,
    pub quizzes: Vec<Quiz>,
    pub flashcards: Vec<Flashcard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    pub category: Category,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a progress update did to a course's completion state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTransition {
    /// Progress reached 100 from below
    Completed,
    /// Progress left 100
    Reopened,
    Unchanged,
}

impl Course {
    /// Set progress, keeping `completed_at` non-null iff progress is 100
    ///
    /// Reaching 100 stamps `completed_at` once; staying at 100 keeps the original stamp.
    pub fn apply_progress(
        &mut self,
        progress: i64,
        now: DateTime<Utc>,
    ) -> Result<ProgressTransition, ForgeError> {
        let progress = u8::try_from(progress)
            .ok()
            .filter(|p| *p <= MAX_PROGRESS)
            .ok_or(ForgeError::ProgressOutOfRange(progress))?;

        let was_complete = self.progress == MAX_PROGRESS;
        self.progress = progress;
        self.updated_at = now;

        let transition = match (was_complete, progress == MAX_PROGRESS) {
            (false, true) => {
                self.completed_at = Some(now);
                ProgressTransition::Completed
            },
            (true, false) => {
                self.completed_at = None;
                ProgressTransition::Reopened
            },
            _ => ProgressTransition::Unchanged,
        };

        Ok(transition)
    }

    pub fn is_complete(&self) -> bool {
        self.progress == MAX_PROGRESS
    }
}
