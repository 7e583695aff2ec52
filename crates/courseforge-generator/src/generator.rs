//! Course generation
//!
//! [`CourseGenerator`] turns a [`SourceDescriptor`] into a fully populated [`NewCourse`]
//! by selecting a template from the catalog and stamping it. The generator holds only an
//! immutable catalog, so one instance can be shared across request handlers.

use std::sync::Arc;

use courseforge_common::types::{NewCourse, SourceType};
use courseforge_common::ForgeError;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{CourseTemplate, TemplateCatalog};
use crate::error::GenerateError;
use crate::{pdf, youtube};

/// Range used by [`InitialProgress::DemoRandom`]
pub const DEMO_PROGRESS_RANGE: std::ops::RangeInclusive<u8> = 25..=74;

/// What to do with a YouTube URL that has no recognisable video ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnparseableUrlPolicy {
    /// Fail with a validation error
    #[default]
    Reject,
    /// Use the first YouTube template
    Fallback,
}

impl std::str::FromStr for UnparseableUrlPolicy {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(UnparseableUrlPolicy::Reject),
            "fallback" => Ok(UnparseableUrlPolicy::Fallback),
            other => Err(ForgeError::Config(format!(
                "invalid unparseable URL policy '{other}', expected reject or fallback"
            ))),
        }
    }
}

/// Starting progress for YouTube courses; PDF courses always start at 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialProgress {
    #[default]
    Zero,
    /// Uniform draw from [`DEMO_PROGRESS_RANGE`], for demo dashboards
    DemoRandom,
}

impl std::str::FromStr for InitialProgress {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zero" => Ok(InitialProgress::Zero),
            "demo_random" => Ok(InitialProgress::DemoRandom),
            other => Err(ForgeError::Config(format!(
                "invalid initial progress mode '{other}', expected zero or demo_random"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneratorOptions {
    pub on_unparseable_url: UnparseableUrlPolicy,
    pub initial_progress: InitialProgress,
}

/// Input to the generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    Youtube { url: String },
    Pdf { filename: String, size_bytes: u64 },
}

impl SourceDescriptor {
    /// Build a descriptor from a source discriminator string
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::UnsupportedSourceType`] for anything other than
    /// `youtube` or `pdf`.
    pub fn from_parts(
        kind: &str,
        locator: impl Into<String>,
        size_bytes: u64,
    ) -> Result<Self, GenerateError> {
        let source = match kind.parse::<SourceType>()? {
            SourceType::Youtube => SourceDescriptor::Youtube {
                url: locator.into(),
            },
            SourceType::Pdf => SourceDescriptor::Pdf {
                filename: locator.into(),
                size_bytes,
            },
        };
        Ok(source)
    }

    pub fn source_type(&self) -> SourceType {
        match self {
            SourceDescriptor::Youtube { .. } => SourceType::Youtube,
            SourceDescriptor::Pdf { .. } => SourceType::Pdf,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CourseGenerator {
    catalog: Arc<TemplateCatalog>,
    options: GeneratorOptions,
}

impl CourseGenerator {
    pub fn new(catalog: Arc<TemplateCatalog>, options: GeneratorOptions) -> Self {
        Self { catalog, options }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn options(&self) -> GeneratorOptions {
        self.options
    }

    /// Generate a course using the thread-local RNG
    pub fn generate(&self, source: &SourceDescriptor) -> Result<NewCourse, GenerateError> {
        self.generate_with_rng(source, &mut rand::thread_rng())
    }

    /// Generate a course, drawing any randomness from `rng`
    ///
    /// # Errors
    ///
    /// - [`GenerateError::MissingUrl`] / [`GenerateError::MissingFilename`] for blank input
    /// - [`GenerateError::UnparseableUrl`] when no video ID is found and the policy is
    ///   [`UnparseableUrlPolicy::Reject`]
    #[tracing::instrument(skip(self, rng), fields(source_type = %source.source_type()))]
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        source: &SourceDescriptor,
        rng: &mut R,
    ) -> Result<NewCourse, GenerateError> {
        match source {
            SourceDescriptor::Youtube { url } => self.youtube_course(url, rng),
            SourceDescriptor::Pdf {
                filename,
                size_bytes,
            } => self.pdf_course(filename, *size_bytes),
        }
    }

    fn youtube_course<R: Rng + ?Sized>(
        &self,
        url: &str,
        rng: &mut R,
    ) -> Result<NewCourse, GenerateError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(GenerateError::MissingUrl);
        }

        let templates = self.catalog.youtube_templates();
        let index = match youtube::extract_video_id(url) {
            Some(video_id) => youtube::template_index(video_id, templates.len()),
            None => match self.options.on_unparseable_url {
                UnparseableUrlPolicy::Reject => {
                    return Err(GenerateError::UnparseableUrl(url.to_string()));
                },
                UnparseableUrlPolicy::Fallback => {
                    tracing::debug!(url, "No video ID found, using fallback template");
                    0
                },
            },
        };

        let progress = match self.options.initial_progress {
            InitialProgress::Zero => 0,
            InitialProgress::DemoRandom => rng.gen_range(DEMO_PROGRESS_RANGE),
        };

        let template = &templates[index];
        tracing::debug!(index, title = %template.title, "Selected YouTube template");

        let mut course = stamp(template, SourceType::Youtube, progress);
        course.video_url = Some(url.to_string());
        Ok(course)
    }

    fn pdf_course(&self, filename: &str, size_bytes: u64) -> Result<NewCourse, GenerateError> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(GenerateError::MissingFilename);
        }

        let key = pdf::select_template_key(self.catalog.pdf(), filename);
        let template = self.catalog.pdf_template(key);
        tracing::debug!(key, title = %template.title, "Selected PDF template");

        let mut course = stamp(template, SourceType::Pdf, 0);
        course.title = pdf::course_title(&template.title, filename);
        course.original_file_name = Some(filename.to_string());
        course.file_size = Some(size_bytes);
        Ok(course)
    }
}

fn stamp(template: &CourseTemplate, source_type: SourceType, progress: u8) -> NewCourse {
    NewCourse {
        title: template.title.clone(),
        description: template.description.clone(),
        thumbnail: template.thumbnail.clone(),
        duration: template.duration.clone(),
        lessons: template.lessons,
        category: template.category,
        difficulty: template.difficulty,
        tags: template.tags.clone(),
        source_type,
        video_url: None,
        original_file_name: None,
        file_size: None,
        progress,
        notes: template.numbered_notes(),
        quizzes: template.numbered_quizzes(),
        flashcards: template.numbered_flashcards(),
    }
}
