//! Upload/translate cycle state
//!
//! One cycle is "current" at a time. The stored recognition result, fit
//! transform, and canvas belong to exactly one loaded image; a failure
//! while loading or recognizing clears all three so a later render can
//! never mix results from different images. Each cycle carries a request
//! generation, and results from a superseded generation are refused at
//! commit time instead of overwriting newer state. A translation failure
//! leaves the committed recognition state alone, since its recovery is
//! retrying the translation rather than re-uploading the image.

use tracing::{debug, info};

use crate::config::Config;
use crate::decode;
use crate::error::PipelineError;
use crate::geometry::FitTransform;
use crate::render::CanvasSurface;
use crate::services::recognition::{self, RecognitionResult};
use crate::services::translation;
use crate::validate::{self, Candidate};

/// Outcome of one upload/translate cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// Overlay drawn and text translated
    Completed {
        region_count: usize,
        translations: Vec<String>,
    },
    /// Recognition found no text; the canvas shows the bare image
    NoText,
    /// A newer cycle superseded this one; nothing was committed
    Superseded,
}

/// Everything one image's cycle produced, staged before commit
struct StagedCycle {
    /// `None` when the service found no text
    recognition: Option<RecognitionResult>,
    transform: FitTransform,
    surface: CanvasSurface,
}

/// Commit decision for a staged cycle
enum Commit {
    Stored {
        texts: Vec<String>,
        region_count: usize,
    },
    NoText,
    Superseded,
}

/// State for the single current upload/translate cycle
pub struct TranslateSession {
    config: Config,
    generation: u64,
    stored: Option<StagedCycle>,
}

impl TranslateSession {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            generation: 0,
            stored: None,
        }
    }

    /// Begin a new cycle, superseding any in-flight one. Returns the
    /// token the cycle must present to commit its results.
    pub fn begin_cycle(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Run one full cycle: validate, decode, letterbox, recognize, draw,
    /// translate. Commits only if `token` is still the current generation.
    pub async fn process(
        &mut self,
        token: u64,
        candidate: Candidate,
        target_language: &str,
    ) -> Result<CycleOutcome, PipelineError> {
        let staged = match self.stage(&candidate).await {
            Ok(staged) => staged,
            Err(e) => {
                self.clear_if_current(token);
                return Err(e);
            }
        };

        match self.commit(token, staged) {
            Commit::Superseded => Ok(CycleOutcome::Superseded),
            Commit::NoText => Ok(CycleOutcome::NoText),
            Commit::Stored {
                texts,
                region_count,
            } => {
                let translations = translation::translate(
                    &self.config.endpoints.translation,
                    target_language,
                    &texts,
                    &self.config.limits,
                )
                .await?;
                Ok(CycleOutcome::Completed {
                    region_count,
                    translations,
                })
            }
        }
    }

    /// Re-run translation for the stored recognition result, e.g. after
    /// the target language changes. Idempotent; a no-op returning `None`
    /// when no recognition result is stored.
    pub async fn retranslate(
        &self,
        target_language: &str,
    ) -> Result<Option<Vec<String>>, PipelineError> {
        let Some(texts) = self.stored_texts() else {
            debug!("retranslate requested with no stored recognition result");
            return Ok(None);
        };

        let translations = translation::translate(
            &self.config.endpoints.translation,
            target_language,
            &texts,
            &self.config.limits,
        )
        .await?;
        Ok(Some(translations))
    }

    /// Rendered canvas for the current image, if a cycle has committed
    pub fn surface(&self) -> Option<&CanvasSurface> {
        self.stored.as_ref().map(|s| &s.surface)
    }

    /// Transform of the current image, if a cycle has committed
    pub fn transform(&self) -> Option<FitTransform> {
        self.stored.as_ref().map(|s| s.transform)
    }

    /// Whether a recognition result is stored for the current image
    pub fn has_result(&self) -> bool {
        self.stored_texts().is_some()
    }

    /// Validate, decode, letterbox, and recognize one candidate. Pure
    /// with respect to session state: nothing is stored here.
    async fn stage(&self, candidate: &Candidate) -> Result<StagedCycle, PipelineError> {
        let kind = validate::validate(candidate)?;
        let image = decode::decode(&candidate.content, kind)?;

        let canvas_w = self.config.render.canvas_width;
        let canvas_h = self.config.render.canvas_height;
        let transform = FitTransform::compute(image.width(), image.height(), canvas_w, canvas_h);
        let mut surface = CanvasSurface::new(&image, &transform, canvas_w, canvas_h);

        let result = recognition::recognize(
            &self.config.endpoints.recognition,
            candidate,
            &self.config.limits,
        )
        .await?;

        if result.is_empty() {
            info!("No text was found in the image");
            return Ok(StagedCycle {
                recognition: None,
                transform,
                surface,
            });
        }

        surface.draw(&result.regions, &transform);

        Ok(StagedCycle {
            recognition: Some(result),
            transform,
            surface,
        })
    }

    /// Commit a staged cycle if its generation is still current. A stale
    /// cycle commits nothing. The no-text path stores the bare canvas so
    /// the image still renders, but retranslate stays a no-op.
    fn commit(&mut self, token: u64, staged: StagedCycle) -> Commit {
        if token != self.generation {
            debug!(
                "discarding results from superseded request generation {}",
                token
            );
            return Commit::Superseded;
        }

        let decision = match &staged.recognition {
            Some(result) => Commit::Stored {
                texts: result.texts(),
                region_count: result.regions.len(),
            },
            None => Commit::NoText,
        };
        self.stored = Some(staged);
        decision
    }

    /// Drop stored state after a failure, unless a newer cycle owns it
    fn clear_if_current(&mut self, token: u64) {
        if token == self.generation {
            self.stored = None;
        }
    }

    /// Text chunks of the stored recognition result, if any
    fn stored_texts(&self) -> Option<Vec<String>> {
        self.stored
            .as_ref()
            .and_then(|s| s.recognition.as_ref())
            .map(|r| r.texts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Region, RegionShape};
    use image::{DynamicImage, Rgba, RgbaImage};

    fn session() -> TranslateSession {
        TranslateSession::new(Config::default())
    }

    fn staged(recognized: Option<&str>) -> StagedCycle {
        let image =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255])));
        let transform = FitTransform::compute(4, 4, 20, 20);
        let surface = CanvasSurface::new(&image, &transform, 20, 20);

        let recognition = recognized.map(|text| RecognitionResult {
            regions: vec![Region {
                text: text.to_string(),
                shape: RegionShape::Marker(Point::new(1.0, 1.0)),
            }],
        });

        StagedCycle {
            recognition,
            transform,
            surface,
        }
    }

    #[test]
    fn test_current_cycle_commits() {
        let mut session = session();
        let token = session.begin_cycle();

        let commit = session.commit(token, staged(Some("hello")));
        assert!(matches!(commit, Commit::Stored { region_count: 1, .. }));
        assert!(session.has_result());
        assert!(session.surface().is_some());
        assert_eq!(session.stored_texts(), Some(vec!["hello".to_string()]));
    }

    #[test]
    fn test_stale_cycle_cannot_overwrite_newer_state() {
        let mut session = session();
        let stale = session.begin_cycle();
        let current = session.begin_cycle();

        let commit = session.commit(current, staged(Some("new")));
        assert!(matches!(commit, Commit::Stored { .. }));

        // The stale cycle finishes late; its result is refused
        let commit = session.commit(stale, staged(Some("old")));
        assert!(matches!(commit, Commit::Superseded));
        assert_eq!(session.stored_texts(), Some(vec!["new".to_string()]));
    }

    #[test]
    fn test_no_text_commits_canvas_without_result() {
        let mut session = session();
        let token = session.begin_cycle();

        let commit = session.commit(token, staged(None));
        assert!(matches!(commit, Commit::NoText));
        // The bare image still renders, but there is nothing to translate
        assert!(session.surface().is_some());
        assert!(!session.has_result());
        assert_eq!(session.stored_texts(), None);
    }

    #[test]
    fn test_failure_clears_current_state() {
        let mut session = session();
        let first = session.begin_cycle();
        session.commit(first, staged(Some("hello")));
        assert!(session.has_result());

        let second = session.begin_cycle();
        session.clear_if_current(second);
        assert!(!session.has_result());
        assert!(session.surface().is_none());
        assert!(session.transform().is_none());
    }

    #[test]
    fn test_stale_failure_does_not_clear_newer_state() {
        let mut session = session();
        let stale = session.begin_cycle();
        let current = session.begin_cycle();
        session.commit(current, staged(Some("keep me")));

        session.clear_if_current(stale);
        assert!(session.has_result());
    }

    #[test]
    fn test_new_image_replaces_transform() {
        let mut session = session();
        let first = session.begin_cycle();
        session.commit(first, staged(Some("a")));
        let first_transform = session.transform().unwrap();

        // A new image with different staged geometry replaces the
        // transform wholesale
        let second = session.begin_cycle();
        let image =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 2, Rgba([0, 0, 0, 255])));
        let transform = FitTransform::compute(10, 2, 20, 20);
        let surface = CanvasSurface::new(&image, &transform, 20, 20);
        session.commit(
            second,
            StagedCycle {
                recognition: None,
                transform,
                surface,
            },
        );

        let second_transform = session.transform().unwrap();
        assert_ne!(first_transform, second_transform);
    }
}
