//! Response composition — text body plus ordered media per category.

use std::path::Path;

use crate::channels::MediaRef;
use crate::pipeline::classifier::{Classification, Salutation};
use crate::pipeline::templates;

/// Final reply for one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedResponse {
    pub text: String,
    /// Sent before the text, in this order.
    pub media: Vec<MediaRef>,
}

/// Pre-existing promotional images.
#[derive(Debug, Clone)]
pub struct MediaCatalog {
    pub poster: MediaRef,
    pub grid: MediaRef,
}

impl MediaCatalog {
    /// Catalog of the standard file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            poster: MediaRef::new(dir.join(templates::POSTER_FILE)),
            grid: MediaRef::new(dir.join(templates::GRID_FILE)),
        }
    }

    /// Assets that do not exist on disk.
    pub fn missing(&self) -> Vec<&MediaRef> {
        [&self.poster, &self.grid]
            .into_iter()
            .filter(|m| !m.path().is_file())
            .collect()
    }

    /// Poster first, then the product grid.
    fn presentation(&self) -> Vec<MediaRef> {
        vec![self.poster.clone(), self.grid.clone()]
    }
}

/// Builds replies from templates. No side effects.
#[derive(Debug, Clone)]
pub struct ResponseComposer {
    media: MediaCatalog,
}

impl ResponseComposer {
    pub fn new(media: MediaCatalog) -> Self {
        Self { media }
    }

    pub fn compose(
        &self,
        classification: Classification,
        salutation: Salutation,
        answer: Option<&str>,
    ) -> ComposedResponse {
        let greet = salutation.as_str();
        match (classification, answer) {
            (Classification::GoCommand, _) => ComposedResponse {
                text: templates::PRESENTATION.to_string(),
                media: self.media.presentation(),
            },
            (Classification::Greeting, _) => ComposedResponse {
                text: format!("{greet}\n{}", templates::GREETING_MENU),
                media: self.media.presentation(),
            },
            (Classification::ThankYou, _) => ComposedResponse {
                text: templates::THANKS_ACK.to_string(),
                media: Vec::new(),
            },
            (Classification::Question, Some(answer)) => ComposedResponse {
                text: format!("{greet}\n\n{answer}"),
                media: Vec::new(),
            },
            (Classification::Question, None) => ComposedResponse {
                text: format!("{greet}\n{}", templates::QUESTION_FALLBACK),
                media: Vec::new(),
            },
        }
    }
}
