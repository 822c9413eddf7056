pub mod classifier;
pub mod numbers;

pub use classifier::HeadingClassifier;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker recorded when a heading has no subtitle line.
pub const NULL_NAME: &str = "Null Name";

/// A heading title with its optional subtitle line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    pub subtitle: Option<String>,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            subtitle: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: Option<String>) -> Self {
        self.subtitle = subtitle;
        self
    }

    /// Chapter-like headings always carry a subtitle; a missing one
    /// becomes the `Null Name` marker.
    pub fn or_placeholder(mut self) -> Self {
        if self.subtitle.is_none() {
            self.subtitle = Some(NULL_NAME.to_string());
        }
        self
    }
}

/// Result of classifying one page of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "title", rename_all = "snake_case")]
pub enum HeadingMatch {
    #[default]
    None,
    Part(Title),
    Chapter(Title),
    Prologue(Title),
    Epilogue(Title),
    SpecialParent(Title),
}

impl HeadingMatch {
    pub fn title(&self) -> Option<&Title> {
        match self {
            HeadingMatch::None => None,
            HeadingMatch::Part(t)
            | HeadingMatch::Chapter(t)
            | HeadingMatch::Prologue(t)
            | HeadingMatch::Epilogue(t)
            | HeadingMatch::SpecialParent(t) => Some(t),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, HeadingMatch::None)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            HeadingMatch::None => "none",
            HeadingMatch::Part(_) => "part",
            HeadingMatch::Chapter(_) => "chapter",
            HeadingMatch::Prologue(_) => "prologue",
            HeadingMatch::Epilogue(_) => "epilogue",
            HeadingMatch::SpecialParent(_) => "special parent",
        }
    }
}

impl fmt::Display for HeadingMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.title() {
            None => write!(f, "none"),
            Some(title) => match &title.subtitle {
                Some(sub) => write!(f, "{} '{}' ({})", self.kind_name(), title.text, sub),
                None => write!(f, "{} '{}'", self.kind_name(), title.text),
            },
        }
    }
}
