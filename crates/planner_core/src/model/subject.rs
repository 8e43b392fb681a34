//! Study subjects and their fixed suggestion rotation.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A subject in the study rotation.
///
/// Serialized with its display label so stored documents stay readable and
/// compatible with plain-text `lastStudySubject` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    #[serde(rename = "ภาษาไทย")]
    Thai,
    #[serde(rename = "คณิตศาสตร์")]
    Mathematics,
    #[serde(rename = "วิทยาศาสตร์")]
    Science,
    #[serde(rename = "อังกฤษ")]
    English,
    #[serde(rename = "สังคมศึกษา")]
    SocialStudies,
    #[serde(rename = "คอมพิวเตอร์")]
    Computer,
    #[serde(rename = "ศิลปะ")]
    Art,
}

/// Suggestion order. Wraps from `Art` back to `Thai`.
pub const ROTATION: [Subject; 7] = [
    Subject::Thai,
    Subject::Mathematics,
    Subject::Science,
    Subject::English,
    Subject::SocialStudies,
    Subject::Computer,
    Subject::Art,
];

impl Subject {
    pub fn label(self) -> &'static str {
        match self {
            Self::Thai => "ภาษาไทย",
            Self::Mathematics => "คณิตศาสตร์",
            Self::Science => "วิทยาศาสตร์",
            Self::English => "อังกฤษ",
            Self::SocialStudies => "สังคมศึกษา",
            Self::Computer => "คอมพิวเตอร์",
            Self::Art => "ศิลปะ",
        }
    }

    /// Parses a stored label. Surrounding whitespace is ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        ROTATION
            .iter()
            .copied()
            .find(|subject| subject.label() == trimmed)
    }

    /// Position of this subject in [`ROTATION`].
    pub fn rotation_index(self) -> usize {
        ROTATION
            .iter()
            .position(|subject| *subject == self)
            .unwrap_or(0)
    }

    /// Subject that follows this one in the rotation.
    pub fn next(self) -> Self {
        ROTATION[(self.rotation_index() + 1) % ROTATION.len()]
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::{Subject, ROTATION};

    #[test]
    fn labels_round_trip_for_every_subject() {
        for subject in ROTATION {
            assert_eq!(Subject::from_label(subject.label()), Some(subject));
        }
        assert_eq!(Subject::from_label(" ศิลปะ "), Some(Subject::Art));
        assert_eq!(Subject::from_label("physics"), None);
    }

    #[test]
    fn next_wraps_after_last_subject() {
        assert_eq!(Subject::Art.next(), Subject::Thai);
        assert_eq!(Subject::Thai.next(), Subject::Mathematics);
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Subject::Computer).expect("serialize subject");
        assert_eq!(json, "\"คอมพิวเตอร์\"");
    }
}
