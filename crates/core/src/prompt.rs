//! Instruction text sent with every slide-deck generation request.
//!
//! The wording is fixed; only the language-dependent labels and the slide
//! range vary.

/// Labels that appear inside generated slides and must be in the deck language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Labels {
    speaker: &'static str,
    owner: &'static str,
    deadline: &'static str,
    action_items: &'static str,
}

const ENGLISH: Labels = Labels {
    speaker: "Speaker",
    owner: "Owner",
    deadline: "Deadline",
    action_items: "Action items",
};

/// Known languages, matched case-insensitively on their English name.
const LABELS: &[(&str, Labels)] = &[
    ("english", ENGLISH),
    (
        "spanish",
        Labels {
            speaker: "Hablante",
            owner: "Responsable",
            deadline: "Fecha límite",
            action_items: "Acciones",
        },
    ),
    (
        "portuguese",
        Labels {
            speaker: "Orador",
            owner: "Responsável",
            deadline: "Prazo",
            action_items: "Ações",
        },
    ),
    (
        "french",
        Labels {
            speaker: "Intervenant",
            owner: "Responsable",
            deadline: "Échéance",
            action_items: "Actions",
        },
    ),
    (
        "german",
        Labels {
            speaker: "Sprecher",
            owner: "Verantwortlich",
            deadline: "Frist",
            action_items: "Aufgaben",
        },
    ),
];

/// Builder for the generation instructions.
#[derive(Debug, Clone)]
pub struct DeckPrompt {
    language: String,
    min_slides: usize,
    max_slides: usize,
    audience: String,
    tone: String,
}

impl Default for DeckPrompt {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            min_slides: 8,
            max_slides: 12,
            audience: "team members and stakeholders who did not attend the session".to_string(),
            tone: "clear, neutral and professional".to_string(),
        }
    }
}

impl DeckPrompt {
    /// Create a prompt with the default English settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output language (its English name, e.g. "Spanish").
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the slide-count range. The bounds are reordered if reversed.
    pub fn with_slide_range(mut self, min: usize, max: usize) -> Self {
        let min = min.max(1);
        let max = max.max(1);
        self.min_slides = min.min(max);
        self.max_slides = min.max(max);
        self
    }

    fn labels(&self) -> Labels {
        let wanted = self.language.trim().to_lowercase();
        LABELS
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, labels)| *labels)
            .unwrap_or(ENGLISH)
    }

    /// Render the full instruction text.
    pub fn render(&self) -> String {
        let labels = self.labels();
        let lines = [
            format!(
                "Create a slide deck in {} from the transcript in this source.",
                self.language
            ),
            format!("Use between {} and {} slides.", self.min_slides, self.max_slides),
            format!("Audience: {}.", self.audience),
            format!("Tone: {}.", self.tone),
            "Each slide has a short title and at most five bullets of one line each.".to_string(),
            "Keep every number, name and date exactly as written in the transcript.".to_string(),
            "Never add facts, figures or conclusions that are not in the transcript.".to_string(),
            format!(
                "When a speaker is not identified, label them \"{} 1\", \"{} 2\" and so on.",
                labels.speaker, labels.speaker
            ),
            "When participants contradict each other, show both positions and mark the slide \
             as a point to clarify."
                .to_string(),
            "Recommended outline: context and goal; participants; key topics discussed; \
             decisions made; open questions and contradictions; risks; next steps."
                .to_string(),
            format!(
                "End with a \"{}\" checklist, one item per line, as \
                 \"[ ] <task> - {}: [{}] - {}: [{}]\".",
                labels.action_items, labels.owner, labels.owner, labels.deadline, labels.deadline
            ),
        ];
        lines.join("\n")
    }
}
