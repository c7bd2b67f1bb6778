use tracing::debug;

use crate::models::LineKind;
use crate::parser::header::is_legacy_title;

/// Lines starting with this (case-insensitive) open the warning block
const CONTENT_WARNING_MARKER: &str = "content warning";

/// Suffixes of the theme music marker that opens episode content. The
/// archive includes a handful of "Into" typos that still count.
const INTRO_SUFFIXES: [&str; 3] = [" intro]", " -intro]", " into]"];

/// Suffixes of the theme music marker that closes episode content
const OUTRO_SUFFIXES: [&str; 2] = [" outro]", " -outro]"];

/// Start of the distribution notice trailing every transcript. Some
/// transcripts are missing the outro marker but all of them carry this.
const LICENSE_LINE: &str = "the magnus archives is a podcast distributed by rusty quill \
and licensed under a creative commons attribution non-commercial sharealike 4.0 \
international licence";

/// Speaker-header annotations that are not part of the name
const CONTINUATION_MARKERS: [&str; 9] = [
    "(CONTINUED)",
    "(CONT’D)",
    "(CONT'D)",
    "(CON’T)",
    "(STATEMENT)",
    "(BACKGROUND)",
    "(DISTANT)",
    "(Cont.)",
    "Cont.",
];

/// What the classifier decided for one logical line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Marker, speaker header or out-of-transcript line; nothing is stored
    Consumed,
    /// The line belongs to the content-warning block
    ContentWarning(String),
    /// The line is transcript content
    Line {
        kind: LineKind,
        characters: Option<Vec<String>>,
    },
}

/// Where the classifier currently is within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the warning block or after the transcript ended
    Outside,
    /// Inside the content-warning block at the top
    ContentWarnings,
    /// Inside episode content
    InTranscript,
}

/// Stateful per-line classifier. Lines are fed in reading order and the
/// state carries across paragraphs, so a marker in one paragraph governs
/// everything after it. Classification never fails; anything ambiguous
/// inside the transcript falls through to spoken dialogue.
pub struct LineClassifier {
    state: State,
    speakers: Option<Vec<String>>,
    last_was_actor: bool,
    legacy_title: bool,
}

impl LineClassifier {
    pub fn new(episode_title: &str) -> Self {
        Self {
            state: State::Outside,
            speakers: None,
            last_was_actor: false,
            legacy_title: is_legacy_title(episode_title),
        }
    }

    /// Classify one trimmed logical line. Marker rules run first in a fixed
    /// order, then the line is handled according to the current state.
    pub fn step(&mut self, line: &str) -> LineOutcome {
        if is_content_warning_marker(line) {
            debug!("content warning block starts: {:?}", line);
            self.state = State::ContentWarnings;
            return LineOutcome::Consumed;
        }
        if is_theme_intro(line) {
            debug!("theme intro: {:?}", line);
            self.state = State::InTranscript;
            return LineOutcome::Consumed;
        }
        if is_theme_outro(line) {
            debug!("theme outro: {:?}", line);
            self.state = State::Outside;
            return LineOutcome::Consumed;
        }
        if is_license_line(line) {
            debug!("license notice: {:?}", line);
            self.state = State::Outside;
            return LineOutcome::Consumed;
        }

        // Some transcripts have no theme marker after the warning block.
        // The first line shaped like content flips the state over.
        if self.state == State::ContentWarnings
            && (is_sfx_line(line) || is_acting_line(line) || is_actor_line(line))
        {
            self.state = State::InTranscript;
        }
        // The early case-numbered transcripts carry no warnings and no
        // theme marker at all; they open straight on a tape click.
        if self.legacy_title && is_sfx_line(line) {
            self.state = State::InTranscript;
        }

        match self.state {
            State::Outside => LineOutcome::Consumed,
            State::ContentWarnings => {
                LineOutcome::ContentWarning(strip_bullet(line).to_string())
            }
            State::InTranscript => self.classify_content(line),
        }
    }

    fn classify_content(&mut self, line: &str) -> LineOutcome {
        // An all-uppercase line names the speakers of what follows, unless
        // the previous line already did; then it has to be dialogue that
        // happens to be shouted in uppercase.
        if is_actor_line(line) && !self.last_was_actor {
            let speakers = split_actor_names(line);
            debug!("speaker header: {:?}", speakers);
            self.speakers = Some(speakers);
            self.last_was_actor = true;
            return LineOutcome::Consumed;
        }
        self.last_was_actor = false;

        if is_sfx_line(line) {
            return LineOutcome::Line {
                kind: LineKind::Sfx,
                characters: None,
            };
        }
        if is_acting_line(line) {
            return LineOutcome::Line {
                kind: LineKind::Acting,
                characters: self.speakers.clone(),
            };
        }
        LineOutcome::Line {
            kind: LineKind::Speaking,
            characters: self.speakers.clone(),
        }
    }
}

fn is_content_warning_marker(line: &str) -> bool {
    line.to_lowercase().starts_with(CONTENT_WARNING_MARKER)
}

fn is_theme_intro(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.starts_with('[') && INTRO_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

fn is_theme_outro(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.starts_with('[') && OUTRO_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

fn is_license_line(line: &str) -> bool {
    line.to_lowercase().starts_with(LICENSE_LINE)
}

/// Sound effect lines are bracketed; OCR sometimes turns one bracket
/// into a brace, so those shapes count too
fn is_sfx_line(line: &str) -> bool {
    (line.starts_with('[') && line.ends_with(']'))
        || (line.starts_with('{') && line.ends_with(']'))
        || (line.starts_with('[') && line.ends_with('}'))
}

fn is_acting_line(line: &str) -> bool {
    line.starts_with('(') && line.ends_with(')')
}

/// A speaker header is all uppercase once its annotations are removed,
/// and is not shaped like a sound effect or acting instruction
fn is_actor_line(line: &str) -> bool {
    let name = strip_continuation_markers(line);
    is_all_uppercase(&name) && !is_sfx_line(line) && !is_acting_line(line)
}

/// No lowercase characters and at least one uppercase character
fn is_all_uppercase(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

fn strip_continuation_markers(line: &str) -> String {
    let mut cleaned = line.to_string();
    for marker in CONTINUATION_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    cleaned.trim().to_string()
}

/// Split a speaker header into individual names. Headers separate
/// multiple speakers by comma, slash or "AND", sometimes mixed.
fn split_actor_names(line: &str) -> Vec<String> {
    let cleaned = strip_continuation_markers(line);
    let mut names = Vec::new();
    for by_comma in cleaned.split(',') {
        for by_slash in by_comma.trim().split('/') {
            for name in by_slash.trim().split(" AND ") {
                names.push(name.trim().to_string());
            }
        }
    }
    names
}

fn strip_bullet(line: &str) -> &str {
    line.strip_prefix("- ").unwrap_or(line)
}
