use serde::{Deserialize, Serialize};

/// How a transcript line was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Sound effect or stage direction in square brackets
    Sfx,
    /// Non-verbal performance note in parentheses
    Acting,
    /// Spoken dialogue
    Speaking,
}

/// A single classified line of episode content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// 1-based position within the episode, assigned in reading order
    pub position: u16,
    /// Cleaned line text with bracket characters removed
    pub line: String,
    /// Classification of the line
    #[serde(rename = "type")]
    pub kind: LineKind,
    /// Speakers the line is attributed to; absent for sound effects and
    /// for dialogue before the first speaker header
    pub characters: Option<Vec<String>>,
}

impl TranscriptLine {
    /// Build a line at the given position, cleaning the raw text
    pub fn new(position: u16, raw: &str, kind: LineKind, characters: Option<Vec<String>>) -> Self {
        Self {
            position,
            line: clean_line(raw),
            kind,
            characters,
        }
    }
}

/// Trim surrounding whitespace and drop every bracket character
fn clean_line(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '(' | ')'))
        .collect()
}

/// A fully parsed episode transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Episode number from the "MAG N" header
    pub episode_number: u16,
    /// Episode title from the header
    pub episode_title: String,
    /// Season derived from the episode number (40 episodes per season)
    pub season: u8,
    /// Name of the source file the transcript came from
    pub filename: String,
    /// Content warnings listed at the top of the transcript
    pub content_warnings: Vec<String>,
    /// Classified lines in reading order
    pub lines: Vec<TranscriptLine>,
}

impl Episode {
    /// Distinct speaker names in order of first appearance
    pub fn speakers(&self) -> Vec<String> {
        let mut speakers = Vec::new();
        for line in &self.lines {
            if let Some(characters) = &line.characters {
                for name in characters {
                    if !speakers.contains(name) {
                        speakers.push(name.clone());
                    }
                }
            }
        }
        speakers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_line_removes_brackets() {
        assert_eq!(clean_line("  [TAPE CLICKS ON] "), "TAPE CLICKS ON");
        assert_eq!(clean_line("(soft laugh)"), "soft laugh");
        assert_eq!(clean_line("He said (quietly) [pause] no."), "He said quietly pause no.");
    }

    #[test]
    fn test_clean_line_keeps_braces() {
        // OCR sometimes turns a square bracket into a brace; those survive
        assert_eq!(clean_line("{CREAK]"), "{CREAK");
        assert_eq!(clean_line("[THUNDER}"), "THUNDER}");
    }

    #[test]
    fn test_new_cleans_text() {
        let line = TranscriptLine::new(3, " [DOOR OPENS] ", LineKind::Sfx, None);
        assert_eq!(line.position, 3);
        assert_eq!(line.line, "DOOR OPENS");
        assert_eq!(line.kind, LineKind::Sfx);
        assert!(line.characters.is_none());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&LineKind::Sfx).unwrap(), "\"sfx\"");
        assert_eq!(serde_json::to_string(&LineKind::Acting).unwrap(), "\"acting\"");
        assert_eq!(serde_json::to_string(&LineKind::Speaking).unwrap(), "\"speaking\"");
    }

    #[test]
    fn test_line_serializes_kind_as_type() {
        let line = TranscriptLine::new(1, "Hello.", LineKind::Speaking, Some(vec!["JON".to_string()]));
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["type"], "speaking");
        assert_eq!(value["characters"][0], "JON");
    }

    #[test]
    fn test_speakers_in_first_appearance_order() {
        let episode = Episode {
            episode_number: 1,
            episode_title: "Anglerfish".to_string(),
            season: 1,
            filename: "mag001.txt".to_string(),
            content_warnings: vec![],
            lines: vec![
                TranscriptLine::new(1, "Statement begins.", LineKind::Speaking, Some(vec!["JON".to_string()])),
                TranscriptLine::new(2, "CLICK", LineKind::Sfx, None),
                TranscriptLine::new(
                    3,
                    "Together now.",
                    LineKind::Speaking,
                    Some(vec!["MARTIN".to_string(), "JON".to_string()]),
                ),
            ],
        };
        assert_eq!(episode.speakers(), vec!["JON", "MARTIN"]);
    }
}
