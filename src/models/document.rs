use serde::Serialize;

use crate::models::episode::{Episode, LineKind};

/// One transcript line flattened with its episode metadata, shaped for
/// the transcripts index
#[derive(Debug, Clone, Serialize)]
pub struct LineDocument {
    pub season: u8,
    pub episode_number: u16,
    pub episode_title: String,
    pub filename: String,
    pub content_warnings: Vec<String>,
    pub position: u16,
    #[serde(rename = "type")]
    pub kind: LineKind,
    pub characters: Option<Vec<String>>,
    pub line: String,
}

impl LineDocument {
    /// Build one document per line of the episode
    pub fn from_episode(episode: &Episode) -> Vec<Self> {
        episode
            .lines
            .iter()
            .map(|line| Self {
                season: episode.season,
                episode_number: episode.episode_number,
                episode_title: episode.episode_title.clone(),
                filename: episode.filename.clone(),
                content_warnings: episode.content_warnings.clone(),
                position: line.position,
                kind: line.kind,
                characters: line.characters.clone(),
                line: line.line.clone(),
            })
            .collect()
    }

    /// Stable document id so re-runs upsert instead of duplicating
    pub fn id(&self) -> String {
        format!("{}-{}", self.episode_number, self.position)
    }
}

/// Episode metadata without the lines, shaped for the episodes index
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeDocument {
    pub season: u8,
    pub episode_number: u16,
    pub episode_title: String,
    pub filename: String,
    pub content_warnings: Vec<String>,
}

impl EpisodeDocument {
    pub fn from_episode(episode: &Episode) -> Self {
        Self {
            season: episode.season,
            episode_number: episode.episode_number,
            episode_title: episode.episode_title.clone(),
            filename: episode.filename.clone(),
            content_warnings: episode.content_warnings.clone(),
        }
    }

    /// Stable document id so re-runs upsert instead of duplicating
    pub fn id(&self) -> String {
        self.episode_number.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::episode::TranscriptLine;

    fn sample_episode() -> Episode {
        Episode {
            episode_number: 187,
            episode_title: "Checking Out".to_string(),
            season: 5,
            filename: "mag187.txt".to_string(),
            content_warnings: vec!["Death".to_string()],
            lines: vec![
                TranscriptLine::new(1, "[CLICK]", LineKind::Sfx, None),
                TranscriptLine::new(
                    2,
                    "Hello?",
                    LineKind::Speaking,
                    Some(vec!["HELEN".to_string()]),
                ),
            ],
        }
    }

    #[test]
    fn test_line_documents_copy_episode_metadata() {
        let docs = LineDocument::from_episode(&sample_episode());
        assert_eq!(docs.len(), 2);
        for doc in &docs {
            assert_eq!(doc.season, 5);
            assert_eq!(doc.episode_number, 187);
            assert_eq!(doc.episode_title, "Checking Out");
            assert_eq!(doc.filename, "mag187.txt");
            assert_eq!(doc.content_warnings, vec!["Death"]);
        }
        assert_eq!(docs[0].line, "CLICK");
        assert_eq!(docs[0].kind, LineKind::Sfx);
        assert_eq!(docs[1].characters, Some(vec!["HELEN".to_string()]));
    }

    #[test]
    fn test_line_document_ids_follow_position() {
        let docs = LineDocument::from_episode(&sample_episode());
        assert_eq!(docs[0].id(), "187-1");
        assert_eq!(docs[1].id(), "187-2");
    }

    #[test]
    fn test_episode_document_id_is_episode_number() {
        let doc = EpisodeDocument::from_episode(&sample_episode());
        assert_eq!(doc.id(), "187");
        assert_eq!(doc.episode_title, "Checking Out");
    }

    #[test]
    fn test_line_document_serializes_kind_as_type() {
        let docs = LineDocument::from_episode(&sample_episode());
        let value = serde_json::to_value(&docs[0]).unwrap();
        assert_eq!(value["type"], "sfx");
        assert_eq!(value["position"], 1);
    }
}
