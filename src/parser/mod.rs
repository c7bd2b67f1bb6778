pub mod classifier;
pub mod header;

pub use classifier::{LineClassifier, LineOutcome};
pub use header::{EpisodeHeader, parse_header, season_for};

use thiserror::Error;
use tracing::debug;

use crate::models::{Episode, TranscriptLine};

/// Boilerplate lines that carry no transcript content at all
const IGNORED_LINES: [&str; 3] = [
    "",
    "[The Magnus Archives Theme – Intro - Continues]",
    "[Main Body of Statement]",
];

/// Fatal per-document failures. Only the header can fail; everything
/// after it is classified on a best-effort basis.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unrecognized episode header: {0:?}")]
    Header(String),
    #[error("no season for episode number {0}")]
    Season(u16),
}

/// Parse a transcript document into an episode. The first paragraph must
/// be the "MAG N — Title" header; the remaining paragraphs are split into
/// logical lines and fed through the classifier in reading order.
pub fn parse_document(filename: &str, paragraphs: &[String]) -> Result<Episode, ParseError> {
    let first = paragraphs.first().map(String::as_str).unwrap_or("");
    let header = parse_header(first)?;
    let season = season_for(header.number)?;
    debug!(
        "episode {} ({:?}), season {}",
        header.number, header.title, season
    );

    let mut classifier = LineClassifier::new(&header.title);
    let mut content_warnings = Vec::new();
    let mut lines: Vec<TranscriptLine> = Vec::new();

    for paragraph in paragraphs.iter().skip(1) {
        // Paragraphs can hide several logical lines behind embedded
        // line breaks, e.g. a speaker header glued to its dialogue
        for raw in paragraph.lines() {
            let line = raw.trim();
            if IGNORED_LINES.contains(&line) {
                debug!("ignoring line: {:?}", line);
                continue;
            }
            match classifier.step(line) {
                LineOutcome::Consumed => {}
                LineOutcome::ContentWarning(warning) => content_warnings.push(warning),
                LineOutcome::Line { kind, characters } => {
                    let position = lines.len() as u16 + 1;
                    lines.push(TranscriptLine::new(position, line, kind, characters));
                }
            }
        }
    }

    Ok(Episode {
        episode_number: header.number,
        episode_title: header.title,
        season,
        filename: filename.to_string(),
        content_warnings,
        lines,
    })
}
