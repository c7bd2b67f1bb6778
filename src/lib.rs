pub mod es;
pub mod io;
pub mod models;
pub mod parser;

pub use es::{ElasticClient, KibanaClient};
pub use io::{collect_transcript_files, parse_transcript_file, split_paragraphs};
pub use models::{Episode, EpisodeDocument, LineDocument, LineKind, TranscriptLine};
pub use parser::{LineClassifier, LineOutcome, ParseError, parse_document};
