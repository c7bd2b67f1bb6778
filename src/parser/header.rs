use std::sync::LazyLock;

use regex::Regex;

use crate::parser::ParseError;

/// Header shapes seen across the transcript archive: "MAG 187 — Checking Out",
/// "MAG – 012 – First Aid", "MAG 120.1 - Priority Boarding". Dashes around the
/// number vary by era and the title keeps curly quotes as typed.
static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^MAG\s?[-–—]?\s?(?P<number>\d+\.?\d*)\s[-–—]?\s?(?P<title>[\w\s’'\-–"“”]+)$"#)
        .expect("Invalid header regex")
});

/// Episode titles from the earliest transcripts that carry a case number
/// instead of a name, e.g. "Case 0122204"
static LEGACY_TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Case\s\d+[-\w]?").expect("Invalid legacy title regex"));

/// Episode number and title extracted from the first paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeHeader {
    pub number: u16,
    pub title: String,
}

/// Parse the "MAG N — Title" header paragraph
pub fn parse_header(paragraph: &str) -> Result<EpisodeHeader, ParseError> {
    let captures = HEADER_PATTERN
        .captures(paragraph)
        .ok_or_else(|| ParseError::Header(paragraph.to_string()))?;
    // A few special episodes are numbered "120.1"; only the whole part counts
    let raw_number = &captures["number"];
    let whole = match raw_number.split_once('.') {
        Some((whole, _)) => whole,
        None => raw_number,
    };
    let number = whole
        .parse::<u16>()
        .map_err(|_| ParseError::Header(paragraph.to_string()))?;
    Ok(EpisodeHeader {
        number,
        title: captures["title"].to_string(),
    })
}

/// Whether a title follows the early "Case NNNNNNN" naming
pub fn is_legacy_title(title: &str) -> bool {
    LEGACY_TITLE_PATTERN.is_match(title)
}

/// Season for an episode number, 40 episodes per season
pub fn season_for(episode_number: u16) -> Result<u8, ParseError> {
    match episode_number {
        1..=40 => Ok(1),
        41..=80 => Ok(2),
        81..=120 => Ok(3),
        121..=160 => Ok(4),
        161..=200 => Ok(5),
        other => Err(ParseError::Season(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_with_em_dash() {
        let header = parse_header("MAG 187 — Checking Out").unwrap();
        assert_eq!(header.number, 187);
        assert_eq!(header.title, "Checking Out");
    }

    #[test]
    fn test_parse_header_with_dash_before_number() {
        let header = parse_header("MAG – 012 – First Aid").unwrap();
        assert_eq!(header.number, 12);
        assert_eq!(header.title, "First Aid");
    }

    #[test]
    fn test_parse_header_without_dashes() {
        let header = parse_header("MAG 1 Anglerfish").unwrap();
        assert_eq!(header.number, 1);
        assert_eq!(header.title, "Anglerfish");
    }

    #[test]
    fn test_parse_header_fractional_number_keeps_whole_part() {
        let header = parse_header("MAG 120.1 - Priority Boarding").unwrap();
        assert_eq!(header.number, 120);
        assert_eq!(header.title, "Priority Boarding");
    }

    #[test]
    fn test_parse_header_keeps_curly_quotes_in_title() {
        let header = parse_header("MAG 39 — Infestation’s End").unwrap();
        assert_eq!(header.title, "Infestation’s End");
    }

    #[test]
    fn test_parse_header_rejects_non_header() {
        assert!(matches!(
            parse_header("Statement of Nathan Watts"),
            Err(ParseError::Header(_))
        ));
        assert!(matches!(parse_header(""), Err(ParseError::Header(_))));
    }

    #[test]
    fn test_parse_header_rejects_missing_title() {
        assert!(parse_header("MAG 42").is_err());
    }

    #[test]
    fn test_legacy_title_detection() {
        assert!(is_legacy_title("Case 0122204"));
        assert!(is_legacy_title("Case 9220611 Zaid Muhyedeen"));
        assert!(!is_legacy_title("Checking Out"));
        assert!(!is_legacy_title("The Case of Mr. Spider"));
    }

    #[test]
    fn test_season_boundaries() {
        assert_eq!(season_for(1).unwrap(), 1);
        assert_eq!(season_for(40).unwrap(), 1);
        assert_eq!(season_for(41).unwrap(), 2);
        assert_eq!(season_for(120).unwrap(), 3);
        assert_eq!(season_for(121).unwrap(), 4);
        assert_eq!(season_for(200).unwrap(), 5);
    }

    #[test]
    fn test_season_out_of_range() {
        assert!(matches!(season_for(0), Err(ParseError::Season(0))));
        assert!(matches!(season_for(201), Err(ParseError::Season(201))));
    }
}
