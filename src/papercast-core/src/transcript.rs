//! Transcript parsing.
//!
//! The dialogue generator asks the model for lines in the form
//! `Speaker: "utterance"`, but nothing upstream enforces that, so the
//! parser is best-effort by design: malformed lines are dropped and
//! reported, never treated as a failure.

/// One parsed (speaker, text) line from the generated transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Speaker name as it appeared before the first `": "`.
    pub speaker: String,
    /// Utterance text, trimmed, with surrounding quotes stripped.
    pub text: String,
}

/// A line that did not match the `Speaker: "text"` convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// Line index within the blank-stripped transcript (0-based).
    pub index: usize,
    /// The offending line, verbatim.
    pub line: String,
}

/// Result of parsing a transcript: recognized utterances in input
/// order, plus the lines that were dropped.
#[derive(Debug, Clone, Default)]
pub struct ParsedTranscript {
    pub utterances: Vec<Utterance>,
    pub skipped: Vec<SkippedLine>,
}

/// Remove empty and whitespace-only lines, preserving order.
pub fn remove_empty_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a raw transcript into ordered utterances.
///
/// Each non-blank line is split on the first `": "`. Lines without the
/// separator land in `skipped` instead of the output. Total over any
/// input; never fails.
pub fn parse_transcript(text: &str) -> ParsedTranscript {
    let text = remove_empty_lines(text);

    let mut parsed = ParsedTranscript::default();
    for (index, line) in text.trim().split('\n').enumerate() {
        match line.split_once(": ") {
            Some((speaker, dialogue)) => {
                let dialogue = strip_quotes(dialogue.trim());
                parsed.utterances.push(Utterance {
                    speaker: speaker.to_string(),
                    text: dialogue.to_string(),
                });
            }
            None => {
                parsed.skipped.push(SkippedLine {
                    index,
                    line: line.to_string(),
                });
            }
        }
    }
    parsed
}

/// Strip at most one leading and one trailing double quote.
fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(parsed: &ParsedTranscript) -> Vec<(&str, &str)> {
        parsed
            .utterances
            .iter()
            .map(|u| (u.speaker.as_str(), u.text.as_str()))
            .collect()
    }

    #[test]
    fn test_parse_basic_dialogue() {
        let parsed = parse_transcript("A: \"hi\"\nB: bye\n\nC no colon");
        assert_eq!(pairs(&parsed), vec![("A", "hi"), ("B", "bye")]);
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].line, "C no colon");
    }

    #[test]
    fn test_parse_strips_surrounding_quotes() {
        let parsed = parse_transcript("Research Summarizer: \"The paper shows X.\"");
        assert_eq!(
            pairs(&parsed),
            vec![("Research Summarizer", "The paper shows X.")]
        );
    }

    #[test]
    fn test_parse_splits_on_first_separator_only() {
        let parsed = parse_transcript("Concept Explainer: Note: use caution");
        assert_eq!(pairs(&parsed), vec![("Concept Explainer", "Note: use caution")]);
    }

    #[test]
    fn test_parse_preserves_input_order() {
        let parsed = parse_transcript("A: one\nB: two\nA: three");
        assert_eq!(pairs(&parsed), vec![("A", "one"), ("B", "two"), ("A", "three")]);
    }

    #[test]
    fn test_parse_strips_at_most_one_quote_per_side() {
        let parsed = parse_transcript("A: \"\"doubled\"\"");
        assert_eq!(pairs(&parsed), vec![("A", "\"doubled\"")]);
    }

    #[test]
    fn test_parse_is_total_over_odd_input() {
        // No panic on empty, whitespace, or colon-free input.
        assert!(parse_transcript("").utterances.is_empty());
        assert!(parse_transcript("\n\n  \n\t\n").utterances.is_empty());
        let parsed = parse_transcript("no separators here\n:::\n pure noise ");
        assert!(parsed.utterances.is_empty());
        assert_eq!(parsed.skipped.len(), 3);
    }

    #[test]
    fn test_remove_empty_lines_keeps_order() {
        assert_eq!(remove_empty_lines("a\n\n  \nb\nc\n"), "a\nb\nc");
    }

    #[test]
    fn test_parse_line_with_colon_but_no_space_is_skipped() {
        let parsed = parse_transcript("Speaker:no space after colon");
        assert!(parsed.utterances.is_empty());
        assert_eq!(parsed.skipped.len(), 1);
    }
}
