//! Greedy word wrapping.
//!
//! Lines are broken only at whitespace. A word wider than the budget is kept
//! whole on its own line rather than hyphenated. Explicit newlines in the input
//! always start a new line.
//!
//! [`wrap`] measures in characters, which is only an approximation of the
//! rendered width: a line of `m`s and a line of `i`s of the same length occupy
//! very different space in Helvetica. [`wrap_by`] takes any additive measure
//! (e.g. real advance widths) and applies the same break policy.

/// Wrap `text` so that no line exceeds `max_chars` characters, except lines
/// holding a single oversized word.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    wrap_by(text, max_chars as f32, |s| s.chars().count() as f32)
}

/// Wrap `text` against `max_width` using `measure` for word and space widths.
/// `measure` must be additive over concatenation.
///
/// Blank input produces no lines. Blank lines inside the text are kept as
/// empty strings.
pub fn wrap_by<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    if text.trim().is_empty() {
        return Vec::new();
    }

    let space_w = measure(" ");
    let mut lines = Vec::new();

    for raw in text.lines() {
        let mut line = String::new();
        let mut line_w = 0.0f32;

        for word in raw.split_whitespace() {
            let word_w = measure(word);
            if line.is_empty() {
                line.push_str(word);
                line_w = word_w;
            } else if line_w + space_w + word_w > max_width {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
                line_w = word_w;
            } else {
                line.push(' ');
                line.push_str(word);
                line_w += space_w + word_w;
            }
        }

        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_fill() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 15);
        assert_eq!(
            lines,
            vec!["the quick brown", "fox jumps over", "the lazy dog"]
        );
    }

    #[test]
    fn exact_fit_stays_on_line() {
        assert_eq!(wrap("abcd efgh", 9), vec!["abcd efgh"]);
        assert_eq!(wrap("abcd efgh", 8), vec!["abcd", "efgh"]);
    }

    #[test]
    fn oversized_word_kept_whole() {
        let lines = wrap("a supercalifragilistic b", 6);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn newlines_preserved() {
        let lines = wrap("first line\n\nthird", 80);
        assert_eq!(lines, vec!["first line", "", "third"]);
    }

    #[test]
    fn crlf_and_runs_of_whitespace() {
        let lines = wrap("a   b\r\nc\t d", 80);
        assert_eq!(lines, vec!["a b", "c d"]);
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(wrap("", 10).is_empty());
        assert!(wrap("  \n\t ", 10).is_empty());
    }

    #[test]
    fn line_length_bound_holds() {
        let text = "Rear left tyre worn below legal tread depth; windscreen chipped on \
                    passenger side. Service interval overdue by 3200km. Spare wheel \
                    missing. Fire extinguisher expired 2024-11. Antidisestablishmentarianism.";
        for max in [5usize, 12, 20, 33, 90] {
            for line in wrap(text, max) {
                let n = line.chars().count();
                assert!(
                    n <= max || !line.contains(' '),
                    "line {line:?} exceeds {max}"
                );
            }
        }
    }

    #[test]
    fn custom_measure() {
        // Every word costs 10, a space 1.
        let lines = wrap_by("a b c d", 21.0, |s| if s == " " { 1.0 } else { 10.0 });
        assert_eq!(lines, vec!["a b", "c d"]);
    }
}
