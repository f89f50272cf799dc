//! Deterministic keyword classification of tool output.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::types::{ClassifiedLine, Severity};

const SUCCESS_KEYWORDS: [&str; 4] = ["success", "succeed", "passed", "complete"];

// A zero count ("0 warnings", "no warnings or errors") negates every keyword in
// the list it introduces. Negated phrases are removed before the substring
// checks.
static NEGATED_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:0|no|zero)\s+(?:warnings?|errors?)\b(?:(?:\s*,\s*|\s+(?:or|and|nor)\s+)(?:warnings?|errors?)\b)*",
    )
    .expect("valid negated count regex")
});

/// Classify standard output line by line.
///
/// Priority is fixed: success, then warning, then error, then plain. Interior
/// empty lines are kept; trailing line terminators of the whole text are not
/// turned into empty lines.
pub fn classify_output(text: &str) -> Vec<ClassifiedLine> {
    split_lines(text)
        .map(|line| ClassifiedLine {
            severity: classify_line(line),
            text: line.to_string(),
        })
        .collect()
}

/// Classify standard error: every non-blank line is highlighted, blank lines
/// are dropped.
pub fn classify_errors(text: &str) -> Vec<ClassifiedLine> {
    split_lines(text)
        .filter(|line| !line.trim().is_empty())
        .map(|line| ClassifiedLine {
            severity: Severity::Highlighted,
            text: line.to_string(),
        })
        .collect()
}

/// Tag a single line.
///
/// Keywords match as case-insensitive substrings, so `TypeError` is an error
/// and `DeprecationWarning` a warning.
pub fn classify_line(line: &str) -> Severity {
    let lowered = line.to_lowercase();
    if SUCCESS_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        return Severity::Success;
    }
    let counted = NEGATED_COUNT.replace_all(&lowered, " ");
    if counted.contains("warning") {
        Severity::Warning
    } else if counted.contains("error") {
        Severity::Error
    } else {
        Severity::Plain
    }
}

/// Render classified lines with their markers, joined by newlines.
pub fn render_lines(lines: &[ClassifiedLine]) -> String {
    lines
        .iter()
        .map(ClassifiedLine::render)
        .collect::<Vec<_>>()
        .join("\n")
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let trimmed = text.trim_end_matches(['\n', '\r']);
    let lines = if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.split('\n'))
    };
    lines
        .into_iter()
        .flatten()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn severities(lines: &[ClassifiedLine]) -> Vec<Severity> {
        lines.iter().map(|line| line.severity).collect()
    }

    #[test]
    fn success_checked_before_error() {
        assert_eq!(
            classify_line("Build succeeded despite 1 error warning"),
            Severity::Success
        );
    }

    #[test]
    fn warning_checked_before_error() {
        assert_eq!(
            classify_line("warning: unused variable, error count 1"),
            Severity::Warning
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(classify_line("ALL TESTS PASSED"), Severity::Success);
        assert_eq!(classify_line("Warning: deprecated"), Severity::Warning);
        assert_eq!(classify_line("ERROR: missing include"), Severity::Error);
        assert_eq!(classify_line("Analysis Complete"), Severity::Success);
        assert_eq!(classify_line("just some text"), Severity::Plain);
    }

    #[test]
    fn zero_counts_do_not_imply_category() {
        assert_eq!(classify_line("Checking... 0 warnings"), Severity::Plain);
        assert_eq!(classify_line("no errors found"), Severity::Plain);
        assert_eq!(classify_line("3 warnings generated."), Severity::Warning);
        assert_eq!(classify_line("0 warnings, 2 errors"), Severity::Error);
    }

    #[test]
    fn keywords_match_inside_words() {
        assert_eq!(classify_line("TypeError: x"), Severity::Error);
        assert_eq!(
            classify_line("ZeroDivisionError: division by zero"),
            Severity::Error
        );
        assert_eq!(classify_line("DeprecationWarning: old api"), Severity::Warning);
        assert_eq!(classify_line("Build unsuccessful"), Severity::Success);
        assert_eq!(classify_line("Run incomplete"), Severity::Success);
        assert_eq!(classify_line("file.cpp:3: error: expected ';'"), Severity::Error);
        assert_eq!(classify_line("redirecting stderr"), Severity::Plain);
    }

    #[test]
    fn zero_count_negates_the_whole_list() {
        assert_eq!(classify_line("No warnings or errors found"), Severity::Plain);
        assert_eq!(classify_line("0 errors, 0 warnings"), Severity::Plain);
        assert_eq!(classify_line("no errors, 2 warnings"), Severity::Warning);
        assert_eq!(classify_line("TypeError: no errors expected"), Severity::Error);
        assert_eq!(classify_line("I know warnings exist"), Severity::Warning);
    }

    #[test]
    fn preserves_order_and_interior_empty_lines() {
        let lines = classify_output("Checking... 0 warnings\n\nAll checks passed\n");
        assert_eq!(
            severities(&lines),
            vec![Severity::Plain, Severity::Plain, Severity::Success]
        );
        assert_eq!(lines[0].text, "Checking... 0 warnings");
        assert_eq!(lines[1].text, "");
        assert_eq!(lines[2].text, "All checks passed");
    }

    #[test]
    fn empty_text_yields_no_lines() {
        assert!(classify_output("").is_empty());
        assert!(classify_output("\n").is_empty());
        assert!(classify_errors("  \n").is_empty());
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let lines = classify_output("a\r\nerror b\r\n");
        assert_eq!(lines[0].text, "a");
        assert_eq!(lines[1].text, "error b");
        assert_eq!(lines[1].severity, Severity::Error);
    }

    #[test]
    fn errors_highlight_every_non_blank_line() {
        let lines = classify_errors("compiling\n\nall passed\n  \nfatal");
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.severity == Severity::Highlighted));
        assert_eq!(lines[1].text, "all passed");
    }

    #[test]
    fn reclassifying_rendered_output_is_stable() {
        let source = "Running tests\nwarning: slow test\nerror: boom\ntests passed\n\nbye";
        let first = classify_output(source);
        let rendered = render_lines(&first);
        let stripped: Vec<String> = rendered
            .split('\n')
            .zip(&first)
            .map(|(line, original)| {
                line.strip_prefix(original.severity.marker())
                    .unwrap_or(line)
                    .to_string()
            })
            .collect();
        let second = classify_output(&stripped.join("\n"));
        assert_eq!(severities(&first), severities(&second));
    }

    #[test]
    fn render_prefixes_markers() {
        let rendered = render_lines(&classify_output("ok\nwarning: x"));
        assert_eq!(rendered, "ok\n🟡 warning: x");
    }
}
