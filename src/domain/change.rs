/// Characters per token used by the budget heuristic. This is a rough
/// approximation, not a tokenizer; override it through `chars_per_token`.
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

pub const NO_DIFF_PLACEHOLDER: &str =
    "_No diff is available for this file (binary file or diff too large to display)._";
pub const PATCH_TRUNCATION_MARKER: &str = "\n... [diff truncated]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Added => "added",
            FileStatus::Modified => "modified",
            FileStatus::Removed => "removed",
            FileStatus::Renamed => "renamed",
        }
    }

    /// Maps a GitHub file status. `copied`, `changed` and `unchanged` carry
    /// content edits in place and are reported as modified.
    pub fn from_api(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "added" => FileStatus::Added,
            "removed" => FileStatus::Removed,
            "renamed" => FileStatus::Renamed,
            _ => FileStatus::Modified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub lines_added: u64,
    pub lines_removed: u64,
    pub status: FileStatus,
    pub patch: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    pub budget_tokens: usize,
    pub max_patch_chars: usize,
    pub chars_per_token: usize,
}

impl SummaryOptions {
    pub fn new(budget_tokens: usize, max_patch_chars: usize) -> Self {
        Self {
            budget_tokens,
            max_patch_chars,
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
        }
    }

    pub fn with_chars_per_token(mut self, chars_per_token: usize) -> Self {
        self.chars_per_token = chars_per_token;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSetSummary {
    pub text: String,
    pub included_count: usize,
    pub total_count: usize,
    pub truncated: bool,
}

impl ChangeSetSummary {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            included_count: 0,
            total_count: 0,
            truncated: false,
        }
    }
}

pub fn estimate_tokens(text: &str, chars_per_token: usize) -> usize {
    text.chars().count().div_ceil(chars_per_token.max(1))
}

/// Renders the change set into one text block that fits the token budget.
///
/// Files are taken in order until the next section would push the running
/// estimate over `budget_tokens`. The first file is always included, even
/// when its section alone exceeds the budget.
pub fn summarize(files: &[FileChange], options: &SummaryOptions) -> ChangeSetSummary {
    if files.is_empty() {
        return ChangeSetSummary::empty();
    }

    let total_count = files.len();
    let mut text = String::new();
    let mut running_tokens = 0usize;
    let mut included_count = 0usize;

    for file in files {
        let section = render_section(file, options.max_patch_chars);
        let section_tokens = estimate_tokens(&section, options.chars_per_token);

        if included_count > 0 && running_tokens + section_tokens > options.budget_tokens {
            text.push_str(&truncation_note(included_count, total_count));
            return ChangeSetSummary {
                text,
                included_count,
                total_count,
                truncated: true,
            };
        }

        text.push_str(&section);
        running_tokens += section_tokens;
        included_count += 1;
    }

    ChangeSetSummary {
        text,
        included_count,
        total_count,
        truncated: false,
    }
}

pub fn render_section(file: &FileChange, max_patch_chars: usize) -> String {
    let mut section = format!(
        "### {path}\nStatus: {status} | +{added} / -{removed}\n\n",
        path = file.path,
        status = file.status.as_str(),
        added = file.lines_added,
        removed = file.lines_removed,
    );

    match &file.patch {
        None => {
            section.push_str(NO_DIFF_PLACEHOLDER);
            section.push('\n');
        }
        Some(patch) => {
            section.push_str("```diff\n");
            section.push_str(&patch_excerpt(patch, max_patch_chars));
            section.push_str("\n```\n");
        }
    }

    section.push('\n');
    section
}

fn patch_excerpt(patch: &str, max_patch_chars: usize) -> String {
    match patch.char_indices().nth(max_patch_chars) {
        None => patch.to_string(),
        Some((cut, _)) => format!("{}{}", &patch[..cut], PATCH_TRUNCATION_MARKER),
    }
}

fn truncation_note(included_count: usize, total_count: usize) -> String {
    format!(
        "_Note: {included_count} of {total_count} changed files are included; \
         the remaining files were omitted to fit the review token budget._\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, patch: Option<&str>) -> FileChange {
        FileChange {
            path: path.to_string(),
            lines_added: 5,
            lines_removed: 2,
            status: FileStatus::Modified,
            patch: patch.map(str::to_string),
        }
    }

    fn options(budget_tokens: usize, max_patch_chars: usize) -> SummaryOptions {
        SummaryOptions::new(budget_tokens, max_patch_chars)
    }

    #[test]
    fn empty_change_set_produces_empty_summary() {
        let summary = summarize(&[], &options(1000, 4000));

        assert_eq!(summary, ChangeSetSummary::empty());
    }

    #[test]
    fn single_small_file_is_included() {
        let files = vec![file("a.js", Some("diff content"))];
        let summary = summarize(&files, &options(1000, 4000));

        assert_eq!(summary.included_count, 1);
        assert_eq!(summary.total_count, 1);
        assert!(!summary.truncated);
        assert!(summary.text.contains("a.js"));
        assert!(summary.text.contains("Status: modified | +5 / -2"));
        assert!(summary.text.contains("```diff\ndiff content\n```"));
    }

    #[test]
    fn budget_overflow_stops_after_first_file() {
        let patch = "x".repeat(1950);
        let files = vec![
            file("one.rs", Some(&patch)),
            file("two.rs", Some(&patch)),
            file("three.rs", Some(&patch)),
        ];
        let section_tokens = estimate_tokens(&render_section(&files[0], 4000), 4);
        assert!((490..=510).contains(&section_tokens));

        let summary = summarize(&files, &options(600, 4000));

        assert_eq!(summary.included_count, 1);
        assert_eq!(summary.total_count, 3);
        assert!(summary.truncated);
        assert!(summary.text.contains("1 of 3"));
        assert!(summary.text.contains("one.rs"));
        assert!(!summary.text.contains("two.rs"));
    }

    #[test]
    fn oversized_first_file_is_kept_and_next_file_truncates() {
        let files = vec![
            file("huge.rs", Some(&"y".repeat(3000))),
            file("tiny.rs", Some("+a")),
        ];
        let summary = summarize(&files, &options(10, 4000));

        assert_eq!(summary.included_count, 1);
        assert!(summary.truncated);
        assert!(summary.text.contains(&"y".repeat(3000)));
        assert!(summary.text.contains("1 of 2"));
    }

    #[test]
    fn all_files_fit_within_budget() {
        let files = vec![file("a.rs", Some("+1")), file("b.rs", None)];
        let summary = summarize(&files, &options(1000, 4000));

        assert_eq!(summary.included_count, 2);
        assert!(!summary.truncated);
        assert!(summary.text.find("a.rs") < summary.text.find("b.rs"));
        assert!(!summary.text.contains(" of 2"));
    }

    #[test]
    fn missing_patch_renders_placeholder() {
        let section = render_section(&file("logo.png", None), 4000);

        assert!(section.contains(NO_DIFF_PLACEHOLDER));
        assert!(!section.contains("```diff"));
    }

    #[test]
    fn long_patch_is_cut_at_character_limit() {
        let head = "a".repeat(100);
        let short = file("long.rs", Some(&format!("{head}{}", "b".repeat(50))));
        let longer = file("long.rs", Some(&format!("{head}{}", "b".repeat(5000))));

        let section = render_section(&short, 100);

        assert!(section.contains(&format!("{head}{PATCH_TRUNCATION_MARKER}")));
        assert!(!section.contains('b'));
        assert_eq!(section.len(), render_section(&longer, 100).len());
    }

    #[test]
    fn patch_cut_respects_multibyte_characters() {
        let change = file("i18n.txt", Some("héllo wörld"));
        let section = render_section(&change, 4);

        assert!(section.contains(&format!("héll{PATCH_TRUNCATION_MARKER}")));
    }

    #[test]
    fn patch_at_limit_is_verbatim() {
        let section = render_section(&file("exact.rs", Some("abcd")), 4);

        assert!(section.contains("```diff\nabcd\n```"));
        assert!(!section.contains(PATCH_TRUNCATION_MARKER));
    }

    #[test]
    fn summarize_is_idempotent() {
        let files = vec![file("a.rs", Some("+1")), file("b.rs", Some(&"z".repeat(900)))];
        let opts = options(200, 500);

        assert_eq!(summarize(&files, &opts), summarize(&files, &opts));
    }

    #[test]
    fn included_count_bounds_hold_across_budgets() {
        let files: Vec<_> = (0..6)
            .map(|i| file(&format!("f{i}.rs"), Some(&"q".repeat(i * 150))))
            .collect();

        for budget in [1, 50, 120, 300, 10_000] {
            let summary = summarize(&files, &options(budget, 400));
            assert!(summary.included_count >= 1);
            assert!(summary.included_count <= summary.total_count);
            assert_eq!(
                summary.truncated,
                summary.included_count < summary.total_count
            );
        }
    }

    #[test]
    fn chars_per_token_is_overridable() {
        let files = vec![file("a.rs", Some(&"k".repeat(560))), file("b.rs", Some("+1"))];
        let coarse = summarize(&files, &options(150, 4000));
        let fine = summarize(&files, &options(150, 4000).with_chars_per_token(8));

        assert!(coarse.truncated);
        assert!(!fine.truncated);
    }

    #[test]
    fn parses_api_file_status() {
        assert_eq!(FileStatus::from_api("added"), FileStatus::Added);
        assert_eq!(FileStatus::from_api("REMOVED"), FileStatus::Removed);
        assert_eq!(FileStatus::from_api("renamed"), FileStatus::Renamed);
        assert_eq!(FileStatus::from_api("copied"), FileStatus::Modified);
    }
}
