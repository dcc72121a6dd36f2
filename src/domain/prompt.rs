use crate::domain::change::ChangeSetSummary;
use crate::domain::review::{ReviewDepth, Section, select_template};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub task: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Overview,
    DetailedReview,
}

pub fn prompts_for(
    kind: PromptKind,
    summary: &ChangeSetSummary,
    depth: ReviewDepth,
) -> PromptPair {
    let task = match kind {
        PromptKind::Overview => render_overview_prompt(summary),
        PromptKind::DetailedReview => render_task_prompt(summary, depth),
    };

    PromptPair {
        system: render_system_prompt(depth),
        task,
    }
}

pub fn render_system_prompt(depth: ReviewDepth) -> String {
    format!(
        "<system_role>
  <title>Expert AI Code Reviewer - Your AI Teammate</title>
  <identity>experienced software engineer and code reviewer</identity>
  <focus>ONLY on analyzing actual code changes</focus>
  <ignore>PR titles, descriptions, or other metadata</ignore>
  <approach>thorough, constructive feedback based solely on code modifications</approach>
  <output_format>structured markdown with clear sections</output_format>
  <review_depth>{depth}</review_depth>
</system_role>"
    )
}

/// First model call: a visible overview and per-file change list only.
pub fn render_overview_prompt(summary: &ChangeSetSummary) -> String {
    let sections = [
        render_section(
            Section::Overview,
            "Two to four sentences on what this pull request changes and why it matters.",
        ),
        render_section(
            Section::FileChanges,
            "One bullet per changed file with a short description of its change.",
        ),
    ]
    .join("\n\n");

    format!(
        "<overview_and_changes_request>
  <context>
    You are an AI teammate summarizing a pull request. Describe the change set only;
    do not review it here. A separate detailed review comment will cover quality,
    risks and recommendations.
  </context>

  <files_changed>
{files}
  </files_changed>

  <response_format>
Start the response with the title line \"## 🤖 AI Teammate - Change Overview\",
then use exactly these sections:

{sections}
  </response_format>
</overview_and_changes_request>",
        files = summary.text,
    )
}

/// Second model call: the detailed review shaped by the depth template.
pub fn render_task_prompt(summary: &ChangeSetSummary, depth: ReviewDepth) -> String {
    let template = select_template(depth);

    let sections = template
        .sections
        .iter()
        .map(|(section, guidance)| render_section(*section, guidance))
        .collect::<Vec<_>>()
        .join("\n\n");

    let instructions = template
        .instructions
        .iter()
        .chain(COMMON_INSTRUCTIONS)
        .map(|line| format!("    - {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<review_request>
  <context>
    {context}
  </context>

  <files_changed>
{files}
  </files_changed>

  <review_depth>{depth}</review_depth>
  <analysis_level>{analysis_level}</analysis_level>

  <response_format>
Start the response with the title line \"## 🔍 AI Teammate - Detailed Review\",
then use exactly these sections. Keep visible sections as plain headings and keep
every <details> block collapsed exactly as shown:

{sections}
  </response_format>

  <instructions>
{instructions}
  </instructions>
</review_request>",
        context = template.context,
        files = summary.text,
        depth = template.depth,
        analysis_level = template.analysis_level,
    )
}

const COMMON_INSTRUCTIONS: &[&str] = &[
    "Focus ONLY on the code changes themselves",
    "Format your response in markdown",
    "This is a separate detailed review comment; the overview is posted on its own, so do not repeat it at length",
];

fn render_section(section: Section, guidance: &str) -> String {
    if section.is_collapsed() {
        format!(
            "<details>\n<summary>{heading}</summary>\n\n{guidance}\n\n</details>",
            heading = section.heading()
        )
    } else {
        format!("### {heading}\n{guidance}", heading = section.heading())
    }
}
