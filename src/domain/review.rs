use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewDepth {
    Basic,
    #[default]
    Comprehensive,
    Expert,
}

impl ReviewDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDepth::Basic => "basic",
            ReviewDepth::Comprehensive => "comprehensive",
            ReviewDepth::Expert => "expert",
        }
    }

    /// Case-insensitive; anything unrecognized resolves to `Comprehensive`.
    pub fn from_input(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "basic" => ReviewDepth::Basic,
            "expert" => ReviewDepth::Expert,
            _ => ReviewDepth::Comprehensive,
        }
    }
}

impl fmt::Display for ReviewDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Overview,
    FileChanges,
    Strengths,
    Risks,
    Security,
    Performance,
    Architecture,
    Testing,
    Recommendations,
}

impl Section {
    pub fn heading(&self) -> &'static str {
        match self {
            Section::Overview => "📋 Overview",
            Section::FileChanges => "📁 File-Level Changes",
            Section::Strengths => "✅ Strengths",
            Section::Risks => "⚠️ Potential Issues and Risks",
            Section::Security => "🔒 Security Considerations",
            Section::Performance => "⚡ Performance Analysis",
            Section::Architecture => "🏗️ Architectural Impact",
            Section::Testing => "🧪 Testing Recommendations",
            Section::Recommendations => "💡 Recommendations",
        }
    }

    /// Overview and file-level changes stay visible in the posted comment;
    /// every analytical section is folded into a `<details>` block.
    pub fn is_collapsed(&self) -> bool {
        !matches!(self, Section::Overview | Section::FileChanges)
    }
}

#[derive(Debug)]
pub struct ReviewTemplate {
    pub depth: ReviewDepth,
    pub context: &'static str,
    pub analysis_level: &'static str,
    pub sections: &'static [(Section, &'static str)],
    pub instructions: &'static [&'static str],
}

static BASIC: ReviewTemplate = ReviewTemplate {
    depth: ReviewDepth::Basic,
    context: "You are an AI teammate performing a focused, concise code review. \
              Highlight only what matters most.",
    analysis_level: "concise: essential observations only, no deep dives",
    sections: &[
        (Section::Overview, "Two or three sentences on what the change accomplishes."),
        (Section::FileChanges, "One bullet per file describing its change."),
        (Section::Strengths, "The most notable good practices, briefly."),
        (Section::Risks, "Only critical bugs or blockers; say so if there are none."),
        (Section::Recommendations, "Short, actionable next steps."),
    ],
    instructions: &[
        "Keep the review concise and focused",
        "Highlight only critical issues",
        "Provide brief, actionable feedback",
    ],
};

static COMPREHENSIVE: ReviewTemplate = ReviewTemplate {
    depth: ReviewDepth::Comprehensive,
    context: "You are an AI teammate reviewing code changes. Provide comprehensive, \
              helpful feedback based only on the code modifications.",
    analysis_level: "thorough: cover correctness, quality and maintainability",
    sections: &[
        (Section::Overview, "A short paragraph on the purpose and effect of the change."),
        (Section::FileChanges, "One bullet per file describing its change."),
        (Section::Strengths, "Good practices and well-structured code worth keeping."),
        (Section::Risks, "Bugs, edge cases and maintainability concerns, each with the affected file."),
        (Section::Security, "Input handling, secrets, injection and access-control concerns."),
        (Section::Performance, "Complexity, allocation and I/O concerns introduced by the change."),
        (Section::Recommendations, "Prioritized, actionable suggestions for improvement."),
    ],
    instructions: &[
        "Be constructive, specific and helpful",
        "Reference file names for every finding",
        "Provide actionable feedback",
    ],
};

static EXPERT: ReviewTemplate = ReviewTemplate {
    depth: ReviewDepth::Expert,
    context: "You are an AI teammate performing an expert-level, comprehensive code review. \
              Provide architectural insights and detailed recommendations.",
    analysis_level: "expert: deep technical analysis including edge cases, failure modes and design trade-offs",
    sections: &[
        (Section::Overview, "A precise summary of the change and its intent."),
        (Section::FileChanges, "One bullet per file describing its change and its role."),
        (Section::Strengths, "Design and implementation choices that work well."),
        (Section::Risks, "Edge cases, failure modes, concurrency and error-handling gaps."),
        (Section::Security, "Security Assessment: vulnerabilities, trust boundaries and data exposure."),
        (Section::Performance, "Algorithmic complexity, resource usage and scalability."),
        (Section::Architecture, "Coupling, layering, API design and long-term technical debt."),
        (Section::Testing, "Missing test coverage and the tests that should be added."),
        (Section::Recommendations, "Expert Recommendations: detailed, prioritized, with code examples where helpful."),
    ],
    instructions: &[
        "Perform deep technical analysis",
        "Consider edge cases and potential failures",
        "Assess architectural impact",
        "Include code examples where helpful",
    ],
};

static TEMPLATES: [&ReviewTemplate; 3] = [&BASIC, &COMPREHENSIVE, &EXPERT];

pub fn select_template(depth: ReviewDepth) -> &'static ReviewTemplate {
    TEMPLATES
        .iter()
        .copied()
        .find(|template| template.depth == depth)
        .unwrap_or(&COMPREHENSIVE)
}
