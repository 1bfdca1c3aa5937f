//! Prompt text for every generation call in the pipeline.
//!
//! System prompts set the role and output contract; the builder functions
//! assemble user prompts from session state. Evidence formatting is bounded
//! per hit so prompt size grows linearly with the evidence count.

use std::fmt::Write;

use crate::session::{MAX_ITERATIONS, SearchHit};

/// Snippet characters shown per hit when formatting evidence for compression.
pub const MAX_SNIPPET_CHARS: usize = 500;

/// Sources listed in the report prompt, newest evidence dropped beyond this.
pub const MAX_REPORT_SOURCES: usize = 50;

/// Snippet characters shown per source in the report prompt.
pub const REPORT_PREVIEW_CHARS: usize = 300;

// ─────────────────────────────────────────────────────────────────────────────
// System Prompts
// ─────────────────────────────────────────────────────────────────────────────

pub const CLARIFY_SYSTEM: &str = "You are a research assistant preparing to investigate a user's topic.

Generate 2-4 clarifying questions that uncover:
- The scope and depth of research the user expects
- The specific aspects they care most about
- Constraints, preferences, or perspectives to respect
- The intended audience or use of the final report

Each question must be specific, answerable in a sentence, and help narrow the research focus. Do not ask questions the topic already answers.";

pub const BRIEF_SYSTEM: &str = "You are a research planning expert.

From the user's topic and their answers to clarifying questions, write a research brief that will steer every later step. The brief must state:
1. The research objective, in one or two sentences
2. The key topics and subtopics to investigate
3. The expected scope and depth
4. Any angles, constraints, or perspectives the user asked for

Be concrete and actionable. Vague answers from the user still deserve a usable brief; fill reasonable defaults and say so.";

pub const COMPRESSION_SYSTEM: &str = "You are a research analyst distilling raw web search results.

Rewrite the results below into one clean, well-organized summary of everything learned so far:
- Preserve every concrete fact, number, date, and name that bears on the brief
- Attribute claims to their sources by title where it matters
- Merge duplicate or overlapping results instead of repeating them
- Discard boilerplate, navigation text, and content irrelevant to the brief
- Organize by theme, not by search query

Output only the summary. This text replaces any earlier summary, so it must stand alone.";

pub const REPORT_SYSTEM: &str = "You are a research assistant writing the final report for a completed investigation.

Write a thorough, well-structured markdown report that answers the user's question from the findings and sources provided.

Requirements:
- Use markdown headings, lists, and emphasis for structure
- Cite sources inline as [Source Title](URL) where claims rely on them; this is mandatory
- Make each major section substantive, with several paragraphs of analysis
- Include specific figures, dates, examples, and quotes from the sources
- Connect findings and explain their relationships rather than listing facts

Do not mention the research process, the word \"findings\", or phrases like \"based on the sources\". Write as an expert explaining the topic directly.";

pub const FILENAME_SYSTEM: &str = "You suggest file names for research reports.

Reply with a single short file name for the report topic given by the user:
- lowercase letters, digits, and underscores only
- at most six words joined by underscores
- no file extension, no quotes, no other text";

/// System prompt for query generation, parameterized by batch size.
pub fn queries_system(num_queries: usize) -> String {
    format!(
        "You are a web search query expert.

Based on the research brief and the progress so far, generate {num_queries} targeted search queries.

Guidelines:
- Each query focuses on ONE specific aspect of the topic
- No two queries may be near-duplicates of each other
- Each query is self-contained, carrying the context a web search needs
- Prefer concrete terms over broad category words"
    )
}

/// System prompt for reflection, parameterized by completed rounds.
pub fn reflect_system(iterations: u32) -> String {
    format!(
        "You are a research analyst judging whether gathered information suffices.

You have a research brief and a summary built from {iterations} round(s) of web searching.

Your tasks:
1. Reason about what has been learned and what the brief still requires
2. Name the specific knowledge gaps, if any
3. Decide whether another search round is warranted
4. If it is, propose follow-up queries that each close exactly one gap

Set needs_more_context to true only when missing information genuinely blocks answering the brief. When the summary suffices, leave follow_up_queries empty. Never propose queries that would mostly re-retrieve what the summary already covers."
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// User Prompt Builders
// ─────────────────────────────────────────────────────────────────────────────

pub fn clarify_user(topic: &str) -> String {
    format!("Research topic:\n\n{topic}")
}

pub fn brief_user(topic: &str, questions: &[String], answers: &[String]) -> String {
    let mut prompt = format!("Research topic:\n\n{topic}\n");
    if !questions.is_empty() {
        prompt.push_str("\nClarifying questions and the user's answers:\n");
        for (question, answer) in questions.iter().zip(answers.iter()) {
            let _ = write!(prompt, "\nQ: {question}\nA: {answer}\n");
        }
    }
    prompt.push_str("\nWrite the research brief.");
    prompt
}

pub fn queries_user(
    brief: &str,
    iteration: u32,
    num_queries: usize,
    findings: Option<&str>,
    gaps: &[String],
) -> String {
    let mut prompt = format!("Research brief:\n\n{brief}\n");

    if iteration == 0 {
        let _ = write!(
            prompt,
            "\nThis is the first search round. Generate {num_queries} broad queries that together cover the brief."
        );
    } else {
        let _ = write!(
            prompt,
            "\nThis is search round {}. Earlier rounds left these knowledge gaps:\n",
            iteration + 1
        );
        for gap in gaps {
            let _ = writeln!(prompt, "- {gap}");
        }
        if let Some(findings) = findings {
            let _ = write!(prompt, "\nSummary of findings so far:\n\n{findings}\n");
        }
        let _ = write!(
            prompt,
            "\nGenerate {num_queries} queries aimed squarely at the gaps. Do not re-cover what the summary already answers."
        );
    }

    prompt
}

pub fn compression_user(brief: &str, evidence: &[SearchHit], iteration: u32) -> String {
    let mut prompt = format!(
        "Research brief:\n\n{brief}\n\nRaw search results after {iteration} round(s):\n"
    );
    for (i, hit) in evidence.iter().enumerate() {
        let _ = write!(
            prompt,
            "\n--- Result {} (query: {}) ---\nTitle: {}\nURL: {}\n{}\n",
            i + 1,
            hit.source_query,
            hit.title,
            hit.url,
            truncate(&hit.snippet, MAX_SNIPPET_CHARS),
        );
    }
    prompt.push_str("\nDistill these results into the summary.");
    prompt
}

pub fn reflection_user(brief: &str, findings: &str, iteration: u32) -> String {
    format!(
        "Research brief:\n\n{brief}\n\nCurrent summary of findings (after round {iteration} of at most {MAX_ITERATIONS}):\n\n{findings}\n\nJudge whether this suffices to answer the brief."
    )
}

pub fn report_user(topic: &str, brief: &str, findings: &str, evidence: &[SearchHit]) -> String {
    let mut prompt = format!(
        "Original question:\n\n{topic}\n\nResearch brief:\n\n{brief}\n\nResearch findings:\n\n{findings}\n\nSources gathered during research:\n"
    );
    for hit in evidence.iter().take(MAX_REPORT_SOURCES) {
        let _ = write!(
            prompt,
            "\n- {} ({})\n  {}\n",
            hit.title,
            hit.url,
            truncate(&hit.snippet, REPORT_PREVIEW_CHARS),
        );
    }
    prompt.push_str("\nWrite the final report.");
    prompt
}

pub fn filename_user(topic: &str) -> String {
    format!("Report topic:\n\n{topic}")
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Truncate to at most `max_chars` characters, cutting on a char boundary.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
