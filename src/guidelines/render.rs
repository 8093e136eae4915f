//! Guideline document rendering and in-place marker block replacement

use super::ResolvedGuideline;

pub const GUIDELINES_START_MARKER: &str = "[//]: # (franken-ai:guidelines:start)";
pub const GUIDELINES_END_MARKER: &str = "[//]: # (franken-ai:guidelines:end)";

pub const DOCUMENT_TITLE: &str = "# FrankenAI Project Guidelines";

const WORKFLOW_SECTION: &str = "\
## FrankenAI Workflow

This project uses a two-phase workflow. Gather context first, then change code.

### Discovery Phase (Gemini CLI)

Use Gemini CLI for repository-wide questions that need a large context window:

- Map the architecture and locate the code involved in a task.
- Summarise how an existing feature is implemented before changing it.
- Find every usage of a class, component or route.

### Implementation Phase (Claude Code)

Use Claude Code to make focused changes once the relevant files are known:

- Implement features and fixes following the guidelines below.
- Run the project's test and lint commands before finishing.
- Keep changes scoped to the files identified during discovery.";

/// Marker-delimited block holding the guideline bodies in order.
pub fn render_guidelines_block(guidelines: &[ResolvedGuideline]) -> String {
    let mut block = String::new();
    block.push_str(GUIDELINES_START_MARKER);
    block.push('\n');
    for guideline in guidelines {
        block.push('\n');
        block.push_str(guideline.content.trim());
        block.push('\n');
    }
    block.push('\n');
    block.push_str(GUIDELINES_END_MARKER);
    block
}

pub fn render_document(guidelines: &[ResolvedGuideline]) -> String {
    format!(
        "{}\n\n{}\n\n{}\n",
        DOCUMENT_TITLE,
        WORKFLOW_SECTION,
        render_guidelines_block(guidelines)
    )
}

/// Replaces the marker block inside `existing`.
///
/// Text outside the markers is untouched. Without a complete marker pair the
/// full document is appended after the existing content.
pub fn inject_guidelines(existing: &str, guidelines: &[ResolvedGuideline]) -> String {
    if let Some((start, end)) = marker_span(existing) {
        let mut output = String::with_capacity(existing.len());
        output.push_str(&existing[..start]);
        output.push_str(&render_guidelines_block(guidelines));
        output.push_str(&existing[end..]);
        return output;
    }

    let document = render_document(guidelines);
    let trimmed = existing.trim_end();
    if trimmed.is_empty() {
        document
    } else {
        format!("{}\n\n{}", trimmed, document)
    }
}

/// Byte range from the start marker through the end of the end marker.
///
/// Uses the last start marker that is followed by an end marker, so a stray
/// start marker earlier in the file never swallows the text after it.
fn marker_span(text: &str) -> Option<(usize, usize)> {
    let starts: Vec<usize> = text
        .match_indices(GUIDELINES_START_MARKER)
        .map(|(index, _)| index)
        .collect();

    starts.into_iter().rev().find_map(|start| {
        let after_start = start + GUIDELINES_START_MARKER.len();
        text[after_start..]
            .find(GUIDELINES_END_MARKER)
            .map(|end| (start, after_start + end + GUIDELINES_END_MARKER.len()))
    })
}
