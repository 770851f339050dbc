//! Instruction prompts for the summary, advantages, limitations and question tasks.
//!
//! The rubric text is fixed. The normalizer and the point extractor strip echoed copies of
//! these instructions, so the leading phrases ("Write ... summary ...:", "List 3 ...:",
//! "Focus on:") must stay in sync with `normalize.rs` and `points.rs`.

use super::window::{OVERVIEW_CHARS, Windows};

/// Number of points requested from each list prompt.
pub const POINTS_PER_LIST: usize = 3;

const SUMMARY_RUBRIC: &str = "\
1. Research Context & Problem (100 words):
- Background of the field
- Gap the research addresses
- Objectives and research questions
- Expected contributions

2. Methodology & Approach (150 words):
- Research design
- Data collection methods
- Analysis procedures
- Study population or sample characteristics
- Tools and techniques

3. Key Findings & Results (200 words):
- Main discoveries and insights
- Important statistics and data
- Significant relationships or patterns
- Supporting evidence and examples
- Unexpected findings

4. Discussion & Implications (150 words):
- Interpretation of the findings
- Theoretical implications
- Practical applications
- Limitations and future directions
- Overall contribution";

const ADVANTAGES_FOCUS: &str = "\
- Novel methodology or approach
- Strong data quality or sample size
- Significant practical implications
- Theoretical contributions
- Rigorous analysis methods";

const LIMITATIONS_FOCUS: &str = "\
- Sample size or selection bias
- Methodological constraints
- Scope or generalizability issues
- Data collection limitations
- Analysis or interpretation concerns";

/// Build the long-form summary prompt.
pub fn summary_prompt(filename: &str, windows: &Windows<'_>) -> String {
    format!(
        "Write a comprehensive research paper summary in 500-600 words. Include:\n\n\
         {SUMMARY_RUBRIC}\n\n\
         Document: {filename}\n\n\
         Content:\n\
         [Introduction]\n{overview}\n\n\
         [Main Content]\n{body}\n\n\
         [Conclusion]\n{conclusion}\n\n\
         Write a clear, detailed summary covering all sections.",
        overview = windows.overview,
        body = windows.body,
        conclusion = windows.conclusion,
    )
}

/// Build the prompt asking for the paper's strengths.
pub fn advantages_prompt(windows: &Windows<'_>) -> String {
    format!(
        "Analyze this research paper and identify exactly {POINTS_PER_LIST} distinct strengths. \
         Be specific and evidence-based.\n\n\
         Research Content:\n{overview}\n{body}\n\n\
         List {POINTS_PER_LIST} strengths in this format:\n\
         1. [Specific strength with evidence]\n\
         2. [Different strength with evidence]\n\
         3. [Third distinct strength with evidence]\n\n\
         Focus on:\n{ADVANTAGES_FOCUS}\n\n\
         Each point should be 15-25 words and backed by evidence from the text.",
        overview = windows.overview,
        body = windows.body,
    )
}

/// Build the prompt asking for the paper's limitations.
pub fn limitations_prompt(windows: &Windows<'_>) -> String {
    format!(
        "Analyze this research paper and identify exactly {POINTS_PER_LIST} distinct limitations. \
         Be constructive and specific.\n\n\
         Research Content:\n{body}\n{conclusion}\n\n\
         List {POINTS_PER_LIST} limitations in this format:\n\
         1. [Specific limitation with explanation]\n\
         2. [Different limitation with explanation]\n\
         3. [Third distinct limitation with explanation]\n\n\
         Focus on:\n{LIMITATIONS_FOCUS}\n\n\
         Each point should be 15-25 words and explain why it is a limitation.",
        body = windows.body,
        conclusion = windows.conclusion,
    )
}

/// Build a question-answering prompt grounded in the opening of the paper.
pub fn question_prompt(question: &str, text: &str) -> String {
    let context: String = text.chars().take(OVERVIEW_CHARS).collect();
    format!("Answer based on the paper:\nQuestion: {question}\nContext: {context}")
}
