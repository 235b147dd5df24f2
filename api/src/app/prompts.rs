//! Default prompts for the three-step rewrite chain

/// Phrases the summary prompt forbids; the model leans on them heavily
pub const BANNED_PHRASES: [&str; 2] = [
    "in a surprising turn of events",
    "in a shocking turn of events",
];

const SUGGESTION_PROMPT: &str = "You are a comedy writer at a satirical newspaper. \
Improve on the following satirical headline. Your new headlines are funny, may touch on \
current political events and have an edge to them. Keep each one roughly the length of \
the original headline and stay close to its topic. Print only the new suggestions, one \
suggestion per line.";

const EDITOR_PROMPT: &str = "You are an editor at a satirical newspaper. For every \
suggested headline you carefully judge: (1) whether it is funny; (2) whether it has a \
clear satirical target; (3) whether it has enough substance and bite; (4) whether it is \
roughly as long as the other suggestions. Based on that review, pick your favorite \
headline and make targeted revisions to it. Your output consists solely of the revised \
headline.";

/// System prompt for step one, listing recent headlines to steer away from
pub fn suggestion_prompt(previous_titles: &[String]) -> String {
    if previous_titles.is_empty() {
        return SUGGESTION_PROMPT.to_string();
    }

    let history = previous_titles
        .iter()
        .map(|t| format!("- {}", t))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nAvoid repeating the wording of the {} headlines you wrote most recently, \
and do not name the same public figure again unless the original headline does:\n{}",
        SUGGESTION_PROMPT,
        previous_titles.len(),
        history
    )
}

pub fn suggestion_request(original_title: &str) -> String {
    format!("The headline to rewrite is the following: {}", original_title)
}

pub fn editor_prompt() -> &'static str {
    EDITOR_PROMPT
}

/// Single user prompt for step three
pub fn summary_prompt(original_title: &str, original_summary: &str, new_title: &str) -> String {
    format!(
        "Below there is an original title and an original summary, followed by an improved \
title. Write an improved summary, based on the original summary, that fits the improved \
title. Do not use the phrase '{}' or '{}'. Only output the improved summary.\n\n\
Title:{}\nSummary:{}\n---\nTitle:{}\nSummary:",
        BANNED_PHRASES[0], BANNED_PHRASES[1], original_title, original_summary, new_title
    )
}
