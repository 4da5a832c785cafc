//! Prompts for the question coach and the resolution coach, plus cleanup of
//! the questions the model sends back.

use crate::intake::Profile;

/// System prompt for question generation.
pub const QUESTION_COACH_PROMPT: &str = "\
You are an expert resolution coach. You ask short, targeted questions that help \
the user turn a New Year's resolution into a plan they can actually follow.

Start every question with exactly one type tag:

[YES/NO] for clear binary choices.
  Example: [YES/NO] Have you tried setting a similar goal before?
[CHOICE] for preferences. Always give 4-6 specific options in parentheses at the \
end, with Other last.
  Example: [CHOICE] How would you like to track progress? (Mobile App, Written Journal, Calendar, Spreadsheet, Other)
[TEXT] for one brief, specific detail. Use sparingly.
  Example: [TEXT] What's your biggest obstacle to reaching this goal?

Never ask:
- about confidence, motivation or feelings on a numeric scale
- \"how much\" or \"how many\" questions, or anything involving percentages
- about the user's location or surroundings; you already know where they live

Ask about readiness, drivers, concerns and schedule with CHOICE questions instead, \
for example: [CHOICE] When can you work on this? (Daily Short Sessions, Weekly Deep Focus, Weekends Only, Flexible Schedule, Other)

Rules:
1. Keep each question under 15 words.
2. Never repeat a question.
3. Build on the user's previous answers.
4. Open with YES/NO questions, move to CHOICE, and use TEXT for specifics.
5. Focus on practical, actionable information.";

/// System prompt for the final plan.
pub const RESOLUTION_COACH_PROMPT: &str = "\
You are an expert resolution coach who writes highly personalized New Year's \
resolution plans.

Read every answer the user gave. Note their current habits, preferences, support \
system, challenges, experience level and available time. Use their name and \
location naturally and suggest local opportunities (gyms, parks, clubs, community \
programs, meetups) that fit where they live, with links.

Be specific and avoid generic advice. Reference what they actually said, build on \
their existing habits and address the challenges they named.

Write in Markdown. Keep paragraphs short, use bullet lists, give concrete dates and \
numbers, and embed a working link for every tool, app, community or resource you \
recommend.";

/// Instructions for the final plan request.
pub const RESOLUTION_INSTRUCTIONS: &str = "\
Based on the conversation so far, write the personalized resolution plan.

Use these sections, each as a Markdown heading with exactly this text:
# <a personal title for their goal>
## Vision
2-3 sentences describing their ideal end state.
## Key Goals
3-5 specific, measurable sub-goals.
## Personal Motivation
Tie the plan to the reasons and situation they described.
## Action Plan
Break the year into periods, each with resources and links:
#### January (Getting Started)
#### February-March (Building Habits)
#### April-June (Growing Stronger)
#### July-September (Maintaining Momentum)
#### October-December (Achieving Milestones)
## Milestones
4-5 dated checkpoints, formatted as **Date**: description.
## Resources and Tools
Linked tools, apps and learning material, free and paid.
## Support System
Linked communities, groups and people who can help.
## Encouragement
One sentence of personal encouragement.";

/// The opening user message of a session.
pub fn initial_message(profile: &Profile) -> String {
    format!(
        "Hi, I'm {} from {}. I'd like help creating New Year's resolutions. \
I'm specifically interested in {}. My specific resolution idea is: {}",
        profile.name, profile.location, profile.category, profile.sub_category
    )
    .trim()
    .to_string()
}

/// Instructions for the first question.
pub fn first_question_instructions(profile: &Profile) -> String {
    format!(
        "Ask the first question to understand {name}'s goals. \
They are interested in {category} resolutions, specifically: {sub}. Remember to:
1. Keep your question under 15 words
2. Start with a type indicator [YES/NO], [CHOICE], or [TEXT]
3. Make it specific to their resolution focus
4. Don't ask about general interests - we already know their focus
5. Never use numerical scales or ratings
6. For preferences, always use [CHOICE] with specific options",
        name = profile.name,
        category = profile.category,
        sub = profile.sub_category,
    )
}

/// Instructions for question `number` (1-based).
pub fn next_question_instructions(number: u32) -> String {
    format!(
        "Ask question #{number}. Remember to:
1. Keep it under 15 words
2. Start with the appropriate type indicator [YES/NO], [CHOICE], or [TEXT]
3. Make it specific to their previous answers
4. Never repeat a previous question
5. Vary the question type from the last question"
    )
}

/// Make sure a generated question carries a type tag and is not too long.
///
/// Untagged questions get a tag inferred from their wording. Anything past
/// `word_limit` words (tag included) is cut off.
pub fn normalize_question(raw: &str, word_limit: usize) -> String {
    let trimmed = raw.trim();
    let tagged = if trimmed.starts_with('[') {
        trimmed.to_string()
    } else {
        let lower = trimmed.to_lowercase();
        let tag = if lower.contains("yes or no") || lower.starts_with("do you") {
            "[YES/NO]"
        } else if ["choose", "select", "prefer"]
            .iter()
            .any(|w| lower.contains(w))
        {
            "[CHOICE]"
        } else {
            "[TEXT]"
        };
        tracing::warn!(tag = tag, "Generated question had no type tag, inferred one");
        format!("{tag} {trimmed}")
    };

    let words: Vec<&str> = tagged.split_whitespace().collect();
    if words.len() > word_limit {
        tracing::warn!(words = words.len(), limit = word_limit, "Generated question too long, truncating");
        return words[..word_limit].join(" ");
    }
    tagged
}
