// Prompt templates for question generation.
// Placeholders are `{technology}`, `{proficiency}` and `{answer}`.

/// Prompt for a fresh question (initial or final) about one technology.
pub const NEW_QUESTION_TEMPLATE: &str = "Generate 1 specific technical interview question for {technology}.

Level: {proficiency}
Requirements:
- Must be answerable by a {proficiency} level developer
- Requires detailed explanation with examples
- Tests practical {technology} knowledge
- Must end with a question mark

Question:";

/// Prompt for a follow-up that builds on the candidate's previous answer.
pub const FOLLOW_UP_TEMPLATE: &str = "Based on this technical interview answer, ask 1 focused follow-up question.

Technology: {technology}
Level: {proficiency}
Previous Answer: {answer}

Generate a follow-up that:
- Explores {technology} deeper
- Tests practical application
- Asks for specific examples

Follow-up question:";

pub fn new_question_prompt(technology: &str, proficiency: &str) -> String {
    NEW_QUESTION_TEMPLATE
        .replace("{technology}", technology)
        .replace("{proficiency}", proficiency)
}

pub fn follow_up_prompt(technology: &str, proficiency: &str, answer: &str) -> String {
    FOLLOW_UP_TEMPLATE
        .replace("{technology}", technology)
        .replace("{proficiency}", proficiency)
        .replace("{answer}", answer)
}
