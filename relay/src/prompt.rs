use crate::config::PolicyConfig;
use crate::identity::CallerIdentity;

/// Persona instruction followed by the literal question.
pub fn build_prompt(policy: &PolicyConfig, query: &str, caller: &CallerIdentity) -> String {
    // The display name is caller-controlled, so it goes in last.
    let instruction = policy
        .system_instruction
        .replace("{max_words}", &policy.max_words.to_string())
        .replace("{name}", &caller.display_name);

    format!("{}\n\nQuestion: {}", instruction.trim_end(), query)
}
