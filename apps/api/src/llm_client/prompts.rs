// Shared prompt fragments for structured requests.
// Each orchestrator defines its own prompts alongside it (see jd/prompts.rs).

/// Appended to a system prompt that never mentions JSON.
/// JSON-object response mode is rejected by the provider unless the prompt asks for JSON.
pub const JSON_FORMAT_INSTRUCTION: &str = "Please format your response as JSON.";

/// Returns the system prompt with the JSON instruction appended if "json" is absent
/// (case-insensitive).
pub fn ensure_json_instruction(system: &str) -> String {
    if system.to_lowercase().contains("json") {
        system.to_string()
    } else {
        format!("{system}\n{JSON_FORMAT_INSTRUCTION}")
    }
}
