// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to prompts that ask for links.
pub const REAL_LINKS_INSTRUCTION: &str = "\
    Only recommend resources that actually exist and are well known in the developer community. \
    Every resource MUST have a real, absolute https URL. \
    If you are not sure a resource exists, leave it out.";
