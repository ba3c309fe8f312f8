// All LLM prompt constants for the curation tier.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Persona for resource curation. Combined with `JSON_ONLY_SYSTEM` at call time.
pub const CURATION_PERSONA: &str = "You are an expert AI tutor with 15+ years of experience \
    in technology education. You specialize in recommending the BEST and most FAMOUS \
    learning resources for any topic.";

/// Curation prompt template. Replace `{topic}` and `{real_links_instruction}` before sending.
pub const CURATION_PROMPT_TEMPLATE: &str = r#"Recommend the best learning resources for "{topic}".

Return a JSON object with this EXACT schema (no extra keys):
{
  "docs": [
    {"title": "Resource Title", "url": "https://example.com", "description": "Brief description", "platform": "Platform Name", "price": "Free"}
  ],
  "blogs": [
    {"title": "Blog Title", "url": "https://example.com", "description": "Brief description", "platform": "Platform Name", "price": "Free"}
  ],
  "videos": [
    {"title": "Video Title", "url": "https://www.youtube.com/watch?v=...", "description": "Brief description", "platform": "YouTube", "price": "Free"}
  ],
  "free_courses": [
    {"title": "Course Title", "url": "https://example.com", "description": "Brief description", "platform": "Platform Name", "price": "Free"}
  ],
  "paid_courses": [
    {"title": "Course Title", "url": "https://example.com", "description": "Brief description", "platform": "Platform Name", "price": "$49.99"}
  ]
}

Rules:
1. Provide 3-5 resources per category, best first
2. {real_links_instruction}
3. Mark prices accurately: "Free" or a specific amount such as "$29/month"
4. Official documentation goes in "docs"; articles and technical blogs go in "blogs"

Topic: {topic}"#;
