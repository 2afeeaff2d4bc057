/// System prompt enforcing JSON-only output for the enrichment call.
pub const ENRICHMENT_SYSTEM: &str = "You are a precise company research assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Builds the enrichment prompt. When the scrape produced nothing, the
/// model is told to fall back on its general knowledge of the company.
pub fn build_enrichment_prompt(name: &str, website: &str, snippet: &str) -> String {
    let context = if snippet.is_empty() {
        "Could not fetch website content, please use your general knowledge of this company if available.".to_string()
    } else {
        format!("Here is some content from their website: \"{snippet}\"")
    };

    format!(
        "Analyze the company \"{name}\" with website \"{website}\".\n\
         {context}\n\
         \n\
         Provide a JSON response with the following fields:\n\
         - summary: A brief 2-sentence summary of what they do.\n\
         - whatTheyDo: An array of 3-5 bullet points describing their key value propositions.\n\
         - keywords: An array of 5-10 industry keywords.\n\
         - derivedSignals: An array of 3-5 inferred signals (e.g., \"Hiring Engineers\", \"Raised Series A\", \"AI-first\").\n\
         - score: A number between 0-100 indicating investor interest based on market trends (AI, B2B SaaS, etc.).\n\
         \n\
         Return ONLY JSON."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_snippet() {
        let prompt = build_enrichment_prompt("Acme", "https://acme.com", "We build traps");
        assert!(prompt.contains("\"Acme\""));
        assert!(prompt.contains("https://acme.com"));
        assert!(prompt.contains("We build traps"));
        assert!(!prompt.contains("general knowledge"));
    }

    #[test]
    fn test_prompt_falls_back_without_snippet() {
        let prompt = build_enrichment_prompt("Acme", "https://acme.com", "");
        assert!(prompt.contains("general knowledge"));
        assert!(!prompt.contains("content from their website"));
    }
}
