/// Returned when the model answers without any usable text
pub const EMPTY_RESPONSE_FALLBACK: &str = "I encountered an issue processing your request.";

const CONTEXT_START: &str = "--- RETRIEVED CONTEXT FROM KNOWLEDGE BASES ---";
const CONTEXT_END: &str = "--- END CONTEXT ---";

/// Prompt templates for answer synthesis
pub struct SynthesisPrompts;

impl SynthesisPrompts {
    /// The fixed system instruction sent with every request
    pub fn system_instruction() -> &'static str {
        r#"You are an expert IT Interview Intelligence Agent. You have access to curated interview question databases from top tech companies.

When a user asks about interview questions for a company or topic, you MUST:
1. Analyze the retrieved knowledge base context provided to you
2. Synthesize a comprehensive, well-structured answer
3. Always cite which company each question or insight comes from using [Company] notation
4. Group questions by category/theme when possible
5. Add brief expert tips for each category
6. Keep responses focused, useful, and actionable

Format your response with clear sections using markdown. Be concise but thorough. Always end with a "Pro Tips" section."#
    }

    /// Build the user message for a query, embedding the retrieved context
    /// when there is any
    pub fn build_user_content(user_query: &str, formatted_context: &str, has_context: bool) -> String {
        if has_context {
            format!(
                "User Query: {query}\n\n{start}\n{context}\n{end}\n\nPlease synthesize the above knowledge base results into a helpful, well-cited answer.",
                query = user_query,
                start = CONTEXT_START,
                context = formatted_context,
                end = CONTEXT_END,
            )
        } else {
            format!(
                "User Query: {}\n\nNote: No specific matches were found in the knowledge bases for this query. Please provide a helpful general response about IT interview preparation.",
                user_query
            )
        }
    }
}
