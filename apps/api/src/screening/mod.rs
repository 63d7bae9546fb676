// Document-to-decision screening pipeline.
// Implements: text extraction, concurrent input resolution, prompt assembly,
// schema-constrained LLM invocation, and response validation.
// All LLM calls go through llm_client — no direct Gemini API calls here.

pub mod extract;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod resolver;
pub mod schema;
pub mod validator;
