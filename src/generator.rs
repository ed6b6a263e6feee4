use std::sync::Arc;
use tracing::{info, error};

use crate::groq::{preview, ChatCompletion, ChatMessage, ChatRequest, UpstreamError};
use crate::models::GenerationResponse;

pub const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 4000;

pub const SYSTEM_INSTRUCTION: &str = "You are an expert React developer. Generate a complete, production-ready React application based on the user's request.

IMPORTANT REQUIREMENTS:
1. Generate a COMPLETE functional React application, not just a landing page
2. Include all necessary components, state management, and functionality
3. Use modern React hooks (useState, useEffect, etc.)
4. Include proper styling with Tailwind CSS classes
5. Make it fully interactive and functional
6. Include realistic data and content relevant to the request
7. Add proper error handling and loading states
8. Make it responsive for mobile and desktop
9. Export the main component as 'App' (export default App)
10. Include proper imports for React and any hooks used

Return ONLY the complete React component code without any explanations. The code should be production-ready and fully functional.";

pub fn user_instruction(prompt: &str) -> String {
    format!("Create a {prompt}. Make it fully functional with all features working, realistic data, proper navigation, and complete user interface. Include all necessary React hooks and state management.")
}

pub fn describe(prompt: &str) -> String {
    format!("Generated {prompt}")
}

/// Turns a free-text prompt into UI code through the upstream model.
pub struct CodeGenerator {
    client: Arc<dyn ChatCompletion>,
    model: String,
}

impl CodeGenerator {
    pub fn new(client: Arc<dyn ChatCompletion>, model: String) -> Self {
        Self { client, model }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::user(user_instruction(prompt)),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<GenerationResponse, UpstreamError> {
        info!("🎯 Generating code for prompt: {}", preview(prompt, 100));
        let request = self.build_request(prompt);

        let code = self.client.complete(&request).await.map_err(|e| {
            error!("Error generating code: {}", e);
            e
        })?;

        Ok(GenerationResponse {
            code,
            title: prompt.to_string(),
            description: describe(prompt),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    struct Recorder {
        seen: Mutex<Vec<ChatRequest>>,
        reply: fn() -> Result<String, UpstreamError>,
    }

    #[async_trait]
    impl ChatCompletion for Recorder {
        async fn complete(&self, request: &ChatRequest) -> Result<String, UpstreamError> {
            self.seen.lock().push(request.clone());
            (self.reply)()
        }
    }

    fn generator(reply: fn() -> Result<String, UpstreamError>) -> (Arc<Recorder>, CodeGenerator) {
        let recorder = Arc::new(Recorder { seen: Mutex::new(Vec::new()), reply });
        let generator = CodeGenerator::new(recorder.clone(), DEFAULT_MODEL.to_string());
        (recorder, generator)
    }

    #[test]
    fn user_instruction_interpolates_prompt() {
        assert_eq!(
            user_instruction("todo app"),
            "Create a todo app. Make it fully functional with all features working, realistic data, proper navigation, and complete user interface. Include all necessary React hooks and state management."
        );
    }

    #[test]
    fn description_follows_template() {
        assert_eq!(describe("todo app"), "Generated todo app");
        assert_eq!(describe(""), "Generated ");
    }

    #[test]
    fn system_instruction_pins_output_format() {
        assert!(SYSTEM_INSTRUCTION.contains("Tailwind CSS"));
        assert!(SYSTEM_INSTRUCTION.contains("export default App"));
        assert!(SYSTEM_INSTRUCTION.contains("Return ONLY the complete React component code"));
    }

    #[tokio::test]
    async fn request_uses_fixed_parameters() {
        let (recorder, generator) = generator(|| Ok("code".into()));
        generator.generate("kanban board").await.unwrap();

        let seen = recorder.seen.lock();
        assert_eq!(seen.len(), 1);
        let req = &seen[0];
        assert_eq!(req.model, DEFAULT_MODEL);
        assert_eq!(req.temperature, TEMPERATURE);
        assert_eq!(req.max_tokens, MAX_TOKENS);
        assert_eq!(req.messages, vec![
            ChatMessage::system(SYSTEM_INSTRUCTION),
            ChatMessage::user(user_instruction("kanban board")),
        ]);
    }

    #[tokio::test]
    async fn completion_maps_into_response() {
        let (_, generator) = generator(|| Ok("```jsx\nfunction App() {}\n```".into()));
        let resp = generator.generate("todo app").await.unwrap();
        assert_eq!(resp, GenerationResponse {
            code: "```jsx\nfunction App() {}\n```".into(),
            title: "todo app".into(),
            description: "Generated todo app".into(),
        });
    }

    #[tokio::test]
    async fn empty_prompt_is_forwarded() {
        let (recorder, generator) = generator(|| Ok(String::new()));
        let resp = generator.generate("").await.unwrap();
        assert_eq!(resp.title, "");
        assert_eq!(recorder.seen.lock()[0].messages[1].content, user_instruction(""));
    }

    #[tokio::test]
    async fn upstream_error_is_returned_unchanged() {
        let (_, generator) = generator(|| Err(UpstreamError::Network("connection reset".into())));
        let err = generator.generate("todo app").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Network(ref m) if m == "connection reset"));
    }
}
