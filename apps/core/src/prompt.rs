/// Invocation contract for the external AI-prompt collaborator. Transport,
/// timeouts, and endpoints live behind the implementation; the engine only
/// asks and word-wraps whatever comes back.
pub trait PromptClient: Send + Sync {
    fn ask(&self, prompt: &str) -> Result<String, String>;
}

/// Default client for deployments with no prompt backend wired up. The
/// error string is surfaced to the user as ordinary text.
#[derive(Debug, Default)]
pub struct UnconfiguredPromptClient;

impl PromptClient for UnconfiguredPromptClient {
    fn ask(&self, _prompt: &str) -> Result<String, String> {
        Err("Sorry, there was an error making the request.".to_string())
    }
}

/// Fixed-reply client for tests.
pub struct CannedPromptClient {
    pub reply: String,
}

impl PromptClient for CannedPromptClient {
    fn ask(&self, _prompt: &str) -> Result<String, String> {
        Ok(self.reply.clone())
    }
}
