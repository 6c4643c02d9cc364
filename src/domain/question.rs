#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub context: Option<String>,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: None,
        }
    }

    /// An empty context string is stored as no context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = if context.is_empty() {
            None
        } else {
            Some(context)
        };
        self
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}
