//! Provider table and availability resolution.

/// Supported upstream providers, in selection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Groq,
    Together,
    HuggingFace,
}

impl ProviderKind {
    /// All providers, highest priority first.
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Groq,
        ProviderKind::Together,
        ProviderKind::HuggingFace,
    ];

    /// Short identifier used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Together => "together",
            Self::HuggingFace => "huggingface",
        }
    }

    /// Name reported by the health endpoint.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Groq => "Groq",
            Self::Together => "Together AI",
            Self::HuggingFace => "HuggingFace",
        }
    }

    /// Environment variable holding the API credential.
    pub fn env_key(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::Together => "TOGETHER_API_KEY",
            Self::HuggingFace => "HUGGINGFACE_API_KEY",
        }
    }

    /// Environment variable that overrides the default endpoint.
    pub fn endpoint_env_key(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_BASE",
            Self::Together => "TOGETHER_API_BASE",
            Self::HuggingFace => "HUGGINGFACE_API_BASE",
        }
    }

    /// Default chat completion endpoint.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Groq => "https://api.groq.com/openai/v1/chat/completions",
            Self::Together => "https://api.together.xyz/v1/chat/completions",
            Self::HuggingFace => {
                "https://api-inference.huggingface.co/models/microsoft/DialoGPT-large"
            }
        }
    }

    /// Model requested from (or implied by) the provider.
    pub fn model(&self) -> &'static str {
        match self {
            Self::Groq => "llama-3.3-70b-versatile",
            Self::Together => "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo",
            Self::HuggingFace => "microsoft/DialoGPT-large",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A provider together with its runtime credential and endpoint.
///
/// The endpoint is carried per-instance so tests and self-hosted gateways
/// can point a provider somewhere other than its public API.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub credential: String,
    pub endpoint: String,
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind, credential: impl Into<String>) -> Self {
        Self {
            kind,
            credential: credential.into(),
            endpoint: kind.endpoint().to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// A provider is available iff its credential is non-empty.
    pub fn is_available(&self) -> bool {
        !self.credential.is_empty()
    }
}

/// Pick the highest-priority provider with a credential configured.
///
/// Pure function of the credential-presence vector; returns `None` when
/// every credential is empty (demo mode).
pub fn resolve_active(providers: &[ProviderConfig]) -> Option<&ProviderConfig> {
    providers.iter().find(|p| p.is_available())
}
