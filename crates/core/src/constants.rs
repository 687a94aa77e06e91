//! Fixed names and values the tour run is built from.
//!
//! Everything the run hard-codes lives here so the orchestration reads as a
//! sequence of steps instead of a wall of literals.

/// Vault secret holding the OpenAI API key.
pub const SECRET_API_KEY: &str = "OpenAIapiKey";

/// Vault secret holding the OpenAI organization id.
pub const SECRET_ORG_ID: &str = "OpenAIorgId";

/// Chat service id for the GPT-3.5 model.
pub const SERVICE_GPT35: &str = "gpt35";

/// Chat service id for the GPT-4 model.
pub const SERVICE_GPT4: &str = "gpt4";

/// Model bound to [`SERVICE_GPT35`].
pub const MODEL_GPT35: &str = "gpt-3.5-turbo";

/// Model bound to [`SERVICE_GPT4`].
pub const MODEL_GPT4: &str = "gpt-4";

/// Embedding model used by the semantic memory.
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default OpenAI API root. Paths like `/v1/chat/completions` are appended.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Memory collection holding the seeded facts.
pub const MEMORY_COLLECTION: &str = "default";

/// Facts seeded into the memory collection, as `(id, text)`.
pub const SEED_FACTS: [(&str, &str); 2] = [
    ("1", "My favorite city is Paris"),
    ("2", "My favorite activity is visiting museums"),
];

/// Template variable holding the city query.
pub const ARG_CITY: &str = "city";

/// Template variable holding the activity query.
pub const ARG_ACTIVITY: &str = "activity";

/// Query bound to [`ARG_CITY`].
pub const CITY_QUERY: &str = "What is my favorite city?";

/// Query bound to [`ARG_ACTIVITY`].
pub const ACTIVITY_QUERY: &str = "What is my favorite activity?";

/// Output bound for the completion.
pub const MAX_TOKENS: u32 = 2000;

/// Sampling temperature for the completion.
pub const TEMPERATURE: f32 = 0.8;

/// Default timeout for every outbound HTTP call, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 60;

/// Env var overriding [`HTTP_TIMEOUT_SECS`].
pub const HTTP_TIMEOUT_ENV: &str = "VAULT_RECALL_HTTP_TIMEOUT_SECS";

/// The personalized tour prompt.
pub const TOUR_PROMPT: &str = r"
                                Information about me, from previous conversations:
                                    - {{$city}} {{recall $city}}
                                        - {{$activity}} {{recall $activity}}
                               Generate a personalized tour of activities for me to do when I have a free day in my favorite city. I just want to do my favorite activity.
";
