pub mod claude;
pub mod factory;
pub mod openai;
pub mod palm;
pub mod scrub;
pub mod traits;

pub use factory::{DEFAULT_TIMEOUT_SECS, ProviderOptions, create_provider, resolve_api_key};
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use traits::{ASSISTANT_INSTRUCTION, Provider, build_inline_prompt, build_user_prompt};
