// Single source of truth for all default values.

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = crate::constants::EMBEDDING_DIM;

// --- Graph embedding (node2vec + skip-gram) ---
pub const DEFAULT_WALK_LENGTH: usize = 30;
pub const DEFAULT_WALKS_PER_NODE: usize = 100;
pub const DEFAULT_WINDOW: usize = 10;
pub const DEFAULT_EPOCHS: usize = 10;
pub const DEFAULT_MIN_COUNT: usize = 1;
pub const DEFAULT_NEGATIVE_SAMPLES: usize = 5;
pub const DEFAULT_LEARNING_RATE: f32 = 0.025;
pub const DEFAULT_MIN_LEARNING_RATE: f32 = 0.0001;
pub const DEFAULT_RETURN_PARAM: f64 = 1.0;
pub const DEFAULT_IN_OUT_PARAM: f64 = 1.0;
pub const DEFAULT_SUBSAMPLE: f64 = 1e-3;

// --- Image embedding ---
pub const DEFAULT_CLIP_MODEL_PATH: &str = "./models/clip_vit_b32_image.onnx";
pub const DEFAULT_IMAGE_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;
pub const DEFAULT_IMAGE_INPUT_SIDE: usize = 224;
pub const DEFAULT_INTRA_THREADS: usize = 2;

// --- Detection ---
pub const DEFAULT_FUSION_MODEL_PATH: &str = "./models/fusion_classifier.onnx";

// --- Verification ---
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_SEARCH_RESULTS: usize = 10;
pub const DEFAULT_GROUNDING_TITLES: usize = 3;
pub const DEFAULT_TITLE_PREFIX_CHARS: usize = 50;
pub const DEFAULT_VERIFICATION_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_FAKE_SAMPLE_LIMIT: usize = 3;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 500;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 8_000;
pub const DEFAULT_SINGLE_FLIGHT_WAIT_SECS: u64 = 180;

// --- Summary ---
pub const DEFAULT_SUMMARY_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_SUMMARY_SEARCH_RESULTS: usize = 5;
pub const DEFAULT_CITATION_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_MAX_CITATIONS_CONSIDERED: usize = 10;
pub const DEFAULT_MAX_VALID_CITATIONS: usize = 5;

// --- Knowledge-graph chat ---
pub const DEFAULT_CHAT_TEMPERATURE: f32 = 1.0;
pub const DEFAULT_CHAT_MAX_ENTITIES: usize = 25;
pub const DEFAULT_CHAT_MAX_RELATIONS: usize = 20;

// --- LLM ---
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_LLM_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_LLM_MAX_RETRIES: u32 = 2;

// --- News search ---
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://news.google.com/rss/search";
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SEARCH_LANGUAGE: &str = "en-US";
pub const DEFAULT_SEARCH_COUNTRY: &str = "US";
pub const DEFAULT_SNIPPET_CHARS: usize = 200;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
