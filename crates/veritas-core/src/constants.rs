/// Veritas system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dimension shared by graph and image embeddings. The fusion model is trained
/// on exactly this width for both inputs.
pub const EMBEDDING_DIM: usize = 512;

/// A fused score strictly above this value is a FAKE verdict.
pub const FAKE_THRESHOLD: f64 = 0.5;

/// Number of leading slots used by the graph feature-vector fallback:
/// entity count, relation count, then PERSON, ORGANIZATION, LOCATION, EVENT, DATE counts.
pub const FEATURE_FALLBACK_SLOTS: usize = 7;

/// Browser-like user agent for outbound fetches; some image hosts reject bare clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Trusted outlets named in verification and summary prompts.
pub const TRUSTED_SOURCES: &[&str] = &[
    "CNN",
    "BBC",
    "NYT",
    "Reuters",
    "Guardian",
    "Hindu",
    "Indian Express",
    "Al Jazeera",
    "Bloomberg",
];
