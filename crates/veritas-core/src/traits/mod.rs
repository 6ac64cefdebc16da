mod fusion_model;
mod image_encoder;
mod llm_client;
mod news_search;

pub use fusion_model::IFusionModel;
pub use image_encoder::IImageEncoder;
pub use llm_client::ILlmClient;
pub use news_search::INewsSearch;
