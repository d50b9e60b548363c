pub mod types;
pub mod config;
pub mod fetcher;
pub mod traits;
pub mod prompt;
pub mod sources;
pub mod llm_adapter;
pub mod digest;
pub mod processing;
pub mod pipeline;
pub mod command;
pub mod server;
pub mod delivery;

pub use types::*;
pub use config::AppConfig;
pub use fetcher::Fetcher;
pub use traits::{ArticleSource, TextGenerator};
pub use prompt::GenerationRequest;
pub use sources::{FallbackResolver, NewsApiSource};
pub use llm_adapter::OllamaGenerator;
pub use processing::{RefinementStage, ResearchStage};
pub use pipeline::{NewsPipeline, PipelineBuilder, PipelineProfile};
pub use command::{handle_command, Command, CommandResponse};
pub use delivery::{deliver, load_delivery_target, DeliveryConfig};
