pub mod fallback;
pub mod news_api;

pub use fallback::FallbackResolver;
pub use news_api::NewsApiSource;
