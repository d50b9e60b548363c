use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use news_digest::{
    deliver, load_delivery_target, AppConfig, Fetcher, NewsApiSource, NewsPipeline,
    OllamaGenerator, PipelineBuilder, PipelineProfile, ResolvedArticles,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "news-digest", version, about = "Fetch, summarize and deliver a daily AI news digest")]
struct Cli {
    /// Digest profile: "agents" (LLMs, RAG, agents) or "general"
    #[arg(long, global = true, default_value = "agents")]
    profile: String,

    /// Only consider articles published on or after this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    since: Option<NaiveDate>,

    /// Maximum number of topics in the digest (1 to 3)
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(1..=3))]
    max_topics: Option<u8>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Serve `POST /news` for the chat bot
    Serve {
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Run the pipeline once and print the digest
    Run,
    /// Run the pipeline once and hand the digest to the delivery program
    Deliver {
        /// JSON record holding the target `groupId`
        #[arg(long)]
        group_record: Option<PathBuf>,
        /// Delivery program; the group id is appended to its arguments
        #[arg(long)]
        program: Option<String>,
        /// Argument for the delivery program (repeatable)
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Show the articles the fallback resolver picks, without summarizing
    Articles,
}

fn build_pipeline(config: &AppConfig, profile: PipelineProfile) -> news_digest::Result<NewsPipeline> {
    let source = NewsApiSource::new(
        Fetcher::new(config.source_fetch_config())?,
        config.news_api_base_url.clone(),
        config.news_api_key.clone(),
    )?;
    let mut generator = OllamaGenerator::new(
        Fetcher::new(config.llm_fetch_config())?,
        config.ollama_base_url.clone(),
        config.ollama_model.clone(),
    );
    if let Some(temperature) = config.ollama_temperature {
        generator = generator.with_temperature(temperature);
    }

    PipelineBuilder::new()
        .profile(profile)
        .source(Arc::new(source))
        .generator(Arc::new(generator))
        .build()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let mut profile: PipelineProfile = cli.profile.parse()?;
    profile = profile.with_from(cli.since);
    if let Some(max_topics) = cli.max_topics {
        profile = profile.with_max_topics(usize::from(max_topics));
    }
    info!("Using profile '{}'", profile.name);

    match cli.mode {
        Mode::Serve { bind } => {
            let pipeline = Arc::new(build_pipeline(&config, profile)?);
            let bind = bind.unwrap_or(config.bind);
            news_digest::server::serve(pipeline, bind).await?;
        }
        Mode::Run => {
            let pipeline = build_pipeline(&config, profile)?;
            let digest = pipeline.run().await.context("pipeline run failed")?;
            println!("{}", digest);
        }
        Mode::Deliver {
            group_record,
            program,
            args,
        } => {
            let record_path = group_record.unwrap_or_else(|| config.group_record.clone());
            let target = load_delivery_target(&record_path).map_err(|e| {
                error!("Cannot resolve delivery target: {}", e);
                e
            })?;
            info!("Delivery target resolved: {}", target.group_id);

            let mut delivery = config.delivery.clone();
            if let Some(program) = program {
                delivery.program = program;
                delivery.args = args;
            } else if !args.is_empty() {
                delivery.args = args;
            }

            let pipeline = build_pipeline(&config, profile)?;
            let digest = pipeline.run().await.map_err(|e| {
                error!("Pipeline failed, nothing delivered: {}", e);
                e
            })?;

            deliver(&delivery, &target, &digest.to_string())
                .await
                .map_err(|e| {
                    error!("{}", e);
                    e
                })?;
            info!("Digest delivered to {}", target.group_id);
        }
        Mode::Articles => {
            let pipeline = build_pipeline(&config, profile)?;
            match pipeline.resolve().await? {
                ResolvedArticles::Found { tier, articles } => {
                    println!("Articles from {}:\n", tier);
                    for article in articles {
                        println!(
                            "- {}\n  Source: {}\n  URL: {}\n",
                            article.title,
                            article.source_name.as_deref().unwrap_or("unknown"),
                            article.url.as_deref().unwrap_or("none")
                        );
                    }
                }
                ResolvedArticles::NoArticles => {
                    println!("No articles found from preferred or fallback sources.");
                }
            }
        }
    }

    Ok(())
}
