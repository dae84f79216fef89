use background_service::{
    BackgroundService, NewsPipeline, PassMode, PassReport, ThreadGenerator, ThreadOutcome,
};
use boltbot_core::{BotConfig, CoreError, ErrorExt, ErrorReporter, PostId};
use clap::{Parser, Subcommand};
use dedup_store::PostedStore;
use feed_reader::FeedClient;
use llm_interface::prompt::DEFAULT_SUBJECT;
use llm_interface::AnyProvider;
use tracing_subscriber::EnvFilter;
use x_client::{Publisher, XClient};

const CRATES: [&str; 7] = [
    "boltbot",
    "boltbot_core",
    "feed_reader",
    "dedup_store",
    "x_client",
    "llm_interface",
    "background_service",
];

#[derive(Parser)]
#[command(name = "boltbot", version, about = "Posts Chargers news from RSS feeds to X")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Fetch, filter and publish new articles once
    Run,
    /// Run a pass now and then every CHECK_INTERVAL_HOURS
    Schedule,
    /// Show what would be posted without posting or recording anything
    DryRun,
    /// Post the newest relevant article, ignoring its age and the history
    Test,
    /// Generate a history thread with the configured AI provider
    Thread {
        /// What the thread should be about
        #[arg(long, default_value = DEFAULT_SUBJECT)]
        subject: String,
        /// Publish the thread instead of printing it
        #[arg(long)]
        live: bool,
    },
}

/// Stands in for the platform client in modes that never publish.
struct DraftOnly;

impl Publisher for DraftOnly {
    async fn post(&self, _text: &str) -> Result<PostId, CoreError> {
        Err(CoreError::Internal {
            message: "publishing is disabled in dry runs".to_string(),
        })
    }

    async fn reply(&self, _text: &str, _in_reply_to: &str) -> Result<PostId, CoreError> {
        Err(CoreError::Internal {
            message: "publishing is disabled in dry runs".to_string(),
        })
    }
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = CRATES
            .iter()
            .map(|name| format!("{}={}", name, level))
            .collect();
        EnvFilter::new(directives.join(","))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CoreError> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = BotConfig::from_env();
    init_tracing(config.as_ref().map(|c| c.debug).unwrap_or(false));

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
    }

    let result = match config {
        Ok(config) => run(cli.command.unwrap_or(Command::Run), config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        ErrorReporter::new().report_error(e);
        eprintln!("❌ {}", e.user_friendly_message());
    }
    result
}

async fn run(command: Command, config: BotConfig) -> Result<(), CoreError> {
    tracing::info!("Starting boltbot ({:?})", command);

    match command {
        Command::Run => {
            let client = XClient::new(config.validate_publishing()?)?;
            let report = news_pipeline(&config, client)?.run_pass(PassMode::Normal).await?;
            print_pass_summary(&report);
        }
        Command::Schedule => {
            let client = XClient::new(config.validate_publishing()?)?;
            let pipeline = news_pipeline(&config, client)?;
            BackgroundService::new(pipeline, config.check_interval())
                .start()
                .await;
        }
        Command::DryRun => {
            println!("🧪 Dry run: nothing will be posted or recorded");
            let report = news_pipeline(&config, DraftOnly)?.run_pass(PassMode::DryRun).await?;
            print_drafts(&report);
        }
        Command::Test => {
            println!("🧪 Posting the newest relevant article...");
            let client = XClient::new(config.validate_publishing()?)?;
            let report = news_pipeline(&config, client)?.run_pass(PassMode::ForceTest).await?;
            match report.published.first() {
                Some(post) => println!("✅ Posted {} (id {})", post.link, post.post_id),
                None => println!("⚠️  No relevant articles found"),
            }
        }
        Command::Thread { subject, live } => {
            let provider = AnyProvider::from_settings(config.provider_settings()?)?;
            let generator = ThreadGenerator::new(provider);

            let outcome = if live {
                let client = XClient::new(config.validate_publishing()?)?;
                generator.run(&subject, &client, false).await?
            } else {
                generator.run(&subject, &DraftOnly, true).await?
            };
            print_thread(&outcome);
        }
    }

    Ok(())
}

fn news_pipeline<P: Publisher>(
    config: &BotConfig,
    publisher: P,
) -> Result<NewsPipeline<FeedClient, P>, CoreError> {
    Ok(NewsPipeline::new(
        FeedClient::new()?,
        publisher,
        PostedStore::open(&config.posted_articles_file),
        config.sources.clone(),
    )
    .with_max_age(config.max_article_age())
    .with_post_spacing(config.post_spacing()))
}

fn print_pass_summary(report: &PassReport) {
    println!("\n📊 Pass summary");
    println!("   Relevant articles: {}", report.relevant);
    println!("   Published: {}", report.published.len());
    println!("   Already posted: {}", report.already_posted);
    println!("   Too old: {}", report.too_old);
    if report.failed > 0 {
        println!("   Failed: {}", report.failed);
    }
}

fn print_drafts(report: &PassReport) {
    if report.drafts.is_empty() {
        println!(
            "\n⚠️  Nothing new to post ({} relevant, {} already posted, {} too old)",
            report.relevant, report.already_posted, report.too_old
        );
        return;
    }

    for draft in &report.drafts {
        let published = draft
            .article
            .published_at
            .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string());

        println!("\n{}", "=".repeat(60));
        println!("📰 {} ({})", draft.article.source_name, published);
        println!("{}", "-".repeat(60));
        println!("{}", draft.message);
        println!("{}", "-".repeat(60));
        println!("   {} characters", draft.message.chars().count());
    }
    println!("\n✅ {} draft(s) ready", report.drafts.len());
}

fn print_thread(outcome: &ThreadOutcome) {
    let total = outcome.segments().len();
    for (index, segment) in outcome.segments().iter().enumerate() {
        println!("\n[{}/{}] ({} chars)", index + 1, total, segment.chars().count());
        println!("{}", segment);
    }

    match outcome {
        ThreadOutcome::Drafted(_) => {
            println!("\n📝 Dry run: {} posts drafted. Use --live to publish.", total)
        }
        ThreadOutcome::Published { post_ids, .. } => {
            let first = post_ids.first().map(String::as_str).unwrap_or("-");
            println!("\n✅ Thread published, first post id {}", first);
        }
    }
}
