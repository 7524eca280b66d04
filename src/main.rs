use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing::{info, warn};

use catalog_cli::{
    ChatBot, RoutingPolicy, UserInput, display_banner, handle_input_with_history, print_help,
};
use catalog_core::{CourseCatalog, VectorStore};
use catalog_openai::{OpenAIClient, OpenAIConfig, OpenAIEmbedder};
use catalog_rag::{CourseIndex, LocalVectorStore, QdrantVectorStore};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Ask questions about the university class schedule", long_about = None)]
struct Cli {
    /// Class schedule export; the first line is the header
    #[arg(long, default_value = "Fall 2024 Class Schedule 08082024.csv")]
    csv: PathBuf,

    /// Qdrant gRPC endpoint
    #[arg(long, env = "QDRANT_URL", default_value = "http://localhost:6334")]
    qdrant_url: String,

    #[arg(long, default_value = "courses-collection")]
    course_collection: String,

    #[arg(long, default_value = "instructors-collection")]
    instructor_collection: String,

    /// Keep the index in memory instead of Qdrant
    #[arg(long)]
    local_store: bool,

    /// Routing policy: "direct" or "classifier"
    #[arg(long, default_value_t = RoutingPolicy::DirectLookup)]
    policy: RoutingPolicy,

    /// Vector store hits handed to the model
    #[arg(long, default_value_t = 5)]
    top_k: usize,

    /// Answer one question and exit
    #[arg(short, long)]
    question: Option<String>,

    /// Debug logging and raw search hits
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = OpenAIConfig::from_env().context("API key is missing")?;
    let llm = OpenAIClient::new(config.clone())?;

    let catalog = CourseCatalog::load(&cli.csv)
        .with_context(|| format!("failed to load course catalog from {}", cli.csv.display()))?;
    info!(
        courses = catalog.courses().len(),
        instructors = catalog.instructors().len(),
        "loaded course catalog"
    );
    if catalog.is_empty() {
        warn!("course catalog has no rows");
    }

    if cli.local_store {
        let index = CourseIndex::new(LocalVectorStore::new(), LocalVectorStore::new());
        run(&cli, llm, catalog, index).await
    } else {
        let courses = QdrantVectorStore::new(
            &cli.qdrant_url,
            &cli.course_collection,
            OpenAIEmbedder::new(config.clone())?,
        );
        let instructors = QdrantVectorStore::new(
            &cli.qdrant_url,
            &cli.instructor_collection,
            OpenAIEmbedder::new(config)?,
        );
        run(&cli, llm, catalog, CourseIndex::new(courses, instructors)).await
    }
}

async fn run<V: VectorStore>(
    cli: &Cli,
    llm: OpenAIClient,
    catalog: CourseCatalog,
    mut index: CourseIndex<V>,
) -> Result<()> {
    index
        .connect()
        .await
        .context("failed to connect to the vector store")?;
    let indexed = index
        .add_courses(catalog.courses())
        .await
        .context("failed to index courses")?;
    info!(
        courses = indexed.courses_indexed,
        instructors = indexed.instructors_indexed,
        skipped = ?indexed.skipped,
        "vector store ready"
    );

    let (courses, instructors) = (catalog.courses().len(), catalog.instructors().len());
    let bot = ChatBot::new(llm, catalog, index)
        .with_policy(cli.policy)
        .with_top_k(cli.top_k);

    if let Some(question) = &cli.question {
        let answer = bot.answer_question(question).await?;
        println!("{}", answer);
        return Ok(());
    }

    display_banner(courses, instructors);

    let mut history = Vec::new();
    while let Some(line) = handle_input_with_history(&mut history)? {
        match UserInput::parse(&line) {
            UserInput::Empty => println!("{}", "Please enter a valid query.".yellow()),
            UserInput::Help => print_help(),
            UserInput::Exit => break,
            UserInput::Question(question) => match bot.answer_question(&question).await {
                Ok(answer) => println!("{}", answer),
                Err(e) => println!("{} {}", "Error processing your question:".red(), e),
            },
        }
    }

    println!("{}", "Goodbye!".green());
    Ok(())
}
