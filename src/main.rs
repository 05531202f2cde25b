// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use pdf_qa::config::ProviderKind;
use pdf_qa::utils::logging::{format_error, format_info, format_step, format_success, format_warning};
use pdf_qa::{
    Component, Config, HealthCheck, HealthReport, HealthStatus, JsonExporter, JsonRecordStore,
    PipelineError, QaService, RecordStore, Validator, build_providers,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "pdf_qa")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Ask questions about PDF documents with retrieval-augmented generation", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a PDF and extract its text
    Upload {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Ask a question about an uploaded document
    Ask {
        document_id: String,

        question: String,

        /// Print the retrieved chunks used as context
        #[arg(long)]
        sources: bool,
    },

    /// List uploaded documents
    Documents,

    /// Show the question history of a document
    Questions { document_id: String },

    /// Write documents and their question history as JSON
    Export {
        /// Export a single document; every document when omitted
        document_id: Option<String>,

        #[arg(short, long, default_value = "./exports")]
        output: PathBuf,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Check configuration, storage and provider health
    Verify {
        /// Send a one-line embedding request to the provider
        #[arg(long)]
        probe: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    colored::control::set_override(cli.color);
    pdf_qa::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let mut config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };
    config.retrieval.show_progress = true;

    if let Err(err) = run(cli.command, &config).await {
        if let Some(pipeline_err) = err.downcast_ref::<PipelineError>() {
            eprintln!(
                "{}",
                format_error(&format!(
                    "{} (status {})",
                    pipeline_err.user_message(),
                    pipeline_err.status_code()
                ))
            );
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}

async fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Upload { file } => cmd_upload(config, &file).await,
        Commands::Ask {
            document_id,
            question,
            sources,
        } => cmd_ask(config, &document_id, &question, sources).await,
        Commands::Documents => cmd_documents(config).await,
        Commands::Questions { document_id } => cmd_questions(config, &document_id).await,
        Commands::Export {
            document_id,
            output,
            pretty,
        } => cmd_export(config, document_id.as_deref(), output, pretty).await,
        Commands::Verify { probe } => cmd_verify(config, probe).await,
    }
}

async fn cmd_upload(config: &Config, file: &Path) -> Result<()> {
    let start_time = Instant::now();
    Validator::validate_file_path(file)?;

    println!("{}", format_step(1, 3, "Reading file"));
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    println!("{}", format_step(2, 3, "Extracting text"));
    let service = QaService::from_config(config).await?;
    let document = service.upload_pdf(&filename, &bytes).await?;

    println!("{}", format_step(3, 3, "Recorded document"));
    println!(
        "{}",
        format_success(&format!(
            "Uploaded {} as {} ({} pages, {} chars) in {:.2}s",
            document.filename,
            document.id,
            document.page_count,
            document.text_len(),
            start_time.elapsed().as_secs_f64()
        ))
    );

    Ok(())
}

async fn cmd_ask(config: &Config, document_id: &str, question: &str, sources: bool) -> Result<()> {
    let service = QaService::from_config(config).await?;
    let answered = service.ask(document_id, question).await?;

    println!("\nQuestion: {}", answered.record.question);
    println!("Answer:   {}\n", answered.record.answer);
    println!("{}", format_info(&answered.answer.stats.summary()));

    if sources {
        println!("\n{}", "=".repeat(80));
        for (idx, source) in answered.answer.sources.iter().enumerate() {
            println!("\n{}. {}", idx + 1, source.format_summary(300));
        }
        println!("{}", "=".repeat(80));
    }

    Ok(())
}

async fn cmd_documents(config: &Config) -> Result<()> {
    let records = JsonRecordStore::open(&config.storage.records_path).await?;
    let documents = records.list_documents().await?;

    if documents.is_empty() {
        println!("{}", format_info("No documents uploaded yet"));
        return Ok(());
    }

    println!("\nFound {} document(s)\n", documents.len());
    for document in documents {
        println!(
            "{}  {}  {} pages  {}",
            document.id,
            document.upload_date.format("%Y-%m-%d %H:%M:%S"),
            document.page_count,
            document.filename
        );
    }

    Ok(())
}

async fn cmd_questions(config: &Config, document_id: &str) -> Result<()> {
    let records = JsonRecordStore::open(&config.storage.records_path).await?;
    let document = records
        .get_document(document_id)
        .await?
        .ok_or_else(|| PipelineError::NotFound(format!("document {}", document_id)))?;
    let questions = records.list_questions(document_id).await?;

    println!("\n{} ({} questions)\n", document.filename, questions.len());
    for record in questions {
        println!(
            "[{}] Q: {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.question
        );
        println!("    A: {}\n", Validator::truncate_text(&record.answer, 500));
    }

    Ok(())
}

async fn cmd_export(
    config: &Config,
    document_id: Option<&str>,
    output: PathBuf,
    pretty: bool,
) -> Result<()> {
    info!("Initializing JSON export");

    let records = JsonRecordStore::open(&config.storage.records_path).await?;
    let exporter = JsonExporter::new(output)?;

    if let Some(id) = document_id {
        let document = records
            .get_document(id)
            .await?
            .ok_or_else(|| PipelineError::NotFound(format!("document {}", id)))?;
        let questions = records.list_questions(id).await?;
        let path = exporter.export_document(&document, &questions, pretty)?;
        println!("{}", format_success(&format!("Exported to {}", path.display())));
    } else {
        let mut entries = Vec::new();
        for document in records.list_documents().await? {
            let questions = records.list_questions(&document.id).await?;
            entries.push((document, questions));
        }
        let manifest = exporter.export_all(&entries, pretty)?;
        println!(
            "{}",
            format_success(&format!(
                "Exported {} documents and {} questions",
                manifest.total_documents, manifest.total_questions
            ))
        );
    }

    Ok(())
}

async fn cmd_verify(config: &Config, probe: bool) -> Result<()> {
    info!("Verifying configuration and storage");
    let mut checks = Vec::new();

    let started = Instant::now();
    checks.push(match config.validate() {
        Ok(()) => HealthCheck::passed(Component::Configuration, started),
        Err(e) => HealthCheck::failed(Component::Configuration, e, started),
    });

    let started = Instant::now();
    checks.push(match check_upload_dir(&config.storage.upload_dir).await {
        Ok(()) => HealthCheck::passed(Component::UploadDirectory, started),
        Err(e) => HealthCheck::failed(Component::UploadDirectory, e, started),
    });

    let started = Instant::now();
    let records = match JsonRecordStore::open(&config.storage.records_path).await {
        Ok(store) => store.list_documents().await,
        Err(e) => Err(e),
    };
    checks.push(match records {
        Ok(documents) if documents.is_empty() => {
            HealthCheck::limited(Component::RecordStore, "no documents uploaded yet", started)
        }
        Ok(_) => HealthCheck::passed(Component::RecordStore, started),
        Err(e) => HealthCheck::failed(Component::RecordStore, e, started),
    });

    let started = Instant::now();
    checks.push(match build_providers(&config.provider) {
        Err(e) => HealthCheck::failed(Component::Provider, e, started),
        Ok(providers) if probe => match providers.embedder.embed("health check").await {
            Ok(_) => HealthCheck::passed(Component::Provider, started),
            Err(e) => HealthCheck::failed(
                Component::Provider,
                PipelineError::from(e).user_message(),
                started,
            ),
        },
        Ok(_) if config.provider.kind == ProviderKind::Local => HealthCheck::limited(
            Component::Provider,
            "offline hashing embedder and extractive answers",
            started,
        ),
        Ok(_) => HealthCheck::passed(Component::Provider, started),
    });

    let report = HealthReport::new(checks, env!("CARGO_PKG_VERSION"));
    println!("\n{}", report.format());

    match report.status {
        HealthStatus::Healthy => println!("{}", format_success("All checks passed")),
        HealthStatus::Degraded => println!("{}", format_warning("Some checks are degraded")),
        HealthStatus::Unhealthy => {
            println!("{}", format_error("Some checks failed"));
            return Err(anyhow::anyhow!("Verification failed"));
        }
    }

    Ok(())
}

async fn check_upload_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Cannot create {}", dir.display()))?;

    let probe = dir.join(".write_check");
    tokio::fs::write(&probe, b"ok")
        .await
        .with_context(|| format!("{} is not writable", dir.display()))?;
    tokio::fs::remove_file(&probe).await.ok();

    Ok(())
}
