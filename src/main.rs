use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use novelscope::config::Config;
use novelscope::embeddings::store;
use novelscope::output::terminal;
use novelscope::{NovelEngine, TextAnalytics};

/// Novelscope: text analytics for fiction.
///
/// Similarity, clustering, classification, sentiment, topics, style and
/// plot prediction over plain text.
#[derive(Parser)]
#[command(name = "novelscope", version, about)]
struct Cli {
    /// Print results as JSON instead of colored text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Similarity of two texts (0 to 1)
    Similarity { text1: String, text2: String },

    /// Similarity of a main text to each reference text
    Relatedness {
        main: String,
        references: Vec<String>,
        /// Read references from a file (one per line) or a directory
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Group texts into k clusters
    Cluster {
        texts: Vec<String>,
        #[arg(short, long, default_value = "2")]
        k: usize,
        /// Read texts from a file (one per line) or a directory
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Score a text against category labels
    Classify {
        text: Option<String>,
        /// Comma-separated categories
        #[arg(long, value_delimiter = ',', default_value = "fantasy,sci-fi,mystery,romance")]
        categories: Vec<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Sentiment score and label
    Sentiment {
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Extract k topics from one text
    Topics {
        text: Option<String>,
        #[arg(short, long, default_value = "3")]
        k: usize,
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Rank TF-IDF keywords across texts
    Keywords {
        texts: Vec<String>,
        #[arg(short, long, default_value = "20")]
        n: usize,
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Writing style metrics
    Style {
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Text complexity metrics
    Complexity {
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Split a novel's chapters into narrative sections
    Structure {
        /// A directory of chapter files, or a file with one chapter per line
        #[arg(long)]
        file: PathBuf,
    },

    /// Train word vectors on a corpus and save the model
    Train {
        /// A directory of documents, or a file with one document per line
        #[arg(long)]
        file: PathBuf,
        #[arg(short, long, default_value = "100")]
        dimensions: usize,
    },

    /// Predict plot developments from the chapters so far
    Predict {
        chapters: Vec<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("novelscope=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let model_dir = config.model_dir.clone();
    let engine = Arc::new(NovelEngine::new(config)?);
    let json = cli.json;

    match cli.command {
        Commands::Similarity { text1, text2 } => {
            let score = engine.similarity(&text1, &text2);
            emit(json, &score, || terminal::display_similarity(score))?;
        }

        Commands::Relatedness {
            main,
            references,
            file,
        } => {
            let references = documents(references, file.as_deref())?;
            let scores = engine.semantic_relatedness(&main, &references);
            emit(json, &scores, || terminal::display_relatedness(&references, &scores))?;
        }

        Commands::Cluster { texts, k, file } => {
            let texts = documents(texts, file.as_deref())?;
            let results = engine.cluster(&texts, k)?;
            emit(json, &results, || terminal::display_clusters(&results))?;
        }

        Commands::Classify {
            text,
            categories,
            file,
        } => {
            let text = single_text(text, file.as_deref())?;
            let scores = engine.classify(&text, &categories);
            emit(json, &scores, || terminal::display_classification(&scores))?;
        }

        Commands::Sentiment { text, file } => {
            let text = single_text(text, file.as_deref())?;
            let result = engine.sentiment(&text);
            emit(json, &result, || terminal::display_sentiment(&result))?;
        }

        Commands::Topics { text, k, file } => {
            let text = single_text(text, file.as_deref())?;
            let topics = engine.extract_topics(&text, k)?;
            emit(json, &topics, || novelscope::topics::result::display(&topics))?;
        }

        Commands::Keywords { texts, n, file } => {
            let texts = documents(texts, file.as_deref())?;
            let keywords = engine.extract_keywords(&texts, n);
            emit(json, &keywords, || terminal::display_keywords(&keywords))?;
        }

        Commands::Style { text, file } => {
            let text = single_text(text, file.as_deref())?;
            let style = engine.writing_style(&text);
            emit(json, &style, || terminal::display_writing_style(&style))?;
        }

        Commands::Complexity { text, file } => {
            let text = single_text(text, file.as_deref())?;
            let metrics = engine.text_complexity(&text);
            emit(json, &metrics, || terminal::display_complexity(&metrics))?;
        }

        Commands::Structure { file } => {
            let chapters = read_documents(&file)?;
            let structure = engine.novel_structure(&chapters);
            emit(json, &structure, || terminal::display_structure(&structure))?;
        }

        Commands::Train { file, dimensions } => {
            let corpus = read_documents(&file)?;
            info!(documents = corpus.len(), dimensions, "Starting training");

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("  {spinner} {msg} ({elapsed})")
                    .expect("valid template"),
            );
            spinner.set_message(format!("Training {dimensions}-dim word vectors"));
            spinner.enable_steady_tick(Duration::from_millis(100));

            let trained = Arc::clone(&engine)
                .train_word_vectors_in_background(corpus, dimensions)
                .await;
            spinner.finish_and_clear();

            if !trained? {
                bail!("Corpus in {} has no tokens to train on", file.display());
            }

            let path = store::model_path(&model_dir);
            engine.save_model(&path)?;

            if json {
                println!("{}", serde_json::json!({ "trained": true, "model": path }));
            } else {
                println!("{}", "Model trained.".bold());
                println!("  Saved to: {}", path.display());
            }
        }

        Commands::Predict { chapters, file } => {
            let chapters = documents(chapters, file.as_deref())?;
            if store::model_file_present(&model_dir) {
                engine.load_model(&store::model_path(&model_dir))?;
            } else if !json {
                println!(
                    "{}",
                    format!("No model found in {}.", model_dir.display()).dimmed()
                );
            }
            let predictions = engine.predict_plot_development(&chapters);
            emit(json, &predictions, || terminal::display_predictions(&predictions))?;
        }
    }

    Ok(())
}

/// Print `value` as JSON, or run the terminal display.
fn emit<T: Serialize>(json: bool, value: &T, display: impl FnOnce()) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        display();
    }
    Ok(())
}

/// Inline texts, or the documents in `file` when given.
fn documents(inline: Vec<String>, file: Option<&Path>) -> Result<Vec<String>> {
    match file {
        Some(path) => read_documents(path),
        None => Ok(inline),
    }
}

/// One text: inline, or the whole contents of `file`.
fn single_text(inline: Option<String>, file: Option<&Path>) -> Result<String> {
    match (inline, file) {
        (_, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        (Some(text), None) => Ok(text),
        (None, None) => bail!("Give a text argument or --file"),
    }
}

/// A directory yields one document per file, sorted by file name. A file
/// yields one document per non-empty line.
fn read_documents(path: &Path) -> Result<Vec<String>> {
    if path.is_dir() {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(path)
            .with_context(|| format!("Failed to list {}", path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        entries.sort();

        entries
            .iter()
            .map(|p| {
                std::fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display()))
            })
            .collect()
    } else {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
