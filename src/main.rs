// textlens CLI: one subcommand per analysis feature, plain-text input
// from an argument or a .txt file, fixed-name export artifacts.
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use rayon::prelude::*;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use walkdir::WalkDir;

use textlens::error::AnalysisError;
use textlens::export;
use textlens::nlp::generate::{EmailStyle, StoryLength, TextGenerator};
use textlens::nlp::ner::EntityCategory;
use textlens::nlp::{classify, merge, ner, qa, relations, sentiment, summarization};
use textlens::session::{QaExchange, SessionState};

#[derive(Parser)]
#[command(name = "textlens", about = "Rule-based text analysis toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract named entities from text
    Entities {
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Entity types to report (default PERSON, ORGANIZATION, LOCATION)
        #[arg(short, long, value_delimiter = ',')]
        types: Vec<String>,
        #[arg(long)]
        json: bool,
        /// Write extracted_entities.txt
        #[arg(long)]
        save: bool,
    },
    /// Extract entities with user-supplied regex patterns
    Custom {
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// name=regex pairs (1 to 5)
        #[arg(short, long = "pattern")]
        patterns: Vec<String>,
        #[arg(long)]
        save: bool,
    },
    /// Extract entities from every .txt file in a directory
    EntitiesBatch {
        #[arg(short, long)]
        dir: PathBuf,
        /// Write batch_entity_results.txt
        #[arg(long)]
        save: bool,
    },
    /// Infer person/organization/location relationships
    Relationships {
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(long)]
        save: bool,
    },
    /// Extractive summary
    Summarize {
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Summary length as a percentage of the original (10-80)
        #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(10..=80))]
        ratio: u8,
        #[arg(long)]
        save: bool,
    },
    /// Bullet-point summary
    Bullets {
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(3..=10))]
        max_points: u8,
        #[arg(long)]
        save: bool,
    },
    /// Keywords and key phrases
    Keywords {
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(5..=20))]
        count: u8,
        #[arg(long)]
        save: bool,
    },
    /// Sentiment analysis of one text
    Sentiment {
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Sentiment over every .txt file in a directory, exported as CSV
    SentimentBatch {
        #[arg(short, long)]
        dir: PathBuf,
    },
    /// Classify text into a content category
    Classify {
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Answer one or more questions about a context document
    Ask {
        context: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(short, long = "question", required = true)]
        questions: Vec<String>,
        #[arg(long)]
        json: bool,
        /// Write qa_results.txt
        #[arg(long)]
        save: bool,
    },
    /// Generate questions a context could answer
    Questions {
        context: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(3..=10))]
        count: u8,
        #[arg(long)]
        save: bool,
    },
    /// Template-based text generation
    #[command(subcommand)]
    Generate(GenerateCommands),
}

#[derive(Subcommand)]
enum GenerateCommands {
    /// Generate a short story
    Story {
        #[arg(short, long, default_value = "")]
        theme: String,
        #[arg(short, long, default_value = "short")]
        length: String,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate an email
    Email {
        #[arg(short, long, default_value = "professional")]
        style: String,
        #[arg(short, long)]
        purpose: String,
        #[arg(short, long, default_value = "Recipient")]
        recipient: String,
        #[arg(long, default_value = "Sender")]
        sender: String,
    },
    /// Generate a blog post
    Blog {
        #[arg(short, long)]
        title: String,
        #[arg(short, long = "point")]
        points: Vec<String>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Continue existing text
    Continue {
        text: String,
        #[arg(short, long, default_value = "creative")]
        style: String,
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Only plain-text files are accepted as input documents.
fn read_text_file(path: &Path) -> Result<String> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    if ext != "txt" {
        return Err(AnalysisError::config(format!(
            "only plain-text (.txt) files are supported, got '{}'",
            path.display()
        ))
        .into());
    }
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn collect_txt_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|s| s.to_str())
                .map(|ext| ext == "txt")
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    if files.is_empty() {
        bail!("no .txt files under {}", dir.display());
    }
    Ok(files)
}

fn progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {wide_bar} {pos}/{len} {msg}",
        )?
        .progress_chars("=>-"),
    );
    Ok(pb)
}

fn resolve_input(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (text, file) {
        (Some(t), None) => Ok(t),
        (None, Some(f)) => read_text_file(&f),
        (Some(_), Some(_)) => bail!("pass either TEXT or --file, not both"),
        (None, None) => bail!("no input: pass TEXT or --file"),
    }
}

fn header(stdout: &mut StandardStream, title: &str) -> Result<()> {
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    writeln!(stdout, "{title}")?;
    stdout.reset()?;
    Ok(())
}

fn save_artifact(name: &str, content: &str) -> Result<()> {
    fs::write(name, content).with_context(|| format!("writing {name}"))?;
    println!("Wrote {name}");
    Ok(())
}

fn parse_custom_patterns(raw: &[String]) -> Result<Vec<(String, String)>> {
    if raw.is_empty() || raw.len() > 5 {
        bail!("between 1 and 5 custom patterns are required");
    }
    raw.iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(name, pattern)| (name.trim().to_string(), pattern.to_string()))
                .ok_or_else(|| anyhow!("pattern '{entry}' is not in name=regex form"))
        })
        .collect()
}

fn parse_types(raw: &[String]) -> Result<Vec<EntityCategory>> {
    if raw.is_empty() {
        return Ok(vec![
            EntityCategory::Person,
            EntityCategory::Organization,
            EntityCategory::Location,
        ]);
    }
    raw.iter()
        .map(|t| EntityCategory::parse(t).ok_or_else(|| anyhow!("unknown entity type '{t}'")))
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    match cli.command {
        Commands::Entities {
            text,
            file,
            types,
            json,
            save,
        } => {
            let input = resolve_input(text, file)?;
            let selected = parse_types(&types)?;
            let report = merge::extract_selected(&input, &selected)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                header(&mut stdout, "Named entities")?;
                for (category, entries) in report.entities.iter() {
                    if entries.is_empty() {
                        continue;
                    }
                    println!("{category} ({}):", entries.len());
                    for entity in entries {
                        println!("  {} ({:.0}%)", entity.text, entity.confidence * 100.0);
                    }
                }
                println!("Total entities: {}", report.total_entities);
                if !report.most_common.is_empty() {
                    println!("Most common:");
                    for (text, count) in &report.most_common {
                        println!("  {text} ({count})");
                    }
                }
            }
            if save {
                save_artifact(export::ENTITIES_FILE, &export::entity_report(&report))?;
            }
        }

        Commands::EntitiesBatch { dir, save } => {
            let files = collect_txt_files(&dir)?;
            let pb = progress_bar(files.len() as u64)?;

            let failures: Mutex<Vec<(PathBuf, String)>> = Mutex::new(Vec::new());
            let texts: Vec<String> = files
                .par_iter()
                .map(|path| {
                    let text = match fs::read_to_string(path) {
                        Ok(text) => text,
                        Err(e) => {
                            failures.lock().push((path.clone(), e.to_string()));
                            String::new()
                        }
                    };
                    pb.inc(1);
                    text
                })
                .collect();
            pb.finish_with_message("extracted");

            let batch = merge::extract_batch(&texts);
            header(&mut stdout, "Batch entity extraction")?;
            println!(
                "{} texts, {} entities ({:.1} per text)",
                batch.total_texts, batch.total_entities, batch.average_entities_per_text
            );
            for item in &batch.results {
                println!(
                    "  {}: {} entities",
                    files[item.text_id - 1].display(),
                    item.report.total_entities
                );
            }
            for failure in &batch.failures {
                println!(
                    "  FAILED {}: {}",
                    files[failure.text_id - 1].display(),
                    failure.error
                );
            }
            for (path, error) in failures.into_inner() {
                println!("  FAILED {}: {error}", path.display());
            }

            if save {
                save_artifact(
                    export::BATCH_ENTITIES_FILE,
                    &export::batch_entity_report(&batch),
                )?;
            }
        }

        Commands::Custom {
            text,
            file,
            patterns,
            save,
        } => {
            let input = resolve_input(text, file)?;
            let pairs = parse_custom_patterns(&patterns)?;
            let results = ner::extract_custom(&input, &pairs)?;

            header(&mut stdout, "Custom pattern matches")?;
            for result in &results {
                println!("{}: {} found", result.name, result.matches.len());
                for m in &result.matches {
                    println!("  {m}");
                }
            }
            if save {
                save_artifact(
                    export::CUSTOM_ENTITIES_FILE,
                    &export::custom_entity_report(&results),
                )?;
            }
        }

        Commands::Relationships { text, file, save } => {
            let input = resolve_input(text, file)?;
            let (report, relations) = relations::analyze(&input)?;

            header(&mut stdout, "Entity relationships")?;
            println!("Relationships: {}", relations.relationship_count);
            for rel in &relations.relationships {
                println!("  {} {} {}", rel.entity1, rel.kind.as_str(), rel.entity2);
            }
            if save {
                save_artifact(
                    export::RELATIONSHIPS_FILE,
                    &export::relationship_report(&report, &relations),
                )?;
            }
        }

        Commands::Summarize {
            text,
            file,
            ratio,
            save,
        } => {
            let input = resolve_input(text, file)?;
            let result = summarization::extractive_summarize(&input, ratio as f64 / 100.0)?;

            header(&mut stdout, "Summary")?;
            println!("{}", result.summary);
            if result.below_minimum_length {
                println!("(text below minimum length; returned unchanged)");
            }
            println!(
                "Sentences: {}/{}  Compression: {:.0}%",
                result.sentences_selected,
                result.original_sentences,
                result.compression_ratio * 100.0
            );
            if save {
                save_artifact(export::SUMMARY_FILE, &export::summary_report(&result))?;
            }
        }

        Commands::Bullets {
            text,
            file,
            max_points,
            save,
        } => {
            let input = resolve_input(text, file)?;
            let result = summarization::bullet_point_summary(&input, max_points as usize)?;

            header(&mut stdout, "Key points")?;
            for point in &result.points {
                println!("• {point}");
            }
            if save {
                save_artifact(export::BULLETS_FILE, &export::bullet_report(&result))?;
            }
        }

        Commands::Keywords {
            text,
            file,
            count,
            save,
        } => {
            let input = resolve_input(text, file)?;
            let result = summarization::keyword_summary(&input, count as usize)?;

            header(&mut stdout, "Keywords")?;
            for (i, keyword) in result.keywords.iter().enumerate() {
                println!("{}. {keyword}", i + 1);
            }
            if !result.key_phrases.is_empty() {
                header(&mut stdout, "Key phrases")?;
                for (i, phrase) in result.key_phrases.iter().enumerate() {
                    println!("{}. {phrase}", i + 1);
                }
            }
            if save {
                save_artifact(export::KEYWORDS_FILE, &export::keyword_report(&result))?;
            }
        }

        Commands::Sentiment { text, file, json } => {
            let input = resolve_input(text, file)?;
            let report = sentiment::analyze_sentiment(&input)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                header(&mut stdout, "Sentiment")?;
                println!(
                    "{} (polarity {:.2}, subjectivity {:.2}, confidence {:.0}%)",
                    report.sentiment,
                    report.polarity,
                    report.subjectivity,
                    report.confidence * 100.0
                );
                println!("Intensity: {}", report.intensity.level);
                for (emotion, score) in &report.emotion_scores {
                    if *score > 0.0 {
                        println!("  {emotion}: {score:.3}");
                    }
                }
            }
        }

        Commands::SentimentBatch { dir } => {
            let files = collect_txt_files(&dir)?;
            let pb = progress_bar(files.len() as u64)?;

            // One failure never aborts the batch; unreadable files are
            // reported beside the successes.
            let failures: Mutex<Vec<(PathBuf, String)>> = Mutex::new(Vec::new());
            let texts: Vec<String> = files
                .par_iter()
                .map(|path| {
                    let text = match fs::read_to_string(path) {
                        Ok(text) => text,
                        Err(e) => {
                            failures.lock().push((path.clone(), e.to_string()));
                            String::new()
                        }
                    };
                    pb.inc(1);
                    text
                })
                .collect();
            pb.finish_with_message("analyzed");

            let report = sentiment::compare_sentiments(&texts);
            header(&mut stdout, "Batch sentiment")?;
            for item in &report.comparisons {
                println!(
                    "{} [{}] {}",
                    files[item.text_id - 1].display(),
                    item.sentiment,
                    item.preview
                );
            }
            println!("Average polarity: {:.3}", report.average_polarity);

            let failures = failures.into_inner();
            for (path, error) in &failures {
                println!("FAILED {}: {error}", path.display());
            }

            save_artifact(
                export::SENTIMENT_CSV_FILE,
                &export::sentiment_csv(&report.comparisons)?,
            )?;
        }

        Commands::Classify { text, file } => {
            let input = resolve_input(text, file)?;
            let result = classify::classify_text(&input)?;

            header(&mut stdout, "Classification")?;
            println!(
                "{} ({:.0}%)",
                result.category,
                result.confidence * 100.0
            );
            println!("{}", classify::category_description(&result.category));
        }

        Commands::Ask {
            context,
            file,
            questions,
            json,
            save,
        } => {
            let input = resolve_input(context, file)?;
            let report = qa::answer_multiple(&questions, &input);

            // The session log belongs to this shell layer, not the core.
            let mut session = SessionState::new();
            for item in &report.results {
                session.record_usage("qa");
                session.log_exchange(QaExchange {
                    question: item.question.clone(),
                    answer: item.answer.clone(),
                    confidence: item.confidence,
                    question_type: item.question_type.clone(),
                });
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                header(&mut stdout, "Answers")?;
                for item in &report.results {
                    println!("Q{}: {}", item.question_id, item.question);
                    println!("A{}: {}", item.question_id, item.answer);
                    println!(
                        "    confidence {:.0}%, type {}",
                        item.confidence * 100.0,
                        item.question_type
                    );
                }
                println!(
                    "{}/{} answered with confidence above 30%",
                    report.successful_answers, report.total_questions
                );
            }
            if save {
                save_artifact(export::QA_FILE, &export::qa_report(&report))?;
            }
        }

        Commands::Questions {
            context,
            file,
            count,
            save,
        } => {
            let input = resolve_input(context, file)?;
            let result = qa::generate_questions(&input, count as usize)?;

            header(&mut stdout, "Generated questions")?;
            for (i, question) in result.questions.iter().enumerate() {
                println!("{}. {question}", i + 1);
            }
            if save {
                save_artifact(
                    export::GENERATED_QUESTIONS_FILE,
                    &export::generated_questions_report(&result.questions),
                )?;
            }
        }

        Commands::Generate(command) => {
            let result = match command {
                GenerateCommands::Story { theme, length, seed } => {
                    let length = StoryLength::parse(&length)
                        .ok_or_else(|| anyhow!("length must be short, medium, or long"))?;
                    generator(seed).story(&theme, length)
                }
                GenerateCommands::Email {
                    style,
                    purpose,
                    recipient,
                    sender,
                } => {
                    let style = EmailStyle::parse(&style)
                        .ok_or_else(|| anyhow!("style must be professional, casual, or formal"))?;
                    generator(None).email(style, &purpose, &recipient, &sender)?
                }
                GenerateCommands::Blog { title, points, seed } => {
                    generator(seed).blog_post(&title, &points)?
                }
                GenerateCommands::Continue { text, style, seed } => {
                    generator(seed).continue_text(&text, &style)?
                }
            };

            header(&mut stdout, "Generated text")?;
            println!("{}", result.text);
            println!("({} words)", result.word_count);
        }
    }

    Ok(())
}

fn generator(seed: Option<u64>) -> TextGenerator {
    match seed {
        Some(seed) => TextGenerator::with_seed(seed),
        None => TextGenerator::new(),
    }
}
