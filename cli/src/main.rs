//! pdfchat CLI - ask questions about a PDF

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfchat::rag::{DEFAULT_HOST, DEFAULT_MODEL};
use pdfchat::{
    Exchange, GeneratorConfig, Orchestrator, PdfExtractor, RagAnswer, RagOptions, Status, Store,
    DEFAULT_DB_PATH,
};

#[derive(Parser)]
#[command(name = "pdfchat")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract a PDF into SQLite and ask questions about it", long_about = None)]
struct Cli {
    /// Record store file
    #[arg(long, global = true, env = "PDFCHAT_DB", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Model name
    #[arg(long, global = true, env = "PDFCHAT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Ollama server URL
    #[arg(long, global = true, env = "OLLAMA_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Generation timeout in seconds
    #[arg(long, global = true, default_value = "120")]
    timeout: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text, images, and tables into the store (replaces its contents)
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Ask a single question
    Ask {
        /// The question
        #[arg(value_name = "QUERY", required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Interactive question loop with conversation history
    Chat {
        /// Load and save the conversation history as JSON
        #[arg(long, value_name = "FILE")]
        history_file: Option<PathBuf>,
    },

    /// Show stored text blocks, images, and tables
    Show {
        /// Maximum number of text blocks to show
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Write image payloads to this directory
        #[arg(long, value_name = "DIR")]
        images_dir: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let generator = GeneratorConfig::new()
        .with_host(cli.host.clone())
        .with_model(cli.model.clone())
        .with_timeout(Duration::from_secs(cli.timeout));

    let result = match cli.command {
        Some(Commands::Extract { input }) => cmd_extract(&input, &cli.db),
        Some(Commands::Ask { query }) => cmd_ask(&query.join(" "), &cli.db, generator),
        Some(Commands::Chat { history_file }) => {
            cmd_chat(&cli.db, generator, history_file.as_deref())
        }
        Some(Commands::Show { limit, images_dir }) => {
            cmd_show(&cli.db, limit, images_dir.as_deref())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pdfchat <COMMAND>".yellow());
            println!("       pdfchat --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_extract(input: &Path, db: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !input.is_file() {
        return Err("PDF file not found.".into());
    }

    let mut store = Store::open(db)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting {}...", input.display()));

    let result = PdfExtractor::new(input).run(&mut store);
    pb.finish_and_clear();

    let report = result.map_err(|e| format!("Error processing PDF: {}", e))?;

    println!("{}", "PDF content extracted and stored.".green().bold());
    println!("  {} {} pages", "├─".dimmed(), report.pages);
    println!("  {} {} text blocks", "├─".dimmed(), report.counts.texts);
    println!("  {} {} images", "├─".dimmed(), report.counts.images);
    println!("  {} {} tables", "└─".dimmed(), report.counts.tables);

    if !report.diagnostics.is_empty() {
        println!(
            "\n{} {} element(s) skipped",
            "Warning:".yellow().bold(),
            report.diagnostics.len()
        );
        for diagnostic in &report.diagnostics {
            println!("  {} {}", "-".dimmed(), diagnostic);
        }
    }

    Ok(())
}

fn cmd_ask(
    query: &str,
    db: &Path,
    generator: GeneratorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(db)?;
    let orchestrator = Orchestrator::with_ollama(generator, RagOptions::default());

    let answer = orchestrator.answer(query, &store, &[]);
    print_answer(&answer);
    Ok(())
}

fn cmd_chat(
    db: &Path,
    generator: GeneratorConfig,
    history_file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(db)?;
    let orchestrator = Orchestrator::with_ollama(generator, RagOptions::default());

    let mut history: Vec<Exchange> = match history_file {
        Some(path) if path.exists() => serde_json::from_str(&fs::read_to_string(path)?)?,
        _ => Vec::new(),
    };

    println!("{}", "PDF Chatbot".cyan().bold());
    println!(
        "{}",
        "Type a question, /history, /clear, or /quit.".dimmed()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{} ", ">".cyan().bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let query = line.trim();

        match query {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                history.clear();
                println!("{}", "History cleared.".dimmed());
            }
            "/history" => print_history(&history),
            _ => {
                let answer = orchestrator.answer(query, &store, &history);
                print_answer(&answer);
                history.push(Exchange::new(query, answer.text));
            }
        }
    }

    if let Some(path) = history_file {
        fs::write(path, serde_json::to_string_pretty(&history)?)?;
        println!("{} {}", "Saved history to".green(), path.display());
    }

    Ok(())
}

fn cmd_show(
    db: &Path,
    limit: usize,
    images_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(db)?;
    let counts = store.counts()?;

    println!("{}", "Text Data".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    let texts = store.texts()?;
    for text in texts.iter().take(limit) {
        let preview: String = text.content.chars().take(200).collect();
        let ellipsis = if text.content.chars().count() > 200 {
            "..."
        } else {
            ""
        };
        println!("{} {}{}", format!("[p{}]", text.page_number).bold(), preview, ellipsis);
    }
    if counts.texts > limit {
        println!("{}", format!("... {} more", counts.texts - limit).dimmed());
    }

    println!();
    println!("{}", "Images".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    if let Some(dir) = images_dir {
        fs::create_dir_all(dir)?;
        for image in store.images()? {
            fs::write(dir.join(&image.name), &image.data)?;
            println!(
                "{} {} ({} bytes)",
                "Saved".green(),
                image.name,
                image.size()
            );
        }
    } else {
        for entry in store.image_entries()? {
            println!("{}: {}", entry.name.bold(), entry.format);
        }
    }

    println!();
    println!("{}", "Tables".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for table in store.tables()? {
        println!(
            "{}",
            format!("Page {}, table {}", table.page_number, table.table_index).bold()
        );
        match table.grid() {
            Ok(grid) => {
                for row in grid {
                    let cells: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or("")).collect();
                    println!("  {}", cells.join(" | "));
                }
            }
            Err(e) => println!("  {} {}", "unreadable:".red(), e),
        }
    }

    println!();
    println!(
        "{}: {} texts, {} images, {} tables",
        "Total".bold(),
        counts.texts,
        counts.images,
        counts.tables
    );

    Ok(())
}

fn print_answer(answer: &RagAnswer) {
    let status = match answer.status {
        Status::Fetched | Status::Cached => answer.status.message().green(),
        Status::NoData => answer.status.message().yellow(),
        Status::GenerationFailed | Status::Unavailable => answer.status.message().red(),
    };
    println!("{}", answer.text);
    println!("{}", status);
}

fn print_history(history: &[Exchange]) {
    if history.is_empty() {
        println!("{}", "No history.".dimmed());
        return;
    }
    for exchange in history {
        println!("{} {}", "Q:".bold(), exchange.query);
        println!("{} {}", "A:".bold(), exchange.response);
    }
}

fn cmd_version() {
    println!("{} {}", "pdfchat".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Ask questions about a PDF document");
}
