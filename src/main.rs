use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::*;
use imlaa::checker::{restore_edges, TextCounters};
use imlaa::cli::output::{self, OutputFormat};
use imlaa::cli::prompt::{self, Choice};
use imlaa::dict::{DictionaryEntry, IgnoredWords, WordType};
use imlaa::service::{
    ConsoleNotifier, CorrectionResponse, CorrectionService, HttpCorrectionService, Notifier,
    ServiceError, SilentNotifier,
};
use imlaa::session::{Capabilities, Debouncer, RecheckRequest, Session};
use imlaa::{Checker, Config};
use std::collections::HashSet;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "imlaa")]
#[command(version, about = "Arabic spell-checking client with annotated corrections", long_about = None)]
struct Cli {
    /// Correction service base URL
    #[arg(long, global = true, env = "IMLAA_SERVICE_URL")]
    service_url: Option<String>,

    /// Ignored words file
    #[arg(long, global = true)]
    ignored_words: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a file, inline text or stdin
    Check {
        /// File to check (stdin when omitted)
        file: Option<PathBuf>,

        /// Text to check instead of a file
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Walk through each correction and choose what to apply
        #[arg(short, long, conflicts_with = "format")]
        interactive: bool,

        /// Write the corrected text back to FILE
        #[arg(short, long, requires = "file")]
        write: bool,

        /// Output format (text, json)
        #[arg(short = 'o', long, default_value = "text")]
        format: OutputFormat,

        /// Exit with code 0 even if errors are found
        #[arg(long)]
        no_fail: bool,
    },
    /// Re-check FILE every time it changes
    Watch { file: PathBuf },
    /// Word and character counts, no service call
    Stats {
        file: Option<PathBuf>,

        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Output format (text, json)
        #[arg(short = 'o', long, default_value = "text")]
        format: OutputFormat,
    },
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DictCommands {
    /// Add a word to the service dictionary
    Add {
        word: String,

        /// Part of speech, Arabic label or English name
        #[arg(long = "type", default_value = "غير محدد")]
        word_type: WordType,

        #[arg(long)]
        definition: Option<String>,

        #[arg(long)]
        root: Option<String>,

        /// Comma-separated synonyms
        #[arg(long)]
        synonyms: Option<String>,

        #[arg(long, default_value_t = 1)]
        frequency: u32,
    },
    /// Manage the local ignored words list
    Ignored {
        #[command(subcommand)]
        action: IgnoredCommands,
    },
}

#[derive(Subcommand, Debug)]
enum IgnoredCommands {
    /// List ignored words
    List,
    /// Ignore a word
    Add { word: String },
    /// Forget all ignored words
    Clear,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "imlaa", &mut io::stdout());
        return Ok(());
    }

    let Some(command) = cli.command else {
        bail!("No command given. Use --help for usage information.");
    };

    let config = Config::load(cli.service_url, cli.ignored_words)?;
    let colored = !cli.no_color && io::stdout().is_terminal();

    match command {
        Commands::Check {
            file,
            text,
            interactive,
            write,
            format,
            no_fail,
        } => {
            let input = read_input(file.as_deref(), text)?;
            let options = CheckOptions {
                file,
                interactive,
                write,
                format,
                colored,
            };
            let errors = match format {
                OutputFormat::Json => run_check(&config, SilentNotifier, input, &options)?,
                OutputFormat::Text => {
                    run_check(&config, ConsoleNotifier::new(colored), input, &options)?
                }
            };

            if errors > 0 && !no_fail && !write {
                std::process::exit(1);
            }
        }
        Commands::Watch { file } => watch(&config, file, colored)?,
        Commands::Stats { file, text, format } => {
            let input = read_input(file.as_deref(), text)?;
            let ignored = load_ignored(&config)?;
            output::print_counters(&TextCounters::of(&input), ignored.len(), format)?;
        }
        Commands::Dict { action } => handle_dict(&config, action, colored)?,
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("IMLAA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    // Another subscriber may already be installed; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(file: Option<&Path>, text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()));
    }
    if io::stdin().is_terminal() {
        bail!("No input given. Pass a FILE, --text, or pipe text on stdin.");
    }
    io::read_to_string(io::stdin()).context("Failed to read stdin")
}

fn load_ignored(config: &Config) -> Result<IgnoredWords> {
    match &config.ignored_words {
        Some(path) => IgnoredWords::load(path),
        None => Ok(IgnoredWords::in_memory()),
    }
}

fn connect(config: &Config) -> Result<HttpCorrectionService> {
    HttpCorrectionService::new(&config.service_url, config.timeout())
        .with_context(|| format!("Failed to set up client for {}", config.service_url))
}

struct CheckOptions {
    file: Option<PathBuf>,
    interactive: bool,
    write: bool,
    format: OutputFormat,
    colored: bool,
}

/// Run `check` and return the number of errors left in the text.
fn run_check<N: Notifier>(
    config: &Config,
    notifier: N,
    input: String,
    options: &CheckOptions,
) -> Result<u64> {
    let mut session = Session::new(
        connect(config)?,
        notifier,
        Checker::new(config),
        load_ignored(config)?,
        Capabilities {
            editing: options.interactive,
        },
    )
    .with_max_suggestions(config.max_suggestions);

    session.set_text(input.clone());
    let outcome = session.check()?;
    output::print_outcome(outcome, options.format, options.colored)?;

    if options.interactive {
        review(&mut session, options.colored)?;
    }

    let errors = session
        .outcome()
        .map_or(0, |outcome| outcome.statistics.errors_found);
    let final_text = match (options.interactive, session.outcome()) {
        (false, Some(outcome)) => restore_edges(&input, &outcome.corrected_text),
        _ => session.text().to_string(),
    };

    if options.interactive && final_text != input {
        println!();
        println!("{}", final_text);
    }

    if options.write {
        if let Some(path) = &options.file {
            if final_text != input {
                fs::write(path, &final_text)
                    .with_context(|| format!("Failed to write file: {}", path.display()))?;
                info!(path = %path.display(), "wrote corrected text");
            }
        }
    }

    if options.format == OutputFormat::Text {
        output::print_check_summary(errors, options.colored);
    }
    Ok(errors)
}

/// Offer each flagged word once, applying choices as they are made.
fn review<S, N>(session: &mut Session<S, N>, colored: bool) -> Result<()>
where
    S: CorrectionService,
    N: Notifier,
{
    let mut offered = HashSet::new();

    loop {
        let next = session.outcome().and_then(|outcome| {
            outcome
                .corrections
                .iter()
                .map(|record| record.original.clone())
                .find(|word| !offered.contains(word))
        });
        let Some(word) = next else {
            return Ok(());
        };
        offered.insert(word.clone());

        let Some(pending) = session.open_suggestions(&word, None)?.cloned() else {
            continue;
        };
        let context = prompt::context_line(session.text(), &pending, colored);

        // Failures below were already reported through the notifier.
        match prompt::ask(&pending, &context, colored)? {
            Choice::Skip => {
                session.dismiss()?;
            }
            Choice::Replace(new_word) => {
                if let Err(e) = session.choose_and_recheck(&new_word) {
                    debug!(error = %e, "replacement not applied");
                }
            }
            Choice::Ignore => {
                session.ignore()?;
            }
            Choice::MarkCorrect => {
                if let Err(e) = session.mark_correct() {
                    debug!(error = %e, "dictionary update failed");
                }
            }
            Choice::Quit => {
                session.dismiss()?;
                return Ok(());
            }
        }
    }
}

fn watch(config: &Config, file: PathBuf, colored: bool) -> Result<()> {
    // The blocking client has to be built and dropped outside the runtime.
    let service = Arc::new(connect(config)?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(watch_loop(config, Arc::clone(&service), file, colored))
}

type CheckResponse = (RecheckRequest, Result<CorrectionResponse, ServiceError>);

async fn watch_loop(
    config: &Config,
    service: Arc<HttpCorrectionService>,
    file: PathBuf,
    colored: bool,
) -> Result<()> {
    let mut session = Session::new(
        Arc::clone(&service),
        ConsoleNotifier::new(colored),
        Checker::new(config),
        load_ignored(config)?,
        Capabilities::default(),
    );
    let debouncer = Debouncer::new(config.debounce());
    let (changes_tx, mut changes) = mpsc::unbounded_channel::<String>();
    let (responses_tx, mut responses) = mpsc::unbounded_channel::<CheckResponse>();
    let mut ticker = tokio::time::interval(config.poll_interval());
    let mut last_modified: Option<SystemTime> = None;

    eprintln!("Watching {} (Ctrl-C to stop)", file.display());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let modified = fs::metadata(&file).and_then(|meta| meta.modified()).ok();
                if modified.is_none() || modified == last_modified {
                    continue;
                }
                last_modified = modified;

                let text = fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read file: {}", file.display()))?;
                let tx = changes_tx.clone();
                debouncer.schedule(move || async move {
                    let _ = tx.send(text);
                });
            }
            Some(text) = changes.recv() => {
                if text == session.text() {
                    continue;
                }
                session.set_text(text);
                println!("{}", output::render_counters(&session.counters()));

                let Ok(request) = session.begin_check() else {
                    continue;
                };
                debug!(ticket = request.ticket.seq(), "issuing check");
                let service = Arc::clone(&service);
                let tx = responses_tx.clone();
                tokio::task::spawn_blocking(move || {
                    let response = service.correct(request.text.trim());
                    let _ = tx.send((request, response));
                });
            }
            Some((request, response)) = responses.recv() => {
                match session.complete_check(&request, response) {
                    Ok(Some(outcome)) => {
                        println!();
                        output::print_outcome(outcome, OutputFormat::Text, colored)?;
                    }
                    Ok(None) => {}
                    Err(e) => debug!(error = %e, "check failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                debouncer.cancel();
                return Ok(());
            }
        }
    }
}

fn handle_dict(config: &Config, action: DictCommands, colored: bool) -> Result<()> {
    match action {
        DictCommands::Add {
            word,
            word_type,
            definition,
            root,
            synonyms,
            frequency,
        } => {
            let mut entry = DictionaryEntry::new(word, word_type);
            entry.definition = definition;
            entry.root = root;
            entry.synonyms = synonyms;
            entry.frequency = frequency;

            let session = Session::new(
                connect(config)?,
                ConsoleNotifier::new(colored),
                Checker::new(config),
                IgnoredWords::in_memory(),
                Capabilities::default(),
            );
            session.add_dictionary_word(&entry)?;
        }
        DictCommands::Ignored { action } => {
            let mut ignored = load_ignored(config)?;
            match action {
                IgnoredCommands::List => {
                    if ignored.is_empty() {
                        println!("{}", "No ignored words.".yellow());
                    }
                    for word in ignored.iter() {
                        println!("  {}", word);
                    }
                }
                IgnoredCommands::Add { word } => {
                    if ignored.add(&word)? {
                        println!("{} Ignoring '{}'", "✓".green(), word);
                    } else {
                        println!("'{}' is already ignored", word);
                    }
                }
                IgnoredCommands::Clear => {
                    let count = ignored.len();
                    ignored.clear()?;
                    println!("{} Cleared {} ignored words", "✓".green(), count);
                }
            }
        }
    }
    Ok(())
}
