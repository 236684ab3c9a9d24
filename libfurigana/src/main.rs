use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use libfurigana::{
    extract_reading_kana, reading_display, sanitize, Engine, FuriganaConfig, NextCardRecord,
    RenderFormat, RomajiTransliterator,
};

#[derive(Parser)]
#[command(name = "libfurigana")]
#[command(about = "Furigana alignment and study card tools for Japanese flashcards")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Align a reading against surface text and print the furigana
    Align {
        /// Surface text, e.g. 食べる
        surface: String,
        /// Kana reading, e.g. たべる
        reading: String,
        /// Output format (defaults to the configured one)
        #[arg(long, value_enum)]
        format: Option<RenderFormat>,
    },
    /// Strip markup from a notes field
    Sanitize { note: String },
    /// Extract the flat kana reading from a back field
    Reading { back: String },
    /// Convert romaji to hiragana
    Kana { romaji: String },
    /// Render a next-card record (JSON file, or - for stdin)
    Card {
        path: PathBuf,
        #[arg(long, value_enum)]
        format: Option<RenderFormat>,
    },
    /// Interactive mode: one `surface<TAB>reading` pair per line
    Repl,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<FuriganaConfig> {
    match path {
        Some(p) => FuriganaConfig::load_toml(p),
        None => Ok(FuriganaConfig::default()),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading card record from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn handle_card(engine: &Engine, path: &Path, format: RenderFormat) -> Result<()> {
    let record = NextCardRecord::from_json(&read_input(path)?)?;
    if let Some(err) = record.failure() {
        bail!("service error: {}", err);
    }
    if record.done {
        println!("Done!");
        return Ok(());
    }

    if record.is_lesson_study() {
        for (i, lesson) in record.chunk.iter().enumerate() {
            println!("[{}/{}] {}", i + 1, record.chunk.len(), lesson.front);
            println!("  {}", engine.render_as(&lesson.front, &lesson.reading, format)?);
            if !lesson.meanings.is_empty() {
                println!("  {}", lesson.meanings.join("; "));
            }
        }
        return Ok(());
    }

    let Some(card) = record.card.as_ref() else {
        bail!("record has no card");
    };
    let view = engine.render_card(card, format)?;
    let meanings = if record.meanings.is_empty() {
        view.meanings
    } else {
        record.meanings.clone()
    };

    let prompt = record.prompt();
    println!("{} ({})", view.headline, prompt.label());
    println!("> {}", prompt.placeholder());
    println!("{}", view.furigana);
    if !view.reading.is_empty() {
        println!("{}", view.reading);
    }
    if !meanings.is_empty() {
        println!("{}", meanings.join("; "));
    }
    println!("{}", view.notes);
    Ok(())
}

fn split_pair(line: &str) -> Option<(&str, &str)> {
    line.split_once('\t')
        .or_else(|| line.rsplit_once(char::is_whitespace))
        .map(|(s, r)| (s.trim(), r.trim()))
}

fn run_repl(engine: &Engine) -> Result<()> {
    println!("libfurigana: enter `surface<TAB>reading` and press Enter");
    println!("Example: 食べる\tたべる");
    println!("Ctrl-D to exit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let raw = line.context("reading stdin")?;
        let input = raw.trim();
        if input.is_empty() {
            continue;
        }
        match split_pair(input) {
            Some((surface, reading)) => {
                writeln!(stdout, "{}", engine.render(surface, reading)?)?;
            }
            None => {
                // surface only: show it unannotated
                writeln!(stdout, "{}", engine.render(input, "")?)?;
            }
        }
    }

    let (hits, misses) = engine.cache_stats();
    tracing::debug!(hits, misses, size = engine.cache_size(), "repl finished");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let default_format = config.format;
    let engine = Engine::new(config);

    match cli.command {
        Some(Commands::Align {
            surface,
            reading,
            format,
        }) => {
            let format = format.unwrap_or(default_format);
            println!("{}", engine.render_as(&surface, &reading, format)?);
        }
        Some(Commands::Sanitize { note }) => {
            println!("{}", sanitize(&note));
        }
        Some(Commands::Reading { back }) => {
            println!("{}", extract_reading_kana(&back));
            println!("{}", reading_display(&back));
        }
        Some(Commands::Kana { romaji }) => {
            println!("{}", RomajiTransliterator::new().convert(&romaji));
        }
        Some(Commands::Card { path, format }) => {
            handle_card(&engine, &path, format.unwrap_or(default_format))?;
        }
        Some(Commands::Repl) | None => run_repl(&engine)?,
    }
    Ok(())
}
