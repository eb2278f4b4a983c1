/// Preview — interactive shell for trying out story styles.
///
/// Usage: preview [--style <name> | --style-file <path>] [--seed <n>]
///
/// Commands:
///   new            — generate a new story
///   show           — show the current story with its slots marked
///   slots          — list slots and their candidate phrases
///   style <name>   — switch to a built-in style
///   seed <n>       — restart with a seed
///   bulk <n>       — generate n stories with frequency stats
///   help           — list commands
///   quit           — exit

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use rustc_hash::{FxHashMap, FxHashSet};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use story_weaver::core::view::StoryView;
use story_weaver::schema::segment::Segment;
use story_weaver::schema::style::StoryStyle;
use story_weaver::story_styles;

#[derive(Parser, Debug)]
#[command(name = "preview", about = "Interactive shell for story styles")]
struct Cli {
    /// Built-in style to load
    #[arg(long, default_value = story_styles::DEFAULT_STYLE, conflicts_with = "style_file")]
    style: String,

    /// Load the style from a RON file instead
    #[arg(long)]
    style_file: Option<PathBuf>,

    /// Initial RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut style = match cli.style_file {
        Some(ref path) => StoryStyle::load_from_ron(path)
            .with_context(|| format!("Failed to load style {}", path.display()))?,
        None => story_styles::builtin(&cli.style).context("Failed to load built-in style")?,
    };
    let mut current_seed = cli.seed;

    println!(
        "Loaded style '{}' ({} slots, {} combinations)",
        style.name,
        style.lexicon.len(),
        style.lexicon.combinations()
    );
    println!("Seed: {}", current_seed);
    println!("Type 'help' for commands.\n");

    let mut view = build_view(&style, current_seed)?;
    view.initialize();
    print_story(&view);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => print_help(),
            "new" | "n" => {
                view.regenerate();
                print_story(&view);
            }
            "show" => {
                print_story(&view);
                for (slot, value) in view.story().iter() {
                    println!("  {:<16} {}", slot, value);
                }
                println!();
            }
            "slots" => {
                for (slot, phrases) in style.lexicon.iter() {
                    println!("  {} ({}):", slot, phrases.len());
                    for phrase in phrases {
                        println!("    - {}", phrase);
                    }
                }
            }
            "style" => {
                if parts.len() < 2 {
                    println!("Usage: style <name>");
                    println!("  Available: {}", story_styles::available().join(", "));
                    println!("  Current: {}", style.name);
                    continue;
                }
                match story_styles::builtin(parts[1]) {
                    Ok(s) => {
                        style = s;
                        view = build_view(&style, current_seed)?;
                        view.initialize();
                        println!("Style set to '{}'", style.name);
                        print_story(&view);
                    }
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            "seed" => {
                if parts.len() < 2 {
                    println!("Current seed: {}", current_seed);
                    continue;
                }
                match parts[1].parse::<u64>() {
                    Ok(s) => {
                        current_seed = s;
                        view = build_view(&style, current_seed)?;
                        view.initialize();
                        println!("Seed set to {}", current_seed);
                        print_story(&view);
                    }
                    Err(_) => println!("Invalid seed: {}", parts[1]),
                }
            }
            "bulk" => {
                if parts.len() < 2 {
                    println!("Usage: bulk <n>");
                    continue;
                }
                let count: usize = match parts[1].parse() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        println!("Invalid count: {}", parts[1]);
                        continue;
                    }
                };
                let mut bulk_view = build_view(&style, current_seed)?;
                bulk_view.initialize();
                print_bulk_stats(&style, &mut bulk_view, count);
            }
            _ => {
                println!("Unknown command: '{}'. Type 'help' for available commands.", cmd);
            }
        }
    }

    Ok(())
}

fn build_view(style: &StoryStyle, seed: u64) -> Result<StoryView> {
    StoryView::builder()
        .with_style(style.clone())
        .seed(seed)
        .build()
        .context("Failed to build story view")
}

fn print_story(view: &StoryView) {
    let mut out = String::new();
    for segment in view.segments() {
        match segment {
            Segment::Literal { text, .. } => out.push_str(&text),
            Segment::Slot {
                value,
                resolved: true,
                ..
            } => out.push_str(&value.magenta().bold().to_string()),
            Segment::Slot { value, .. } => out.push_str(&value.red().underlined().to_string()),
        }
    }
    println!("\n{}\n", out);
}

fn print_bulk_stats(style: &StoryStyle, view: &mut StoryView, count: usize) {
    let mut sentences: FxHashSet<String> = FxHashSet::default();
    let mut picks: FxHashMap<(String, String), u32> = FxHashMap::default();

    for _ in 0..count {
        view.regenerate();
        sentences.insert(view.sentence());
        for (slot, value) in view.story().iter() {
            *picks.entry((slot.to_string(), value.to_string())).or_insert(0) += 1;
        }
    }

    println!("\n=== Bulk Generation: {} stories ===\n", count);
    println!(
        "Unique sentences: {} / {} (of {} possible)",
        sentences.len(),
        count,
        style.lexicon.combinations()
    );

    for (slot, phrases) in style.lexicon.iter() {
        println!("\n{} (expected {:.1}% each):", slot, 100.0 / phrases.len() as f64);
        for phrase in phrases {
            let n = picks
                .get(&(slot.to_string(), phrase.clone()))
                .copied()
                .unwrap_or(0);
            println!(
                "  {:<32} {:>6} ({:.1}%)",
                phrase,
                n,
                100.0 * n as f64 / count as f64
            );
        }
    }
    println!();
}

fn print_help() {
    println!("Commands:");
    println!("  new            Generate a new story");
    println!("  show           Show the current story and its slot values");
    println!("  slots          List slots and candidate phrases");
    println!("  style <name>   Switch to a built-in style");
    println!("  seed <n>       Restart with RNG seed");
    println!("  bulk <n>       Generate n stories with frequency statistics");
    println!("  help           Show this help");
    println!("  quit           Exit");
    println!();
    println!("Styles: {}", story_styles::available().join(", "));
}
