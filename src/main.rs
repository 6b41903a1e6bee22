//! tsugumi - Aozora Bunko manuscript inspector

use std::process::ExitCode;

use clap::Parser;

use tsugumi::{AozoraFormat, BookProperty, ParseOptions, Parsed};

#[derive(Parser)]
#[command(name = "tsugumi")]
#[command(version, about = "Aozora Bunko manuscript parser", long_about = None)]
#[command(after_help = "EXAMPLES:
    tsugumi book.txt                 Show book summary
    tsugumi --json book.txt          Dump the document tree as JSON
    tsugumi -e utf-8 book.txt        Read a UTF-8 manuscript")]
struct Cli {
    /// Input manuscript
    #[arg(value_name = "INPUT")]
    input: String,

    /// Print the parsed document tree as JSON
    #[arg(long)]
    json: bool,

    /// Source encoding label (WHATWG name)
    #[arg(short, long, value_name = "LABEL", default_value = "shift_jis")]
    encoding: String,

    /// Suppress warnings
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet { "error" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let encoding = encoding_rs::Encoding::for_label(cli.encoding.as_bytes())
        .ok_or_else(|| format!("unknown encoding: {}", cli.encoding))?;
    let format = AozoraFormat::with_options(ParseOptions::default().with_encoding(encoding));
    let parsed = format.parse(&cli.input).map_err(|e| e.to_string())?;

    if cli.json {
        let json = serde_json::to_string_pretty(&parsed).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        show_info(&cli.input, &parsed);
    }
    Ok(())
}

fn show_info(path: &str, parsed: &Parsed) {
    let book = &parsed.book;

    println!("File: {path}");
    println!("Title: {}", book.title().unwrap_or("(untitled)"));
    for (label, property) in [
        ("Original title", BookProperty::OriginalTitle),
        ("Subtitle", BookProperty::Subtitle),
        ("Original subtitle", BookProperty::OriginalSubtitle),
        ("Author", BookProperty::Author),
        ("Translator", BookProperty::Translator),
        ("Series", BookProperty::Series),
        ("Series position", BookProperty::SeriesPosition),
    ] {
        if let Some(value) = book.property(property) {
            println!("{label}: {value}");
        }
    }
    println!("Identifier: {}", book.unique_id());

    println!("Chapters: {}", book.chapters.len());
    for (index, chapter) in book.chapters.iter().enumerate() {
        let paragraphs = chapter.root.paragraphs();
        let chars: usize = paragraphs.iter().map(|p| p.fragment.len()).sum();
        match chapter.title() {
            Some(title) => println!(
                "  {:>3}. {title} ({} paragraphs, {chars} chars)",
                index + 1,
                paragraphs.len()
            ),
            None => println!(
                "  {:>3}. ({} paragraphs, {chars} chars)",
                index + 1,
                paragraphs.len()
            ),
        }
    }

    println!("Resources: {}", book.resources.len());
    for resource in &book.resources {
        println!("  {}", resource.display());
    }
    println!("Warnings: {}", parsed.warnings.len());
}
