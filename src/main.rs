//! sheets – lay out card images for duplex printing.
//!
//! Usage:
//!   sheets <manifest.json> [output.pdf] [--landscape] [--title "My Deck"] [--layout-json plan.json]
//!
//! If `output.pdf` is omitted the manifest's `output` is used, and failing
//! that the PDF is written next to the manifest with the same stem
//! (e.g. `deck.json` → `deck.pdf`).

use std::{env, fs, path::PathBuf, process};

use card_sheets::cards::{collect_pairs, ResourceType};
use card_sheets::geometry::PageOrientation;
use card_sheets::manifest::Manifest;
use card_sheets::pipeline::compute_document;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut manifest_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut layout_json: Option<PathBuf> = None;
    let mut landscape = false;
    let mut title: Option<String> = None;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1).peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--landscape" | "-l" => landscape = true,
            "--title" | "-t" => match iter.next() {
                Some(v) => title = Some(v.clone()),
                None => {
                    eprintln!("Error: --title needs a value.");
                    process::exit(1);
                }
            },
            "--layout-json" | "-j" => match iter.next() {
                Some(v) => layout_json = Some(PathBuf::from(v)),
                None => {
                    eprintln!("Error: --layout-json needs a file path.");
                    process::exit(1);
                }
            },
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if positional == 0 {
                    manifest_path = Some(PathBuf::from(path));
                } else if positional == 1 {
                    output_path = Some(PathBuf::from(path));
                } else {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    let manifest_path = match manifest_path {
        Some(p) => p,
        None => {
            eprintln!("Error: no manifest specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    let mut manifest = match Manifest::load(&manifest_path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error loading '{}': {e}", manifest_path.display());
            process::exit(1);
        }
    };
    if landscape {
        manifest.orientation = PageOrientation::Landscape;
    }

    let output = output_path
        .or_else(|| manifest.output.clone())
        .unwrap_or_else(|| {
            let mut o = manifest_path.clone();
            o.set_extension("pdf");
            o
        });

    // Default title: stem of the manifest filename.
    let default_title = manifest_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("card sheets")
        .to_string();
    let mut config = manifest.pipeline_config(&default_title);
    if let Some(t) = title {
        config.title = t;
    }

    let tile = match manifest.tile() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    let catalog = manifest.catalog();

    let pairs = match collect_pairs(&manifest.cards, &catalog) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    for kind in ResourceType::ALL {
        let count = manifest
            .cards
            .iter()
            .filter(|c| c.produces() == Some(kind))
            .count();
        if count > 0 {
            log::info!("{count} {kind:?} resource card(s)");
        }
    }

    let document = match compute_document(&pairs, &tile, &config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error generating PDF: {e}");
            process::exit(1);
        }
    };
    let written = match document.write_pdf(&output) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Error writing '{}': {e}", output.display());
            process::exit(1);
        }
    };
    if let Some(plan) = layout_json {
        if let Err(e) = fs::write(&plan, document.layout().to_json()) {
            eprintln!("Error writing '{}': {e}", plan.display());
            process::exit(1);
        }
    }
    let pages = document.pages().len();
    eprintln!(
        "Wrote '{}' ({} cards, {} bytes, {} page{})",
        output.display(),
        manifest.cards.len(),
        written,
        pages,
        if pages == 1 { "" } else { "s" }
    );
}

fn print_usage(prog: &str) {
    eprintln!("sheets – duplex card sheet generator (card-sheets)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <manifest.json> [output.pdf] [--landscape] [--title \"My Deck\"] [--layout-json plan.json]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <manifest.json>  Print job: page/tile sizes, back images and the card list");
    eprintln!("  [output.pdf]     Output path  (default: manifest `output`, else manifest stem + .pdf)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --title, -t        Document title in PDF metadata (default: manifest title or filename stem)");
    eprintln!("  --landscape, -l    Turn the page on its side");
    eprintln!("  --layout-json, -j  Also write the page plan as JSON");
    eprintln!("  --help             Print this message");
}
