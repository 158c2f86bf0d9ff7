//! Terminal playtest harness
//!
//! Plays a quiz against a GeoJSON file from stdin, one guess per line:
//! a feature id in point-and-click, a name in write-name and city-map,
//! `lng,lat` in guess-location.
//!
//! Usage:
//!   cargo run --bin playtest -- --dataset provinces.json --mode write-name --seed 7

use clap::Parser;
use geoquiz::core::error::Result;
use geoquiz::quiz::view::{city_map_view, dataset_view, outcome_view};
use geoquiz::quiz::{Guess, QuizSession};
use geoquiz::{Dataset, FeatureId, Mode, QuizConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Play a geography quiz in the terminal
#[derive(Parser, Debug)]
#[command(name = "playtest")]
#[command(about = "Play a geography quiz against a GeoJSON dataset")]
struct Args {
    /// GeoJSON FeatureCollection to play
    #[arg(long)]
    dataset: PathBuf,

    /// point-and-click, write-name, guess-location or city-map
    #[arg(long, default_value = "write-name")]
    mode: String,

    /// Random seed for a reproducible question order
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding the default tolerances
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat the file as a player upload (ids by position, loose names)
    #[arg(long, default_value_t = false)]
    upload: bool,

    /// Name shown in the final summary
    #[arg(long)]
    name: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("geoquiz=debug")
        .init();

    let args = Args::parse();
    let mode: Mode = match args.mode.parse() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let config = match &args.config {
        Some(path) => QuizConfig::load_from_toml(path)?,
        None => QuizConfig::default(),
    };

    let mut dataset = if args.upload {
        let content = std::fs::read_to_string(&args.dataset)?;
        Dataset::from_upload_str(&content, &config.dataset.missing_name_label)?
    } else {
        Dataset::from_file(&args.dataset)?
    };
    if let Some(name) = &args.name {
        dataset = dataset.with_name(name.clone());
    }

    let rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut session = QuizSession::new(dataset, mode, &config, rng);

    println!("\n=== GEOQUIZ: {} ===", mode);
    if let Some(view) = dataset_view(session.dataset(), &config.bounds) {
        println!("Map bounds: {:?}", view.max.to_array());
    }
    println!("Type 'quit' to stop, 'reset' to start over.\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let Some(question) = session.current_question() else {
            break;
        };
        println!("[{}/{}] {}", question.number, question.total, prompt(mode, question.name));
        if mode == Mode::CityMap {
            if let Some(view) = session.current_feature().and_then(|f| city_map_view(f, &config.city_map)) {
                println!("  view: {:?}", view.initial.to_array());
            }
        }
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let input = line?;
        let input = input.trim();
        match input {
            "" => continue,
            "quit" | "q" => break,
            "reset" => {
                session.reset();
                continue;
            }
            _ => {}
        }

        let Some(guess) = parse_guess(mode, input) else {
            println!("Expected 'lng,lat'");
            continue;
        };
        let target = session.current_feature().cloned();
        match session.submit_guess(guess).map(|outcome| outcome.cloned()) {
            Ok(Some(outcome)) => {
                match outcome.distance_km {
                    Some(km) if km == 0.0 => println!("  Hit! ({})", outcome.feature_name),
                    Some(km) => println!("  Missed {} by {:.2} km", outcome.feature_name, km),
                    None if outcome.is_correct => println!("  Correct: {}", outcome.feature_name),
                    None => println!("  Wrong, it was {}", outcome.feature_name),
                }
                if let Some(frame) = target.as_ref().and_then(|t| outcome_view(t, &outcome)) {
                    println!("  frame: {:?}", frame.to_array());
                }
                println!("  score: {}", session.score());
            }
            Ok(None) => break,
            Err(e) => println!("  {}", e),
        }
    }

    if let Some(summary) = session.summary() {
        println!("\n{}", summary.share_text());
    }
    Ok(())
}

fn prompt(mode: Mode, name: &str) -> String {
    match mode {
        Mode::PointAndClick => format!("Which feature id is {}?", name),
        Mode::GuessLocation => format!("Where is {}?", name),
        Mode::WriteName | Mode::CityMap => "Name the highlighted place".to_string(),
    }
}

fn parse_guess(mode: Mode, input: &str) -> Option<Guess> {
    match mode {
        Mode::PointAndClick => Some(Guess::Feature(FeatureId::parse_lenient(input))),
        Mode::WriteName | Mode::CityMap => Some(Guess::text(input)),
        Mode::GuessLocation => {
            let (lng, lat) = input.split_once(',')?;
            let lng = lng.trim().parse::<f64>().ok()?;
            let lat = lat.trim().parse::<f64>().ok()?;
            Some(Guess::location(lng, lat))
        }
    }
}
