use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Store, StoreLoader};
use recommender::{Recommendations, ResolveError, Resolver};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Width of the similarity bar, in characters
const BAR_WIDTH: usize = 20;

/// movie-recs - find movies similar to one you like
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Movie recommendations from a precomputed similarity table", long_about = None)]
struct Cli {
    /// Catalog CSV with movie_id and title columns
    #[arg(long, env = "MOVIE_RECS_CATALOG", default_value = "movies_list.csv")]
    catalog: PathBuf,

    /// Similarity table (dense CSV, or bincode when the extension is .bin)
    #[arg(long, env = "MOVIE_RECS_SIMILARITY", default_value = "movie_similarity.csv")]
    similarity: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movies similar to a title
    Recommend {
        /// Exact movie title
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "10", value_parser = clap::value_parser!(u16).range(1..=100))]
        count: u16,

        /// Print the structured result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search for movies by title (case-insensitive substring match)
    Search {
        #[arg(long)]
        title: String,

        /// Maximum number of matches to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show what was loaded
    Stats,

    /// List all titles alphabetically
    Titles {
        /// Only show the first N titles
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let loader = StoreLoader::new(&cli.catalog, &cli.similarity);
    let start = Instant::now();
    let store = loader.get_or_load().with_context(|| {
        format!(
            "Failed to load {} and {}",
            cli.catalog.display(),
            cli.similarity.display()
        )
    })?;
    let (movies, rows, cols) = store.counts();
    info!(
        movies,
        rows,
        cols,
        elapsed = ?start.elapsed(),
        "Store ready"
    );
    eprintln!("{} {} films loaded", "✓".green(), movies);

    let resolver = Resolver::new(store);

    match cli.command {
        Commands::Recommend { title, count, json } => {
            handle_recommend(&resolver, &title, count as usize, json)?
        }
        Commands::Search { title, limit } => handle_search(&resolver, &title, limit),
        Commands::Stats => handle_stats(resolver.store()),
        Commands::Titles { limit } => handle_titles(resolver.store(), limit),
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(resolver, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(resolver: &Resolver, title: &str, count: usize, json: bool) -> Result<()> {
    if title.trim().is_empty() {
        bail!("Please select a movie first");
    }

    let result = resolver.resolve(title, count);
    match &result {
        Ok(recs) => info!(
            movie_id = recs.movie_id,
            returned = recs.len(),
            skipped = recs.skipped.len(),
            "Resolved '{}'",
            title
        ),
        Err(err) => warn!("{}", err),
    }

    if json {
        let rendered = match &result {
            Ok(recs) => serde_json::to_string_pretty(recs)?,
            Err(err) => serde_json::to_string_pretty(err)?,
        };
        println!("{}", rendered);
        return Ok(());
    }

    match result {
        Ok(recs) => print_recommendations(&recs),
        Err(ResolveError::NotFoundExact { query, suggestions }) => {
            println!("{} '{}' not found exactly", "⚠".yellow(), query);
            if !suggestions.is_empty() {
                println!("Similar titles: {}", suggestions.join(", ").cyan());
            }
            println!(
                "{} Unable to generate recommendations for '{}'",
                "✗".red(),
                query
            );
        }
        Err(ResolveError::NotFoundInMatrix {
            movie_id,
            title,
            available_sample,
        }) => {
            println!(
                "{} '{}' (ID: {}) is not in the similarity table",
                "✗".red(),
                title,
                movie_id
            );
            println!("Available IDs: {:?}...", available_sample);
        }
    }
    Ok(())
}

/// Render a score in [0, 1] as a fixed-width bar
fn score_bar(score: f64) -> String {
    let filled = (score.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Helper function to format and print recommendations
fn print_recommendations(recs: &Recommendations) {
    println!(
        "{}",
        format!("If you like '{}'...", recs.title).bold().red()
    );
    println!("You might also like these {} films:\n", recs.len());

    for (idx, rec) in recs.items.iter().enumerate() {
        println!("{}. {}", (idx + 1).to_string().green(), rec.title.bold());
        println!(
            "   Similarity: {:>5.1}%  {}",
            rec.score * 100.0,
            score_bar(rec.score).red()
        );
    }

    if !recs.skipped.is_empty() {
        println!(
            "\n{} {} similar movies skipped (missing from catalog): {:?}",
            "⚠".yellow(),
            recs.skipped.len(),
            recs.skipped
        );
    }

    if let Some(avg) = recs.average_score() {
        println!("\nAverage similarity: {:.1}%", avg * 100.0);
    }
}

/// Handle the 'search' command
fn handle_search(resolver: &Resolver, title: &str, limit: usize) {
    let matches = resolver.store().catalog().search(title, limit);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    for entry in matches {
        println!("{}: {}", entry.movie_id, entry.title);
    }
}

/// Handle the 'stats' command
fn handle_stats(store: &Store) {
    let catalog = store.catalog();
    let similarity = store.similarity();
    let (rows, cols) = similarity.shape();

    let first_titles: Vec<&str> = catalog
        .entries()
        .iter()
        .take(5)
        .map(|e| e.title.as_str())
        .collect();
    let sample_ids: Vec<_> = similarity.column_ids().iter().take(10).collect();

    println!("{}", "Statistics".bold().blue());
    println!("{}Films available: {}", "• ".green(), catalog.len());
    println!("{}Similarity matrix: {}x{}", "• ".green(), rows, cols);
    println!("{}First films: {:?}", "• ".cyan(), first_titles);
    println!("{}Matrix IDs: {:?}...", "• ".cyan(), sample_ids);
}

/// Handle the 'titles' command
fn handle_titles(store: &Store, limit: Option<usize>) {
    let titles = store.catalog().sorted_titles();
    let shown = limit.unwrap_or(titles.len());
    for title in titles.iter().take(shown) {
        println!("{}", title);
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(resolver: Resolver, requests: usize, concurrent: usize) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("--requests and --concurrent must both be at least 1");
    }

    // Sample random catalog titles so every request hits the ranking path
    let entries = resolver.store().catalog().entries();
    let titles: Vec<String> = (0..requests)
        .map(|_| entries[rand::random_range(0..entries.len())].title.clone())
        .collect();

    let permits = Arc::new(Semaphore::new(concurrent));
    let wall_start = Instant::now();

    let mut handles = vec![];
    for title in titles {
        let resolver = resolver.clone();
        let permits = Arc::clone(&permits);
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let elapsed = tokio::task::spawn_blocking(move || {
                let start = Instant::now();
                // Misses are still timed, they are legitimate outcomes
                let _ = resolver.resolve(&title, 10);
                start.elapsed()
            })
            .await?;
            Ok::<_, anyhow::Error>(elapsed)
        });
        handles.push(handle);
    }

    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = wall_start.elapsed();

    let avg_latency = mean_duration(&timings);
    timings.sort();
    let last = timings.len() - 1;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(last)];

    println!("Benchmark results:");
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} requests/second",
        requests as f64 / wall_time.as_secs_f64()
    );

    Ok(())
}

/// Mean of a non-empty set of durations
fn mean_duration(timings: &[Duration]) -> Duration {
    let total: Duration = timings.iter().sum();
    let nanos = total.as_nanos() / timings.len() as u128;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
