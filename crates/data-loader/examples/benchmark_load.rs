use anyhow::Context;
use data_loader::Store;
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let catalog = Path::new("data/movies_list.csv");
    let similarity = Path::new("data/movie_similarity.csv");

    println!("Loading catalog and similarity table...\n");

    let start = Instant::now();
    let store = Store::load_from_files(catalog, similarity).context("Failed to load artifacts")?;
    let elapsed = start.elapsed();

    let (movies, rows, cols) = store.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", movies);
    println!("Matrix: {}x{}", rows, cols);
    println!(
        "\nPerformance: {:.0} scores/second",
        (rows * cols) as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
