use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DIMS: usize = 50;
const WORDS_PER_TOPIC: usize = 12;

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut ChaCha8Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

/// Write a synthetic vocabulary matrix and its labels: four topics whose
/// words cluster around a shared centroid.
#[derive(Debug, Parser)]
#[command(name = "generate_sample", version)]
struct Args {
    /// Matrix file to write
    #[arg(default_value = "sample_vocab.txt")]
    vocab: PathBuf,

    /// Labels file to write, one word per line
    #[arg(default_value = "sample_labels.txt")]
    labels: PathBuf,

    /// Seed for the generator
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const TOPICS: [[&str; WORDS_PER_TOPIC]; 4] = [
    [
        "cat", "dog", "horse", "cow", "sheep", "goat", "mouse", "rabbit", "wolf", "fox", "bear",
        "deer",
    ],
    [
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "dozen",
        "hundred",
    ],
    [
        "london", "paris", "berlin", "rome", "madrid", "vienna", "prague", "oslo", "dublin",
        "lisbon", "athens", "warsaw",
    ],
    [
        "run", "walk", "jump", "swim", "read", "write", "sing", "eat", "sleep", "think", "speak",
        "climb",
    ],
];

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    // Every topic gets its own centroid; words scatter around it.
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut words: Vec<&str> = Vec::new();
    for topic_words in &TOPICS {
        let centroid: Vec<f64> = (0..DIMS).map(|_| gauss(&mut rng, 0.0, 1.0)).collect();
        for word in topic_words {
            rows.push(centroid.iter().map(|&c| c + gauss(&mut rng, 0.0, 0.15)).collect());
            words.push(*word);
        }
    }

    // Interleave topics so the first N rows cover all of them.
    let order: Vec<usize> = (0..WORDS_PER_TOPIC)
        .flat_map(|i| (0..TOPICS.len()).map(move |t| t * WORDS_PER_TOPIC + i))
        .collect();

    let mut vocab = BufWriter::new(
        File::create(&args.vocab)
            .with_context(|| format!("creating {}", args.vocab.display()))?,
    );
    writeln!(vocab, "{} {} real", rows.len(), DIMS)?;
    for &i in &order {
        let line: Vec<String> = rows[i].iter().map(|v| format!("{v:.6}")).collect();
        writeln!(vocab, "{}", line.join(" "))?;
    }
    vocab.flush()?;

    let mut labels = BufWriter::new(
        File::create(&args.labels)
            .with_context(|| format!("creating {}", args.labels.display()))?,
    );
    for &i in &order {
        writeln!(labels, "{}", words[i])?;
    }
    labels.flush()?;

    println!(
        "Wrote {} vectors ({DIMS} dims each) to {} and their labels to {}",
        rows.len(),
        args.vocab.display(),
        args.labels.display()
    );
    Ok(())
}
