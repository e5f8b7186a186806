//! Column Transform Benchmarking Tool
//!
//! Measures elementwise transform throughput on a large UTF-8 text file,
//! one row per line, through the same parallel column driver that
//! expressions use.
//!
//! ## Usage
//!
//! ```bash
//! # NFC normalization only
//! ./target/release/grisly_bench /path/to/names.txt normalize
//!
//! # Every operation in turn
//! ./target/release/grisly_bench /path/to/names.txt all
//! ```
//!
//! Operations: `normalize` (NFC), `remove_diacritics`,
//! `remove_bracketed_content` (default pairs), `unique_words`, `all`.
//!
//! ## Example Output
//!
//! ```text
//! === normalize ===
//! --------------------------------
//! Mode        : normalize
//! Elapsed     : 0.212 s
//! Throughput  : 0.874 GiB/s
//! Rows        : 10_000_000
//! Rows/sec    : 47_169_811
//! --------------------------------
//! ```

use std::env;
use std::fs;
use std::io;
use std::time::{Duration, Instant};

use grisly_core::analyzer::{
    apply_elementwise, BracketSpanRemover, DiacriticStripper, StringTransform, UnicodeNormalizer,
    UniqueWordsFilter,
};
use grisly_core::arena::StrArena;
use grisly_core::NormalizationForm;

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;

const OPERATIONS: [&str; 4] = [
    "normalize",
    "remove_diacritics",
    "remove_bracketed_content",
    "unique_words",
];

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: grisly_bench <path> [normalize|remove_diacritics|remove_bracketed_content|unique_words|all]");
        std::process::exit(1);
    }

    let path = &args[1];
    let op = args.get(2).map(String::as_str).unwrap_or("all");

    let selected: Vec<&str> = match op {
        "all" => OPERATIONS.to_vec(),
        name if OPERATIONS.contains(&name) => vec![name],
        other => {
            eprintln!("unknown operation `{other}`");
            std::process::exit(1);
        }
    };

    println!("Loading file...");
    let bytes = fs::read(path)?;
    let input = std::str::from_utf8(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let column: StrArena = input.lines().collect();

    println!("File size: {}", fmt_bytes(input.len() as u64));
    println!("Rows:      {}\n", fmt_count(column.len() as u64));

    for name in selected {
        match name {
            "normalize" => bench(name, &UnicodeNormalizer::new(NormalizationForm::Nfc), &column),
            "remove_diacritics" => bench(name, &DiacriticStripper::new(), &column),
            "remove_bracketed_content" => bench(name, &BracketSpanRemover::default(), &column),
            _ => bench(name, &UniqueWordsFilter::new(), &column),
        }
    }

    Ok(())
}

fn bench<T: StringTransform>(label: &str, transform: &T, column: &StrArena) {
    println!("=== {label} ===");

    warmup(|| {
        std::hint::black_box(apply_elementwise(transform, column));
    });

    let elapsed = measure(|| {
        std::hint::black_box(apply_elementwise(transform, column));
    });

    print_perf(label, column.byte_len(), elapsed, column.len() as u64);
}

fn warmup<F: FnMut()>(mut f: F) {
    for _ in 0..WARMUP_RUNS {
        f();
    }
}

fn measure<F: FnMut()>(mut f: F) -> Duration {
    let mut total = Duration::ZERO;

    for _ in 0..MEASURE_RUNS {
        let start = Instant::now();
        f();
        total += start.elapsed();
    }

    total / MEASURE_RUNS as u32
}

fn print_perf(label: &str, input_bytes: usize, elapsed: Duration, rows: u64) {
    let secs = elapsed.as_secs_f64().max(f64::EPSILON);
    let gib = input_bytes as f64 / (1024.0 * 1024.0 * 1024.0);

    println!("--------------------------------");
    println!("Mode        : {}", label);
    println!("Elapsed     : {:.3} s", secs);
    println!("Throughput  : {:.3} GiB/s", gib / secs);
    println!("Rows        : {}", fmt_count(rows));
    println!("Rows/sec    : {}", fmt_count((rows as f64 / secs) as u64));
    println!("--------------------------------\n");
}

fn fmt_bytes(b: u64) -> String {
    if b >= 1024 * 1024 * 1024 {
        format!("{:.2} GiB", b as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if b >= 1024 * 1024 {
        format!("{:.2} MiB", b as f64 / (1024.0 * 1024.0))
    } else if b >= 1024 {
        format!("{:.2} KiB", b as f64 / 1024.0)
    } else {
        format!("{} B", b)
    }
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
