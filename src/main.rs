use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use table_processor::processor::ProcessorError;
use table_processor::processor::filter::FallbackPolicy;
use table_processor::processor::pipeline::process_csv;
use table_processor::tasks::{duplicate_chars, reverse, traversal, word_frequency};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "table-processor", version, about = "Console exercises and a CSV filter tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reverse a string
    Reverse { text: String },
    /// Count word frequencies in a text
    WordFreq { text: String },
    /// Report characters occurring more than once
    Duplicates { text: String },
    /// Compare Vec traversal styles
    Traversal {
        /// Number of elements to traverse
        #[arg(long, default_value_t = traversal::DEFAULT_SIZE)]
        size: usize,
    },
    /// Filter a CSV table and append the average of one column
    Filter {
        /// Input CSV path
        #[arg(long)]
        input: PathBuf,
        /// Output CSV path
        #[arg(long)]
        output: PathBuf,
        /// Filter expression, e.g. "price > 100" or "name startswith a"
        #[arg(long)]
        expr: String,
        /// Header name of the numeric column to average
        #[arg(long)]
        avg_column: String,
        /// What an unrecognized expression degrades to
        #[arg(long, value_enum, default_value_t = Fallback::Permissive)]
        on_unrecognized: Fallback,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Fallback {
    /// Pass every row through
    Permissive,
    /// Drop every row
    Strict,
}

impl From<Fallback> for FallbackPolicy {
    fn from(fallback: Fallback) -> Self {
        match fallback {
            Fallback::Permissive => FallbackPolicy::Permissive,
            Fallback::Strict => FallbackPolicy::Strict,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), ProcessorError> {
    match command {
        Command::Reverse { text } => {
            println!("Reversed: {}", reverse::reverse(&text));
        }
        Command::WordFreq { text } => {
            println!("Words Frequency Analysis:");
            for (word, count) in word_frequency::word_frequencies(&text) {
                println!("{word} - {count}");
            }
        }
        Command::Duplicates { text } => {
            println!("Duplicate chars:");
            for (ch, count) in duplicate_chars::duplicate_chars(&text) {
                println!("{ch} - {count} times");
            }
        }
        Command::Traversal { size } => {
            let timings = traversal::compare_traversals(size);
            println!("Vec traversal over {size} elements:");
            println!("For Loop: {:?}", timings.indexed_for);
            println!("For-Each Loop: {:?}", timings.for_each);
            println!("While Loop: {:?}", timings.while_loop);
            println!("Iterator: {:?}", timings.iterator_sum);
        }
        Command::Filter {
            input,
            output,
            expr,
            avg_column,
            on_unrecognized,
        } => {
            let report = process_csv(
                &input,
                &output,
                &expr,
                &avg_column,
                on_unrecognized.into(),
            )?;
            println!(
                "Table processed successfully. Filtered rows: {}",
                report.matched_rows
            );
        }
    }
    Ok(())
}
