use std::error::Error;
use std::io::Write;

use table_processor::processor::filter::FallbackPolicy;
use table_processor::processor::pipeline::process_csv;
use tempfile::NamedTempFile;

fn main() -> Result<(), Box<dyn Error>> {
    let mut input = NamedTempFile::new()?;
    write!(input, "name,price\napple,50\nbanana,150\ncherry,250\n")?;
    let output = NamedTempFile::new()?;

    let report = process_csv(
        input.path(),
        output.path(),
        "price > 100",
        "price",
        FallbackPolicy::Permissive,
    )?;

    println!("Filtered rows: {}", report.matched_rows);
    println!("Average price: {}", report.average);
    println!("--- output ---");
    print!("{}", std::fs::read_to_string(output.path())?);
    Ok(())
}
