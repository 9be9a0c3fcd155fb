use rand::Rng;
use std::fs::{self, File};
use std::io::{BufWriter, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = "data/products.csv";
    fs::create_dir_all("data")?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "name,category,price,quantity")?;

    let mut rng = rand::rng();
    for i in 0..1_000 {
        let price = rng.random_range(1..1000);
        let quantity = rng.random_range(1..50);
        let category = ["books", "games", "tools", "food"][rng.random_range(0..4)];
        writeln!(writer, "item{i},{category},{price},{quantity}")?;
    }
    writer.flush()?;

    println!("Sample CSV generated: {path}");
    Ok(())
}
