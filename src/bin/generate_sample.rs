//! Writes the same small phone catalogue as CSV, JSON and Parquet so every
//! loader can be tried by hand:
//!
//! ```text
//! cargo run --bin generate_sample -- sample_data
//! cargo run -- --file sample_data/phones.csv --where "brand=xiaomi" --aggregate "price=avg"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
struct Phone {
    name: String,
    brand: String,
    price: i64,
    rating: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[low, high)`.
    fn range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }
}

fn catalogue(rng: &mut SimpleRng) -> Vec<Phone> {
    // (brand, model line, base price)
    let lines = [
        ("apple", "iphone 15", 799.0),
        ("apple", "iphone 15 pro", 999.0),
        ("samsung", "galaxy s23", 799.0),
        ("samsung", "galaxy s23 ultra", 1199.0),
        ("samsung", "galaxy a54", 449.0),
        ("xiaomi", "redmi note 12", 199.0),
        ("xiaomi", "poco x5 pro", 299.0),
        ("xiaomi", "13t", 649.0),
        ("google", "pixel 8", 699.0),
        ("google", "pixel 8 pro", 999.0),
        ("oneplus", "11", 699.0),
        ("nothing", "phone 2", 599.0),
    ];

    lines
        .iter()
        .map(|&(brand, name, base)| Phone {
            name: name.to_string(),
            brand: brand.to_string(),
            price: (base * rng.range(0.9, 1.1)).round() as i64,
            rating: (rng.range(4.0, 5.0) * 10.0).round() / 10.0,
        })
        .collect()
}

fn write_csv(path: &Path, phones: &[Phone]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for phone in phones {
        writer.serialize(phone).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_json(path: &Path, phones: &[Phone]) -> Result<()> {
    let file = std::fs::File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(file, phones).context("writing JSON")?;
    Ok(())
}

fn write_parquet(path: &Path, phones: &[Phone]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("brand", DataType::Utf8, false),
        Field::new("price", DataType::Int64, false),
        Field::new("rating", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(phones.iter().map(|p| p.name.as_str()))),
            Arc::new(StringArray::from_iter_values(phones.iter().map(|p| p.brand.as_str()))),
            Arc::new(Int64Array::from_iter_values(phones.iter().map(|p| p.price))),
            Arc::new(Float64Array::from_iter_values(phones.iter().map(|p| p.rating))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let phones = catalogue(&mut rng);

    write_csv(&out_dir.join("phones.csv"), &phones)?;
    write_json(&out_dir.join("phones.json"), &phones)?;
    write_parquet(&out_dir.join("phones.parquet"), &phones)?;

    println!(
        "Wrote {} phones to {}/phones.{{csv,json,parquet}}",
        phones.len(),
        out_dir.display()
    );
    Ok(())
}
