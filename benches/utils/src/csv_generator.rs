use core::fmt::Display;

use fake::{faker::lorem::en::Word, Fake};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Generates `id,word,number,...` rows. Two generators with the same shape produce the
/// same values; `jitter` is added to every numeric column.
#[derive(Debug)]
pub struct CsvGenerator {
    rows: usize,
    columns: usize,
    jitter: f64,
}

impl CsvGenerator {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns: columns.max(3),
            jitter: 0.0,
        }
    }

    pub fn with_jitter(self, jitter: f64) -> Self {
        Self { jitter, ..self }
    }

    pub fn generate(&self) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64((self.rows * 31 + self.columns) as u64);
        let mut csv = (1..=self.columns)
            .map(|col| format!("header{}", col))
            .collect::<Vec<_>>()
            .join(",");
        csv.push('\n');

        for row_idx in 0..self.rows {
            let word: String = Word().fake_with_rng(&mut rng);
            let mut row = vec![row_idx.to_string(), word];
            for _ in 2..self.columns {
                let value: f64 = rng.gen_range(-10_000.0, 10_000.0);
                row.push(format!("{:.6}", value + self.jitter));
            }
            csv.push_str(&row.join(","));
            csv.push('\n');
        }
        csv.into_bytes()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl Display for CsvGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}
