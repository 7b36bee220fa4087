use std::path::PathBuf;

use anyhow::Result;
use ir_integrate::data::writer::write_sample_table;
use ir_integrate::SampleTable;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Deterministic noise source (splitmix64), seeded per run.
struct Noise {
    state: u64,
}

impl Noise {
    fn new(seed: u64) -> Self {
        Noise { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[-amplitude, amplitude)`.
    fn sample(&mut self, amplitude: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        (2.0 * unit - 1.0) * amplitude
    }
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data.csv"));

    let mut noise = Noise::new(42);

    // Wavenumbers: 4000 → 402, step 2 (descending, as exported by the spectrometer)
    let wavenumbers: Vec<f64> = (0..1800).map(|i| 4000.0 - i as f64 * 2.0).collect();

    // (label, [(centre, width, absorbance)])
    let samples: [(&str, &[(f64, f64, f64)]); 4] = [
        ("PE-blank", &[(2915.0, 15.0, 0.9), (2848.0, 12.0, 0.7), (1465.0, 10.0, 0.3)]),
        ("PE-OH-1", &[(3400.0, 90.0, 0.2), (2915.0, 15.0, 0.9), (1715.0, 14.0, 0.15)]),
        ("PE-OH-2", &[(3400.0, 90.0, 0.45), (2915.0, 15.0, 0.85), (1715.0, 14.0, 0.35)]),
        ("PE-OH-3", &[(3400.0, 90.0, 0.8), (2915.0, 15.0, 0.8), (1715.0, 14.0, 0.6)]),
    ];

    let mut labels = Vec::with_capacity(samples.len());
    let mut columns = Vec::with_capacity(samples.len());
    for (label, bands) in samples {
        let column: Vec<f64> = wavenumbers
            .iter()
            .map(|&wn| {
                let signal: f64 = bands
                    .iter()
                    .map(|&(mu, sigma, amp)| gaussian(wn, mu, sigma, amp))
                    .sum();
                signal + noise.sample(0.002)
            })
            .collect();
        labels.push(label.to_string());
        columns.push(column);
    }

    let table = SampleTable::new(wavenumbers, labels, columns)?;
    write_sample_table(&output_path, &table)?;

    println!(
        "Wrote {} samples ({} wavenumbers each) to {}",
        table.n_datasets(),
        table.n_rows(),
        output_path.display()
    );
    Ok(())
}
