//! Writes `sample_data.csv`: a small sensor log with numeric and text columns,
//! handy for trying filters, the log transform and the X/Y plot.

/// SplitMix64; deterministic so the sample file is the same on every run.
struct Jitter(u64);

impl Jitter {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[-amplitude, amplitude)`.
    fn around(&mut self, amplitude: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        (unit * 2.0 - 1.0) * amplitude
    }
}

fn main() -> anyhow::Result<()> {
    let mut jitter = Jitter(42);
    let sensors = ["north", "south", "east"];

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(["time", "temperature", "pressure", "humidity", "sensor"])?;

    let n_rows = 200;
    for i in 0..n_rows {
        let time = i as f64 * 0.5;
        // Strictly positive values so the log transform applies cleanly.
        let temperature = (20.0 + 5.0 * (time / 10.0).sin() + jitter.around(0.7)).max(0.1);
        let pressure = (1013.0 + jitter.around(5.0)).max(0.1);
        let humidity = (45.0 + 0.1 * time + jitter.around(3.0)).clamp(1.0, 100.0);
        let sensor = sensors[i % sensors.len()];

        writer.write_record([
            format!("{time:.1}"),
            format!("{temperature:.3}"),
            format!("{pressure:.2}"),
            format!("{humidity:.2}"),
            sensor.to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {n_rows} rows to {output_path}");
    Ok(())
}
