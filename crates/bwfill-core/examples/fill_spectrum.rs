//! Stream a narrowband test tone through the spectral repeater
//!
//! Run with: cargo run --example fill_spectrum -p bwfill-core

use bwfill_core::prelude::*;
use std::f64::consts::PI;

fn main() {
    let mut config = FillConfig::load().expect("load config");
    init_logging(&config.logging);

    // The stock 20 MHz defaults are meant for a real transmit chain; scale
    // the demo down to audio rates unless a config file says otherwise.
    if config.repeater.output_bandwidth == RepeaterConfig::default().output_bandwidth {
        config.repeater = RepeaterConfig {
            input_bandwidth: 1_000.0,
            output_bandwidth: 8_000.0,
            sample_rate: 48_000.0,
            normalize: false,
        };
    }
    config.validate().expect("valid config");

    let mut repeater =
        SpectralRepeater::from_config(&config.repeater).expect("valid repeater parameters");

    println!(
        "Filling {:.0} Hz with {} copies spaced {:.1} Hz apart",
        repeater.output_bandwidth(),
        repeater.num_copies(),
        repeater.shift_spacing()
    );
    for i in 0..repeater.num_copies() {
        let freq = -repeater.output_bandwidth() + i as f64 * repeater.shift_spacing();
        println!("  copy {:2}: {:>12.1} Hz", i, freq);
    }

    // 200 Hz complex tone, processed in scheduler-sized chunks.
    let tone: Vec<IQSample> = (0..4096)
        .map(|k| {
            let angle = 2.0 * PI * 200.0 * k as f64 / repeater.sample_rate();
            IQSample::from_polar(0.5, angle)
        })
        .collect();

    let mut output = Vec::with_capacity(tone.len());
    for (n, chunk) in tone.chunks(512).enumerate() {
        // Halfway through, widen the input bandwidth between blocks; the
        // repeater re-derives its plan and logs the change.
        if n == 4 {
            repeater.set_input_bandwidth(repeater.input_bandwidth() * 2.0);
        }
        output.extend(repeater.process(chunk));
    }

    let power_in: f64 = tone.iter().map(|s| s.norm_sqr()).sum::<f64>() / tone.len() as f64;
    let power_out: f64 = output.iter().map(|s| s.norm_sqr()).sum::<f64>() / output.len() as f64;
    println!(
        "\nProcessed {} samples in {} blocks",
        output.len(),
        tone.len() / 512
    );
    println!("Input power:  {:.4}", power_in);
    println!("Output power: {:.4} ({:.1}x)", power_out, power_out / power_in);
    println!("Cursor:       {}", repeater.sample_index());
}
