//! STL Decomposition example.
//!
//! Run with: cargo run --example stl_decomposition
//! Set `RUST_LOG=seasonal_stl=debug` to follow the loops.

use seasonal_stl::prelude::*;
use std::f64::consts::PI;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== STL Decomposition Example ===\n");

    println!("STL (Seasonal-Trend decomposition using LOESS) breaks down a");
    println!("time series into trend, seasonal and irregular components:");
    println!("  Y = Trend + Seasonal + Irregular   (additive)");
    println!("  Y = Trend * Seasonal * Irregular   (multiplicative)\n");

    let period = 12;
    let n = 120; // 10 years of monthly data

    let series: Vec<f64> = (0..n)
        .map(|i| {
            let trend = 0.1 * i as f64;
            let seasonal = 10.0 * (2.0 * PI * i as f64 / period as f64).sin();
            let noise = 0.5 * (i as f64 * 0.7).cos();
            trend + seasonal + noise
        })
        .collect();

    println!("Generated: {} observations with period={}\n", n, period);

    // 1. Basic STL Decomposition
    println!("--- Basic STL Decomposition ---");

    let spec = StlSpec::for_period(period, 7)?;
    let result = decompose(&series, &spec)?;

    println!("Trend window: {}", spec.trend().window());
    let max_reconstruction_error: f64 = (0..n)
        .map(|i| (series[i] - (result.fit()[i] + result.irregular()[i])).abs())
        .fold(0.0, f64::max);
    println!("Max reconstruction error: {:.2e}", max_reconstruction_error);

    println!(
        "Trend strength:    {:.4}\nSeasonal strength: {:.4}",
        result.trend_strength(),
        result.seasonal_strength(period).unwrap_or(0.0)
    );

    println!("\n--- First Season of Components ---");
    println!(
        "{:>4} {:>10} {:>10} {:>10} {:>10}",
        "t", "Original", "Trend", "Seasonal", "Irregular"
    );
    println!("{:-<46}", "");
    for (i, &value) in series.iter().enumerate().take(period) {
        println!(
            "{:>4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            i,
            value,
            result.trend()[i],
            result.seasonal()[i],
            result.irregular()[i]
        );
    }

    // 2. Robust STL with outliers and a missing value
    println!("\n--- Robust STL with Outliers ---");

    let mut damaged = series.clone();
    damaged[30] = 100.0;
    damaged[60] = -80.0;
    damaged[75] = f64::NAN;

    let standard = decompose(&damaged, &spec)?;
    let robust = decompose(&damaged, &StlSpec::robust_for_period(period, 7)?)?;

    println!("{:<10} {:>12} {:>12} {:>10}", "Method", "Trend[30]", "Trend[60]", "Weight[30]");
    println!("{:-<47}", "");
    for (name, r) in [("Standard", &standard), ("Robust", &robust)] {
        println!(
            "{:<10} {:>12.4} {:>12.4} {:>10.4}",
            name,
            r.trend()[30],
            r.trend()[60],
            r.weights()[30]
        );
    }
    println!("Missing value at t=75 bridged: trend = {:.4}", robust.trend()[75]);

    // 3. Multiplicative decomposition
    println!("\n--- Multiplicative STL ---");

    let sales: Vec<f64> = (0..n)
        .map(|i| (100.0 + 2.0 * i as f64) * (1.0 + 0.25 * (2.0 * PI * i as f64 / period as f64).cos()))
        .collect();
    let multiplicative = StlSpec::builder()
        .with_season(SeasonalSpec::new(period, 7)?)
        .multiplicative(true)
        .with_outer_loops(3)
        .build()?;
    let result = decompose(&sales, &multiplicative)?;
    let factors: Vec<String> = result.seasonal()[..period]
        .iter()
        .map(|f| format!("{:.3}", f))
        .collect();
    println!("Seasonal factors: [{}]", factors.join(", "));

    // 4. Multiple seasonal periods
    println!("\n--- Multiple Seasonal Periods ---");

    let hours = 24 * 7 * 4;
    let hourly: Vec<f64> = (0..hours)
        .map(|i| {
            let daily = 5.0 * (2.0 * PI * i as f64 / 24.0).sin();
            let weekly = 3.0 * (2.0 * PI * i as f64 / 168.0).sin();
            50.0 + 0.01 * i as f64 + daily + weekly
        })
        .collect();

    let joint = StlSpec::builder()
        .with_season(SeasonalSpec::new(24, 11)?)
        .with_season(SeasonalSpec::new(168, 11)?)
        .with_inner_loops(3)
        .build()?;
    let joint_result = decompose(&hourly, &joint)?;

    let chained = IterativeStl::from_periods(&[24, 168], 11)?.decompose(&hourly)?;

    println!("{:<10} {:>12} {:>12}", "Variant", "Daily str.", "Weekly str.");
    println!("{:-<36}", "");
    for (name, r) in [("Joint", &joint_result), ("Iterative", &chained)] {
        println!(
            "{:<10} {:>12.4} {:>12.4}",
            name,
            r.seasonal_strength(24).unwrap_or(0.0),
            r.seasonal_strength(168).unwrap_or(0.0)
        );
    }

    println!("\n=== STL Decomposition Example Complete ===");
    Ok(())
}
