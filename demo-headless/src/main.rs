use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wildfire_spread_core::{
    normalize, slope_from_elevation, BurnStatistics, CompassDirection, Grid, SpreadEngine,
    SpreadParams, WindVector,
};

/// Wildfire spread demo on a synthetic landscape
#[derive(Parser, Debug)]
#[command(name = "wildfire-spread-demo")]
#[command(about = "Cellular-automaton wildfire spread demo", long_about = None)]
struct Args {
    /// Grid size in cells (square grid)
    #[arg(short, long, default_value_t = 64)]
    size: usize,

    /// Checkpoint hours, comma separated
    #[arg(long, value_delimiter = ',', default_value = "1,2,3,6,12")]
    hours: Vec<f32>,

    /// Simulation steps per simulated hour
    #[arg(long, default_value_t = 4)]
    steps_per_hour: u32,

    /// Wind speed in km/h
    #[arg(short, long, default_value_t = 15.0)]
    wind_speed: f32,

    /// Wind heading (north, south, east, west, ne, se, nw, sw)
    #[arg(long, default_value = "north")]
    wind_dir: String,

    /// Ignition radius in cells
    #[arg(short, long, default_value_t = 2)]
    radius: usize,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Cell size in meters for slope calculation
    #[arg(long, default_value_t = 90.0)]
    cell_size: f32,
}

/// Synthetic inputs: Gaussian hill elevation, smooth risk, patchy fuel
fn synthetic_landscape(size: usize) -> (Grid, Grid, Grid) {
    let mut elevation = Grid::new(size, size);
    let mut raw_risk = Grid::new(size, size);
    let mut fuel = Grid::new(size, size);

    let half = size as f32 / 2.0;
    let spread = (size * size) as f32 / 10.0;
    for r in 0..size {
        for c in 0..size {
            let y = r as f32 - half;
            let x = c as f32 - half;
            elevation.set(r, c, 500.0 + 200.0 * (-(x * x + y * y) / spread).exp());
            raw_risk.set(r, c, (x * 0.15).sin() + (y * 0.1).cos() + 2.0);
            let patch = ((r / 6 + c / 9) % 5) as f32;
            fuel.set(r, c, 0.55 + 0.1 * patch);
        }
    }

    (normalize(&raw_risk), fuel, elevation)
}

/// Coarse ASCII rendering: ' ' unburnt, '.' charcoal, '+' cooling, '#' burning
fn render(intensity: &Grid, fuel: &Grid, params: &SpreadParams) -> String {
    let mut out = String::with_capacity(intensity.len() + intensity.rows());
    for r in 0..intensity.rows() {
        for c in 0..intensity.cols() {
            let i = intensity.get(r, c);
            let ch = if i >= params.active_threshold {
                '#'
            } else if i > params.combustion_threshold {
                '+'
            } else if i > 0.0 || fuel.get(r, c) < 1.0 {
                '.'
            } else {
                ' '
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    println!("=== Wildfire Spread Demo ===\n");

    let direction: CompassDirection = args.wind_dir.parse()?;
    let wind = WindVector::from_compass(direction, args.wind_speed);
    println!(
        "Wind: {:.1} km/h {} -> vector ({:.2}, {:.2})",
        args.wind_speed,
        direction,
        wind.wx(),
        wind.wy()
    );

    let (risk, fuel, elevation) = synthetic_landscape(args.size);
    let slope = slope_from_elevation(&elevation, args.cell_size);
    info!("Synthetic landscape ready: {}x{}", args.size, args.size);

    let mut engine = SpreadEngine::new(risk, fuel, Some(slope), wind, args.seed)?;
    let centre = (args.size / 2) as i64;
    engine.ignite(centre, centre, args.radius)?;

    let snapshots = engine.run_with_snapshots(&args.hours, args.steps_per_hour)?;

    // Band tallies depend only on intensity
    let final_fuel = snapshots.final_fuel_remaining().as_slice();
    println!(
        "{:>6} {:>8} {:>8} {:>9} {:>7} {:>10}",
        "Hour", "Active", "Cooling", "Charcoal", "Lit", "Peak"
    );
    for (hour, intensity) in snapshots.iter() {
        let stats = BurnStatistics::compute(intensity.as_slice(), final_fuel, engine.params());
        println!(
            "{:>6.1} {:>8} {:>8} {:>9} {:>7} {:>10.3}",
            hour,
            stats.active_cells,
            stats.cooling_cells,
            stats.charcoal_cells,
            stats.burning_cells(),
            stats.peak_intensity
        );
    }

    let stats = engine.statistics();
    println!(
        "\nFinal: {} cells burned, mean fuel consumed {:.1}%",
        stats.burned_cells,
        stats.mean_fuel_consumed * 100.0
    );

    if let Some((last_hour, last)) = snapshots.iter().last() {
        println!("\nIntensity at {:.1}h:", last_hour);
        print!(
            "{}",
            render(last, snapshots.final_fuel_remaining(), engine.params())
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_landscape_ranges() {
        let (risk, fuel, elevation) = synthetic_landscape(16);
        assert!(risk.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!(fuel.as_slice().iter().all(|&v| (0.5..=1.0).contains(&v)));
        assert!(elevation.max() <= 700.0);
    }

    #[test]
    fn test_render_legend() {
        let intensity = Grid::from_vec(1, 4, vec![0.9, 0.2, 0.05, 0.0]).unwrap();
        let fuel = Grid::filled(1, 4, 1.0);
        assert_eq!(
            render(&intensity, &fuel, &SpreadParams::default()),
            "#+. \n"
        );

        // Thresholds follow the configured coefficients
        let params = SpreadParams {
            active_threshold: 0.15,
            ..SpreadParams::default()
        };
        assert_eq!(render(&intensity, &fuel, &params), "##. \n");
    }

    #[test]
    fn test_args_parse_hours() {
        let args = Args::parse_from(["demo-headless", "--hours", "1,6,12", "--wind-dir", "sw"]);
        assert_eq!(args.hours, vec![1.0, 6.0, 12.0]);
        assert_eq!(args.wind_dir, "sw");
        assert_eq!(args.steps_per_hour, 4);
    }
}
