use std::path::PathBuf;
use std::process::ExitCode;

use footscan::analysis::{describe_with_fallback, MeasurementRecord, TemplateDescriptor};
use footscan::{process_scan, PipelineConfig};

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        eprintln!("usage: measure_foot <input.ply> <output.ply> [seed]");
        return ExitCode::from(2);
    };

    let mut config = PipelineConfig::default();
    if let Some(seed) = args.next() {
        match seed.parse() {
            Ok(seed) => config.seed = seed,
            Err(_) => {
                eprintln!("invalid seed: {}", seed);
                return ExitCode::from(2);
            }
        }
    }

    let outcome = match process_scan(&PathBuf::from(&input), &PathBuf::from(&output), &config) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("failed to process {}: {}", input, e);
            return ExitCode::FAILURE;
        }
    };

    let m = outcome.measurements;
    println!("foot length:   {:.1} mm", m.foot_length * 1000.0);
    println!("foot width:    {:.1} mm", m.foot_width * 1000.0);
    println!("circumference: {:.1} mm", m.circumference * 1000.0);
    println!("points:        {}", m.point_count);

    let record = MeasurementRecord::from_scan(&m, 1000.0);
    let description = describe_with_fallback(&TemplateDescriptor, &record);
    println!();
    println!("{}", description.full_description);

    if let Some(e) = outcome.save_error {
        eprintln!("measurements computed, but writing {} failed: {}", output, e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
