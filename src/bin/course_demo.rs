//! Demo: generate one course and print it as JSON.
//! Usage: `course_demo <topic> [difficulty] [hours]`

use course_forge::{config, telemetry, CourseGenerator, Difficulty, GenerateOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let mut args = std::env::args().skip(1);
    let topic = args.next().unwrap_or_else(|| "React.js".to_string());
    let difficulty = args
        .next()
        .and_then(|d| Difficulty::parse(&d))
        .unwrap_or_default();
    let hours = args
        .next()
        .and_then(|h| h.parse::<f32>().ok())
        .unwrap_or(4.0);

    let generator = CourseGenerator::from_config(config::load_default());
    let options = GenerateOptions::default()
        .with_difficulty(difficulty)
        .with_hours(hours);
    let report = generator.generate_with_report(&topic, &options).await?;

    for d in &report.degradations {
        eprintln!("degraded: {:?} subtopic={:?} ({})", d.component, d.subtopic, d.reason);
    }
    println!("{}", serde_json::to_string_pretty(&report.blueprint)?);
    Ok(())
}
