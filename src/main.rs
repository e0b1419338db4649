mod config;
mod harness;

use editor::EngineCore;
use editor::config::PhysicsConfig;

fn main() -> Result<(), harness::HarnessError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = config::HarnessConfig::from_env();
    tracing::info!(?config, "linkbench starting");

    let mut engine = EngineCore::new(PhysicsConfig::default());
    engine.set_viewport(1280.0, 720.0);
    harness::load_scene(&mut engine, &config)?;
    let report = harness::run(&mut engine, &config)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
