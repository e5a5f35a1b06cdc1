use anyhow::Result;
use chrono::{Duration, Utc};
use helioviewer::{Client, DataSource, MovieOptions, Value, create_events, create_layers};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // RUST_LOG=helioviewer=debug shows every request.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Set HELIOVIEWER_API_URL to point at another server.
    let client = Client::from_env()?;

    let end = Utc::now().naive_utc() - Duration::days(15);
    let request = [
        ("startTime", Value::from(end - Duration::minutes(5))),
        ("endTime", Value::from(end)),
        ("layers", create_layers([(DataSource::Aia171, 100)])?.into()),
        ("events", create_events(["AR"])?.into()),
        ("eventsLabels", Value::from(true)),
        ("imageScale", Value::from(1)),
        ("format", Value::from("mp4")),
    ];

    let path = client.create_movie(
        request,
        &MovieOptions {
            filename: Some("aia_171_active_regions".into()),
            overwrite: true,
            ..MovieOptions::default()
        },
    )?;
    println!("saved {}", path.display());
    Ok(())
}
