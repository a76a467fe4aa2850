//! Dark windows for the coming week.
//!
//! ```text
//! cargo run --example tonight                  # Denver, next seven nights
//! cargo run --example tonight -- request.toml  # a DarkSkyConfig file
//! RUST_LOG=darksky=debug cargo run --example tonight
//! ```

use chrono::{Duration, Utc};
use darksky::{summarize, DarkSkyConfig, MeeusEphemeris, Observer};

fn main() -> darksky::Result<()> {
    env_logger::init();

    let (range, observer, result) = match std::env::args().nth(1) {
        Some(path) => {
            let config = DarkSkyConfig::load(path)?;
            let range = config.range()?;
            let result = config.classifier()?.classify(&range, &config.observer);
            (range, config.observer, result)
        }
        None => {
            let zone = chrono_tz::America::Denver;
            let today = Utc::now().with_timezone(&zone).date_naive();
            let range = darksky::CivilRange::new(today, today + Duration::days(6), zone);
            let observer = Observer::new(39.74, -104.99, 1609.0)?;
            let result =
                darksky::Classifier::new(MeeusEphemeris::default()).classify(&range, &observer);
            (range, observer, result)
        }
    };

    println!(
        "{} to {} in {} at {:.2}°, {:.2}°",
        range.start(),
        range.end(),
        range.zone().name(),
        observer.latitude().value(),
        observer.longitude().value()
    );

    let zone = range.zone();
    let local = |t: chrono::DateTime<Utc>| t.with_timezone(&zone).format("%H:%M");
    for row in summarize(&result) {
        let mut parts = Vec::new();
        if let Some(span) = row.full_dark {
            parts.push(format!("dark all day ({:.1} h)", span.duration_hours()));
        }
        if let Some(span) = row.dawn {
            let arrow = if row.continues_from_previous { "…" } else { "" };
            parts.push(format!("{arrow}{}–{}", local(span.start), local(span.end)));
        }
        if let Some(span) = row.dusk {
            let arrow = if row.continues_into_next { "…" } else { "" };
            parts.push(format!("{}–{}{arrow}", local(span.start), local(span.end)));
        }
        if parts.is_empty() {
            parts.push("no dark window".to_string());
        }
        println!("{}  {}", row.date, parts.join(", "));
    }

    for fault in result.faults() {
        eprintln!("{fault}");
    }
    Ok(())
}
