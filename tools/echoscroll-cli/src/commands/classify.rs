//! Classify the touches in a trace.

use std::collections::BTreeMap;
use std::path::PathBuf;

use echoscroll_common::config::AppConfig;
use echoscroll_gesture::{GestureClassifier, TouchPairer};
use echoscroll_model::gesture::GestureKind;
use echoscroll_model::input::{parse_input_records, InputKind};
use echoscroll_model::touch::TouchSample;

pub fn run(trace: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    let content = super::read_trace(&trace)?;
    let records = parse_input_records(&content)
        .map_err(|e| anyhow::anyhow!("{}: {e}", trace.display()))?;

    let mut classifier = GestureClassifier::new(config.gesture.clone());
    let mut pairer = TouchPairer::new();
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();

    println!("Gestures in {}:", trace.display());
    for record in &records {
        let t = record.timestamp_ms;
        let (kind, position) = match record.kind {
            InputKind::Down { x, y } => {
                let sample = TouchSample::new(x, y, t);
                if let Some(orphan) = pairer.down(sample) {
                    tracing::warn!(t = orphan.timestamp_ms, "Touch-down without touch-up");
                }
                classifier.note_position(sample.position());
                continue;
            }
            InputKind::Up { x, y } => {
                let paired = pairer.up(TouchSample::new(x, y, t));
                match paired.duration_ms {
                    Some(duration) => (
                        classifier.classify(paired.sample, duration),
                        paired.sample.position(),
                    ),
                    None => classifier.classify_unpaired(t),
                }
            }
            InputKind::Tap { x, y, duration_ms } => {
                let sample = TouchSample::new(x, y, t);
                match duration_ms {
                    Some(duration) => (classifier.classify(sample, duration), sample.position()),
                    None => classifier.classify_unpaired(t),
                }
            }
            _ => continue,
        };
        *counts.entry(kind.label()).or_default() += 1;
        println!(
            "  {t:>8} ms  {:<12} ({:.1}, {:.1})",
            kind.to_string(),
            position.x,
            position.y
        );
    }

    println!();
    println!("Summary:");
    for kind in GestureKind::ALL {
        let count = counts.get(kind.label()).copied().unwrap_or(0);
        println!("  {:<12} {count}", kind.to_string());
    }

    Ok(())
}
