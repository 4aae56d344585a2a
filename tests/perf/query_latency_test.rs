use std::time::Instant;

use crate::adapters::{search_collection, MATTERS};
use crate::entities::Matter;

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

fn matter(i: usize) -> Matter {
    Matter {
        id: format!("f{i}"),
        folder_name: format!("Expediente {i:05} c/ Aseguradora"),
        subject_matter: "Daños y perjuicios".to_string(),
        description: format!("Accidente de tránsito número {i}"),
        jurisdiction: "CABA".to_string(),
        court_division: format!("Juzgado Civil {}", i % 110),
        ..Default::default()
    }
}

#[test]
fn local_matter_scan_p95_under_50ms() {
    let mut records: Vec<Matter> = (0..2_000).map(matter).collect();
    records.push(Matter {
        id: "target".to_string(),
        folder_name: "Pérez c/ Gómez s/ daños".to_string(),
        ..Default::default()
    });

    for _ in 0..10 {
        let _ = search_collection(&MATTERS, &records, "perez");
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(40);
        for _ in 0..40 {
            let start = Instant::now();
            let hits = search_collection(&MATTERS, &records, "perez");
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
            assert_eq!(hits.len(), 1);
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 50.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 50.0ms); batches={batch_p95:?}",
    );
}
