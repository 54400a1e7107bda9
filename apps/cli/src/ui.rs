//! Terminal rendering of the workbench state.

use client_core::OrchestrationState;
use shared::domain::{format_vector, SortAlgorithm};

pub const PROCESSING_MARKER: &str = "Processing...";

pub fn render_state(state: &OrchestrationState) -> String {
    let mut lines = Vec::new();

    if let Some(result) = &state.result {
        lines.push("Sort results".to_string());
        lines.push(format!("  Comparisons:    {}", result.comparisons()));
        lines.push(format!("  Movements:      {}", result.movements()));
        lines.push(format!(
            "  Execution time: {}ms",
            format_millis(result.elapsed_millis())
        ));
        lines.push(format!(
            "  Original:       {}",
            format_vector(&result.original_vector)
        ));
        lines.push(format!(
            "  Sorted:         {}",
            format_vector(result.sorted_vector())
        ));
    } else {
        lines.push(format!("Current numbers: {}", state.vector_text));
    }

    if state.is_loading() {
        lines.push(PROCESSING_MARKER.to_string());
    }
    let error = state.error_message();
    if !error.is_empty() {
        lines.push(format!("Error: {error}"));
    }

    lines.join("\n")
}

pub fn render_settings(state: &OrchestrationState) -> String {
    let file = state
        .selected_file
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    format!(
        "algorithm: {} ({})\nrandom count: {}\nselected file: {file}",
        state.algorithm,
        state.algorithm.label(),
        state.random_count
    )
}

pub fn render_algorithms(selected: SortAlgorithm) -> String {
    SortAlgorithm::ALL
        .iter()
        .map(|algorithm| {
            let marker = if *algorithm == selected { '*' } else { ' ' };
            format!(
                "{marker} {:<17} {:<9} {}",
                algorithm.name(),
                algorithm.path_segment(),
                algorithm.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_millis(millis: f64) -> String {
    if millis.fract() == 0.0 {
        format!("{millis:.0}")
    } else {
        format!("{millis:.3}")
    }
}
