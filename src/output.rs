//! Output Formatting Module
//!
//! Terminal and JSON renderings of a computed scene.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::layout::PanelPlacement;
use crate::scene::Scene;

// ===================== JSON OUTPUT =====================

/// Serialize the scene for an external renderer.
pub fn scene_json(scene: &Scene) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(scene)
}

// ===================== TERMINAL OUTPUT =====================

/// Format a placement as one table row.
pub fn format_panel(p: &PanelPlacement) -> String {
    format!(
        "{:>5}  {:>9.3} {:>9.3} {:>9.3}   {:>7.3} x {:>7.3} x {:>7.3}  {}",
        p.index,
        p.position[0],
        p.position[1],
        p.position[2],
        p.size[0],
        p.size[1],
        p.size[2],
        if p.has_error { "FAULT" } else { "ok" }
    )
}

/// Print the scene summary and, when `list_panels` is set, every placement.
///
/// # Arguments
/// * `scene` - Computed scene
/// * `at` - Instant the sun was computed for (ephemeris model only)
/// * `list_panels` - Print one row per panel
pub fn print_scene(scene: &Scene, at: Option<DateTime<Tz>>, list_panels: bool) {
    let [length, height, depth] = scene.frame.size;
    println!("Frame       : {:.3} x {:.3} x {:.3} (L x H x D)", length, height, depth);
    println!("Mount height: {:.3}", scene.mount_height);

    let shape = &scene.shape;
    if shape.is_degenerate() {
        println!("Grid        : {} x {} (panel does not fit, frame only)", shape.columns, shape.rows);
    } else {
        println!(
            "Grid        : {} columns x {} rows, {} placed",
            shape.columns, shape.rows, shape.total
        );
        println!(
            "Panel size  : {:.3} x {:.3} x {:.3} (gap-adjusted)",
            shape.panel_length, shape.panel_height, shape.panel_depth
        );
    }

    let faulty: Vec<String> = scene.faulty_panels().map(|p| p.index.to_string()).collect();
    if faulty.is_empty() {
        println!("Faults      : none");
    } else {
        println!("Faults      : {} (panels {})", faulty.len(), faulty.join(", "));
    }
    println!();

    let sun = &scene.sun;
    match at {
        Some(t) => println!("Sun ({}) at {}:", sun.model, t.format("%Y-%m-%d %H:%M:%S %Z")),
        None => println!("Sun ({}):", sun.model),
    }
    println!(
        "  Position    : ({:.3}, {:.3}, {:.3})",
        sun.position.x, sun.position.y, sun.position.z
    );
    println!("  Intensity   : {:.2}", sun.intensity);
    if sun.below_horizon {
        println!("  Below the horizon.");
    }

    if list_panels && !scene.panels.is_empty() {
        println!();
        println!("Index          x         y         z      length    height     depth  status");
        for p in &scene.panels {
            println!("{}", format_panel(p));
        }
    }
}

// ===================== TESTS =====================
