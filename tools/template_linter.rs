/// Template Linter: validates a story template file.
///
/// Usage: template_linter <templates.ron> [--catalog <catalog.ron>]

use masal_engine::core::catalog::Catalog;
use masal_engine::core::template::{Slot, StoryTemplates};
use masal_engine::schema::config::StoryLength;
use masal_engine::schema::theme::ThemeKind;
use masal_engine::telemetry;
use std::path::Path;
use std::process;

fn main() {
    telemetry::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: template_linter <templates.ron> [--catalog <catalog.ron>]");
        process::exit(0);
    }

    let templates_path = Path::new(&args[1]);
    let mut catalog_path = None;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--catalog" && i + 1 < args.len() {
            i += 1;
            catalog_path = Some(args[i].clone());
        }
        i += 1;
    }

    // Loading already rejects bad slots and broken paragraph layout.
    let templates = match StoryTemplates::load_from_ron(templates_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("ERROR: Failed to load template file: {}", e);
            process::exit(1);
        }
    };

    println!("Loaded templates from {}", templates_path.display());
    for kind in [ThemeKind::Adventure, ThemeKind::Space, ThemeKind::Generic] {
        let counts: Vec<String> = StoryLength::ALL
            .iter()
            .map(|length| {
                let n = templates.branch(kind).paragraphs(length.factor()).count();
                format!("{}={}", length.as_str(), n)
            })
            .collect();
        println!("  {:<10} {}", kind.name(), counts.join(" "));
    }

    let mut report = templates.lint();

    if let Some(ref path) = catalog_path {
        match Catalog::load_from_ron(Path::new(path)) {
            Ok(catalog) => {
                for theme in &catalog.themes {
                    if theme.kind() == ThemeKind::Generic {
                        println!("  theme '{}' uses the generic branch", theme.title);
                    }
                }
            }
            Err(e) => report
                .errors
                .push(format!("catalog '{}' failed to load: {}", path, e)),
        }
    }

    // Slots defined but never used anywhere are worth knowing about.
    for slot in Slot::ALL {
        let used = templates.title.uses(slot)
            || [ThemeKind::Adventure, ThemeKind::Space, ThemeKind::Generic]
                .into_iter()
                .any(|kind| templates.branch(kind).paragraphs(3).any(|t| t.uses(slot)));
        if !used {
            println!("  note: {{{}}} is never used", slot.name());
        }
    }

    println!("\n=== Template Lint Report ===\n");

    if report.is_clean() {
        println!("All checks passed!");
    }

    for warning in &report.warnings {
        println!("WARNING: {}", warning);
    }

    for error in &report.errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        report.errors.len(),
        report.warnings.len()
    );

    if !report.errors.is_empty() {
        process::exit(1);
    }
}
