use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use tracing::{info, info_span, warn};

use sheetmap_cli::config::{
    FileConfig, FlagOverrides, RunSettings, load_file_config, resolve_settings,
};
use sheetmap_cli::output::{default_output_path, write_report};
use sheetmap_ingest::load_workbook;
use sheetmap_map::{
    MatchingEngine, NgramEmbedder, NoopEmbedder, RapidfuzzScorer, WorkbookReport, map_workbook,
};
use sheetmap_model::{MappingResult, MatchingConfig};
use sheetmap_schema::{AliasPolicy, SchemaRegistry};

use crate::cli::{MapArgs, MatchArgs, SchemaArgs, SuggestArgs};
use crate::summary::{apply_table_style, dim_cell, header_cell};

/// Result of a `map` run.
pub struct MapOutcome {
    pub report: WorkbookReport,
    /// Where the report was written; `None` on a dry run.
    pub output: Option<PathBuf>,
}

pub fn run_map(args: &MapArgs) -> Result<MapOutcome> {
    let input = &args.input;
    let _span = info_span!("map", input = %input.display()).entered();

    let flags = FlagOverrides {
        fuzzy_min_threshold: args.matching.fuzzy_threshold,
        header_rows: args.header_rows.map(usize::from),
        max_header_rows: args.max_header_rows.map(usize::from),
    };
    let settings = settings_for(&args.matching, &flags)?;
    let registry = load_registry(&args.schema)?;
    let engine = build_engine(registry, settings.matching, args.matching.no_semantic);

    let sheets = load_workbook(input).with_context(|| format!("load {}", input.display()))?;
    let source = input.display().to_string();
    let report = map_workbook(&engine, &source, &sheets, &settings.header_span)
        .with_context(|| format!("map {}", input.display()))?;

    let output = if args.dry_run {
        None
    } else {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(input));
        write_report(&path, &report)?;
        info!(path = %path.display(), "wrote mapping report");
        Some(path)
    };
    Ok(MapOutcome { report, output })
}

/// The resolved match first, then lexical runners-up, one per column.
pub fn run_suggest(args: &SuggestArgs) -> Result<Vec<MappingResult>> {
    let flags = FlagOverrides {
        fuzzy_min_threshold: args.matching.fuzzy_threshold,
        ..FlagOverrides::default()
    };
    let settings = settings_for(&args.matching, &flags)?;
    if args.top == 0 {
        return Ok(Vec::new());
    }
    let registry = load_registry(&args.schema)?;
    let engine = build_engine(registry, settings.matching, args.matching.no_semantic);

    let mut suggestions = Vec::with_capacity(args.top);
    let resolved = engine.resolve(&args.label);
    if resolved.is_match() {
        suggestions.push(resolved);
    }
    for candidate in engine.top_matches(&args.label, args.top) {
        if suggestions.len() >= args.top {
            break;
        }
        if suggestions
            .iter()
            .all(|s| s.canonical_column != candidate.canonical_column)
        {
            suggestions.push(candidate);
        }
    }
    Ok(suggestions)
}

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let registry = load_registry(args)?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Canonical"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Aliases"),
    ]);
    apply_table_style(&mut table);
    for column in registry.columns() {
        table.add_row(vec![
            Cell::new(&column.key),
            Cell::new(&column.canonical_name),
            Cell::new(column.data_type),
            if column.required {
                Cell::new("yes")
            } else {
                dim_cell("no")
            },
            if column.aliases.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(column.aliases.join(", "))
            },
        ]);
    }
    println!("{table}");

    let conflicts = registry.alias_conflicts();
    if !conflicts.is_empty() {
        println!();
        println!("Alias conflicts (first column wins):");
        for conflict in conflicts {
            println!(
                "- '{}': {} shadows {}",
                conflict.alias, conflict.first_key, conflict.second_key
            );
        }
    }
    Ok(())
}

fn settings_for(matching: &MatchArgs, flags: &FlagOverrides) -> Result<RunSettings> {
    let file = match &matching.config {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };
    resolve_settings(&file, flags)
}

fn load_registry(args: &SchemaArgs) -> Result<Arc<SchemaRegistry>> {
    let policy = if args.strict_aliases {
        AliasPolicy::Reject
    } else {
        AliasPolicy::FirstWins
    };
    let (registry, summary) = SchemaRegistry::load(&args.schema, policy).context("load schema")?;
    if summary.alias_conflicts > 0 {
        warn!(
            conflicts = summary.alias_conflicts,
            "schema has shared aliases; run `sheetmap schema` to list them"
        );
    }
    Ok(Arc::new(registry))
}

fn build_engine(
    registry: Arc<SchemaRegistry>,
    config: MatchingConfig,
    no_semantic: bool,
) -> MatchingEngine {
    if no_semantic {
        MatchingEngine::with_providers(
            registry,
            config,
            Box::new(RapidfuzzScorer),
            Box::new(NoopEmbedder),
        )
    } else {
        MatchingEngine::with_providers(
            registry,
            config,
            Box::new(RapidfuzzScorer),
            Box::new(NgramEmbedder::default()),
        )
    }
}
