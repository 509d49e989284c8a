//! Site Suitability CLI
//!
//! Scores one location, or a batch of candidate sites, with the AHP model.
//!
//! Usage:
//!   assess-site --lat 22.7196 --lon 75.8577
//!   assess-site --sites data/candidate_sites.json --output data/assessed_sites.json --geojson

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use site_suitability::{
    loader, report, AhpModel, Coordinates, Criterion, CriterionWeights, EvaluationResult, MarkerColor,
    MarkerPalette, StudyArea, SyntheticSource, WeightConfig, DEFAULT_LATITUDE, DEFAULT_LONGITUDE,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Palette {
    Classic,
    Contrast,
}

impl From<Palette> for MarkerPalette {
    fn from(p: Palette) -> Self {
        match p {
            Palette::Classic => MarkerPalette::CLASSIC,
            Palette::Contrast => MarkerPalette::CONTRAST,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "assess-site",
    about = "Score solar site suitability with a fixed-weight AHP model"
)]
struct Args {
    /// Latitude of the location to assess
    #[arg(long, default_value_t = DEFAULT_LATITUDE, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude of the location to assess
    #[arg(long, default_value_t = DEFAULT_LONGITUDE, allow_negative_numbers = true)]
    lon: f64,

    /// JSON file of candidate sites (batch mode)
    #[arg(short, long)]
    sites: Option<PathBuf>,

    /// JSON weight configuration
    #[arg(short, long)]
    weights: Option<PathBuf>,

    /// Raw Technical weight (normalized with the other two)
    #[arg(long)]
    technical: Option<f64>,

    /// Raw Environmental weight
    #[arg(long)]
    environmental: Option<f64>,

    /// Raw Social weight
    #[arg(long)]
    social: Option<f64>,

    /// Marker color scheme
    #[arg(long, value_enum, default_value_t = Palette::Classic)]
    palette: Palette,

    /// Output JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also output GeoJSON next to the JSON output
    #[arg(long)]
    geojson: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("{}", "=".repeat(60));
    info!("AHP Site Suitability");
    info!("{}", "=".repeat(60));

    let model = build_model(&args)?;
    let palette = MarkerPalette::from(args.palette);
    let area = StudyArea::default();

    let assessments = match &args.sites {
        Some(path) => loader::load_sites(path)?
            .into_iter()
            .map(|site| {
                let mut assessment = match site.values {
                    Some(values) => model.assess(site.coordinates, values),
                    None => model.evaluate(site.coordinates, &SyntheticSource),
                };
                assessment.id = Some(site.id);
                assessment.name = Some(site.name);
                assessment
            })
            .collect(),
        None => {
            let coords = Coordinates::new(args.lat, args.lon)?;
            vec![model.evaluate(coords, &SyntheticSource)]
        }
    };

    for a in &assessments {
        if !area.contains(a.coordinates) {
            warn!(
                "({:.4}, {:.4}) is outside the calibrated study area",
                a.coordinates.latitude, a.coordinates.longitude
            );
        }
    }

    let result = EvaluationResult::new(assessments, &model);

    if let [single] = result.assessments.as_slice() {
        info!("\nNormalized criteria (0-1):");
        for (sub, value) in single.site_values.iter() {
            info!(
                "  {:30} {:.2} [{}]",
                sub.name(),
                value,
                MarkerColor::for_site_value(value).as_str()
            );
        }
        info!("\nCriterion contributions:");
        for (criterion, share) in model.criterion_scores(&single.site_values) {
            info!("  {:30} {:.3}", criterion.name(), share);
        }
        info!("\nScore: {:.3} (progress {:.0}%)", single.score, single.progress() * 100.0);
        info!("Recommendation: {}", single.suitability);
        info!(
            "Marker: {} | {}",
            single.marker_color(&palette).as_str(),
            single.popup_text()
        );
    } else {
        info!("\nTop 10 sites by score:");
        for a in result.assessments.iter().take(10) {
            let name: String = a.name.as_deref().unwrap_or("Unknown").chars().take(40).collect();
            info!("  {:.3} | {:40} | {}", a.score, name, a.suitability);
        }
    }

    if let Some(output) = &args.output {
        info!("\nWriting output to {:?}", output);
        let file = File::create(output)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &result)?;

        if args.geojson {
            let geojson_path = output.with_extension("geojson");
            info!("Writing GeoJSON to {:?}", geojson_path);
            let collection = report::to_feature_collection(&result, &palette, &area)?;
            let file = File::create(&geojson_path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &collection)?;
        }
    } else if args.geojson {
        warn!("--geojson needs --output; skipping");
    }

    // Summary
    info!("\n{}", "=".repeat(60));
    info!("SUMMARY");
    info!("{}", "=".repeat(60));
    info!("Total assessed: {}", result.metadata.total_sites);
    for (category, count) in &result.metadata.category_distribution {
        info!("  {}: {} sites", category, count);
    }

    Ok(())
}

/// Configuration file first, then any weight overrides from the command line
fn build_model(args: &Args) -> Result<AhpModel> {
    let config = match &args.weights {
        Some(path) => loader::load_weight_config(path)?,
        None => WeightConfig::default(),
    };
    let mut model = AhpModel::from_config(config.clone())?;

    if args.technical.is_some() || args.environmental.is_some() || args.social.is_some() {
        let raw = CriterionWeights {
            technical: args.technical.unwrap_or(config.criteria.technical),
            environmental: args.environmental.unwrap_or(config.criteria.environmental),
            social: args.social.unwrap_or(config.criteria.social),
        };
        for criterion in Criterion::ALL {
            let value = raw.get(criterion);
            ensure!(
                value.is_finite() && value >= 0.0,
                "{} weight must be finite and non-negative, got {}",
                criterion.name(),
                value
            );
        }
        model.set_criterion_weights(raw);
    }

    let w = model.weights().criteria();
    info!(
        "Weights: Technical={:.3}, Environmental={:.3}, Social={:.3}",
        w.technical, w.environmental, w.social
    );

    Ok(model)
}
