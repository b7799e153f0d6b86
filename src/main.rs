use std::process;

use clap::Parser;
use dotenv::dotenv;
use glicko_processor::{
    args::Args,
    database::db::DbClient,
    error::Result,
    export::{csv_sink::CsvSink, ExportSink},
    model::{
        loader::{load_dataset, Dataset},
        optimizer::optimize,
        prediction::PredictionHarness,
        rating_engine::RatingEngine,
        structures::{model_config::ModelConfig, player_rating::PlayerRating}
    }
};
use tracing::{error, info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenv().ok();
    let args = Args::parse();

    init_tracing(&args.log_level);

    if let Err(e) = run(args).await {
        error!("{}", e);
        process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

async fn run(args: Args) -> Result<()> {
    args.validate()?;
    let config = args.model_config();

    info!("=== INITIALIZE ===");
    let client = DbClient::connect(&args.connection_string).await?;
    let dataset = load_dataset(&client, args.rounds, args.category.as_deref()).await?;
    let engine = RatingEngine::new(&dataset, args.shard_size, args.threads)?;

    if let (Some(first), Some(last)) = (dataset.rounds().first(), dataset.rounds().last()) {
        info!(
            "Rounds {} to {} span {} to {}",
            first.id, last.id, first.start_time, last.start_time
        );
    }

    info!("=== RATE ===");
    let mut sink = args.outfile.as_ref().map(CsvSink::create).transpose()?;
    let mut ratings = dataset.initial_ratings(&config);
    engine.advance(
        0..dataset.round_count(),
        &mut ratings,
        config.tau,
        sink.as_mut().map(|s| s as &mut dyn ExportSink)
    )?;

    let active = ratings.iter().filter(|r| r.active).count();
    info!("Rated {} of {} players over {} rounds", active, dataset.player_count(), dataset.round_count());
    report_players(&dataset, &ratings, &args.report);

    info!("=== PREDICT ===");
    match evaluate(&engine, &args, &config) {
        Ok(()) => {}
        Err(e) if !args.optimize => warn!("Skipping prediction: {}", e),
        Err(e) => return Err(e)
    }

    info!("=== FLUSHING ===");
    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }

    info!("=== DONE ===");
    Ok(())
}

fn evaluate(engine: &RatingEngine, args: &Args, config: &ModelConfig) -> Result<()> {
    let harness = PredictionHarness::new(engine, args.prediction_count, args.active_count)?;
    let windows = harness.windows();
    info!(
        "Training on rounds {:?}, warming up on {:?}, predicting {:?}",
        windows.training, windows.active, windows.evaluation
    );

    let score = harness.predict(config)?;
    info!("Prediction score: {:.6}", score);

    if args.optimize {
        info!("=== OPTIMIZE ===");
        optimize(&harness, config, args.search_space, args.max_iterations)?;
    }

    Ok(())
}

fn report_players(dataset: &Dataset, ratings: &[PlayerRating], names: &[String]) {
    for name in names {
        match dataset.index_of_name(name) {
            Some(index) => {
                let rating = &ratings[index];
                info!(
                    "{}: r = {:.2}, rd = {:.2}, sigma = {:.6}",
                    name, rating.rating, rating.deviation, rating.volatility
                );
            }
            None => warn!("No player named {}", name)
        }
    }
}
