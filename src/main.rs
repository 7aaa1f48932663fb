use std::sync::Arc;

use anyhow::{Context, Result};
use time::OffsetDateTime;

use atelier::{
    catalog::{
        AttributeCatalog, PresetDimension, StrategyDimension, preset::builtin_preset_catalog,
        strategy::builtin_strategy_catalog,
    },
    cli::{PreviewArgs, PreviewLayer, preview_args_from_args},
    config::Config,
    engine::{CreativeEngine, SelectionRequest},
    logging::init_tracing,
    observability::metrics::start_prometheus_exporter,
    reasoning::{ReasoningPort, http::OpenAiCompatibleReasoner},
    recency::SelectionScope,
    selection::AssistedContext,
    strategist::{StrategyContext, VisualStrategist},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = preview_args_from_args()?;
    let config = Config::load_or_default(&args.config_path)
        .with_context(|| format!("failed to load config from {}", args.config_path.display()))?;
    let logging = init_tracing(&config.logging)?;

    if config.metrics.enabled {
        let runtime = start_prometheus_exporter(config.metrics.listen_addr())
            .context("failed to start prometheus exporter")?;
        tracing::info!(
            target: "metrics",
            listen_addr = %runtime.listen_addr,
            "prometheus_exporter_started"
        );
    }

    let reasoner = build_reasoner(&config)?;
    tracing::info!(
        target: "atelier",
        run_id = %logging.run_id(),
        layer = ?args.layer,
        calendar_id = %args.calendar_id,
        count = args.count,
        assisted = reasoner.is_some(),
        "preview_started"
    );

    match args.layer {
        PreviewLayer::Preset => run_preset(&config, &args, reasoner).await?,
        PreviewLayer::Strategy => run_strategy(&config, &args, reasoner).await?,
    }

    eprintln!("atelier preview finished; logs in {}", logging.log_dir().display());
    Ok(())
}

fn build_reasoner(config: &Config) -> Result<Option<Arc<dyn ReasoningPort>>> {
    let assisted = &config.assisted;
    let Some(endpoint) = assisted.endpoint.as_deref().filter(|_| assisted.enabled) else {
        return Ok(None);
    };

    let reasoner = OpenAiCompatibleReasoner::new(
        endpoint,
        assisted.model.as_str(),
        assisted.credential.clone(),
        assisted.timeout(),
    )
    .context("failed to construct reasoning client")?;
    let port: Arc<dyn ReasoningPort> = Arc::new(reasoner);
    Ok(Some(port))
}

fn assisted_context(args: &PreviewArgs, assisted: bool) -> Option<AssistedContext> {
    if !assisted {
        return None;
    }
    let brand = args.brand_id.clone().unwrap_or_else(|| args.calendar_id.clone());
    let mut context = AssistedContext::new(brand).with_platform(args.platform.as_str());
    if let Some(objective) = &args.objective {
        context = context.with_campaign_objective(objective.as_str());
    }
    Some(context)
}

async fn run_preset(
    config: &Config,
    args: &PreviewArgs,
    reasoner: Option<Arc<dyn ReasoningPort>>,
) -> Result<()> {
    let catalog = match &config.catalog.path {
        Some(path) => AttributeCatalog::<PresetDimension>::load(path)?,
        None => builtin_preset_catalog()?,
    };
    let context = assisted_context(args, reasoner.is_some());
    let mut engine = CreativeEngine::new(catalog, config.engine.clone());
    if let Some(port) = reasoner {
        engine = engine.with_reasoner(port, config.assisted.settings());
    }

    for post_index in 0..args.count {
        let mut request = SelectionRequest {
            sector: args.sector.clone(),
            usage_occasions: args.occasions.clone(),
            scope_id: args.calendar_id.clone(),
            brand_id: args.brand_id.clone(),
            seed: args.seed.map(|seed| seed.wrapping_add(post_index)),
            post_index,
            objective: args.objective.clone(),
            assisted_context: None,
        };
        if let Some(context) = &context {
            request = request.with_assisted_context(context.clone());
        }
        let scored = engine.select_creative_attributes(request).await?;
        println!("{}", scored.to_json());
    }

    let mut scope = SelectionScope::new(args.calendar_id.as_str());
    if let Some(brand_id) = &args.brand_id {
        scope = scope.with_brand(brand_id.as_str());
    }
    let stats = engine.diversity_stats(&scope).await;
    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}

async fn run_strategy(
    config: &Config,
    args: &PreviewArgs,
    reasoner: Option<Arc<dyn ReasoningPort>>,
) -> Result<()> {
    let catalog = match &config.catalog.strategy_path {
        Some(path) => AttributeCatalog::<StrategyDimension>::load(path)?,
        None => builtin_strategy_catalog()?,
    };
    let shared_context = assisted_context(args, reasoner.is_some());
    let mut engine = CreativeEngine::new(catalog, config.engine.clone());
    if let Some(port) = reasoner {
        engine = engine.with_reasoner(port, config.assisted.settings());
    }
    let strategist = VisualStrategist::new(engine);
    let today = OffsetDateTime::now_utc().date();

    for post_index in 0..args.count {
        let scheduled_date = i64::try_from(post_index)
            .ok()
            .and_then(|days| today.checked_add(time::Duration::days(days)))
            .unwrap_or(today);
        let context = StrategyContext {
            calendar_id: args.calendar_id.clone(),
            post_index,
            total_posts: args.count,
            sector: args.sector.clone(),
            usage_occasions: args.occasions.clone(),
            brand_values: Vec::new(),
            product_benefits: Vec::new(),
            has_products: true,
            platform: args.platform.clone(),
            country: args.country.clone(),
            scheduled_date,
            season: None,
            seed: args.seed.map(|seed| seed.wrapping_add(post_index)),
            objective: args.objective.clone(),
            assisted_context: shared_context.clone(),
        };
        let strategy = strategist.generate(&context).await?;
        println!("{}", strategy.to_json());
    }

    let stats = strategist.calendar_stats(&args.calendar_id).await;
    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}
