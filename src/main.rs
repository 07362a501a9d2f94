//! Nutrimatch CLI entrypoint.
//!
//! Usage: `nutrimatch [--search-only] TERM...` where a term may be prefixed with `dish:` or
//! `ingredient:` (default). Prints the result as JSON on stdout.

use std::sync::Arc;

use nutrimatch::backend::{ElasticsearchClient, HttpSuggestionClient};
use nutrimatch::config::Config;
use nutrimatch::matcher::NutritionMatcher;
use nutrimatch::model::{SearchTerm, TermKind};
use nutrimatch::refine::{HttpQueryOracle, NoopOracle, QueryOracle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut search_only = false;
    let mut terms = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--search-only" {
            search_only = true;
        } else {
            terms.push(parse_term(&arg));
        }
    }
    if terms.is_empty() {
        anyhow::bail!("usage: nutrimatch [--search-only] [dish:|ingredient:]TERM...");
    }

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        es_url = %config.es_url,
        index = %config.es_index,
        oracle = config.oracle_url.is_some(),
        terms = terms.len(),
        "Nutrimatch starting"
    );

    let mut engine =
        ElasticsearchClient::new(&config.es_url, &config.es_index, config.http_timeout)?;
    if let Some(key) = &config.es_api_key {
        engine = engine.with_api_key(key.clone());
    }
    let suggestions = HttpSuggestionClient::new(&config.suggest_url, config.http_timeout)?;

    let oracle: Arc<dyn QueryOracle> = match &config.oracle_url {
        Some(url) => Arc::new(HttpQueryOracle::new(url, config.http_timeout)?),
        None => {
            tracing::warn!("No NUTRIMATCH_ORACLE_URL configured, refinement disabled");
            Arc::new(NoopOracle)
        }
    };

    let matcher = NutritionMatcher::new(
        Arc::new(engine),
        Arc::new(suggestions),
        oracle,
        config.matcher_config(),
    )?;

    let output = if search_only {
        let wave = matcher.search(&terms).await?;
        serde_json::to_string_pretty(&wave.matches)?
    } else {
        let result = matcher.analyze(&terms, None).await?;
        serde_json::to_string_pretty(&result)?
    };
    println!("{}", output);

    Ok(())
}

fn parse_term(arg: &str) -> SearchTerm {
    if let Some((prefix, text)) = arg.split_once(':')
        && let Ok(kind) = prefix.parse::<TermKind>()
    {
        return SearchTerm::new(text.trim(), kind);
    }
    SearchTerm::ingredient(arg.trim())
}
