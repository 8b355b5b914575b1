use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgGroup, Parser};
use std::io::Read;
use std::path::PathBuf;
use tokio::sync::mpsc;

use factlens::api::{parse_timestamp, ApiClient, ArticleFilters, NewsApi};
use factlens::app::{App, AppEvent};
use factlens::collection::ArticleCollection;
use factlens::config::{self, Config};
use factlens::report;
use factlens::theme::ThemeVariant;
use factlens::ui;
use factlens::workflow::{AnalysisWorkflow, ArticleDetailWorkflow, Completion, DetailState};

#[derive(Parser, Debug)]
#[command(
    name = "factlens",
    about = "Terminal client for the FactLens news bias analysis service",
    group(ArgGroup::new("mode").args(["list", "show", "analyze", "analyze_article"]))
)]
struct Args {
    /// Analysis service base URL (overrides FACTLENS_API_BASE_URL and the config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Config file (default: ~/.config/factlens/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the article list and exit
    #[arg(long)]
    list: bool,

    /// Server-side topic filter for the article list
    #[arg(long, value_name = "TOPIC")]
    topic: Option<String>,

    /// Only articles published at or after this time (RFC 3339)
    #[arg(long, value_name = "TIME", value_parser = parse_date)]
    date_from: Option<DateTime<Utc>>,

    /// Print one article with its latest analysis and exit
    #[arg(long, value_name = "ID")]
    show: Option<i64>,

    /// Analyze TEXT (or stdin when TEXT is "-") and exit
    #[arg(long, value_name = "TEXT")]
    analyze: Option<String>,

    /// Request an analysis of a stored article and exit
    #[arg(long, value_name = "ID")]
    analyze_article: Option<i64>,

    /// Print raw service records as JSON
    #[arg(long)]
    json: bool,
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(raw).ok_or_else(|| format!("'{raw}' is not an RFC 3339 timestamp"))
}

impl Args {
    fn filters(&self) -> ArticleFilters {
        ArticleFilters {
            topic: self.topic.clone(),
            date_from: self.date_from,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::default_config_path().context("Failed to locate config file")?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let base_url = config.resolve_base_url(args.api_url.as_deref());
    let api = ApiClient::new(&base_url, config.request_timeout())
        .context("Failed to create service client")?;
    tracing::info!(base_url = %api.base_url(), "Using analysis service");

    if args.list {
        return list_articles(&api, &args).await;
    }
    if let Some(id) = args.show {
        return show_article(&api, id, args.json).await;
    }
    if let Some(text) = &args.analyze {
        let text = if text == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf
        } else {
            text.clone()
        };
        return analyze(&api, Target::Text(&text), args.json).await;
    }
    if let Some(id) = args.analyze_article {
        return analyze(&api, Target::Article(id), args.json).await;
    }

    let theme = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "Unknown theme in config, using dark");
        ThemeVariant::Dark
    });

    let mut app = App::new(api, theme);
    app.list_filters = args.filters();

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}

async fn list_articles(api: &ApiClient, args: &Args) -> Result<()> {
    let articles = api
        .list_articles(&args.filters())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load articles: {}", e.detail()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
        return Ok(());
    }

    let collection = ArticleCollection::from_articles(articles);
    if let Some(message) = collection.empty_message() {
        println!("{}", message);
    }
    for article in collection.visible_articles() {
        println!("{}", report::article_line(article));
    }
    Ok(())
}

async fn show_article(api: &ApiClient, id: i64, json: bool) -> Result<()> {
    let mut detail = ArticleDetailWorkflow::new(id);
    detail.load(api).await;

    match detail.state() {
        DetailState::Loaded(view) if json => {
            let record = serde_json::json!({
                "article": view.article,
                "analysis": view.latest,
            });
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        DetailState::Loaded(view) => print!("{}", report::article_report(view)),
        DetailState::NotFound { reason } => bail!("Article not found: {}", reason),
        state => bail!("Article {} did not load ({:?})", id, state),
    }
    Ok(())
}

enum Target<'a> {
    Text(&'a str),
    Article(i64),
}

async fn analyze(api: &ApiClient, target: Target<'_>, json: bool) -> Result<()> {
    let mut workflow = AnalysisWorkflow::new();
    let completion = match target {
        Target::Text(text) => workflow.run(api, text).await?,
        Target::Article(id) => workflow.run_article(api, id).await?,
    };

    match completion {
        Completion::Applied => {}
        Completion::Failed(message) => bail!(message),
        Completion::Discarded => bail!("Analysis response was discarded"),
    }

    if json {
        if let Some(raw) = workflow.raw_result() {
            println!("{}", serde_json::to_string_pretty(raw)?);
        }
    } else if let Some(display) = workflow.result() {
        print!("{}", report::analysis_report(display));
        if display.is_high_bias() {
            println!();
            println!("Warning: high bias detected");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_are_exclusive() {
        assert!(Args::try_parse_from(["factlens", "--list", "--show", "3"]).is_err());
        assert!(Args::try_parse_from(["factlens", "--list", "--topic", "Economy"]).is_ok());
    }

    #[test]
    fn test_date_from_is_validated() {
        assert!(Args::try_parse_from(["factlens", "--list", "--date-from", "yesterday"]).is_err());
        let args =
            Args::try_parse_from(["factlens", "--list", "--date-from", "2025-04-01T00:00:00Z"])
                .unwrap();
        assert_eq!(
            args.filters().date_from.map(|d| d.to_rfc3339()),
            Some("2025-04-01T00:00:00+00:00".to_string())
        );
    }
}
