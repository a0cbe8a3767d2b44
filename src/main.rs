use clap::Parser;
use speed_report::client::{PERFORMANCE_CATEGORY, PageSpeedClient};
use speed_report::extract::Extractor;
use speed_report::results::{AnalysisReport, StrategyResult};
use speed_report::validate::AnalysisRequest;
use std::process::ExitCode;

mod args;
use args::{Args, Command, ReportMode, load_config};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let result = match args.command {
        Command::Serve {
            listen,
            config,
            endpoint,
        } => serve(listen, config, endpoint).await,
        Command::Analyze {
            url,
            mode,
            json,
            config,
        } => analyze(url, mode, json, config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(
    listen: Option<String>,
    config: Option<std::path::PathBuf>,
    endpoint: Option<String>,
) -> speed_report::Result<()> {
    let mut config = load_config(config.as_ref())?;
    if let Some(listen) = listen {
        config.listen_addr = listen;
    }
    if let Some(endpoint) = endpoint {
        config.api_endpoint = endpoint;
    }

    ::log::info!("Using PageSpeed endpoint {}", config.api_endpoint);
    speed_report::server::run_server(config).await
}

async fn analyze(
    url: String,
    mode: ReportMode,
    json: bool,
    config: Option<std::path::PathBuf>,
) -> speed_report::Result<()> {
    let config = load_config(config.as_ref())?;

    let request = AnalysisRequest {
        url: Some(url),
        email: None,
    };
    let url = request.validated_url()?;

    let mut client = PageSpeedClient::new(config.api_endpoint.clone(), config.require_api_key()?);
    if mode == ReportMode::Full {
        client = client.with_category(PERFORMANCE_CATEGORY);
    }

    let extractor = Extractor::new(mode.extractor_options());
    let report = client.analyze(url, &extractor).await?;

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| speed_report::Error::Unexpected(e.to_string()))?;
        println!("{}", out);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    print_strategy("Mobile", &report.mobile);
    print_strategy("Desktop", &report.desktop);

    let top = report.top_recommendations();
    if top.is_empty() {
        println!("No recommendations.");
        return;
    }

    println!("Top recommendations:");
    for (i, item) in top.iter().enumerate() {
        match &item.savings {
            Some(savings) => println!("  {}. {} (~{})", i + 1, item.title, savings),
            None => println!("  {}. {}", i + 1, item.title),
        }
    }
}

fn print_strategy(label: &str, result: &StrategyResult) {
    println!("{}: score {}", label, result.score);
    println!(
        "  FCP {}  LCP {}  TBT {}  CLS {}",
        result.metrics.fcp, result.metrics.lcp, result.metrics.tbt, result.metrics.cls
    );
}
