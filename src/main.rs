use anyhow::Result;
use console::style;
use log::{error, warn};
use media_sort_by_date::cli::Cli;
use media_sort_by_date::component::SortByDate;
use media_sort_by_date::component::sort_by_date::BatchSummary;
use media_sort_by_date::config::Config;
use media_sort_by_date::init::{LOG_FILE_NAME, init_logging};
use media_sort_by_date::tools::{ExifToolSession, MetadataExtractor, SystemCommandRunner};

fn main() -> Result<()> {
    let cli = Cli::parse_normalized();
    init_logging(cli.debug)?;

    let summary = run(cli).inspect_err(|e| error!("{e:#}"))?;
    print_summary(&summary);

    Ok(())
}

fn run(cli: Cli) -> Result<BatchSummary> {
    let config = Config::from_cli(cli)?;

    let session = ExifToolSession::start()?;
    let extractor = MetadataExtractor::new(session, config.debug);

    let summary = SortByDate::new(&config, &extractor, &SystemCommandRunner).run();

    if let Err(e) = extractor.into_inner().close() {
        warn!("Failed to close exiftool: {e:#}");
    }

    Ok(summary)
}

fn print_summary(summary: &BatchSummary) {
    println!("{}", style("=== 整理結果 ===").cyan().bold());
    println!("  檔案總數: {}", summary.total);
    println!("  成功: {}", style(summary.succeeded).green());
    if summary.failed > 0 {
        println!("  失敗: {}", style(summary.failed).red());
    }
    println!("  耗時: {:.2?}", summary.elapsed);
    println!("{}", style(format!("詳細記錄請見 {LOG_FILE_NAME}")).dim());
}
