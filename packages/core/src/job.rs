//! One end-to-end report run.
//!
//! Resolves the chain head, pages backward until the target coverage is
//! reached (or the node runs dry), then writes the hourly CSV.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::AppError;
use crate::history::{page_backward, FeeHistoryProvider, HourlyAggregator, PagingOutcome};
use crate::report::{self, ReportSummary};
use crate::services::rpc::to_quantity;

#[derive(Debug, Clone)]
pub struct JobSummary {
    pub output_path: PathBuf,
    pub rows_written: usize,
    pub paging: PagingOutcome,
    pub summary: Option<ReportSummary>,
}

pub async fn run(
    config: &Config,
    provider: &(dyn FeeHistoryProvider + Send + Sync),
) -> Result<JobSummary, AppError> {
    let head = provider.latest_block_number().await?;
    tracing::info!(
        "Paging fee history from head block {} via {}",
        to_quantity(head),
        provider.provider_name()
    );

    let mut aggregator = HourlyAggregator::new();
    let paging = page_backward(provider, &config.paging(), head, &mut aggregator).await?;
    tracing::debug!(
        "Paging stopped after {} chunks: {}",
        paging.chunks_fetched,
        paging.stop_reason
    );

    let rows = report::build_rows(
        aggregator.buckets(),
        aggregator.latest_anchor(),
        config.target_hours,
    );
    report::write_csv(&config.output_path, &rows)?;
    tracing::info!("Wrote {} rows={}", config.output_path.display(), rows.len());

    let summary = report::summarize(&rows);
    if let Some(summary) = &summary {
        tracing::info!(
            "Cheapest hour {} ({:.4} gwei), most expensive {} ({:.4} gwei), mean {:.4} gwei over {} blocks",
            summary.cheapest.hour_utc,
            summary.cheapest.avg_gas_price_gwei,
            summary.most_expensive.hour_utc,
            summary.most_expensive.avg_gas_price_gwei,
            summary.mean_gas_price_gwei,
            summary.total_blocks,
        );
    }

    Ok(JobSummary {
        output_path: config.output_path.clone(),
        rows_written: rows.len(),
        paging,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::history::types::{FeeHistorySegment, FetchOutcome};
    use crate::history::StopReason;
    use crate::services::mock_rpc::MockRpcProvider;

    const GWEI: u128 = 1_000_000_000;

    fn config_writing_to(dir: &tempfile::TempDir) -> Config {
        Config {
            output_path: dir.path().join("report.csv"),
            chunk_delay_millis: 0,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn head_lookup_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockRpcProvider::new();

        let result = run(&config_writing_to(&dir), &provider).await;

        assert!(matches!(result, Err(AppError::Provider(_))));
        assert!(!dir.path().join("report.csv").exists());
    }

    #[tokio::test]
    async fn immediate_not_found_writes_empty_csv() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_writing_to(&dir);
        let provider = MockRpcProvider::new()
            .with_head(500)
            .with_chunk(FetchOutcome::NotFound);

        let summary = run(&config, &provider).await.unwrap();

        assert_eq!(summary.rows_written, 0);
        assert_eq!(summary.paging.stop_reason, StopReason::NotFound);
        assert!(summary.summary.is_none());
        assert_eq!(std::fs::read_to_string(&config.output_path).unwrap(), "");
    }

    #[tokio::test]
    async fn partial_data_still_produces_a_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_writing_to(&dir);
        let segment = FeeHistorySegment::try_new(
            100,
            vec![30 * GWEI, 32 * GWEI, 34 * GWEI],
            vec![Some(vec![2 * GWEI]), Some(vec![3 * GWEI])],
        )
        .unwrap();
        let provider = MockRpcProvider::new()
            .with_head(101)
            .with_chunk(FetchOutcome::Segment(segment))
            .with_chunk(FetchOutcome::Empty)
            .with_timestamp(100, 1_000)
            .with_timestamp(101, 1_010);

        let summary = run(&config, &provider).await.unwrap();

        assert_eq!(summary.paging.stop_reason, StopReason::EmptySegment);
        assert_eq!(summary.rows_written, 1);
        assert_eq!(
            std::fs::read_to_string(&config.output_path).unwrap(),
            "hour_epoch,hour_utc,avg_base_fee_gwei,avg_tip_gwei_p50,avg_gas_price_gwei,blocks\n\
             0,1970-01-01 00:00:00,31.0,2.5,33.5,2\n"
        );
    }
}
