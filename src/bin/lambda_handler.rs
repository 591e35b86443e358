//! AWS Lambda handler for project summaries
//!
//! Accepts a project as JSON (the same shape as the `project` field of a
//! snapshot) and returns its financial summary, monthly revenue and burn rate.
//! Input problems are reported in the `error` field rather than failing the
//! invocation.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

use project_financials::reports::{self, BurnRateRow, CategoryRow, MonthlyRevenueRow};
use project_financials::{FinancialSummary, Project, TrackerError};

/// Input payload
#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub project: Project,

    /// Reject invalid inputs instead of summarizing them (default: true)
    #[serde(default = "default_validate")]
    pub validate: bool,
}

fn default_validate() -> bool {
    true
}

/// Output payload
#[derive(Debug, Default, Serialize)]
pub struct SummaryResponse {
    pub summary: FinancialSummary,
    pub monthly_revenue: Vec<MonthlyRevenueRow>,
    pub burn_rate: Vec<BurnRateRow>,
    pub categories: Vec<CategoryRow>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn error_response(error: TrackerError) -> SummaryResponse {
    SummaryResponse {
        error: Some(error.to_string()),
        ..Default::default()
    }
}

fn summarize_request(request: SummaryRequest) -> SummaryResponse {
    let start = std::time::Instant::now();

    let mut project = request.project;
    if let Err(e) = project.ensure_periods() {
        return error_response(e);
    }
    project.recompute();

    if request.validate {
        if let Err(e) = project.validate() {
            return error_response(e);
        }
    }

    SummaryResponse {
        summary: project.summary(),
        monthly_revenue: reports::monthly_revenue(&project),
        burn_rate: reports::burn_rate(&project),
        categories: reports::category_summary(&project),
        execution_time_ms: start.elapsed().as_millis() as u64,
        error: None,
    }
}

async fn handler(event: LambdaEvent<SummaryRequest>) -> Result<SummaryResponse, Error> {
    Ok(summarize_request(event.payload))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> SummaryRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_unusable_calendar_reported_in_error_field() {
        let response = summarize_request(request(
            r#"{"project": {"config": {"calendar": {"period_days": 100000000, "period_count": 2}}}}"#,
        ));

        let error = response.error.unwrap();
        assert!(error.contains("calendar"));
        assert!(response.monthly_revenue.is_empty());
    }

    #[test]
    fn test_empty_project_uses_calendar_periods() {
        let response = summarize_request(request(r#"{"project": {}}"#));

        assert!(response.error.is_none());
        assert_eq!(response.monthly_revenue.len(), 24);
        assert_eq!(response.burn_rate.len(), 24);
    }
}
