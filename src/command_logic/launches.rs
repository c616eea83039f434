use std::collections::BTreeMap;

use crate::cli_app::LaunchesArgs;
use crate::constants::Message;
use crate::external_api::report_portal_api::models::launch::Launch;
use crate::external_api::report_portal_api::models::page::Page;
use crate::external_api::report_portal_api::ReportPortalApi;
use crate::external_api::{ApiError, QueryParams};

/// Which launch query the arguments ask for
#[derive(Debug, PartialEq, Eq)]
pub enum LaunchQuery {
    All,
    FilterName(String),
    Filter(QueryParams),
}

impl From<&LaunchesArgs> for LaunchQuery {
    fn from(args: &LaunchesArgs) -> Self {
        if let Some(name) = &args.filter_name {
            return LaunchQuery::FilterName(name.clone());
        }
        if let Some(query) = &args.query {
            return LaunchQuery::Filter(QueryParams::Raw(query.clone()));
        }
        if !args.params.is_empty() {
            let params: BTreeMap<String, String> = args.params.iter().cloned().collect();
            return LaunchQuery::Filter(QueryParams::Pairs(params));
        }
        LaunchQuery::All
    }
}

/// Fetch launches and render them for stdout
pub async fn list_launches(
    args: &LaunchesArgs,
    report_portal_api: &ReportPortalApi,
    json: bool,
) -> Result<String, ApiError> {
    let page = match LaunchQuery::from(args) {
        LaunchQuery::All => report_portal_api.get_launches().await?,
        LaunchQuery::FilterName(name) => report_portal_api.get_launches_by_filter_name(&name).await?,
        LaunchQuery::Filter(query) => report_portal_api.get_launches_by_filter(query).await?,
    };
    render_page(&page, json)
}

fn render_page(page: &Page<Launch>, json: bool) -> Result<String, ApiError> {
    if json {
        return Ok(serde_json::to_string_pretty(page)?);
    }
    let mut lines: Vec<String> = page
        .content
        .iter()
        .map(|launch| Message::LaunchLine(launch).to_formatted_string())
        .collect();
    lines.push(
        Message::PageSummary {
            shown: page.content.len(),
            total: page.page.total_elements,
        }
        .to_formatted_string(),
    );
    Ok(lines.join("\n"))
}
