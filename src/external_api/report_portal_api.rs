pub mod models;

use std::collections::BTreeMap;

use super::{ApiError, BaseApiClient, QueryParams};
use models::filter::Filter;
use models::launch::Launch;
use models::page::Page;

const LAUNCH_ENDPOINT: &str = "/api/v1/{project}/launch";
const FILTER_ENDPOINT: &str = "/api/v1/{project}/filter";
const FILTER_NAME_PARAM: &str = "filter.eq.name";

/// Launch queries for one ReportPortal project
#[derive(Debug, Clone)]
pub struct ReportPortalApi {
    pub client: BaseApiClient,
}

impl ReportPortalApi {
    pub fn new(base_url: &str, project: &str, api_key: &str) -> Result<Self, ApiError> {
        Ok(Self { client: BaseApiClient::new(base_url, project, api_key)? })
    }

    #[cfg(test)]
    pub fn mock(base_url: &str) -> Self {
        Self::new(base_url, "demo_project", "9a1b6a35-4d0c-4d6c-a4a4-2b2b2b2b2b2b").unwrap()
    }

    /// Latest launches, server default paging
    pub async fn get_launches(&self) -> Result<Page<Launch>, ApiError> {
        self.client.get(LAUNCH_ENDPOINT, &[], None).await
    }

    /// Launches matching already built query params, no translation applied
    pub async fn get_launches_by_filter(
        &self,
        query: impl Into<QueryParams>,
    ) -> Result<Page<Launch>, ApiError> {
        let query = query.into();
        self.client.get(LAUNCH_ENDPOINT, &[], Some(&query)).await
    }

    /// Launches matching a filter saved on the server under `name`.
    ///
    /// When several filters share the name the first one in response order is used.
    pub async fn get_launches_by_filter_name(&self, name: &str) -> Result<Page<Launch>, ApiError> {
        let filters = self.get_filters_by_name(name).await?;
        let filter = filters
            .first()
            .ok_or_else(|| ApiError::FilterNotFound(name.to_string()))?;

        let params = filter.to_query_params();
        tracing::info!(filter = %filter.name, ?params, "resolved saved filter");
        self.get_launches_by_filter(params).await
    }

    pub async fn get_filters_by_name(&self, name: &str) -> Result<Page<Filter>, ApiError> {
        let query = QueryParams::Pairs(BTreeMap::from([(
            FILTER_NAME_PARAM.to_string(),
            name.to_string(),
        )]));
        self.client.get(FILTER_ENDPOINT, &[], Some(&query)).await
    }
}
