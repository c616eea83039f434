use crate::constants::Message;
use crate::external_api::report_portal_api::ReportPortalApi;
use crate::external_api::ApiError;

/// Saved filters with the given name, one per line
pub async fn list_filters(
    name: &str,
    report_portal_api: &ReportPortalApi,
    json: bool,
) -> Result<String, ApiError> {
    let filters = report_portal_api.get_filters_by_name(name).await?;
    if json {
        return Ok(serde_json::to_string_pretty(&filters)?);
    }
    if filters.is_empty() {
        return Ok(Message::NoFiltersFound(name).to_formatted_string());
    }
    Ok(filters
        .content
        .iter()
        .map(|filter| {
            Message::FilterLine {
                name: &filter.name,
                owner: &filter.owner,
                conditions: filter.entities.len(),
            }
            .to_formatted_string()
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_list_filters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/demo_project/filter")
            .match_query(Matcher::UrlEncoded("filter.eq.name".into(), "failed-only".into()))
            .with_status(200)
            .with_body(
                r#"{"content": [{"name": "failed-only", "owner": "superadmin", "entities": [
                    {"filtering_field": "status", "condition": "eq", "value": "FAILED"},
                    {"filtering_field": "mode", "condition": "eq", "value": "DEFAULT"}
                ]}]}"#,
            )
            .create_async()
            .await;

        let output = list_filters("failed-only", &ReportPortalApi::mock(&server.url()), false)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(output, "failed-only (owner: superadmin, conditions: 2)");
    }

    #[tokio::test]
    async fn test_list_filters_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/demo_project/filter")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"content": []}"#)
            .create_async()
            .await;

        let output = list_filters("nope", &ReportPortalApi::mock(&server.url()), false)
            .await
            .unwrap();

        assert_eq!(output, "No filters named 'nope'");
    }

    #[tokio::test]
    async fn test_list_filters_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/demo_project/filter")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let result = list_filters("any", &ReportPortalApi::mock(&server.url()), true).await;

        assert!(matches!(result, Err(ApiError::Api(status, _)) if status.as_u16() == 403));
    }
}
