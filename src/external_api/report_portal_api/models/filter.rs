use std::collections::BTreeMap;

use super::null_as_default;

/// Saved filter returned by `GET /api/v1/{project}/filter`
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Filter {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub filter_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: String,
    #[serde(deserialize_with = "null_as_default")]
    pub entities: Vec<FilterEntity>,
    #[serde(rename = "selection_parameters", skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionParams>,
}

/// One `field condition value` triple. The condition token is passed to the
/// server verbatim.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct FilterEntity {
    #[serde(rename = "filtering_field", deserialize_with = "null_as_default")]
    pub field: String,
    #[serde(deserialize_with = "null_as_default")]
    pub condition: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SelectionParams {
    #[serde(deserialize_with = "null_as_default")]
    pub page_number: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub orders: Vec<FilterOrder>,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct FilterOrder {
    #[serde(deserialize_with = "null_as_default")]
    pub sorting_column: String,
    #[serde(rename = "is_asc", deserialize_with = "null_as_default")]
    pub ascending: bool,
}

impl FilterOrder {
    pub fn direction(&self) -> &'static str {
        if self.ascending {
            "ASC"
        } else {
            "DESC"
        }
    }
}

impl FilterEntity {
    pub fn new(field: &str, condition: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            condition: condition.to_string(),
            value: value.to_string(),
        }
    }

    pub fn query_key(&self) -> String {
        format!("filter.{}.{}", self.condition, self.field)
    }
}

impl Filter {
    /// Query params for `GET /launch` equivalent to this saved filter.
    ///
    /// Entities sharing a key overwrite each other in order, and only the last
    /// order entry becomes `page.sort`.
    pub fn to_query_params(&self) -> BTreeMap<String, String> {
        let mut params: BTreeMap<String, String> = self
            .entities
            .iter()
            .map(|entity| (entity.query_key(), entity.value.clone()))
            .collect();

        if let Some(selection) = &self.selection {
            if selection.page_number != 0 {
                params.insert("page.page".to_string(), selection.page_number.to_string());
            }
            if let Some(order) = selection.orders.last() {
                params.insert(
                    "page.sort".to_string(),
                    format!("{},{}", order.sorting_column, order.direction()),
                );
            }
        }
        params
    }
}
