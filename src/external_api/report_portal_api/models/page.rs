use super::null_as_default;

/// Slice of a server-side result set.
///
/// `{"content": [...], "page": {"number", "size", "totalElements", "totalPages"}}`
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub content: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page: PageMetadata,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMetadata {
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.content.first()
    }
}
