use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Paging ──

/// One display slot of a pagination control: a page button or an ellipsis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageItem {
    pub id: usize,
    pub page_number: Option<u32>,
    pub is_current_page: bool,
    pub is_range: bool,
}

impl PageItem {
    pub fn page(id: usize, page_number: u32, is_current_page: bool) -> Self {
        Self {
            id,
            page_number: Some(page_number),
            is_current_page,
            is_range: false,
        }
    }

    pub fn ellipsis(id: usize) -> Self {
        Self {
            id,
            page_number: None,
            is_current_page: false,
            is_range: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingResponse {
    pub current_page: u32,
    pub total_pages: u32,
    pub items: Vec<PageItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

// ── Facets ──

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FacetType {
    #[default]
    DistinctValue,
    Category,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetValue {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub product_count: u64,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Facet {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub facet_type: FacetType,
    #[serde(default)]
    pub values: Vec<FacetValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryNode {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub product_count: u64,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

/// A facet with the values the shopper selected, as sent to product search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Refinement {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetMergeRequest {
    #[serde(default)]
    pub previous: Vec<Facet>,
    pub fresh: Vec<Facet>,
    #[serde(default)]
    pub selected: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub cached_categories: Option<CategoryNode>,
    #[serde(default)]
    pub fresh_categories: Option<CategoryNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetMergeResponse {
    pub facets: Vec<Facet>,
    pub refinements: Vec<Refinement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryNode>,
}

// ── Checkout ──

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Future,
    Edit,
    Summary,
    Disabled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutLayout {
    #[default]
    Accordion,
    OnePage,
}
