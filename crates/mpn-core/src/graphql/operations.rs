//! Operation documents and their typed variables/results.

use mpn_types::{MetafieldSpec, ProductCandidate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::GraphqlRequest;

/// Products per scan page.
pub const PRODUCTS_PAGE_SIZE: usize = 50;

pub const PRODUCTS_WITH_MPN_QUERY: &str = r#"
query GetProductsWithMpn($first: Int!, $cursor: String) {
  products(first: $first, after: $cursor) {
    pageInfo {
      hasNextPage
      endCursor
    }
    edges {
      node {
        id
        title
        legacyResourceId
        sourceMpn: metafield(namespace: "shopify--facts", key: "mpn") {
          id
          value
        }
        targetMpn: metafield(namespace: "custom", key: "mpn") {
          id
          value
        }
      }
    }
  }
}
"#;

pub const SET_METAFIELDS_MUTATION: &str = r#"
mutation UpdateProductMetafield($metafields: [MetafieldsSetInput!]!) {
  metafieldsSet(metafields: $metafields) {
    metafields {
      id
      namespace
      key
      value
    }
    userErrors {
      field
      message
    }
  }
}
"#;

pub fn products_page_request(page_size: usize, cursor: Option<&str>) -> GraphqlRequest {
    GraphqlRequest::new(PRODUCTS_WITH_MPN_QUERY, json!({ "first": page_size, "cursor": cursor }))
}

pub fn set_metafields_request(inputs: &[MetafieldsSetInput]) -> GraphqlRequest {
    GraphqlRequest::new(SET_METAFIELDS_MUTATION, json!({ "metafields": inputs }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductsPage {
    pub products: ProductConnection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConnection {
    pub page_info: PageInfo,
    #[serde(default)]
    pub edges: Vec<ProductEdge>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductEdge {
    pub node: ProductNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub legacy_resource_id: Option<String>,
    #[serde(default)]
    pub source_mpn: Option<MetafieldValue>,
    #[serde(default)]
    pub target_mpn: Option<MetafieldValue>,
}

impl ProductNode {
    /// Products without a non-empty source value are not candidates.
    pub fn into_candidate(self) -> Option<ProductCandidate> {
        let source = self.source_mpn.and_then(|m| m.value).filter(|v| !v.is_empty())?;
        let target = self.target_mpn.and_then(|m| m.value);
        Some(ProductCandidate::new(self.id, self.title, source, target))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetafieldValue {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldsSetInput {
    pub owner_id: String,
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: String,
}

impl MetafieldsSetInput {
    /// Write `candidate`'s source value into the `target` metafield.
    pub fn copy_to(target: &MetafieldSpec, candidate: &ProductCandidate) -> Self {
        Self {
            owner_id: candidate.id.clone(),
            namespace: target.namespace.to_string(),
            key: target.key.to_string(),
            value_type: target.value_type.to_string(),
            value: candidate.source_value.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMetafieldsData {
    #[serde(default)]
    pub metafields_set: Option<SetMetafieldsPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMetafieldsPayload {
    #[serde(default)]
    pub metafields: Option<Vec<WrittenMetafield>>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WrittenMetafield {
    pub id: String,
    pub namespace: String,
    pub key: String,
    pub value: String,
}

/// Per-item validation failure reported by `metafieldsSet`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserError {
    /// Path into the mutation input, e.g. `["metafields", "3", "value"]`
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl UserError {
    /// Index into the submitted `metafields` array this error refers to.
    pub fn input_index(&self) -> Option<usize> {
        let field = self.field.as_ref()?;
        let mut segments = field.iter();
        if let Some(first) = segments.next() {
            if first != "metafields" {
                return first.parse().ok();
            }
        }
        segments.next()?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_page_request_variables() {
        let req = products_page_request(50, None);
        assert_eq!(req.variables["first"], 50);
        assert_eq!(req.variables["cursor"], Value::Null);

        let req = products_page_request(50, Some("abc"));
        assert_eq!(req.variables["cursor"], "abc");
    }

    #[test]
    fn test_set_input_wire_shape() {
        let candidate = ProductCandidate::new("gid://shopify/Product/7", "Tube", "TB-700", None);
        let input = MetafieldsSetInput::copy_to(&MetafieldSpec::TARGET_MPN, &candidate);
        let req = set_metafields_request(&[input]);
        assert_eq!(
            req.variables["metafields"][0],
            json!({
                "ownerId": "gid://shopify/Product/7",
                "namespace": "custom",
                "key": "mpn",
                "type": "single_line_text_field",
                "value": "TB-700"
            })
        );
    }

    #[test]
    fn test_node_without_source_is_skipped() {
        let node: ProductNode = serde_json::from_value(json!({
            "id": "gid://shopify/Product/1",
            "title": "No MPN",
            "sourceMpn": null,
            "targetMpn": null
        }))
        .unwrap();
        assert!(node.into_candidate().is_none());

        let node: ProductNode = serde_json::from_value(json!({
            "id": "gid://shopify/Product/2",
            "title": "Empty MPN",
            "sourceMpn": {"id": "gid://shopify/Metafield/9", "value": ""}
        }))
        .unwrap();
        assert!(node.into_candidate().is_none());
    }

    #[test]
    fn test_user_error_index() {
        let err = UserError {
            field: Some(vec!["metafields".into(), "3".into(), "value".into()]),
            message: "Value is invalid".into(),
        };
        assert_eq!(err.input_index(), Some(3));

        let err = UserError { field: None, message: "oops".into() };
        assert_eq!(err.input_index(), None);

        let err = UserError {
            field: Some(vec!["metafields".into(), "ownerId".into()]),
            message: "bad owner".into(),
        };
        assert_eq!(err.input_index(), None);
    }
}
