//! Funding status lookups against the deposit indexing service.

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Deserializer;
use serde_json::json;
use serde_json::Value;

use crate::error::DashboardError;

const DEPOSIT_QUERY: &str = r#"
    query getDeposit($nftID: Int!, $user: String!) {
        deposit(nftID: $nftID, user: $user) {
            active
            fundingID
        }
    }
"#;

/// Funding state of one deposit as recorded by the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FundingStatus {
    pub active: bool,
    #[serde(rename = "fundingID", deserialize_with = "number_or_string")]
    pub funding_id: u64,
}

/// A service that can report the funding status of a deposit.
#[async_trait(?Send)]
pub trait DepositIndexer {
    async fn funding_status(
        &self,
        nft_id: u64,
        user: &Address,
    ) -> Result<FundingStatus, DashboardError>;
}

/// Queries a GraphQL subgraph over HTTP.
pub struct GraphIndexer {
    url: String,
    client: reqwest::Client,
}

impl GraphIndexer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait(?Send)]
impl DepositIndexer for GraphIndexer {
    async fn funding_status(
        &self,
        nft_id: u64,
        user: &Address,
    ) -> Result<FundingStatus, DashboardError> {
        let body = query_body(nft_id, user);
        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        parse_funding_response(resp)
    }
}

fn query_body(nft_id: u64, user: &Address) -> Value {
    json!({
        "query": DEPOSIT_QUERY,
        // the subgraph stores addresses in lowercase
        "variables": { "nftID": nft_id, "user": format!("{:#x}", user) },
    })
}

#[derive(Deserialize)]
struct GraphResponse {
    #[serde(default)]
    data: Option<DepositData>,
    #[serde(default)]
    errors: Vec<GraphError>,
}

#[derive(Deserialize)]
struct DepositData {
    deposit: Option<FundingStatus>,
}

#[derive(Deserialize)]
struct GraphError {
    message: String,
}

/// Extracts the deposit from a raw GraphQL response body.
pub fn parse_funding_response(body: Value) -> Result<FundingStatus, DashboardError> {
    let resp: GraphResponse = serde_json::from_value(body)?;

    if !resp.errors.is_empty() {
        let messages: Vec<_> = resp.errors.into_iter().map(|e| e.message).collect();
        return Err(DashboardError::Indexer(messages.join("; ")));
    }

    resp.data
        .and_then(|d| d.deposit)
        .ok_or_else(|| DashboardError::Indexer("no matching deposit".to_string()))
}

/// Subgraphs encode big integers as decimal strings; accept plain numbers too.
fn number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Answers every query with the same status.
    pub(crate) struct StubIndexer(pub Result<FundingStatus, DashboardError>);

    #[async_trait(?Send)]
    impl DepositIndexer for StubIndexer {
        async fn funding_status(
            &self,
            _nft_id: u64,
            _user: &Address,
        ) -> Result<FundingStatus, DashboardError> {
            self.0.clone()
        }
    }

    #[test]
    fn query_uses_lowercase_user() {
        let body = query_body(42, &Address::repeat_byte(0xAB));
        assert_eq!(body["variables"]["nftID"], 42);
        assert_eq!(body["variables"]["user"], format!("0x{}", "ab".repeat(20)));
    }

    #[test]
    fn accepts_numeric_and_string_funding_ids() {
        let numeric = parse_funding_response(json!({
            "data": { "deposit": { "active": true, "fundingID": 7 } }
        }))
        .unwrap();
        let text = parse_funding_response(json!({
            "data": { "deposit": { "active": true, "fundingID": "7" } }
        }))
        .unwrap();

        assert_eq!(numeric, text);
        assert_eq!(
            numeric,
            FundingStatus {
                active: true,
                funding_id: 7
            }
        );
    }

    #[test]
    fn graphql_errors_are_reported() {
        let err = parse_funding_response(json!({
            "errors": [ { "message": "bad query" }, { "message": "timeout" } ]
        }))
        .unwrap_err();
        assert_eq!(err, DashboardError::Indexer("bad query; timeout".to_string()));
    }

    #[test]
    fn missing_deposit_is_an_indexer_error() {
        let err = parse_funding_response(json!({ "data": { "deposit": null } })).unwrap_err();
        assert!(err.is_indexer());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = parse_funding_response(json!({
            "data": { "deposit": { "active": "yes", "fundingID": 1 } }
        }))
        .unwrap_err();
        assert!(err.is_decode());
    }
}
