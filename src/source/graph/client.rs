use crate::data::{AdjacencyMap, RawMeasurement};
use crate::error::AnalyticsError;
use crate::source::graph::types::{
    cell_string, measurement_from_row, CountryInfo, MetricInfo, NamedNode, StatementRequest,
    TxResponse, TxResult,
};
use crate::source::{MeasurementSource, Snapshot};
use crate::utils::config::SourceConfig;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const MEASUREMENT_QUERY: &str = "\
MATCH (c:Country)-[m:MEASURED]->(k:Metric) \
OPTIONAL MATCH (c)-[:IN_REGION]->(r:Region) \
OPTIONAL MATCH (c)-[:IN_INCOME_GROUP]->(i:IncomeGroup) \
RETURN c.code AS country_code, c.name AS country_name, r.name AS region, \
       i.name AS income_group, k.code AS metric_code, k.name AS metric_name, \
       k.multiplier AS multiplier, m.year AS year, m.value AS value";

const ADJACENCY_QUERY: &str = "\
MATCH (c:Country)-[:NEIGHBOR]->(n:Country) \
RETURN c.code AS country_code, n.code AS neighbor_code";

/// Client for the graph database's HTTP transaction endpoint.
///
/// This is the whole storage contract: send Cypher, get rows back, map
/// them into typed measurements at this boundary so nothing downstream
/// ever touches an untyped record.
pub struct GraphClient {
    client: Client,
    endpoint: Url,
    user: String,
    password: String,
}

impl GraphClient {
    pub fn new(config: &SourceConfig, password: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("building HTTP client")?;

        let mut base = config.uri.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)
            .and_then(|u| u.join(&format!("db/{}/tx/commit", config.database)))
            .with_context(|| format!("invalid graph endpoint {}", config.uri))?;

        Ok(Self {
            client,
            endpoint,
            user: config.user.clone(),
            password,
        })
    }

    /// Run one statement and commit. Statement-level failures come back
    /// inside a 200 response, so both layers get checked here.
    async fn commit(&self, statement: &str) -> Result<TxResult> {
        debug!(%statement, "running graph statement");

        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth(&self.user, Some(&self.password))
            .json(&StatementRequest::single(statement))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("graph request failed: {} - {}", status, error_text));
        }

        let body = response.json::<TxResponse>().await?;
        if let Some(err) = body.errors.first() {
            return Err(anyhow!("graph statement failed: {} - {}", err.code, err.message));
        }

        body.results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("graph response carried no result set"))
    }

    /// Fetch every measurement row, enriched with region and income-group
    /// membership where present.
    pub async fn fetch_measurements(&self) -> Result<Vec<RawMeasurement>> {
        let result = self.commit(MEASUREMENT_QUERY).await?;

        let rows: Vec<RawMeasurement> = result
            .data
            .iter()
            .filter_map(|r| measurement_from_row(&r.row))
            .collect();

        info!(rows = rows.len(), "fetched measurement rows");
        Ok(rows)
    }

    /// Fetch the country adjacency relation.
    pub async fn fetch_adjacency(&self) -> Result<AdjacencyMap> {
        let result = self.commit(ADJACENCY_QUERY).await?;

        let mut map = AdjacencyMap::new();
        for row in &result.data {
            if let (Some(from), Some(to)) = (cell_string(&row.row, 0), cell_string(&row.row, 1)) {
                map.add_edge(&from, &to);
            }
        }

        info!(edges = map.edge_count(), "fetched adjacency edges");
        Ok(map)
    }

    pub async fn list_countries(&self) -> Result<Vec<CountryInfo>> {
        let result = self
            .commit(
                "MATCH (c:Country) RETURN c.code AS code, c.code2 AS code2, \
                 c.name AS name, c.currency AS currency ORDER BY c.code",
            )
            .await?;

        Ok(result
            .data
            .iter()
            .filter_map(|r| {
                Some(CountryInfo {
                    code: cell_string(&r.row, 0)?,
                    code2: cell_string(&r.row, 1),
                    name: cell_string(&r.row, 2),
                    currency: cell_string(&r.row, 3),
                })
            })
            .collect())
    }

    pub async fn list_metrics(&self) -> Result<Vec<MetricInfo>> {
        let result = self
            .commit(
                "MATCH (m:Metric) RETURN m.code AS code, m.name AS name, \
                 m.periodicity AS periodicity, m.definition AS definition ORDER BY m.code",
            )
            .await?;

        Ok(result
            .data
            .iter()
            .filter_map(|r| {
                Some(MetricInfo {
                    code: cell_string(&r.row, 0)?,
                    name: cell_string(&r.row, 1),
                    periodicity: cell_string(&r.row, 2),
                    definition: cell_string(&r.row, 3),
                })
            })
            .collect())
    }

    pub async fn list_regions(&self) -> Result<Vec<NamedNode>> {
        self.list_named("MATCH (r:Region) RETURN r.id AS id, r.name AS name ORDER BY r.name")
            .await
    }

    pub async fn list_income_groups(&self) -> Result<Vec<NamedNode>> {
        self.list_named(
            "MATCH (i:IncomeGroup) RETURN i.id AS id, i.name AS name ORDER BY i.name",
        )
        .await
    }

    async fn list_named(&self, statement: &str) -> Result<Vec<NamedNode>> {
        let result = self.commit(statement).await?;
        Ok(result
            .data
            .iter()
            .map(|r| NamedNode {
                id: cell_string(&r.row, 0),
                name: cell_string(&r.row, 1),
            })
            .collect())
    }

    /// Cheap connectivity probe, useful at startup before real work.
    pub async fn test_connectivity(&self) -> Result<()> {
        self.commit("RETURN 1").await.map(|_| ())
    }
}

impl MeasurementSource for GraphClient {
    async fn snapshot(&self) -> Result<Snapshot, AnalyticsError> {
        let rows = self
            .fetch_measurements()
            .await
            .map_err(AnalyticsError::Source)?;
        let adjacency = self
            .fetch_adjacency()
            .await
            .map_err(AnalyticsError::Source)?;

        Ok(Snapshot { rows, adjacency })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(uri: &str) -> SourceConfig {
        SourceConfig {
            uri: uri.to_string(),
            database: "neo4j".to_string(),
            user: "neo4j".to_string(),
        }
    }

    fn client_for(server: &mockito::ServerGuard) -> GraphClient {
        GraphClient::new(&config(&server.url()), "secret".to_string()).unwrap()
    }

    #[test]
    fn test_endpoint_construction() {
        let client = GraphClient::new(&config("http://localhost:7474"), "pw".to_string()).unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "http://localhost:7474/db/neo4j/tx/commit"
        );
    }

    #[test]
    fn test_invalid_uri_is_rejected() {
        assert!(GraphClient::new(&config("not a uri"), "pw".to_string()).is_err());
    }

    #[tokio::test]
    async fn test_fetch_measurements_maps_rows() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{
            "results": [{
                "columns": ["country_code","country_name","region","income_group","metric_code","metric_name","multiplier","year","value"],
                "data": [
                    {"row": ["ARG","Argentina","Latin America & Caribbean",null,"M1","Metric One",1.0,"2010",3.5]},
                    {"row": [null,null,null,null,"M1",null,null,"2010",1.0]}
                ]
            }],
            "errors": []
        }"#;
        let mock = server
            .mock("POST", "/db/neo4j/tx/commit")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let rows = client_for(&server).fetch_measurements().await.unwrap();
        mock.assert_async().await;

        // The row without a country code is unmappable and skipped.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country_code, "ARG");
        assert_eq!(rows[0].coerce().unwrap().year, 2010);
    }

    #[tokio::test]
    async fn test_fetch_adjacency_builds_map() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{
            "results": [{
                "columns": ["country_code","neighbor_code"],
                "data": [
                    {"row": ["FRA","DEU"]},
                    {"row": ["DEU","FRA"]}
                ]
            }],
            "errors": []
        }"#;
        server
            .mock("POST", "/db/neo4j/tx/commit")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let map = client_for(&server).fetch_adjacency().await.unwrap();
        assert_eq!(map.neighbors("FRA"), &["DEU"]);
        assert_eq!(map.edge_count(), 2);
    }

    #[tokio::test]
    async fn test_statement_error_in_200_body() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{
            "results": [],
            "errors": [{"code": "Neo.ClientError.Statement.SyntaxError", "message": "oops"}]
        }"#;
        server
            .mock("POST", "/db/neo4j/tx/commit")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let err = client_for(&server).fetch_measurements().await.unwrap_err();
        assert!(err.to_string().contains("SyntaxError"));
    }

    #[tokio::test]
    async fn test_http_failure_propagates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/db/neo4j/tx/commit")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let err = client_for(&server).test_connectivity().await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_snapshot_combines_both_fetches() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{
            "results": [{"columns": [], "data": []}],
            "errors": []
        }"#;
        let mock = server
            .mock("POST", "/db/neo4j/tx/commit")
            .with_status(200)
            .with_body(body)
            .expect(2)
            .create_async()
            .await;

        let snapshot = client_for(&server).snapshot().await.unwrap();
        mock.assert_async().await;

        assert!(snapshot.rows.is_empty());
        assert!(snapshot.adjacency.is_empty());
    }
}
