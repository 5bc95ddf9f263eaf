//! Wikidata SPARQL client.

use serde::Deserialize;
use ureq::Agent;

use super::{EntityInfo, EntityLookup, LookupError};

pub const DEFAULT_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Label languages in order of preference.
pub const LABEL_LANGUAGES: &str = "nl,en,de";

const QUERY_TEMPLATE: &str = r#"
SELECT DISTINCT ?uri ?uriLabel ?uriDescription WHERE {
    ?uri wdt:P31|wdt:P279 [] .

    VALUES ?uri { <ENTITY_URI> }

    SERVICE wikibase:label { bd:serviceParam wikibase:language "LANGUAGES". }
}
"#;

/// Looks up entity labels and descriptions on a SPARQL endpoint.
pub struct WikidataClient {
    agent: Agent,
    endpoint: String,
    user_agent: String,
}

impl WikidataClient {
    pub fn new(agent: Agent, endpoint: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            agent,
            endpoint: endpoint.into(),
            user_agent: user_agent.into(),
        }
    }
}

impl EntityLookup for WikidataClient {
    fn lookup(&self, uri: &str) -> Result<EntityInfo, LookupError> {
        log::debug!("querying {} for {uri}", self.endpoint);

        let mut url = url::Url::parse(&self.endpoint).map_err(|source| LookupError::Http {
            uri: uri.to_string(),
            message: format!("invalid endpoint '{}': {source}", self.endpoint),
        })?;
        url.query_pairs_mut().append_pair("query", &label_query(uri));

        let mut response = self
            .agent
            .get(url.as_str())
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "application/sparql-results+json")
            .call()
            .map_err(|source| LookupError::Http {
                uri: uri.to_string(),
                message: source.to_string(),
            })?;

        let results: SparqlResults =
            response
                .body_mut()
                .read_json()
                .map_err(|source| LookupError::Decode {
                    uri: uri.to_string(),
                    message: source.to_string(),
                })?;

        entity_from_results(uri, results)
    }
}

/// SPARQL query asking for the label and description of `uri`.
pub fn label_query(uri: &str) -> String {
    QUERY_TEMPLATE
        .replace("ENTITY_URI", uri)
        .replace("LANGUAGES", LABEL_LANGUAGES)
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    results: SparqlBindings,
}

#[derive(Debug, Deserialize)]
struct SparqlBindings {
    bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
struct Binding {
    #[serde(rename = "uriLabel")]
    label: Option<BoundValue>,

    #[serde(rename = "uriDescription")]
    description: Option<BoundValue>,
}

#[derive(Debug, Deserialize)]
struct BoundValue {
    value: String,
}

fn entity_from_results(uri: &str, results: SparqlResults) -> Result<EntityInfo, LookupError> {
    let first = results
        .results
        .bindings
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::NoResults {
            uri: uri.to_string(),
        })?;

    let label = first.label.ok_or_else(|| LookupError::Decode {
        uri: uri.to_string(),
        message: "first result has no uriLabel".to_string(),
    })?;

    Ok(EntityInfo::new(
        label.value,
        first.description.map(|description| description.value),
    ))
}

/// Parse a SPARQL JSON results document.
pub fn entity_from_json(uri: &str, json: &str) -> Result<EntityInfo, LookupError> {
    let results: SparqlResults =
        serde_json::from_str(json).map_err(|source| LookupError::Decode {
            uri: uri.to_string(),
            message: source.to_string(),
        })?;
    entity_from_results(uri, results)
}
