//! Stanford CoreNLP server client.
//!
//! Sends one request per input text to `POST /?properties=...` and reads the
//! JSON output format: `sentences[].parse` for the constituency tree and
//! `sentences[].basicDependencies` for the dependency graph.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::annotator::Annotator;
use super::config::PipelineConfig;
use super::tree::Tree;
use super::types::{
    AnnotatedSentence, Annotation, DependencyEdge, DependencyGraph, IndexedWord, PipelineError,
};

/// Relation label CoreNLP uses for the edge from the virtual root.
const ROOT_RELATION: &str = "ROOT";

/// CoreNLP annotation client.
pub struct CoreNlpClient {
    config: PipelineConfig,
    client: Client,
}

/// CoreNLP JSON document.
#[derive(Debug, Deserialize)]
struct CoreNlpDocument {
    #[serde(default)]
    sentences: Vec<CoreNlpSentence>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoreNlpSentence {
    #[serde(default)]
    parse: Option<String>,
    #[serde(default)]
    basic_dependencies: Option<Vec<CoreNlpDependency>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoreNlpDependency {
    dep: String,
    governor: usize,
    governor_gloss: String,
    dependent: usize,
    dependent_gloss: String,
}

impl CoreNlpClient {
    /// Create a new client with the given configuration.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get the config.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    async fn call_server(&self, text: &str) -> Result<CoreNlpDocument, PipelineError> {
        let properties = self.config.properties().to_string();
        let url = format!("{}/", self.config.base_url());

        let resp = self
            .client
            .post(&url)
            .query(&[("properties", properties.as_str())])
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(text.to_string())
            .send()
            .await
            .map_err(|e| PipelineError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Api(format!("HTTP {}: {}", status, body.trim())));
        }

        resp.json()
            .await
            .map_err(|e| PipelineError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Annotator for CoreNlpClient {
    fn display_name(&self) -> &str {
        "CoreNLP"
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/ready", self.config.base_url());
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("CoreNLP readiness check failed: {}", e);
                false
            }
        }
    }

    fn availability_hint(&self) -> String {
        format!(
            "no CoreNLP server answering at {} (start one with \
             `java -mx4g edu.stanford.nlp.pipeline.StanfordCoreNLPServer -port 9000` \
             or set CORENLP_ENDPOINT)",
            self.config.base_url()
        )
    }

    async fn annotate(&self, text: &str) -> Result<Annotation, PipelineError> {
        debug!("Annotating: {}", text);
        let document = self.call_server(text).await?;
        convert_document(document)
    }
}

fn convert_document(document: CoreNlpDocument) -> Result<Annotation, PipelineError> {
    let sentences = document
        .sentences
        .into_iter()
        .map(convert_sentence)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Annotation { sentences })
}

fn convert_sentence(sentence: CoreNlpSentence) -> Result<AnnotatedSentence, PipelineError> {
    let parse = sentence.parse.ok_or(PipelineError::MissingField("parse"))?;
    let tree = Tree::parse(&parse)?;

    let deps = sentence
        .basic_dependencies
        .ok_or(PipelineError::MissingField("basicDependencies"))?;

    let mut graph = DependencyGraph::default();
    for dep in deps {
        let dependent = IndexedWord::new(dep.dependent, dep.dependent_gloss);
        if dep.dep == ROOT_RELATION && dep.governor == 0 {
            if graph.root.is_none() {
                graph.root = Some(dependent);
            } else {
                warn!(
                    "Ignoring additional root {} ({}) in dependency graph",
                    dependent.word, dependent.index
                );
            }
            continue;
        }
        graph.edges.push(DependencyEdge {
            governor: IndexedWord::new(dep.governor, dep.governor_gloss),
            dependent,
            relation: dep.dep,
        });
    }

    Ok(AnnotatedSentence {
        tree,
        dependencies: graph,
    })
}
