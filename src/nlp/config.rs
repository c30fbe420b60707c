//! CoreNLP pipeline configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Configuration for the CoreNLP pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// CoreNLP server endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Processing stages, in order
    #[serde(default = "default_annotators")]
    pub annotators: Vec<String>,
    /// Sentences longer than this many tokens are not parsed
    #[serde(default = "default_parse_maxlen")]
    pub parse_maxlen: u32,
    /// POS tagging confidence threshold
    #[serde(default = "default_pos_confidence")]
    pub pos_confidence: f64,
    /// Worker threads used by the server for this pipeline
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost:9000".to_string()
}

fn default_annotators() -> Vec<String> {
    ["tokenize", "ssplit", "pos", "lemma", "ner", "parse", "depparse"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_parse_maxlen() -> u32 {
    120
}

fn default_pos_confidence() -> f64 {
    1.0
}

fn default_threads() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            annotators: default_annotators(),
            parse_maxlen: default_parse_maxlen(),
            pos_confidence: default_pos_confidence(),
            threads: default_threads(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl PipelineConfig {
    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `CORENLP_ENDPOINT`: server URL
    /// - `CORENLP_THREADS`: worker thread count
    /// - `CORENLP_TIMEOUT_SECS`: request timeout
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("CORENLP_ENDPOINT") {
            if !val.trim().is_empty() {
                self.endpoint = val.trim().to_string();
            }
        }
        if let Some(threads) = env_parse::<usize>("CORENLP_THREADS") {
            self.threads = threads;
        }
        if let Some(timeout) = env_parse::<u64>("CORENLP_TIMEOUT_SECS") {
            self.timeout_secs = timeout;
        }
        self
    }

    /// Server-side properties for this pipeline, as the JSON object CoreNLP
    /// expects in its `properties` query parameter.
    pub fn properties(&self) -> Value {
        let mut props = Map::new();
        props.insert(
            "annotators".to_string(),
            Value::String(self.annotators.join(",")),
        );
        props.insert(
            "parse.maxlen".to_string(),
            Value::String(self.parse_maxlen.to_string()),
        );
        props.insert(
            "pos.confidence".to_string(),
            Value::String(format_float(self.pos_confidence)),
        );
        props.insert(
            "threads".to_string(),
            Value::String(self.threads.to_string()),
        );
        props.insert(
            "outputFormat".to_string(),
            Value::String("json".to_string()),
        );
        Value::Object(props)
    }

    /// Endpoint without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let val = std::env::var(key).ok()?;
    match val.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Ignoring unparseable {}={:?}", key, val);
            None
        }
    }
}

/// Render floats the way Java property files write them ("1.0", not "1").
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.endpoint, "http://localhost:9000");
        assert_eq!(config.annotators.len(), 7);
        assert_eq!(config.annotators.last().map(String::as_str), Some("depparse"));
        assert_eq!(config.parse_maxlen, 120);
        assert_eq!(config.threads, 4);
    }

    #[test]
    fn test_properties() {
        let props = PipelineConfig::default().properties();
        assert_eq!(
            props["annotators"],
            "tokenize,ssplit,pos,lemma,ner,parse,depparse"
        );
        assert_eq!(props["parse.maxlen"], "120");
        assert_eq!(props["pos.confidence"], "1.0");
        assert_eq!(props["threads"], "4");
        assert_eq!(props["outputFormat"], "json");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: PipelineConfig = toml::from_str("threads = 2\npos_confidence = 0.75").unwrap();
        assert_eq!(config.threads, 2);
        assert_eq!(config.endpoint, "http://localhost:9000");
        assert_eq!(config.properties()["pos.confidence"], "0.75");
    }

    #[test]
    fn test_base_url_trims_slash() {
        let config = PipelineConfig {
            endpoint: "http://corenlp:9000/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://corenlp:9000");
    }
}
