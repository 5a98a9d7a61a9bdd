//! Configuration types for Symptomix.
//!
//! `AppConfig` represents the top-level `config.toml` controlling the
//! server address, generation sampling parameters, and retrieval fan-out.
//! All fields have defaults matching the reference deployment. API keys are
//! never part of this file; they come from the environment.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Symptomix service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// HTTP server bind address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Generation provider model and sampling constants.
///
/// These are deliberately configuration constants, not per-call inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
}

fn default_model() -> String {
    "meta-llama/llama-4-maverick-17b-128e-instruct".to_string()
}

fn default_temperature() -> f64 {
    0.4
}

fn default_max_tokens() -> u32 {
    512
}

fn default_top_p() -> f64 {
    1.0
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
        }
    }
}

/// Similarity-index name, fan-out, and serverless placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_index_name")]
    pub index_name: String,
    /// Number of passages fetched per turn.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_cloud")]
    pub cloud: String,
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_index_name() -> String {
    "medicalbot".to_string()
}

fn default_top_k() -> usize {
    3
}

fn default_cloud() -> String {
    "aws".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            index_name: default_index_name(),
            top_k: default_top_k(),
            cloud: default_cloud(),
            region: default_region(),
        }
    }
}
