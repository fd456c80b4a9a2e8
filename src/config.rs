// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::engine::segmenter::SegmenterOptions;
use crate::engine_core::constants::{config as env_keys, limits};
use crate::engine_core::errors::TranscriptError;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Result<Self, TranscriptError> {
        match s.trim().to_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(TranscriptError::ConfigurationError(format!(
                "Unknown log format '{}' (expected 'text' or 'json')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Upper bound on the accumulated transcript in the stream codec
    pub max_transcript_bytes: u64,
    pub strip_system_directives: bool,
    pub collapse_file_uploads: bool,
    pub suppress_inline_tool_json: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, TranscriptError> {
        let defaults = Self::default();
        Ok(Self {
            log_level: env::var(env_keys::ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_format: match env::var(env_keys::ENV_LOG_FORMAT) {
                Ok(v) => LogFormat::parse(&v)?,
                Err(_) => defaults.log_format,
            },
            max_transcript_bytes: match env::var(env_keys::ENV_MAX_TRANSCRIPT_BYTES) {
                Ok(v) => v.trim().parse::<u64>().map_err(|e| {
                    TranscriptError::ConfigurationError(format!(
                        "{} must be a byte count: {}",
                        env_keys::ENV_MAX_TRANSCRIPT_BYTES,
                        e
                    ))
                })?,
                Err(_) => defaults.max_transcript_bytes,
            },
            strip_system_directives: env_flag(
                env_keys::ENV_STRIP_SYSTEM,
                defaults.strip_system_directives,
            )?,
            collapse_file_uploads: env_flag(
                env_keys::ENV_COLLAPSE_UPLOADS,
                defaults.collapse_file_uploads,
            )?,
            suppress_inline_tool_json: env_flag(
                env_keys::ENV_SUPPRESS_INLINE_JSON,
                defaults.suppress_inline_tool_json,
            )?,
        })
    }

    pub fn segmenter_options(&self) -> SegmenterOptions {
        SegmenterOptions {
            strip_system_directives: self.strip_system_directives,
            collapse_file_uploads: self.collapse_file_uploads,
            suppress_inline_tool_json: self.suppress_inline_tool_json,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            max_transcript_bytes: limits::MAX_TRANSCRIPT_BYTES,
            strip_system_directives: true,
            collapse_file_uploads: true,
            suppress_inline_tool_json: true,
        }
    }
}

fn env_flag(key: &str, default: bool) -> Result<bool, TranscriptError> {
    flag_value(key, env::var(key).ok().as_deref(), default)
}

/// Unset means `default`; a set value must be a recognised boolean.
fn flag_value(key: &str, raw: Option<&str>, default: bool) -> Result<bool, TranscriptError> {
    match raw {
        None => Ok(default),
        Some(v) => parse_flag(v).ok_or_else(|| {
            TranscriptError::ConfigurationError(format!(
                "{} must be a boolean (true/false, 1/0, yes/no, on/off), got '{}'",
                key, v
            ))
        }),
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
