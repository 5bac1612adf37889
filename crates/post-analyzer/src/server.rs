//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the analyzer and the extraction backends over stdio so AI
//! assistants can analyze drafts or pull text out of local files.
//!
//! The server is a presentation layer: every `#[tool]` method delegates to
//! `post_analyzer_core` and only converts results into MCP content.

use camino::Utf8PathBuf;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use post_analyzer_core::config::Config;
use post_analyzer_core::extract::{self, ExtractMode, ExtractorSettings, InputFile};
use post_analyzer_core::{AnalysisReport, Session, SessionState, Thresholds, analysis};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `analyze_text` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeTextParams {
    /// The post text to analyze.
    pub text: String,
    /// Word count below which the post is flagged as short.
    pub min_words: Option<usize>,
    /// Average words per sentence above which sentences are flagged as long.
    pub max_sentence_words: Option<usize>,
}

/// Parameters for the `extract_file` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ExtractFileParams {
    /// Path to a PDF or image file on the server's filesystem.
    pub path: String,
    /// Extraction backend: "auto", "pdf", or "image". Defaults to auto.
    pub mode: Option<ExtractMode>,
    /// Skip analysis and return only the text.
    #[serde(default)]
    pub skip_analysis: bool,
}

#[derive(Serialize)]
struct ExtractFileOutput {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<AnalysisReport>,
}

/// MCP server exposing analysis and extraction to AI assistants.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    thresholds: Thresholds,
    settings: ExtractorSettings,
    default_mode: ExtractMode,
    max_input: Option<usize>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl ProjectServer {
    /// Create a server with default settings.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Create a server using thresholds and backend settings from `config`.
    pub fn with_config(config: &Config) -> Self {
        Self {
            tool_router: Self::tool_router(),
            thresholds: config.thresholds(),
            settings: config.extractor_settings(),
            default_mode: config.default_mode.unwrap_or_default(),
            max_input: config.max_input(),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Analyze post text.
    #[tool(
        description = "Analyze social post text. Returns word count, sentence count, average words per sentence, and editorial suggestions."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn analyze_text(
        &self,
        Parameters(params): Parameters<AnalyzeTextParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "analyze_text", chars = params.text.len(), "executing MCP tool");

        let thresholds = Thresholds {
            min_words: params.min_words.unwrap_or(self.thresholds.min_words),
            max_avg_sentence_words: params
                .max_sentence_words
                .unwrap_or(self.thresholds.max_avg_sentence_words),
        };
        let report = analysis::analyze_with(&params.text, &thresholds);
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "analyze_text",
            words = report.word_count,
            suggestions = report.suggestions.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Extract text from a PDF or image and analyze it.
    #[tool(
        description = "Extract text from a local PDF (text layer) or image (OCR via tesseract), then analyze it."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", path = %params.path))]
    async fn extract_file(
        &self,
        Parameters(params): Parameters<ExtractFileParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "extract_file", mode = ?params.mode, "executing MCP tool");

        let path = Utf8PathBuf::from(params.path);
        let mut session = Session::new().with_thresholds(self.thresholds);

        let prepared = InputFile::load(&path, self.max_input).and_then(|file| {
            let mode = file.resolve_mode(params.mode.unwrap_or(self.default_mode))?;
            Ok((file, mode))
        });
        match prepared {
            Ok((file, mode)) => {
                let extractor = extract::extractor_for(mode, &self.settings);
                session.drive(extractor.as_ref(), &file, |_| {}).await;
            }
            Err(err) => session.reject(&err),
        }

        match session.into_state() {
            SessionState::Success { text, report } => {
                let output = ExtractFileOutput {
                    text,
                    analysis: (!params.skip_analysis).then_some(report),
                };
                let json = serde_json::to_string_pretty(&output).map_err(|e| {
                    McpError::internal_error(format!("serialization error: {e}"), None)
                })?;
                tracing::info!(tool = "extract_file", "MCP tool completed");
                Ok(CallToolResult::success(vec![Content::text(json)]))
            }
            SessionState::Failed { message, .. } => {
                tracing::info!(tool = "extract_file", error = %message, "MCP tool failed");
                Ok(CallToolResult::error(vec![Content::text(message)]))
            }
            other => Err(McpError::internal_error(
                format!("extraction ended in unexpected state: {other:?}"),
                None,
            )),
        }
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use analyze_text for drafts and extract_file for PDFs or images.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    #[test]
    fn server_info_has_correct_name() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);

        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = ProjectServer::new();
        let result = server
            .get_info(Parameters(GetInfoParams {
                format: "json".to_string(),
            }))
            .expect("get_info should succeed");

        let text = extract_text(&result).expect("should have text content");
        let json: serde_json::Value = serde_json::from_str(text).expect("valid JSON");
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    }

    #[test]
    fn analyze_text_reports_counts_and_suggestions() {
        let server = ProjectServer::new();
        let result = server
            .analyze_text(Parameters(AnalyzeTextParams {
                text: "Check this out https://example.com now".to_string(),
                min_words: None,
                max_sentence_words: None,
            }))
            .expect("analyze_text should succeed");
        assert!(!result.is_error.unwrap_or(false));

        let text = extract_text(&result).expect("should have text content");
        let json: serde_json::Value = serde_json::from_str(text).expect("valid JSON");
        assert_eq!(json["word_count"], 5);
        let suggestions = json["suggestions"].as_array().expect("suggestions array");
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn analyze_text_honors_threshold_overrides() {
        let server = ProjectServer::new();
        let result = server
            .analyze_text(Parameters(AnalyzeTextParams {
                text: "Hello world.".to_string(),
                min_words: Some(2),
                max_sentence_words: None,
            }))
            .expect("analyze_text should succeed");

        let text = extract_text(&result).expect("should have text content");
        let json: serde_json::Value = serde_json::from_str(text).expect("valid JSON");
        assert!(json["suggestions"].as_array().expect("array").is_empty());
    }

    #[tokio::test]
    async fn extract_file_rejects_wrong_type() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "just text").expect("write");

        let server = ProjectServer::new();
        let result = server
            .extract_file(Parameters(ExtractFileParams {
                path: path.to_string_lossy().into_owned(),
                mode: Some(ExtractMode::Pdf),
                skip_analysis: false,
            }))
            .await
            .expect("tool call should not error at protocol level");

        assert!(result.is_error.unwrap_or(false));
        assert_eq!(extract_text(&result), Some("Please upload a PDF file"));
    }

    #[tokio::test]
    async fn extract_file_reports_missing_file() {
        let server = ProjectServer::new();
        let result = server
            .extract_file(Parameters(ExtractFileParams {
                path: "/definitely/not/here.pdf".to_string(),
                mode: None,
                skip_analysis: true,
            }))
            .await
            .expect("tool call should not error at protocol level");

        assert!(result.is_error.unwrap_or(false));
    }
}
