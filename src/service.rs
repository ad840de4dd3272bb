use std::future::Future;
use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{CallToolResult, Content, ErrorData, ServerCapabilities, ServerInfo},
    ServerHandler,
};
use rmcp_macros::{tool, tool_handler, tool_router};
use serde::Serialize;

use crate::config::{LedgerConfig, CLEAR_THOUGHTS, RECORD_THOUGHT, SUMMARIZE_THOUGHTS};
use crate::error::{LedgerError, Result as LedgerResult};
use crate::handlers::ThoughtLedger;
use crate::models::{FailureResponse, RecordResult, RecordThoughtParams, ThreadParams};
use crate::repository::MemoryThoughtStore;

/// MCP server exposing the thought ledger as tools
#[derive(Clone)]
pub struct ThoughtLedgerService {
    tool_router: ToolRouter<Self>,
    ledger: Arc<ThoughtLedger<MemoryThoughtStore>>,
    config: Arc<LedgerConfig>,
}

impl ThoughtLedgerService {
    /// Create a service from configuration loaded out of the environment
    pub fn from_env() -> LedgerResult<Self> {
        let config = LedgerConfig::load()?;
        Self::new(config)
    }

    /// Create a service with an explicit configuration
    pub fn new(config: LedgerConfig) -> LedgerResult<Self> {
        config.validate()?;

        tracing::info!(
            "Initializing {} v{} (max thought length {})",
            config.server.name,
            config.server.version,
            config
                .validation
                .max_thought_length
                .map_or_else(|| "unlimited".to_string(), |max| max.to_string())
        );
        if let Some(allowed) = &config.tools.allowed {
            tracing::info!("Serving only tools: {}", allowed.join(", "));
        }

        Ok(Self {
            tool_router: Self::tool_router(),
            ledger: Arc::new(ThoughtLedger::in_memory(&config)),
            config: Arc::new(config),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Get the underlying ledger
    pub fn ledger(&self) -> &ThoughtLedger<MemoryThoughtStore> {
        &self.ledger
    }

    fn ensure_allowed(&self, tool: &str) -> LedgerResult<()> {
        if self.config.tools.is_allowed(tool) {
            Ok(())
        } else {
            Err(LedgerError::ToolDisabled(tool.to_string()))
        }
    }
}

fn success_result<T: Serialize>(payload: T) -> std::result::Result<CallToolResult, ErrorData> {
    let content = Content::json(payload)
        .map_err(|e| ErrorData::internal_error(format!("Failed to create JSON content: {}", e), None))?;
    Ok(CallToolResult::success(vec![content]))
}

fn failure_result(tool: &str, err: LedgerError) -> std::result::Result<CallToolResult, ErrorData> {
    tracing::warn!("{} failed: {}", tool, err);
    failure_content(FailureResponse::new(err.describe()))
}

fn failure_content(failure: FailureResponse) -> std::result::Result<CallToolResult, ErrorData> {
    let content = Content::json(failure)
        .map_err(|e| ErrorData::internal_error(format!("Failed to create JSON content: {}", e), None))?;
    Ok(CallToolResult::error(vec![content]))
}

#[tool_router]
impl ThoughtLedgerService {
    #[tool(description = "Record one step of a dynamic, reflective reasoning process. Each thought can build on, question, revise (is_revision + revises_thought) or branch from (branch_from_thought + branch_id) earlier thoughts. thought_number, total_thoughts, revises_thought and branch_from_thought are integers >= 1. thought_number may exceed total_thoughts; the estimate is raised to match. Set next_thought_needed to false only when a satisfactory answer is reached.")]
    pub async fn record_thought(
        &self,
        params: Parameters<RecordThoughtParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        if let Err(e) = self.ensure_allowed(RECORD_THOUGHT) {
            return failure_result(RECORD_THOUGHT, e);
        }

        match self.ledger.record(params.0).await {
            RecordResult::Recorded(response) => success_result(response),
            RecordResult::Failed(failure) => failure_content(failure),
        }
    }

    #[tool(description = "Summarize the recorded thinking process of a conversation as a timeline ordered by thought number")]
    pub async fn summarize_thoughts(
        &self,
        params: Parameters<ThreadParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        if let Err(e) = self.ensure_allowed(SUMMARIZE_THOUGHTS) {
            return failure_result(SUMMARIZE_THOUGHTS, e);
        }

        match self.ledger.summarize(&params.0.user_id, &params.0.thread_id).await {
            Ok(summary) => success_result(summary),
            Err(e) => failure_result(SUMMARIZE_THOUGHTS, e),
        }
    }

    #[tool(description = "Clear the recorded thoughts of a conversation")]
    pub async fn clear_thoughts(
        &self,
        params: Parameters<ThreadParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        if let Err(e) = self.ensure_allowed(CLEAR_THOUGHTS) {
            return failure_result(CLEAR_THOUGHTS, e);
        }

        match self.ledger.clear(&params.0.user_id, &params.0.thread_id).await {
            Ok(cleared) => success_result(cleared),
            Err(e) => failure_result(CLEAR_THOUGHTS, e),
        }
    }
}

#[tool_handler]
impl ServerHandler for ThoughtLedgerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::V_2024_11_05,
            server_info: rmcp::model::Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
            },
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            instructions: Some(
                "Sequential-thinking ledger: record reasoning steps per user and thread, then summarize or clear them".into(),
            ),
        }
    }
}
