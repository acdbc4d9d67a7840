//! Log and advisor tools

use chrono::{Duration, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{tool, Access, ToolDescriptor};
use crate::platform::GetLogsOptions;

/// Service whose logs to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LogService {
    Api,
    BranchAction,
    Postgres,
    EdgeFunction,
    Auth,
    Storage,
    Realtime,
}

impl LogService {
    /// Analytics query for the service's most recent entries
    pub fn sql(self) -> &'static str {
        match self {
            Self::Api => {
                "select id, identifier, timestamp, event_message, request.method, request.path, response.status_code \
                 from edge_logs \
                 cross join unnest(metadata) as m \
                 cross join unnest(m.request) as request \
                 cross join unnest(m.response) as response \
                 order by timestamp desc limit 100"
            }
            Self::BranchAction => {
                "select workflow_run, workflow_run_logs.timestamp, id, event_message \
                 from workflow_run_logs \
                 order by timestamp desc limit 100"
            }
            Self::Postgres => {
                "select identifier, postgres_logs.timestamp, id, event_message, parsed.error_severity \
                 from postgres_logs \
                 cross join unnest(metadata) as m \
                 cross join unnest(m.parsed) as parsed \
                 order by timestamp desc limit 100"
            }
            Self::EdgeFunction => {
                "select id, function_edge_logs.timestamp, event_message, response.status_code, request.method, \
                 m.function_id, m.execution_time_ms, m.deployment_id, m.version \
                 from function_edge_logs \
                 cross join unnest(metadata) as m \
                 cross join unnest(m.response) as response \
                 cross join unnest(m.request) as request \
                 order by timestamp desc limit 100"
            }
            Self::Auth => {
                "select id, auth_logs.timestamp, event_message, metadata.level, metadata.status, \
                 metadata.path, metadata.msg as msg, metadata.error \
                 from auth_logs \
                 cross join unnest(metadata) as metadata \
                 order by timestamp desc limit 100"
            }
            Self::Storage => {
                "select id, storage_logs.timestamp, event_message \
                 from storage_logs \
                 order by timestamp desc limit 100"
            }
            Self::Realtime => {
                "select id, realtime_logs.timestamp, event_message \
                 from realtime_logs \
                 order by timestamp desc limit 100"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorKind {
    Security,
    Performance,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetLogsParams {
    /// Project ref
    pub project_id: String,
    pub service: LogService,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetAdvisorsParams {
    /// Project ref
    pub project_id: String,
    /// Which advisor report to fetch
    #[serde(rename = "type")]
    pub kind: AdvisorKind,
}

/// Options covering the last minute
fn recent_logs(service: LogService) -> GetLogsOptions {
    let end = Utc::now();
    let start = end - Duration::minutes(1);
    GetLogsOptions {
        sql: service.sql().to_string(),
        iso_timestamp_start: Some(start.to_rfc3339_opts(SecondsFormat::Millis, true)),
        iso_timestamp_end: Some(end.to_rfc3339_opts(SecondsFormat::Millis, true)),
    }
}

pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        tool(
            "get_logs",
            "Gets logs for a Supabase project by service type. Returns entries from the last minute.",
            Access::Read,
            |ctx, p: GetLogsParams| async move {
                ctx.platform.get_logs(&p.project_id, recent_logs(p.service)).await
            },
        ),
        tool(
            "get_advisors",
            "Gets security or performance advisory notices for a Supabase project.",
            Access::Read,
            |ctx, p: GetAdvisorsParams| async move {
                match p.kind {
                    AdvisorKind::Security => ctx.platform.get_security_advisors(&p.project_id).await,
                    AdvisorKind::Performance => ctx.platform.get_performance_advisors(&p.project_id).await,
                }
            },
        ),
    ]
}
