use serde::{Deserialize, Serialize};

use crate::model::{Mode, QueryReply, Resource};
use crate::query_router::DispatchOutcome;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceDto {
    pub name: String,
    pub path: String,
}

impl From<Resource> for ResourceDto {
    fn from(value: Resource) -> Self {
        Self {
            name: value.name,
            path: value.path,
        }
    }
}

/// One resolved keystroke: either verbatim text or a listing to render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyDto {
    Text { text: String },
    Resources { label: String, items: Vec<ResourceDto> },
}

impl From<QueryReply> for ReplyDto {
    fn from(value: QueryReply) -> Self {
        match value {
            QueryReply::Text(text) => ReplyDto::Text { text },
            QueryReply::Resources(kind, items) => ReplyDto::Resources {
                label: kind.label().to_string(),
                items: items.into_iter().map(ResourceDto::from).collect(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeDto {
    None,
    Text { text: String },
    ReplaceInput { text: String },
    ModeChanged {
        mode: Mode,
        window_lines: Option<Vec<String>>,
    },
    Help { text: String },
    Hide,
    Quit,
}

impl From<DispatchOutcome> for OutcomeDto {
    fn from(value: DispatchOutcome) -> Self {
        match value {
            DispatchOutcome::None => OutcomeDto::None,
            DispatchOutcome::Text(text) => OutcomeDto::Text { text },
            DispatchOutcome::ReplaceInput(text) => OutcomeDto::ReplaceInput { text },
            DispatchOutcome::ModeChanged { mode, window_lines } => {
                OutcomeDto::ModeChanged { mode, window_lines }
            }
            DispatchOutcome::Help(text) => OutcomeDto::Help { text },
            DispatchOutcome::Hide => OutcomeDto::Hide,
            DispatchOutcome::Quit => OutcomeDto::Quit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub input: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryResponse {
    pub reply: Option<ReplyDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitRequest {
    pub input: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitResponse {
    pub outcome: OutcomeDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetModeRequest {
    pub mode: Mode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetModeResponse {
    pub mode: Mode,
    pub placeholder: String,
    pub window_lines: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivateRequest {
    /// "program" launches directly, anything else opens via the shell.
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivateResponse {
    pub activated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HideProgramRequest {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlocklistResponse {
    pub entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetSearchStringRequest {
    pub template: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AckResponse {
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CoreRequest {
    Query(QueryRequest),
    Submit(SubmitRequest),
    SetMode(SetModeRequest),
    WindowList,
    Activate(ActivateRequest),
    HideProgram(HideProgramRequest),
    ClearBlocklist,
    SetSearchString(SetSearchStringRequest),
    Reindex,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CoreResponse {
    Query(QueryResponse),
    Submit(SubmitResponse),
    SetMode(SetModeResponse),
    WindowList { lines: Vec<String> },
    Activate(ActivateResponse),
    HideProgram(BlocklistResponse),
    ClearBlocklist(BlocklistResponse),
    SetSearchString(AckResponse),
    Reindex(AckResponse),
    /// Unsolicited event: a prompt reply that arrived after the original
    /// query response was already sent.
    AsyncText { text: String },
}
