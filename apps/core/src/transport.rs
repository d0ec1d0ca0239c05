use serde::{Deserialize, Serialize};

use crate::action_executor::{self, LaunchError};
use crate::contract::{
    AckResponse, ActivateResponse, BlocklistResponse, CoreRequest, CoreResponse, QueryResponse,
    SetModeResponse, SubmitResponse,
};
use crate::index_service::IndexService;
use crate::model::ResourceKind;
use crate::query_router::{DispatchOutcome, QueryRouter};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
    Launch,
    Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { response: CoreResponse },
    Err { error: ErrorResponse },
}

pub fn handle_request(
    router: &QueryRouter,
    service: &std::sync::Arc<IndexService>,
    request: CoreRequest,
) -> TransportResponse {
    match handle_command(router, service, request) {
        Ok(response) => TransportResponse::Ok { response },
        Err(error) => TransportResponse::Err { error },
    }
}

pub fn handle_json(
    router: &QueryRouter,
    service: &std::sync::Arc<IndexService>,
    payload: &str,
) -> String {
    handle_line(router, service, payload).payload
}

/// One stdin line in, one stdout line out, plus whether the caller should
/// stop reading.
pub struct LineReply {
    pub payload: String,
    pub quit: bool,
}

pub fn handle_line(
    router: &QueryRouter,
    service: &std::sync::Arc<IndexService>,
    line: &str,
) -> LineReply {
    let response = match serde_json::from_str::<CoreRequest>(line) {
        Ok(request) => handle_request(router, service, request),
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::InvalidJson,
                message: error.to_string(),
            },
        },
    };

    let quit = matches!(
        &response,
        TransportResponse::Ok {
            response: CoreResponse::Submit(SubmitResponse {
                outcome: crate::contract::OutcomeDto::Quit,
            }),
        }
    );

    LineReply {
        payload: serde_json::to_string(&response)
            .expect("transport response should serialize"),
        quit,
    }
}

/// Serialized form of a late prompt reply, pushed without a request.
pub fn async_text_event(text: String) -> String {
    let response = TransportResponse::Ok {
        response: CoreResponse::AsyncText { text },
    };
    serde_json::to_string(&response).expect("transport response should serialize")
}

fn handle_command(
    router: &QueryRouter,
    service: &std::sync::Arc<IndexService>,
    request: CoreRequest,
) -> Result<CoreResponse, ErrorResponse> {
    match request {
        CoreRequest::Query(request) => Ok(CoreResponse::Query(QueryResponse {
            reply: router.resolve(&request.input).map(Into::into),
        })),
        CoreRequest::Submit(request) => Ok(CoreResponse::Submit(SubmitResponse {
            outcome: router.dispatch(&request.input).into(),
        })),
        CoreRequest::SetMode(request) => {
            let outcome = router.set_mode(request.mode);
            let window_lines = match outcome {
                DispatchOutcome::ModeChanged { window_lines, .. } => window_lines,
                _ => None,
            };
            Ok(CoreResponse::SetMode(SetModeResponse {
                mode: request.mode,
                placeholder: router.placeholder().to_string(),
                window_lines,
            }))
        }
        CoreRequest::WindowList => Ok(CoreResponse::WindowList {
            lines: router.window_lines(),
        }),
        CoreRequest::Activate(request) => {
            let result = if request.label == ResourceKind::Program.label() {
                action_executor::launch_program(&request.path)
            } else {
                action_executor::open_document(&request.path)
            };
            match result {
                Ok(()) => Ok(CoreResponse::Activate(ActivateResponse { activated: true })),
                Err(error) => Err(map_launch_error(error)),
            }
        }
        CoreRequest::HideProgram(request) => {
            if request.path.trim().is_empty() {
                return Err(ErrorResponse {
                    code: ErrorCode::InvalidRequest,
                    message: "hide_program requires a path".to_string(),
                });
            }
            service.hide_program(&request.path).map_err(map_settings_error)?;
            Ok(CoreResponse::HideProgram(BlocklistResponse {
                entries: service.blocklist_len(),
            }))
        }
        CoreRequest::ClearBlocklist => {
            service.clear_blocklist().map_err(map_settings_error)?;
            Ok(CoreResponse::ClearBlocklist(BlocklistResponse {
                entries: service.blocklist_len(),
            }))
        }
        CoreRequest::SetSearchString(request) => {
            service
                .set_search_string(&request.template)
                .map_err(map_settings_error)?;
            Ok(CoreResponse::SetSearchString(AckResponse { done: true }))
        }
        CoreRequest::Reindex => {
            service.spawn_rebuild_all();
            Ok(CoreResponse::Reindex(AckResponse { done: true }))
        }
    }
}

fn map_launch_error(error: LaunchError) -> ErrorResponse {
    ErrorResponse {
        code: ErrorCode::Launch,
        message: error.to_string(),
    }
}

fn map_settings_error(error: crate::settings_store::SettingsError) -> ErrorResponse {
    ErrorResponse {
        code: ErrorCode::Settings,
        message: error.to_string(),
    }
}
