use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use quicknav_core::contract::{
    ActivateRequest, CoreRequest, CoreResponse, HideProgramRequest, OutcomeDto, QueryRequest,
    ReplyDto, SubmitRequest,
};
use quicknav_core::document_index::DocumentIndexer;
use quicknav_core::index_service::IndexService;
use quicknav_core::platform::{RegistryProgram, StubOs};
use quicknav_core::program_index::ProgramIndexer;
use quicknav_core::prompt::UnconfiguredPromptClient;
use quicknav_core::query_router::QueryRouter;
use quicknav_core::settings_store::SettingsStore;
use quicknav_core::transport::{handle_json, handle_line, handle_request, ErrorCode, TransportResponse};
use quicknav_core::window_switcher::WindowSwitcher;

struct Fixture {
    base: PathBuf,
    service: Arc<IndexService>,
    router: QueryRouter,
}

impl Fixture {
    fn new(label: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let base = std::env::temp_dir().join(format!("quicknav-{label}-{unique}"));
        std::fs::create_dir_all(&base).unwrap();

        let os = Arc::new(StubOs {
            programs: vec![RegistryProgram {
                display_name: "Paint".to_string(),
                display_icon: r"C:\Apps\paint.exe".to_string(),
                ..RegistryProgram::default()
            }],
            ..StubOs::default()
        });

        let store = SettingsStore::open(base.join("prefs.json")).unwrap();
        let program_indexer = ProgramIndexer::new(os.clone(), Vec::new());
        let document_indexer = DocumentIndexer::new(base.join("docs"));
        let service = Arc::new(IndexService::new(store, program_indexer, document_indexer));
        service.rebuild_programs();

        let router = QueryRouter::new(
            service.clone(),
            Arc::new(WindowSwitcher::new(os)),
            Arc::new(UnconfiguredPromptClient),
        );

        Self {
            base,
            service,
            router,
        }
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.base);
    }
}

#[test]
fn query_request_returns_matching_resources() {
    let fixture = Fixture::new("transport-query");

    let response = handle_request(
        &fixture.router,
        &fixture.service,
        CoreRequest::Query(QueryRequest {
            input: "paint".to_string(),
        }),
    );

    match response {
        TransportResponse::Ok {
            response: CoreResponse::Query(query),
        } => match query.reply {
            Some(ReplyDto::Resources { label, items }) => {
                assert_eq!(label, "program");
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].name, "Paint");
            }
            other => panic!("expected a resource listing, got {other:?}"),
        },
        other => panic!("expected ok query response, got {other:?}"),
    }
}

#[test]
fn invalid_json_maps_to_the_invalid_json_code() {
    let fixture = Fixture::new("transport-bad-json");

    let raw = handle_json(&fixture.router, &fixture.service, "{not-json");
    let parsed: TransportResponse = serde_json::from_str(&raw).unwrap();

    match parsed {
        TransportResponse::Err { error } => assert_eq!(error.code, ErrorCode::InvalidJson),
        other => panic!("expected invalid json error, got {other:?}"),
    }
}

#[test]
fn quit_submit_sets_the_line_quit_flag() {
    let fixture = Fixture::new("transport-quit");

    let reply = handle_line(
        &fixture.router,
        &fixture.service,
        r#"{"kind":"submit","payload":{"input":":x"}}"#,
    );
    assert!(reply.quit);
    assert!(reply.payload.contains("\"quit\""));

    let reply = handle_line(
        &fixture.router,
        &fixture.service,
        r#"{"kind":"submit","payload":{"input":"2+2"}}"#,
    );
    assert!(!reply.quit);
}

#[test]
fn math_submit_replaces_the_input() {
    let fixture = Fixture::new("transport-math");

    let response = handle_request(
        &fixture.router,
        &fixture.service,
        CoreRequest::Submit(SubmitRequest {
            input: "2+3*4".to_string(),
        }),
    );

    match response {
        TransportResponse::Ok {
            response: CoreResponse::Submit(submit),
        } => assert_eq!(
            submit.outcome,
            OutcomeDto::ReplaceInput {
                text: "14".to_string()
            }
        ),
        other => panic!("expected ok submit response, got {other:?}"),
    }
}

#[test]
fn hide_program_updates_the_blocklist_count() {
    let fixture = Fixture::new("transport-hide");

    let response = handle_request(
        &fixture.router,
        &fixture.service,
        CoreRequest::HideProgram(HideProgramRequest {
            path: r"c:\apps\paint.exe".to_string(),
        }),
    );

    match response {
        TransportResponse::Ok {
            response: CoreResponse::HideProgram(blocklist),
        } => assert_eq!(blocklist.entries, 1),
        other => panic!("expected ok hide response, got {other:?}"),
    }

    let cleared = handle_request(&fixture.router, &fixture.service, CoreRequest::ClearBlocklist);
    match cleared {
        TransportResponse::Ok {
            response: CoreResponse::ClearBlocklist(blocklist),
        } => assert_eq!(blocklist.entries, 0),
        other => panic!("expected ok clear response, got {other:?}"),
    }
}

#[test]
fn hide_program_requires_a_path() {
    let fixture = Fixture::new("transport-hide-empty");

    let response = handle_request(
        &fixture.router,
        &fixture.service,
        CoreRequest::HideProgram(HideProgramRequest {
            path: "   ".to_string(),
        }),
    );

    match response {
        TransportResponse::Err { error } => assert_eq!(error.code, ErrorCode::InvalidRequest),
        other => panic!("expected invalid request error, got {other:?}"),
    }
}

#[test]
fn activating_a_missing_program_is_a_launch_error() {
    let fixture = Fixture::new("transport-activate");
    let missing = std::env::temp_dir().join("quicknav-no-such-program.exe");

    let response = handle_request(
        &fixture.router,
        &fixture.service,
        CoreRequest::Activate(ActivateRequest {
            label: "program".to_string(),
            path: missing.to_string_lossy().to_string(),
        }),
    );

    match response {
        TransportResponse::Err { error } => assert_eq!(error.code, ErrorCode::Launch),
        other => panic!("expected launch error, got {other:?}"),
    }
}
