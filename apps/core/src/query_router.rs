use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::action_executor::{BrowserLauncher, ShellBrowserLauncher};
use crate::index_service::IndexService;
use crate::math_eval;
use crate::model::{Mode, QueryReply, ResourceKind};
use crate::prompt::PromptClient;
use crate::search;
use crate::text::{url_encode, wrap_by_words, WRAP_COLUMNS};
use crate::window_switcher::WindowSwitcher;

pub const PROMPT_PLACEHOLDER: &str = "Please wait...";

const HELP_TEXT: &str = "Command modes:\n\
:p | Program search (default)\n\
:d | Document search\n\
:w | Internet search\n\
:s | Switch to window\n\
:g | Quick AI\n\
:r | Re-index all resources\n\
:q | Hide\n\
:x | Quit\n\
\n\
Math:\n\
Supported: + - * /\n\
Just write an operation and see the result.";

/// What an explicit submit resolved to. The interactive surface executes
/// the outward-facing part; engine-side effects already happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    None,
    Text(String),
    /// A math submit evaluates in place of the typed expression.
    ReplaceInput(String),
    ModeChanged {
        mode: Mode,
        /// Present when the new mode is ChooseWindow.
        window_lines: Option<Vec<String>>,
    },
    Help(String),
    Hide,
    Quit,
}

type TextSink = Arc<dyn Fn(String) + Send + Sync>;

/// Fills the persisted search template with the percent-encoded query.
pub fn expand_search_url(template: &str, query: &str) -> String {
    template.replace("{query}", &url_encode(query))
}

/// Classifies free-text input and dispatches it: math first, then the
/// active mode's snapshot or templated text action.
pub struct QueryRouter {
    service: Arc<IndexService>,
    windows: Arc<WindowSwitcher>,
    prompt: Arc<dyn PromptClient>,
    browser: Arc<dyn BrowserLauncher>,
    mode: Mutex<Mode>,
    prompt_generation: Arc<AtomicU64>,
    async_text_sink: Option<TextSink>,
}

impl QueryRouter {
    pub fn new(
        service: Arc<IndexService>,
        windows: Arc<WindowSwitcher>,
        prompt: Arc<dyn PromptClient>,
    ) -> Self {
        Self {
            service,
            windows,
            prompt,
            browser: Arc::new(ShellBrowserLauncher),
            mode: Mutex::new(Mode::default()),
            prompt_generation: Arc::new(AtomicU64::new(0)),
            async_text_sink: None,
        }
    }

    /// Registers where late AI replies go. Without a sink they are logged
    /// and dropped.
    pub fn with_async_text_sink(mut self, sink: TextSink) -> Self {
        self.async_text_sink = Some(sink);
        self
    }

    /// Swaps the browser-launch implementation.
    pub fn with_browser_launcher(mut self, browser: Arc<dyn BrowserLauncher>) -> Self {
        self.browser = browser;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode.lock().map(|guard| *guard).unwrap_or_default()
    }

    /// Fresh window titles, re-enumerated on every call.
    pub fn window_lines(&self) -> Vec<String> {
        self.windows.list()
    }

    pub fn placeholder(&self) -> &'static str {
        self.mode().placeholder(self.service.documents_ready())
    }

    /// Switches the active mode. Entering ChooseWindow is the moment the
    /// window list is enumerated.
    pub fn set_mode(&self, mode: Mode) -> DispatchOutcome {
        if let Ok(mut current) = self.mode.lock() {
            *current = mode;
        }
        let window_lines = if mode == Mode::ChooseWindow {
            Some(self.windows.list())
        } else {
            None
        };
        DispatchOutcome::ModeChanged { mode, window_lines }
    }

    /// Keystroke-time resolution. First match wins: math, then the active
    /// mode. A math-looking but invalid expression silently becomes an
    /// ordinary query.
    pub fn resolve(&self, input: &str) -> Option<QueryReply> {
        if input.is_empty() {
            return None;
        }

        if math_eval::is_math_candidate(input) {
            if let Ok(result) = math_eval::eval(input) {
                return Some(QueryReply::Text(result));
            }
        }

        match self.mode() {
            Mode::ProgramSearch => Some(QueryReply::Resources(
                ResourceKind::Program,
                search::filter(&self.service.program_snapshot(), input),
            )),
            Mode::DocumentSearch => Some(QueryReply::Resources(
                ResourceKind::Document,
                search::filter(&self.service.document_snapshot(), input),
            )),
            Mode::InternetSearch => Some(QueryReply::Text(wrap_by_words(
                &format!("Internet search: {input}"),
                WRAP_COLUMNS,
            ))),
            Mode::AskAi => {
                self.start_prompt(input.to_string());
                Some(QueryReply::Text(PROMPT_PLACEHOLDER.to_string()))
            }
            Mode::ChooseWindow => None,
        }
    }

    /// Explicit submit. `:x`-style commands come first; the remaining text
    /// is handled by the active mode.
    pub fn dispatch(&self, submitted: &str) -> DispatchOutcome {
        if submitted.is_empty() {
            return DispatchOutcome::None;
        }

        if let Some(rest) = submitted.strip_prefix(':') {
            return self.dispatch_command(rest);
        }

        if math_eval::is_math_candidate(submitted) {
            if let Ok(result) = math_eval::eval(submitted) {
                return DispatchOutcome::ReplaceInput(result);
            }
        }

        match self.mode() {
            Mode::AskAi => {
                self.start_prompt(submitted.to_string());
                DispatchOutcome::Text(PROMPT_PLACEHOLDER.to_string())
            }
            Mode::ChooseWindow => {
                if let Ok(ordinal) = submitted.trim().parse::<i64>() {
                    self.windows.focus(ordinal);
                    DispatchOutcome::Hide
                } else {
                    DispatchOutcome::None
                }
            }
            Mode::InternetSearch => self.open_internet_search(submitted),
            Mode::ProgramSearch | Mode::DocumentSearch => DispatchOutcome::None,
        }
    }

    /// One selector letter after the `:`; anything beyond it is ignored.
    fn dispatch_command(&self, rest: &str) -> DispatchOutcome {
        let Some(selector) = rest.chars().next() else {
            return DispatchOutcome::None;
        };

        match selector {
            'p' => self.set_mode(Mode::ProgramSearch),
            'd' => self.set_mode(Mode::DocumentSearch),
            'w' => self.set_mode(Mode::InternetSearch),
            'g' => self.set_mode(Mode::AskAi),
            's' => self.set_mode(Mode::ChooseWindow),
            'h' => DispatchOutcome::Help(HELP_TEXT.to_string()),
            'r' => {
                self.service.spawn_rebuild_all();
                DispatchOutcome::Text("Re-indexing programs and documents.".to_string())
            }
            'q' => DispatchOutcome::Hide,
            'x' => DispatchOutcome::Quit,
            _ => DispatchOutcome::None,
        }
    }

    fn open_internet_search(&self, query: &str) -> DispatchOutcome {
        let url = expand_search_url(&self.service.search_string(), query);
        match self.browser.open(&url) {
            Ok(()) => DispatchOutcome::Hide,
            Err(error) => {
                crate::logging::error(&format!("browser open failed: {error}"));
                DispatchOutcome::Text(
                    "Sorry, there was an error opening your web browser.".to_string(),
                )
            }
        }
    }

    /// Fires the prompt collaborator off-thread. Replies are stamped with a
    /// generation; a reply that arrives after a newer prompt started is
    /// dropped instead of overwriting the current display.
    fn start_prompt(&self, prompt_text: String) {
        let generation = self.prompt_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let client = Arc::clone(&self.prompt);
        let counter = Arc::clone(&self.prompt_generation);
        let sink = self.async_text_sink.clone();

        std::thread::spawn(move || {
            let reply = match client.ask(&prompt_text) {
                Ok(text) => wrap_by_words(&text, WRAP_COLUMNS),
                Err(message) => message,
            };

            if counter.load(Ordering::SeqCst) != generation {
                crate::logging::info("dropping stale prompt reply");
                return;
            }

            match sink {
                Some(sink) => sink(reply),
                None => crate::logging::info(&format!("prompt reply (no sink): {reply}")),
            }
        });
    }
}
