use std::sync::Once;

use analyzer_core::{
    update, AnalysisPane, AnalysisResult, Document, Effect, ErrorInfo, ErrorKind, Msg,
    WorkflowState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn document(id: &str) -> Document {
    Document {
        id: id.to_string(),
        filename: format!("{id}.pdf"),
        page_count: 2,
        created_at: "2025-06-01T10:00:00Z".to_string(),
    }
}

fn library_token(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchList { token } | Effect::SearchDocuments { token, .. } => Some(*token),
            _ => None,
        })
        .expect("no library effect emitted")
}

fn debounce_token(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ScheduleSearchDebounce { token } => Some(*token),
            _ => None,
        })
        .expect("no debounce effect emitted")
}

fn loaded(documents: Vec<Document>) -> WorkflowState {
    let (state, effects) = update(WorkflowState::new(), Msg::SessionStarted);
    let token = library_token(&effects);
    let (state, _) = update(
        state,
        Msg::LibraryLoaded {
            token,
            result: Ok(documents),
        },
    );
    state
}

#[test]
fn session_start_fetches_the_list() {
    init_logging();
    let (state, effects) = update(WorkflowState::new(), Msg::SessionStarted);

    assert!(matches!(effects.as_slice(), [Effect::FetchList { .. }]));
    assert!(state.view().busy.listing);
}

#[test]
fn library_load_replaces_the_documents() {
    init_logging();
    let state = loaded(vec![document("doc-1"), document("doc-2")]);
    let view = state.view();

    assert_eq!(view.documents.len(), 2);
    assert_eq!(view.documents[0].id, "doc-1");
    assert!(!view.busy.listing);
}

#[test]
fn library_load_failure_keeps_the_previous_documents() {
    init_logging();
    let state = loaded(vec![document("doc-1")]);

    let (state, effects) = update(state, Msg::SearchSubmitted);
    let token = library_token(&effects);
    let (state, _) = update(
        state,
        Msg::LibraryLoaded {
            token,
            result: Err(ErrorInfo::new(ErrorKind::Transport, "unreachable")),
        },
    );
    let view = state.view();

    assert_eq!(view.documents.len(), 1);
    assert_eq!(view.last_error.unwrap().kind, ErrorKind::Transport);
    assert!(!view.busy.listing && !view.busy.searching);
}

#[test]
fn editing_the_query_arms_the_debounce_instead_of_searching() {
    init_logging();
    let state = loaded(vec![]);

    let (state, effects) = update(state, Msg::SearchInputChanged("rust".to_string()));

    assert!(matches!(
        effects.as_slice(),
        [Effect::ScheduleSearchDebounce { .. }]
    ));
    assert_eq!(state.view().search_input, "rust");
    assert!(!state.view().busy.searching);
}

#[test]
fn elapsed_debounce_issues_the_search() {
    init_logging();
    let state = loaded(vec![]);
    let (state, effects) = update(state, Msg::SearchInputChanged("rust".to_string()));
    let token = debounce_token(&effects);

    let (state, effects) = update(state, Msg::SearchDebounceElapsed { token });

    assert!(matches!(
        effects.as_slice(),
        [Effect::SearchDocuments { query, .. }] if query == "rust"
    ));
    assert!(state.view().busy.searching);
}

#[test]
fn a_newer_edit_supersedes_an_armed_debounce() {
    init_logging();
    let state = loaded(vec![]);
    let (state, first) = update(state, Msg::SearchInputChanged("ru".to_string()));
    let stale = debounce_token(&first);
    let (state, second) = update(state, Msg::SearchInputChanged("rust".to_string()));

    let (state, effects) = update(state, Msg::SearchDebounceElapsed { token: stale });
    assert!(effects.is_empty());
    assert!(!state.view().busy.searching);

    let fresh = debounce_token(&second);
    let (_, effects) = update(state, Msg::SearchDebounceElapsed { token: fresh });
    assert!(matches!(
        effects.as_slice(),
        [Effect::SearchDocuments { query, .. }] if query == "rust"
    ));
}

#[test]
fn explicit_submit_bypasses_the_quiet_period_and_cancels_the_timer() {
    init_logging();
    let state = loaded(vec![]);
    let (state, armed) = update(state, Msg::SearchInputChanged("rust".to_string()));
    let pending = debounce_token(&armed);

    let (state, effects) = update(state, Msg::SearchSubmitted);
    assert!(matches!(
        effects.as_slice(),
        [Effect::SearchDocuments { query, .. }] if query == "rust"
    ));

    // The timer armed before the submit fires into the void.
    let (state, effects) = update(state, Msg::SearchDebounceElapsed { token: pending });
    assert!(effects.is_empty());
    assert!(state.view().busy.searching);
}

#[test]
fn blank_query_falls_back_to_a_plain_list() {
    init_logging();
    let state = loaded(vec![]);
    let (state, effects) = update(state, Msg::SearchInputChanged("   ".to_string()));
    let token = debounce_token(&effects);

    let (state, effects) = update(state, Msg::SearchDebounceElapsed { token });

    assert!(matches!(effects.as_slice(), [Effect::FetchList { .. }]));
    assert!(state.view().busy.listing);
    assert!(!state.view().busy.searching);
}

#[test]
fn stale_library_reply_is_dropped() {
    init_logging();
    let state = loaded(vec![]);
    let (state, first) = update(state, Msg::SearchSubmitted);
    let stale = library_token(&first);
    // A second request supersedes the first before it completes.
    let (state, second) = update(state, Msg::SearchSubmitted);

    let (state, _) = update(
        state,
        Msg::LibraryLoaded {
            token: stale,
            result: Ok(vec![document("old")]),
        },
    );
    assert!(state.view().documents.is_empty());
    assert!(state.view().busy.listing);

    let fresh = library_token(&second);
    let (state, _) = update(
        state,
        Msg::LibraryLoaded {
            token: fresh,
            result: Ok(vec![document("new")]),
        },
    );
    assert_eq!(state.view().documents[0].id, "new");
}

#[test]
fn replacement_that_drops_the_focused_document_clears_the_analysis() {
    init_logging();
    let state = loaded(vec![document("doc-1")]);
    let (state, effects) = update(
        state,
        Msg::AnalyzeRequested {
            document_id: "doc-1".to_string(),
        },
    );
    let analysis_token = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchAnalysis { token, .. } => Some(*token),
            _ => None,
        })
        .expect("no analysis effect emitted");
    let (state, _) = update(
        state,
        Msg::AnalysisFinished {
            token: analysis_token,
            result: Ok(AnalysisResult {
                document_id: "doc-1".to_string(),
                overall_score: 78,
                key_strengths: vec![],
                priority_improvements: vec![],
                overall_assessment: String::new(),
            }),
        },
    );

    let (state, effects) = update(state, Msg::SearchSubmitted);
    let token = library_token(&effects);
    let (state, _) = update(
        state,
        Msg::LibraryLoaded {
            token,
            result: Ok(vec![document("doc-2")]),
        },
    );

    assert_eq!(state.view().analysis, AnalysisPane::Idle);
}

#[test]
fn replacement_that_keeps_the_focused_document_keeps_the_analysis() {
    init_logging();
    let state = loaded(vec![document("doc-1")]);
    let (state, effects) = update(
        state,
        Msg::AnalyzeRequested {
            document_id: "doc-1".to_string(),
        },
    );
    assert_eq!(effects.len(), 1);

    let (state, effects) = update(state, Msg::SearchSubmitted);
    let token = library_token(&effects);
    let (state, _) = update(
        state,
        Msg::LibraryLoaded {
            token,
            result: Ok(vec![document("doc-1"), document("doc-2")]),
        },
    );

    assert!(state.view().analysis.is_loading_for("doc-1"));
}
