use super::*;

fn text(s: &str) -> Arc<[char]> {
    s.chars().collect()
}

fn typing_state(s: &str) -> SessionState {
    let mut state = SessionState::new(TypingSettings::default());
    state.begin(text(s), TypingSettings::default());
    state
}

#[test]
fn test_new_state_is_idle() {
    let state = SessionState::new(TypingSettings::default());
    assert!(!state.is_typing);
    assert!(!state.is_paused);
    assert_eq!(state.cursor, 0);
    assert!(state.text.is_empty());
}

#[test]
fn test_begin_resets_previous_session() {
    let mut state = typing_state("first");
    state.cursor = 3;
    state.mistakes = 2;
    state.pause(PauseReason::FocusLost);
    state.finish(SessionOutcome::Stopped);

    state.begin(text("second"), TypingSettings::default());

    assert!(state.is_typing);
    assert!(!state.is_paused);
    assert_eq!(state.pause_reason, None);
    assert_eq!(state.cursor, 0);
    assert_eq!(state.interruption_count, 0);
    assert_eq!(state.mistakes, 0);
    assert_eq!(state.last_outcome, None);
    assert_eq!(state.text.len(), 6);
}

#[test]
fn test_pause_counts_interruptions() {
    let mut state = typing_state("hello");
    state.pause(PauseReason::FocusLost);
    assert!(state.is_paused);
    assert_eq!(state.pause_reason, Some(PauseReason::FocusLost));
    assert_eq!(state.interruption_count, 1);
}

#[test]
fn test_stop_requires_active_session() {
    let mut state = SessionState::new(TypingSettings::default());
    assert_eq!(state.request_stop(), Err(SessionError::NotTyping));
    assert!(!state.stop_requested);

    let mut state = typing_state("hello");
    assert_eq!(state.request_stop(), Ok(()));
    assert!(state.stop_requested);
}

#[test]
fn test_resume_without_session_has_no_side_effect() {
    let mut state = SessionState::new(TypingSettings::default());
    assert_eq!(state.request_resume(), Err(SessionError::NotTyping));
    assert!(!state.resume_requested);
    assert!(!state.stop_requested);
}

#[test]
fn test_resume_clears_pause_and_raises_signal() {
    let mut state = typing_state("hello world");
    state.cursor = 4;
    state.pause(PauseReason::FocusLost);

    assert_eq!(state.request_resume(), Ok(4));
    assert!(!state.is_paused);
    assert_eq!(state.pause_reason, None);
    assert!(state.resume_requested);
}

#[test]
fn test_resume_while_running_is_noop() {
    let mut state = typing_state("hello");
    state.cursor = 2;
    assert_eq!(state.request_resume(), Ok(2));
    assert!(!state.resume_requested);
}

#[test]
fn test_finish_consumes_signals() {
    let mut state = typing_state("hello");
    state.request_stop().unwrap();
    state.finish(SessionOutcome::Stopped);

    assert!(!state.is_typing);
    assert!(!state.stop_requested);
    assert_eq!(state.last_outcome, Some(SessionOutcome::Stopped));
}

#[test]
fn test_update_settings_merges_and_records_time() {
    let mut state = SessionState::new(TypingSettings::default());
    let now = Instant::now();
    let patch = SettingsPatch {
        wpm: Some(90.0),
        ..Default::default()
    };

    let updated = state.update_settings(&patch, now).unwrap();

    assert!((updated.words_per_minute - 90.0).abs() < f64::EPSILON);
    assert_eq!(state.settings, updated);
    assert_eq!(state.settings_updated_at, Some(now));
}

#[test]
fn test_invalid_update_changes_nothing() {
    let mut state = SessionState::new(TypingSettings::default());
    let patch = SettingsPatch {
        wpm: Some(-1.0),
        variance: Some(5.0),
        ..Default::default()
    };

    assert!(state.update_settings(&patch, Instant::now()).is_err());
    assert_eq!(state.settings, TypingSettings::default());
    assert_eq!(state.settings_updated_at, None);
}

#[test]
fn test_focus_grace_window() {
    let mut state = SessionState::new(TypingSettings::default());
    let start = Instant::now();
    let grace = Duration::from_secs(2);
    assert!(!state.in_focus_grace(start, grace));

    state.settings_updated_at = Some(start);
    assert!(state.in_focus_grace(start + Duration::from_millis(1999), grace));
    assert!(!state.in_focus_grace(start + Duration::from_secs(2), grace));
}

#[test]
fn test_snapshot_progress() {
    let mut state = typing_state("abcd");
    state.cursor = 1;
    let snapshot = state.snapshot();

    assert_eq!(snapshot.cursor, 1);
    assert_eq!(snapshot.total, 4);
    assert!((snapshot.percentage() - 25.0).abs() < f64::EPSILON);
    assert_eq!(snapshot.typed_so_far, "a");
    assert_eq!(snapshot.remaining, "bcd");
}

#[test]
fn test_snapshot_of_empty_text_is_zero_percent() {
    let state = SessionState::new(TypingSettings::default());
    assert_eq!(state.snapshot().percentage(), 0.0);
}

#[test]
fn test_snapshot_views_are_bounded() {
    let long: String = "x".repeat(1000);
    let mut state = typing_state(&long);
    state.cursor = 500;
    let snapshot = state.snapshot();

    assert_eq!(snapshot.typed_so_far.chars().count(), VIEW_LIMIT);
    assert_eq!(snapshot.remaining.chars().count(), VIEW_LIMIT);
}

#[test]
fn test_snapshot_is_a_copy() {
    let mut state = typing_state("hello");
    let before = state.snapshot();
    state.cursor = 5;
    assert_eq!(before.cursor, 0);
}

#[tokio::test(start_paused = true)]
async fn test_wake_interrupts_wait() {
    let session = SharedSession::new(TypingSettings::default());
    session.wake();
    let started = Instant::now();
    session.wait_for_signal(Duration::from_secs(10)).await;
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_wait_times_out() {
    let session = SharedSession::new(TypingSettings::default());
    let started = Instant::now();
    session.wait_for_signal(Duration::from_millis(100)).await;
    assert!(started.elapsed() >= Duration::from_millis(100));
}
