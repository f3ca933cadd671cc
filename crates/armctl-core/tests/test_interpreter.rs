mod common;

use armctl_core::ArmError;
use armctl_core::motion::{GripLevel, Pose};
use common::{harness, pose};

fn run(h: &mut common::Harness, line: &str) -> Vec<armctl_core::Reply> {
    h.interpreter.execute_line(line)
}

#[test]
fn test_move_then_undo_issues_two_moves() {
    let mut h = harness();
    let target = pose([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    let replies = run(&mut h, "m 1 2 3 4 5 6");
    assert!(!replies[0].is_error(), "{}", replies[0].output());
    assert_eq!(h.interpreter.state().current_pose, target);

    let replies = run(&mut h, "u");
    assert!(!replies[0].is_error(), "{}", replies[0].output());

    let backend = h.backend.borrow();
    assert_eq!(backend.moves, vec![target, Pose::default()]);
    assert_eq!(h.interpreter.state().current_pose, Pose::default());
    assert!(h.interpreter.state().pose_undo_stack().is_empty());
}

#[test]
fn test_undo_restores_mutations_in_reverse_order() {
    let mut h = harness();
    run(&mut h, "m 1 0 0 0 0 0");
    run(&mut h, "grip 0.5");
    run(&mut h, "m 2 0 0 0 0 0");
    run(&mut h, "ungrip");

    for _ in 0..4 {
        let reply = &run(&mut h, "undo")[0];
        assert!(!reply.is_error(), "{}", reply.output());
    }

    let state = h.interpreter.state();
    assert_eq!(state.current_pose, Pose::default());
    assert_eq!(state.current_grip, GripLevel::OPEN);

    let backend = h.backend.borrow();
    // Undo order: grip back to 0.5, move back to x=1, grip back to open, move home.
    assert_eq!(
        backend.moves,
        vec![
            pose([1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            pose([2.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            pose([1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            Pose::default(),
        ]
    );
    let half = GripLevel::new(0.5).unwrap();
    assert_eq!(
        backend.grips,
        vec![half, GripLevel::OPEN, half, GripLevel::OPEN]
    );
    drop(backend);

    let reply = &run(&mut h, "undo")[0];
    assert_eq!(reply.outcome, Err(ArmError::EmptyUndoStack));
}

#[test]
fn test_rejected_move_leaves_state_unchanged() {
    let mut h = harness();
    h.backend.borrow_mut().fail_moves = true;

    let reply = &run(&mut h, "m 1 2 3 4 5 6")[0];
    assert!(matches!(reply.outcome, Err(ArmError::Backend(_))));

    let state = h.interpreter.state();
    assert_eq!(state.current_pose, Pose::default());
    assert!(state.pose_undo_stack().is_empty());
    assert_eq!(state.command_log().len(), 1);
    assert!(state.command_log()[0].output.starts_with("error:"));
}

#[test]
fn test_parse_error_is_logged_without_backend_calls() {
    let mut h = harness();
    let reply = &run(&mut h, "m 1 2 3")[0];
    assert!(matches!(reply.outcome, Err(ArmError::Parse(_))));
    assert!(h.backend.borrow().moves.is_empty());
    assert_eq!(h.interpreter.state().command_log()[0].input, "m 1 2 3");
}

#[test]
fn test_home_stack_round_trip() {
    let mut h = harness();
    let start = pose([5.0, 5.0, 5.0, 0.0, 0.0, 0.0]);
    run(&mut h, "m 5 5 5 0 0 0");
    run(&mut h, "sh");
    run(&mut h, "m 9 9 9 0 0 0");

    let reply = &run(&mut h, "h")[0];
    assert!(!reply.is_error(), "{}", reply.output());
    assert_eq!(h.interpreter.state().current_pose, start);
    assert!(h.interpreter.state().home_stack().is_empty());

    let reply = &run(&mut h, "home")[0];
    assert_eq!(reply.outcome, Err(ArmError::EmptyHomeStack));

    // Returning home is itself undoable.
    run(&mut h, "u");
    assert_eq!(
        h.interpreter.state().current_pose,
        pose([9.0, 9.0, 9.0, 0.0, 0.0, 0.0])
    );
}

#[test]
fn test_failed_pop_home_keeps_home_pose() {
    let mut h = harness();
    run(&mut h, "sh");
    h.backend.borrow_mut().fail_moves = true;

    let reply = &run(&mut h, "ph")[0];
    assert!(reply.is_error());
    assert_eq!(h.interpreter.state().home_stack().len(), 1);
}

#[test]
fn test_clear_home() {
    let mut h = harness();
    run(&mut h, "sh && sh");
    let reply = &run(&mut h, "ch")[0];
    assert_eq!(reply.outcome, Ok("cleared 2 home pose(s)".to_string()));
    assert!(h.interpreter.state().home_stack().is_empty());
}

#[test]
fn test_repeat_runs_resolve_history() {
    let mut h = harness();
    run(&mut h, "w");
    run(&mut h, "wj");
    run(&mut h, "g");

    let reply = &run(&mut h, "rrr")[0];
    assert_eq!(reply.input, "w");
    assert!(reply.output().starts_with("pose:"));

    // History is now: w, wj, g, w
    assert_eq!(run(&mut h, "r")[0].input, "w");
    assert_eq!(run(&mut h, "rr")[0].input, "w");
    assert_eq!(run(&mut h, "repeat 4")[0].input, "g");

    let log = h.interpreter.state().command_log();
    assert_eq!(log.len(), 7);
    assert!(log.iter().all(|entry| !entry.input.starts_with('r')));
}

#[test]
fn test_repeat_deeper_than_history_fails() {
    let mut h = harness();
    run(&mut h, "w");
    let reply = &run(&mut h, "rrr")[0];
    assert_eq!(
        reply.outcome,
        Err(ArmError::RepetitionDepth {
            depth: 3,
            available: 1
        })
    );
}

#[test]
fn test_repeat_with_empty_history_fails() {
    let mut h = harness();
    let reply = &run(&mut h, "r")[0];
    assert!(matches!(reply.outcome, Err(ArmError::RepetitionDepth { .. })));
}

#[test]
fn test_repeat_repeats_moves_through_undo_path() {
    let mut h = harness();
    run(&mut h, "m 1 0 0 0 0 0");
    run(&mut h, "r");
    assert_eq!(h.interpreter.state().pose_undo_stack().len(), 2);
}

#[test]
fn test_chain_executes_in_order_and_continues_after_error() {
    let mut h = harness();
    let replies = run(&mut h, "m 1 2 3 4 5 6 && bogus && w");
    assert_eq!(replies.len(), 3);
    assert!(!replies[0].is_error());
    assert_eq!(
        replies[1].outcome,
        Err(ArmError::UnknownCommand("bogus".to_string()))
    );
    assert_eq!(replies[2].output(), "pose: 1 2 3 4 5 6");
}

#[test]
fn test_chain_repeat_sees_earlier_parts() {
    let mut h = harness();
    let replies = run(&mut h, "w && r");
    assert_eq!(replies[1].input, "w");
}

#[test]
fn test_cmd_forwards_raw_text() {
    let mut h = harness();
    let reply = &run(&mut h, "cmd Straight 1 1")[0];
    assert_eq!(reply.outcome, Ok("controller: 0 Straight 1 1".to_string()));
    assert_eq!(h.backend.borrow().count("raw"), 1);
}

#[test]
fn test_adjust_grip_requires_history() {
    let mut h = harness();
    let reply = &run(&mut h, "more")[0];
    assert_eq!(reply.outcome, Err(ArmError::NoGripHistory));

    run(&mut h, "grip 0.5");
    run(&mut h, "more");
    assert_eq!(
        h.interpreter.state().current_grip,
        GripLevel::new(0.6).unwrap()
    );
    run(&mut h, "less && less");
    assert_eq!(
        h.interpreter.state().current_grip,
        GripLevel::new(0.4).unwrap()
    );
}

#[test]
fn test_set_speed_and_controller_settings() {
    let mut h = harness();
    run(&mut h, "ss 25");
    assert_eq!(h.interpreter.state().speed, 25.0);
    run(&mut h, "l && ms 50 && z");
    let backend = h.backend.borrow();
    assert_eq!(backend.count("linear"), 1);
    assert_eq!(backend.count("max-speed"), 1);
    assert_eq!(backend.count("zero-torque"), 1);
}

#[test]
fn test_history_and_clear_history() {
    let mut h = harness();
    run(&mut h, "w");
    let reply = &run(&mut h, "hi")[0];
    assert!(reply.output().contains("w  ->  pose: 0 0 0 0 0 0"));

    run(&mut h, "chi");
    assert!(h.interpreter.state().command_log().is_empty());
}

#[test]
fn test_record_three_commands_persists_three_steps() {
    let mut h = harness();
    run(&mut h, "rec demo");
    run(&mut h, "m 1 2 3 4 5 6");
    run(&mut h, "grip");
    run(&mut h, "w");
    let reply = &run(&mut h, "stop-rec")[0];
    assert!(reply.output().contains("saved (3 steps)"), "{}", reply.output());

    let saved = h.repository.saved.borrow();
    let recording = saved.get("demo").unwrap();
    assert_eq!(recording.inputs(), ["m 1 2 3 4 5 6", "grip", "w"]);
    assert_eq!(recording.outputs()[2], "pose: 1 2 3 4 5 6");
}

#[test]
fn test_record_twice_fails() {
    let mut h = harness();
    run(&mut h, "rec a");
    let reply = &run(&mut h, "rec b")[0];
    assert_eq!(reply.outcome, Err(ArmError::RecordingAlreadyActive));
    assert_eq!(
        run(&mut h, "chi && stop-record && stop-record")[2].outcome,
        Err(ArmError::NoActiveRecording)
    );
}

#[test]
fn test_failed_save_keeps_recording_in_memory() {
    let mut h = harness();
    *h.repository.fail_saves.borrow_mut() = true;
    run(&mut h, "rec demo && w");
    let reply = &run(&mut h, "stop-rec")[0];
    assert!(!reply.is_error());
    assert!(reply.output().contains("not saved"));
    assert!(h.interpreter.recorder().store().by_name("demo").is_some());
}

#[test]
fn test_playback_without_drift_is_clean() {
    let mut h = harness();
    run(&mut h, "rec demo && m 1 2 3 4 5 6 && w && stop-rec");
    run(&mut h, "u");

    let reply = &run(&mut h, "play demo")[0];
    assert!(!reply.is_error(), "{}", reply.output());
    let report = h.interpreter.last_playback().unwrap();
    assert!(report.is_clean(), "{}", report);
    assert_eq!(report.steps_run, 2);
}

#[test]
fn test_playback_reports_drift() {
    let mut h = harness();
    run(&mut h, "rec && w && stop-rec");
    h.backend.borrow_mut().pose_drift = 0.5;

    let reply = &run(&mut h, "play")[0];
    assert!(!reply.is_error());
    let report = h.interpreter.last_playback().unwrap();
    assert_eq!(report.diffs.len(), 1);
    assert_eq!(report.diffs[0].recorded, "pose: 0 0 0 0 0 0");
    assert_eq!(report.diffs[0].live, "pose: 0.5 0 0 0 0 0");
}

#[test]
fn test_play_while_recording_fails() {
    let mut h = harness();
    run(&mut h, "rec a && w && stop-rec && rec b");
    let reply = &run(&mut h, "play a")[0];
    assert_eq!(reply.outcome, Err(ArmError::RecordingInProgress));
}

#[test]
fn test_play_by_index_and_unknown_name() {
    let mut h = harness();
    run(&mut h, "rec first && w && stop-rec");
    run(&mut h, "rec second && g && stop-rec");

    run(&mut h, "play 0");
    assert_eq!(h.interpreter.last_playback().unwrap().name, "first");

    let reply = &run(&mut h, "play missing")[0];
    assert_eq!(
        reply.outcome,
        Err(ArmError::RecordingNotFound("missing".to_string()))
    );
}

#[test]
fn test_play_loads_from_repository() {
    let mut first = harness();
    run(&mut first, "rec stored && w && stop-rec");
    let repository = first.repository.clone();

    let mut h = common::harness_with(repository);
    let reply = &run(&mut h, "play stored")[0];
    assert!(!reply.is_error(), "{}", reply.output());
    assert!(h.interpreter.recorder().store().by_name("stored").is_some());
}

#[test]
fn test_exit_saves_active_recording_and_releases() {
    let mut h = harness();
    run(&mut h, "rec unfinished && w");
    let replies = run(&mut h, "exit && w");
    assert_eq!(replies.len(), 1);
    assert!(h.interpreter.is_finished());
    assert!(h.repository.saved.borrow().contains_key("unfinished"));

    let backend = h.backend.borrow();
    assert_eq!(backend.count("disable"), 1);
    assert_eq!(backend.count("disconnect"), 1);
}

#[test]
fn test_connection_loss_ends_session() {
    let mut h = harness();
    h.backend.borrow_mut().drop_connection = true;
    let replies = run(&mut h, "w && w");
    assert_eq!(replies.len(), 1);
    assert!(matches!(replies[0].outcome, Err(ArmError::Connection(_))));
    assert!(h.interpreter.is_finished());
    assert_eq!(h.backend.borrow().count("disconnect"), 1);
}

#[test]
fn test_repeat_depths_against_move_and_grip() {
    let mut h = harness();
    run(&mut h, "m 1 2 3 4 5 6");
    run(&mut h, "grip 0.5");

    assert_eq!(run(&mut h, "r")[0].input, "grip 0.5");
    // History: m, grip, grip
    assert_eq!(run(&mut h, "rrr")[0].input, "m 1 2 3 4 5 6");
    assert_eq!(h.backend.borrow().moves.len(), 2);

    let mut fresh = harness();
    run(&mut fresh, "m 1 2 3 4 5 6");
    run(&mut fresh, "grip 0.5");
    let reply = &run(&mut fresh, "rrr")[0];
    assert!(matches!(reply.outcome, Err(ArmError::RepetitionDepth { .. })));
    assert_eq!(fresh.backend.borrow().moves.len(), 1);
    assert_eq!(fresh.backend.borrow().grips.len(), 1);
}

#[test]
fn test_rejected_grip_leaves_state_unchanged() {
    let mut h = harness();
    let before = h.interpreter.state().current_grip;
    h.backend.borrow_mut().fail_grips = true;

    let reply = &run(&mut h, "grip 0.5")[0];
    assert!(matches!(reply.outcome, Err(ArmError::Backend(_))));

    let state = h.interpreter.state();
    assert_eq!(state.current_grip, before);
    assert!(state.grip_undo_stack().is_empty());
    assert_eq!(run(&mut h, "u")[0].outcome, Err(ArmError::EmptyUndoStack));
}

#[test]
fn test_rejected_undo_of_move_keeps_entry() {
    let mut h = harness();
    let target = pose([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    run(&mut h, "m 1 2 3 4 5 6");
    h.backend.borrow_mut().fail_moves = true;

    let reply = &run(&mut h, "undo")[0];
    assert!(matches!(reply.outcome, Err(ArmError::Backend(_))));
    assert_eq!(h.interpreter.state().current_pose, target);
    assert_eq!(h.interpreter.state().pose_undo_stack(), [Pose::default()]);

    h.backend.borrow_mut().fail_moves = false;
    let reply = &run(&mut h, "undo")[0];
    assert!(!reply.is_error(), "{}", reply.output());
    assert_eq!(h.interpreter.state().current_pose, Pose::default());
    assert!(h.interpreter.state().pose_undo_stack().is_empty());
}

#[test]
fn test_rejected_undo_of_grip_keeps_entry() {
    let mut h = harness();
    let before = h.interpreter.state().current_grip;
    let half = GripLevel::new(0.5).unwrap();
    run(&mut h, "grip 0.5");
    h.backend.borrow_mut().fail_grips = true;

    let reply = &run(&mut h, "undo")[0];
    assert!(matches!(reply.outcome, Err(ArmError::Backend(_))));
    assert_eq!(h.interpreter.state().current_grip, half);
    assert_eq!(h.interpreter.state().grip_undo_stack(), [before]);

    h.backend.borrow_mut().fail_grips = false;
    assert!(!run(&mut h, "undo")[0].is_error());
    assert_eq!(h.interpreter.state().current_grip, before);
}

#[test]
fn test_wait_runs_without_backend_calls() {
    let mut h = harness();
    let calls_before = h.backend.borrow().calls.len();

    let reply = &run(&mut h, "wait 0")[0];
    assert_eq!(reply.outcome, Ok("waited 0s".to_string()));
    assert_eq!(h.backend.borrow().calls.len(), calls_before);
    assert_eq!(h.interpreter.state().command_log()[0].input, "wait 0");
}

#[test]
fn test_wait_out_of_range_is_an_error() {
    let mut h = harness();
    run(&mut h, "rec kept");

    let replies = run(&mut h, "wait 1e20 && w");
    assert_eq!(replies.len(), 2);
    assert!(matches!(replies[0].outcome, Err(ArmError::Parse(_))));
    assert!(!replies[1].is_error());
    assert!(!h.interpreter.is_finished());
    assert!(h.interpreter.recorder().is_active());
}

#[test]
fn test_replayed_record_does_not_start_recording() {
    let mut h = harness();
    run(&mut h, "rec outer && rec inner && w && stop-rec");
    assert_eq!(
        h.interpreter.recorder().store().by_name("outer").unwrap().inputs(),
        ["rec inner", "w"]
    );

    let reply = &run(&mut h, "play outer")[0];
    assert!(!reply.is_error(), "{}", reply.output());
    assert!(!h.interpreter.recorder().is_active());
    assert!(h.interpreter.recorder().store().by_name("inner").is_none());

    let report = h.interpreter.last_playback().unwrap();
    assert_eq!(report.steps_run, 2);
    assert_eq!(report.diffs.len(), 1);
    assert_eq!(report.diffs[0].input, "rec inner");
    assert_eq!(
        report.diffs[0].live,
        format!("error: {}", ArmError::RecordingDuringPlayback)
    );
    assert_eq!(h.repository.saved.borrow().len(), 1);
}
