use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{
    error::ViewError,
    surface::PlayerView,
    timer::ManualClock,
    view::{share, View},
};

const INTERVAL: Duration = Duration::from_millis(550);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Tick(&'static str, TickIndex),
    Reset(&'static str),
}

type CallLog = Rc<RefCell<Vec<Call>>>;

struct RecordingView {
    name: &'static str,
    log: CallLog,
    fail_at: Option<TickIndex>,
    fail_reset: bool,
}

impl RecordingView {
    fn new(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: log.clone(),
            fail_at: None,
            fail_reset: false,
        }
    }

    fn failing_at(mut self, tick: TickIndex) -> Self {
        self.fail_at = Some(tick);
        self
    }

    fn failing_reset(mut self) -> Self {
        self.fail_reset = true;
        self
    }
}

impl View for RecordingView {
    fn tick(&mut self, tick: TickIndex) -> Result<(), ViewError> {
        if self.fail_at == Some(tick) {
            return Err(ViewError::Render(format!("{} broke", self.name)));
        }
        self.log.borrow_mut().push(Call::Tick(self.name, tick));
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ViewError> {
        if self.fail_reset {
            return Err(ViewError::Render(format!("{} broke", self.name)));
        }
        self.log.borrow_mut().push(Call::Reset(self.name));
        Ok(())
    }
}

fn ticks_of(log: &CallLog, name: &str) -> Vec<TickIndex> {
    log.borrow()
        .iter()
        .filter_map(|call| match call {
            Call::Tick(n, tick) if *n == name => Some(*tick),
            _ => None,
        })
        .collect()
}

fn resets_of(log: &CallLog, name: &str) -> usize {
    log.borrow()
        .iter()
        .filter(|call| matches!(call, Call::Reset(n) if *n == name))
        .count()
}

fn controller(
    max_ticks: usize,
    views: Vec<SharedView>,
) -> (PlaybackController<PlayerView, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let controller = PlaybackController::with_clock(
        PlaybackConfig {
            views,
            interval: INTERVAL,
            max_ticks,
        },
        PlayerView::new(max_ticks),
        clock.clone(),
    )
    .expect("controller");
    (controller, clock)
}

fn fire(controller: &mut PlaybackController<PlayerView, ManualClock>, clock: &ManualClock) {
    clock.advance(INTERVAL);
    controller.update().expect("update");
}

#[test]
fn sequential_steps_tick_every_view_in_order() {
    let log = CallLog::default();
    let first = share(RecordingView::new("first", &log));
    let second = share(RecordingView::new("second", &log));
    let (mut controller, _clock) = controller(10, vec![first, second]);

    for n in 0..4 {
        assert_eq!(controller.step().expect("step"), StepOutcome::Advanced(n));
    }

    assert_eq!(controller.current_tick(), 4);
    assert_eq!(
        *log.borrow(),
        vec![
            Call::Tick("first", 0),
            Call::Tick("second", 0),
            Call::Tick("first", 1),
            Call::Tick("second", 1),
            Call::Tick("first", 2),
            Call::Tick("second", 2),
            Call::Tick("first", 3),
            Call::Tick("second", 3),
        ]
    );
    // The readout shows the index being executed by the latest step.
    assert_eq!(controller.surface().ticks_text(), "3 of 10");
}

#[test]
fn timer_driven_run_stops_at_the_bound() {
    let log = CallLog::default();
    let view = share(RecordingView::new("view", &log));
    let (mut controller, clock) = controller(3, vec![view]);

    controller.play();
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert!(controller.surface().pause_visible());

    for _ in 0..3 {
        fire(&mut controller, &clock);
    }

    assert_eq!(ticks_of(&log, "view"), vec![0, 1, 2]);
    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert_eq!(controller.surface().ticks_text(), "3 of 3");
    assert!(controller.surface().play_visible());
    assert_eq!(controller.next_deadline(), None);

    fire(&mut controller, &clock);
    assert_eq!(controller.step().expect("step"), StepOutcome::Finished);
    assert_eq!(ticks_of(&log, "view"), vec![0, 1, 2]);
}

#[test]
fn double_play_keeps_a_single_timer() {
    let log = CallLog::default();
    let view = share(RecordingView::new("view", &log));
    let (mut controller, clock) = controller(20, vec![view]);

    controller.play();
    controller.play();
    for _ in 0..5 {
        fire(&mut controller, &clock);
    }

    assert_eq!(ticks_of(&log, "view"), vec![0, 1, 2, 3, 4]);
    assert_eq!(controller.current_tick(), 5);
}

#[test]
fn no_firing_before_a_full_period() {
    let log = CallLog::default();
    let view = share(RecordingView::new("view", &log));
    let (mut controller, clock) = controller(5, vec![view]);

    controller.play();
    clock.advance(INTERVAL - Duration::from_millis(1));
    controller.update().expect("update");

    assert!(ticks_of(&log, "view").is_empty());
    assert_eq!(controller.next_deadline(), Some(clock.now() + Duration::from_millis(1)));
}

#[test]
fn pause_then_play_resumes_from_paused_tick() {
    let log = CallLog::default();
    let view = share(RecordingView::new("view", &log));
    let (mut controller, clock) = controller(10, vec![view]);

    controller.play();
    fire(&mut controller, &clock);
    fire(&mut controller, &clock);
    controller.pause();
    assert_eq!(controller.state(), PlaybackState::Stopped);

    clock.advance(INTERVAL * 4);
    controller.update().expect("update while paused");
    assert_eq!(ticks_of(&log, "view"), vec![0, 1]);

    controller.play();
    fire(&mut controller, &clock);
    assert_eq!(ticks_of(&log, "view"), vec![0, 1, 2]);
}

#[test]
fn pause_while_stopped_is_a_no_op() {
    let (mut controller, _clock) = controller(3, Vec::new());
    controller.pause();
    controller.pause();
    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert_eq!(controller.current_tick(), 0);
}

#[test]
fn reset_rewinds_and_resets_views_once_per_call() {
    let log = CallLog::default();
    let view = share(RecordingView::new("view", &log));
    let (mut controller, clock) = controller(5, vec![view]);

    controller.step().expect("step 0");
    controller.step().expect("step 1");
    controller.step().expect("step 2");
    controller.play();
    controller.reset().expect("reset");

    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert_eq!(controller.current_tick(), 0);
    assert_eq!(controller.surface().ticks_text(), "0 of 5");
    assert_eq!(resets_of(&log, "view"), 1);

    controller.play();
    fire(&mut controller, &clock);
    assert_eq!(ticks_of(&log, "view"), vec![0, 1, 2, 0]);
}

#[test]
fn reset_twice_matches_reset_once() {
    let log = CallLog::default();
    let view = share(RecordingView::new("view", &log));
    let (mut controller, _clock) = controller(5, vec![view]);

    controller.step().expect("step");
    controller.reset().expect("first reset");
    let tick_after_first = controller.current_tick();
    let text_after_first = controller.surface().ticks_text();
    controller.reset().expect("second reset");

    assert_eq!(controller.current_tick(), tick_after_first);
    assert_eq!(controller.surface().ticks_text(), text_after_first);
    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert_eq!(resets_of(&log, "view"), 2);
}

#[test]
fn view_failure_halts_playback_and_skips_later_views() {
    let log = CallLog::default();
    let broken = share(RecordingView::new("broken", &log).failing_at(1));
    let after = share(RecordingView::new("after", &log));
    let (mut controller, clock) = controller(5, vec![broken, after]);

    controller.play();
    fire(&mut controller, &clock);

    clock.advance(INTERVAL);
    let err = controller.update().expect_err("view failure");

    assert!(matches!(
        err,
        PlaybackError::View {
            index: 0,
            tick: Some(1),
            ..
        }
    ));
    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert_eq!(controller.current_tick(), 1);
    assert_eq!(ticks_of(&log, "after"), vec![0]);
}

#[test]
fn reset_failure_is_propagated_after_rewinding() {
    let log = CallLog::default();
    let before = share(RecordingView::new("before", &log));
    let broken = share(RecordingView::new("broken", &log).failing_reset());
    let after = share(RecordingView::new("after", &log));
    let (mut controller, _clock) = controller(5, vec![before, broken, after]);

    controller.play();
    controller.step().expect("step");
    let err = controller.reset().expect_err("reset failure");

    assert!(matches!(
        err,
        PlaybackError::View {
            index: 1,
            tick: None,
            source: ViewError::Render(_),
        }
    ));
    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert_eq!(controller.current_tick(), 0);
    assert_eq!(controller.surface().ticks_text(), "0 of 5");
    assert_eq!(resets_of(&log, "before"), 1);
    assert_eq!(resets_of(&log, "after"), 0);
}

#[test]
fn reset_failure_message_names_the_reset() {
    let log = CallLog::default();
    let broken = share(RecordingView::new("broken", &log).failing_reset());
    let (mut controller, _clock) = controller(5, vec![share(RecordingView::new("ok", &log)), broken]);

    let err = controller.reset().expect_err("reset failure");
    assert_eq!(
        err.to_string(),
        "view #1 failed at reset: render failure: broken broke"
    );
}

#[test]
fn intents_from_the_surface_drive_the_controller() {
    let log = CallLog::default();
    let view = share(RecordingView::new("view", &log));
    let (mut controller, clock) = controller(5, vec![view]);

    let buttons = controller.surface().intents();
    buttons.send(PlayerIntent::Step);
    buttons.send(PlayerIntent::Play);
    controller.update().expect("update");

    assert_eq!(ticks_of(&log, "view"), vec![0]);
    assert_eq!(controller.state(), PlaybackState::Playing);

    fire(&mut controller, &clock);
    assert_eq!(ticks_of(&log, "view"), vec![0, 1]);

    buttons.send(PlayerIntent::Reset);
    controller.update().expect("update");
    assert_eq!(resets_of(&log, "view"), 1);
    assert_eq!(controller.state(), PlaybackState::Stopped);
}

#[test]
fn pause_queued_before_a_due_firing_cancels_it() {
    let log = CallLog::default();
    let view = share(RecordingView::new("view", &log));
    let (mut controller, clock) = controller(5, vec![view]);

    controller.play();
    clock.advance(INTERVAL);
    controller.surface().intents().send(PlayerIntent::Pause);
    controller.update().expect("update");

    assert!(ticks_of(&log, "view").is_empty());
    assert_eq!(controller.state(), PlaybackState::Stopped);
}

#[test]
fn zero_ticks_finishes_immediately() {
    let log = CallLog::default();
    let view = share(RecordingView::new("view", &log));
    let (mut controller, clock) = controller(0, vec![view]);

    controller.play();
    fire(&mut controller, &clock);

    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert!(ticks_of(&log, "view").is_empty());
    assert_eq!(controller.surface().ticks_text(), "0 of 0");
}

#[test]
fn zero_interval_is_rejected() {
    let result = PlaybackController::with_clock(
        PlaybackConfig {
            views: Vec::new(),
            interval: Duration::ZERO,
            max_ticks: 3,
        },
        PlayerView::new(3),
        ManualClock::new(),
    );
    assert!(matches!(result, Err(PlaybackError::InvalidInterval)));
}

#[test]
fn busy_view_is_reported_instead_of_panicking() {
    let log = CallLog::default();
    let view = share(RecordingView::new("view", &log));
    let (mut controller, _clock) = controller(5, vec![view.clone()]);

    let _held = view.borrow_mut();
    let err = controller.step().expect_err("busy");
    assert!(matches!(err, PlaybackError::ViewBusy { index: 0 }));
}
