use super::pacing::FramePacer;
use crate::error::{ConfigError, WaveError};
use crate::wave::WaveView;
use std::{
    sync::{Arc, Condvar, Mutex},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

/// Receives a notification every time a new frame is ready to be drawn.
///
/// This is called from inside the tick, with the scheduler's internal lock held: implementations
/// must not call back into the scheduler. Sending on a channel is the intended use.
pub trait RedrawSink: Send + Sync {
    fn request_redraw(&self);
}

impl<F> RedrawSink for F
where
    F: Fn() + Send + Sync,
{
    fn request_redraw(&self) {
        self()
    }
}

/// Whether ticks are being scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// A handle on one scheduled tick. It's only honored while it's the pending one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickTicket(u64);

/// The result of firing a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new frame was traced and a redraw requested.
    Rendered { next_delay: Duration },

    /// The view isn't measured yet; the tick was rescheduled without drawing anything.
    Deferred { next_delay: Duration },

    /// The ticket was stale: the scheduler was stopped or restarted since it was issued.
    Cancelled,
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    ticket: TickTicket,
    due: Instant,
}

#[derive(Debug)]
struct Control {
    state: SchedulerState,
    pending: Option<Pending>,
    next_ticket: u64,
    pacer: FramePacer,
    ticks: u64,
    shutdown: bool,
}

impl Control {
    fn schedule(&mut self, delay: Duration) -> TickTicket {
        let ticket = TickTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(Pending { ticket, due: Instant::now() + delay });
        ticket
    }
}

struct Shared {
    control: Mutex<Control>,
    wakeup: Condvar,
    view: Arc<Mutex<WaveView>>,
    sink: Box<dyn RedrawSink>,
}

impl Shared {
    fn fire(&self, ticket: TickTicket) -> TickOutcome {
        // The control lock is held for the whole tick so stopping waits for an in flight tick.
        let mut control = self.control.lock().unwrap();
        let current = control.pending.map(|pending| pending.ticket);
        if control.state != SchedulerState::Running || current != Some(ticket) {
            return TickOutcome::Cancelled;
        }
        control.pending = None;

        let started = Instant::now();
        let rendered = self.view.lock().unwrap().tick();
        if rendered {
            self.sink.request_redraw();
        }
        let cost = started.elapsed();
        let next_delay = control.pacer.next_delay(cost);
        control.ticks += 1;
        control.schedule(next_delay);
        log::trace!("tick #{} took {cost:?}, next in {next_delay:?}", control.ticks);

        if rendered { TickOutcome::Rendered { next_delay } } else { TickOutcome::Deferred { next_delay } }
    }

    fn run(&self) {
        loop {
            let ticket = {
                let mut control = self.control.lock().unwrap();
                loop {
                    if control.shutdown {
                        return;
                    }
                    let pending = control.pending;
                    match pending {
                        Some(pending) => {
                            let now = Instant::now();
                            if pending.due <= now {
                                break pending.ticket;
                            }
                            control = self.wakeup.wait_timeout(control, pending.due - now).unwrap().0;
                        }
                        None => control = self.wakeup.wait(control).unwrap(),
                    }
                }
            };
            self.fire(ticket);
        }
    }
}

/// Drives a [WaveView]: advances it on a fixed cadence and asks the host to redraw.
///
/// The scheduler is either stopped or running. Starting schedules a tick right away; every tick
/// then schedules the next one `interval` minus its own cost later. Stopping cancels the pending
/// tick, and once [AnimationScheduler::stop] returns no tick will touch the view again.
///
/// Ticks can be driven by a dedicated thread ([AnimationScheduler::spawn]) or by the host itself
/// ([AnimationScheduler::manual]) using [AnimationScheduler::pending_tick] and
/// [AnimationScheduler::fire].
pub struct AnimationScheduler {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl AnimationScheduler {
    /// A scheduler whose ticks are fired by the caller.
    pub fn manual(view: Arc<Mutex<WaveView>>, sink: impl RedrawSink + 'static, interval: Duration) -> Self {
        let control = Control {
            state: SchedulerState::Stopped,
            pending: None,
            next_ticket: 0,
            pacer: FramePacer::new(interval),
            ticks: 0,
            shutdown: false,
        };
        let shared = Shared { control: Mutex::new(control), wakeup: Condvar::new(), view, sink: Box::new(sink) };
        Self { shared: Arc::new(shared), worker: None }
    }

    /// A scheduler with its own ticking thread. It starts out stopped.
    pub fn spawn(
        view: Arc<Mutex<WaveView>>,
        sink: impl RedrawSink + 'static,
        interval: Duration,
    ) -> Result<Self, WaveError> {
        let mut scheduler = Self::manual(view, sink, interval);
        let shared = scheduler.shared.clone();
        let worker = thread::Builder::new()
            .name("circlewave-ticker".into())
            .spawn(move || shared.run())
            .map_err(WaveError::SchedulerSpawn)?;
        scheduler.worker = Some(worker);
        Ok(scheduler)
    }

    /// Start ticking, firing the first tick immediately.
    ///
    /// Starting an already running scheduler replaces its pending tick rather than adding one.
    pub fn start(&self) {
        let mut control = self.shared.control.lock().unwrap();
        if control.state == SchedulerState::Stopped {
            log::info!("animation started, interval {:?}", control.pacer.interval());
        }
        control.state = SchedulerState::Running;
        control.schedule(Duration::ZERO);
        self.shared.wakeup.notify_all();
    }

    /// Stop ticking and cancel the pending tick.
    pub fn stop(&self) {
        let mut control = self.shared.control.lock().unwrap();
        if control.state == SchedulerState::Running {
            log::info!("animation stopped after {} ticks", control.ticks);
        }
        control.state = SchedulerState::Stopped;
        control.pending = None;
        self.shared.wakeup.notify_all();
    }

    pub fn on_become_visible(&self) {
        self.start();
    }

    pub fn on_become_hidden(&self) {
        self.stop();
    }

    /// Turn the animation on or off.
    pub fn refresh_progress(&self, enable: bool) {
        if enable {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Change the target delay between ticks. Takes effect when the next tick is scheduled.
    pub fn set_refresh_interval(&self, interval: Duration) -> Result<(), ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::InvalidRefreshInterval);
        }
        self.shared.control.lock().unwrap().pacer.set_interval(interval);
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        self.shared.control.lock().unwrap().pacer.interval()
    }

    pub fn state(&self) -> SchedulerState {
        self.shared.control.lock().unwrap().state
    }

    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// The tick waiting to be fired, if any.
    pub fn pending_tick(&self) -> Option<TickTicket> {
        self.shared.control.lock().unwrap().pending.map(|pending| pending.ticket)
    }

    /// When the pending tick is due.
    pub fn next_due(&self) -> Option<Instant> {
        self.shared.control.lock().unwrap().pending.map(|pending| pending.due)
    }

    /// Run the tick behind `ticket` now, if it's still the pending one.
    pub fn fire(&self, ticket: TickTicket) -> TickOutcome {
        self.shared.fire(ticket)
    }

    /// How many ticks ran so far.
    pub fn ticks(&self) -> u64 {
        self.shared.control.lock().unwrap().ticks
    }

    pub fn view(&self) -> &Arc<Mutex<WaveView>> {
        &self.shared.view
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        {
            let mut control = self.shared.control.lock().unwrap();
            control.shutdown = true;
            control.pending = None;
        }
        self.shared.wakeup.notify_all();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WaveConfig;
    use crate::wave::Viewport;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const INTERVAL: Duration = Duration::from_millis(25);

    struct Fixture {
        scheduler: AnimationScheduler,
        redraws: Arc<AtomicUsize>,
    }

    impl Fixture {
        fn new(viewport: Viewport) -> Self {
            let mut view = WaveView::new(&WaveConfig::default()).expect("invalid config");
            view.set_viewport(viewport);
            let redraws = Arc::new(AtomicUsize::new(0));
            let counter = redraws.clone();
            let sink = move || {
                counter.fetch_add(1, Ordering::SeqCst);
            };
            let scheduler = AnimationScheduler::manual(Arc::new(Mutex::new(view)), sink, INTERVAL);
            Self { scheduler, redraws }
        }

        fn redraws(&self) -> usize {
            self.redraws.load(Ordering::SeqCst)
        }

        fn phases(&self) -> Vec<f32> {
            self.scheduler.view().lock().unwrap().clock().phases()
        }

        fn fire_pending(&self) -> TickOutcome {
            let ticket = self.scheduler.pending_tick().expect("nothing pending");
            self.scheduler.fire(ticket)
        }
    }

    #[test]
    fn starts_stopped() {
        let fixture = Fixture::new(Viewport::sized(100, 100));
        assert_eq!(fixture.scheduler.state(), SchedulerState::Stopped);
        assert_eq!(fixture.scheduler.pending_tick(), None);
    }

    #[test]
    fn first_tick_is_immediate() {
        let fixture = Fixture::new(Viewport::sized(100, 100));
        let before = Instant::now();
        fixture.scheduler.start();
        let due = fixture.scheduler.next_due().expect("nothing pending");
        assert!(due <= Instant::now());
        assert!(due >= before);
    }

    #[test]
    fn tick_renders_and_reschedules() {
        let fixture = Fixture::new(Viewport::sized(100, 100));
        fixture.scheduler.start();
        let outcome = fixture.fire_pending();

        let TickOutcome::Rendered { next_delay } = outcome else {
            panic!("unexpected outcome: {outcome:?}");
        };
        assert!(next_delay <= INTERVAL);
        assert_eq!(fixture.redraws(), 1);
        assert_eq!(fixture.scheduler.ticks(), 1);
        assert!(fixture.scheduler.pending_tick().is_some());
        assert!(!fixture.scheduler.view().lock().unwrap().geometry().is_empty());
    }

    #[test]
    fn unmeasured_view_defers() {
        let fixture = Fixture::new(Viewport::sized(0, 0));
        fixture.scheduler.start();
        assert!(matches!(fixture.fire_pending(), TickOutcome::Deferred { .. }));
        assert_eq!(fixture.redraws(), 0);
        assert!(fixture.scheduler.pending_tick().is_some());

        // sizing the view later gets picked up by the next tick
        fixture.scheduler.view().lock().unwrap().set_viewport(Viewport::sized(100, 100));
        assert!(matches!(fixture.fire_pending(), TickOutcome::Rendered { .. }));
        assert_eq!(fixture.redraws(), 1);
    }

    #[test]
    fn stale_ticket_after_stop_is_ignored() {
        let fixture = Fixture::new(Viewport::sized(100, 100));
        fixture.scheduler.start();
        fixture.fire_pending();
        let pending = fixture.scheduler.pending_tick().expect("nothing pending");
        let phases = fixture.phases();

        fixture.scheduler.stop();
        assert_eq!(fixture.scheduler.fire(pending), TickOutcome::Cancelled);
        assert_eq!(fixture.redraws(), 1);
        assert_eq!(fixture.phases(), phases);
        assert_eq!(fixture.scheduler.pending_tick(), None);
    }

    #[test]
    fn restart_does_not_double_schedule() {
        let fixture = Fixture::new(Viewport::sized(100, 100));
        fixture.scheduler.start();
        let first = fixture.scheduler.pending_tick().expect("nothing pending");
        fixture.scheduler.start();
        let second = fixture.scheduler.pending_tick().expect("nothing pending");

        assert_ne!(first, second);
        assert_eq!(fixture.scheduler.fire(first), TickOutcome::Cancelled);
        assert!(matches!(fixture.scheduler.fire(second), TickOutcome::Rendered { .. }));
        assert_eq!(fixture.redraws(), 1);
    }

    #[test]
    fn ticket_fires_once() {
        let fixture = Fixture::new(Viewport::sized(100, 100));
        fixture.scheduler.start();
        let ticket = fixture.scheduler.pending_tick().expect("nothing pending");
        fixture.scheduler.fire(ticket);
        assert_eq!(fixture.scheduler.fire(ticket), TickOutcome::Cancelled);
        assert_eq!(fixture.scheduler.ticks(), 1);
    }

    #[test]
    fn visibility_toggles_state() {
        let fixture = Fixture::new(Viewport::sized(100, 100));
        fixture.scheduler.on_become_visible();
        assert!(fixture.scheduler.is_running());
        fixture.scheduler.on_become_hidden();
        assert!(!fixture.scheduler.is_running());
        fixture.scheduler.refresh_progress(true);
        assert!(fixture.scheduler.is_running());
        fixture.scheduler.refresh_progress(false);
        assert_eq!(fixture.scheduler.pending_tick(), None);
    }

    #[test]
    fn refresh_interval() {
        let fixture = Fixture::new(Viewport::sized(100, 100));
        fixture.scheduler.set_refresh_interval(Duration::from_millis(60)).expect("rejected");
        assert_eq!(fixture.scheduler.refresh_interval(), Duration::from_millis(60));
        assert!(fixture.scheduler.set_refresh_interval(Duration::ZERO).is_err());
        assert_eq!(fixture.scheduler.refresh_interval(), Duration::from_millis(60));
    }

    #[test]
    fn threaded_ticks_stop_cleanly() {
        let mut view = WaveView::new(&WaveConfig::default()).expect("invalid config");
        view.set_viewport(Viewport::sized(100, 100));
        let view = Arc::new(Mutex::new(view));
        let redraws = Arc::new(AtomicUsize::new(0));
        let counter = redraws.clone();
        let sink = move || {
            counter.fetch_add(1, Ordering::SeqCst);
        };
        let scheduler = AnimationScheduler::spawn(view.clone(), sink, Duration::from_millis(2)).expect("spawn failed");

        scheduler.start();
        thread::sleep(Duration::from_millis(100));
        scheduler.stop();
        let after_stop = redraws.load(Ordering::SeqCst);
        let phases = view.lock().unwrap().clock().phases();
        assert!(after_stop > 0);

        thread::sleep(Duration::from_millis(50));
        assert_eq!(redraws.load(Ordering::SeqCst), after_stop);
        assert_eq!(view.lock().unwrap().clock().phases(), phases);
        drop(scheduler);
    }
}
