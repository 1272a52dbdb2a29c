use std::time::Duration;

/// Interval between countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Registers and cancels the periodic countdown timer.
///
/// Each tick the scheduler delivers must carry the `generation` it was started
/// with; the trigger drops ticks whose generation does not match the active
/// session. `stop` must take effect before it returns: once it has been
/// called, no further tick from that registration may be delivered.
pub trait TickScheduler {
    fn start(&mut self, generation: u64, period: Duration);
    fn stop(&mut self);
}
