use atlas_shared::pointer::TimerCommand;
use gloo_timers::callback::Timeout;

/// Runs the hover controller's timer commands. At most one timer is
/// pending; dropping a `Timeout` clears it.
#[derive(Default)]
pub struct HoverDebounce {
    pending: Option<(u64, Timeout)>,
}

impl HoverDebounce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, commands: Vec<TimerCommand>, on_fire: impl Fn(u64) + Clone + 'static) {
        for command in commands {
            match command {
                TimerCommand::Arm { token, delay } => {
                    let on_fire = on_fire.clone();
                    let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
                    let timeout = Timeout::new(millis, move || on_fire(token));
                    self.pending = Some((token, timeout));
                }
                TimerCommand::Cancel(token) => {
                    if matches!(self.pending, Some((pending, _)) if pending == token) {
                        self.pending = None;
                    }
                }
            }
        }
    }

    pub fn cancel_all(&mut self) {
        self.pending = None;
    }
}
