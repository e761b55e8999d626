//! The two periodic drivers of a session. Time is fed in explicitly so the same
//! elapsed durations always produce the same firing sequence.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Movement, pursuit and terminal checks (~60 Hz).
    Update,
    /// Score accrual (1 Hz).
    Score,
}

#[derive(Clone, Debug)]
struct PeriodicTask {
    task: Task,
    period: Duration,
    until_next: Duration,
    active: bool,
}

impl PeriodicTask {
    fn new(task: Task, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            task,
            period,
            until_next: period,
            active: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Scheduler {
    tasks: [PeriodicTask; 2],
}

impl Scheduler {
    pub fn new(update_every: Duration, score_every: Duration) -> Self {
        Self {
            tasks: [
                PeriodicTask::new(Task::Update, update_every),
                PeriodicTask::new(Task::Score, score_every),
            ],
        }
    }

    pub fn is_running(&self, task: Task) -> bool {
        self.tasks.iter().any(|t| t.task == task && t.active)
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.iter().all(|t| !t.active)
    }

    pub fn stop(&mut self, task: Task) {
        for t in self.tasks.iter_mut().filter(|t| t.task == task) {
            t.active = false;
        }
    }

    /// Advances the clock by `elapsed` and returns every firing in time order.
    /// Simultaneous firings keep declaration order (`Update` before `Score`).
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Task> {
        let mut fired = Vec::new();
        let mut remaining = elapsed;
        loop {
            let Some(next) = self
                .tasks
                .iter()
                .filter(|t| t.active)
                .map(|t| t.until_next)
                .min()
            else {
                break;
            };
            if next > remaining {
                for t in self.tasks.iter_mut().filter(|t| t.active) {
                    t.until_next -= remaining;
                }
                break;
            }
            remaining -= next;
            for t in self.tasks.iter_mut().filter(|t| t.active) {
                t.until_next -= next;
                if t.until_next.is_zero() {
                    fired.push(t.task);
                    t.until_next = t.period;
                }
            }
        }
        fired
    }
}
