use std::marker::PhantomData;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Elm-style runtime: one thread folds events into state, every effect runs
/// on its own worker thread and reports back through the event channel.
pub struct StateMachine<TState, TEvent, TEffect, T, R, E, X>
where
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>) + Send + Sync,
    R: Fn(&TState) + Send + Sync,
    E: Fn(TEffect, Sender<TEvent>) + Send + Sync,
    X: Fn(&TState) -> bool + Send + Sync,
{
    init: (TState, Vec<TEffect>),
    transition_fn: Arc<T>,
    render_fn: Arc<R>,
    run_effect_fn: Arc<E>,
    is_done_fn: Arc<X>,
    event_sender: Sender<TEvent>,
    event_receiver: Receiver<TEvent>,
    _event: PhantomData<TEvent>,
}

impl<TState, TEvent, TEffect, T, R, E, X> StateMachine<TState, TEvent, TEffect, T, R, E, X>
where
    TState: Send + 'static,
    TEvent: Send + 'static,
    TEffect: Send + 'static,
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>) + Send + Sync + 'static,
    R: Fn(&TState) + Send + Sync + 'static,
    E: Fn(TEffect, Sender<TEvent>) + Send + Sync + 'static,
    X: Fn(&TState) -> bool + Send + Sync + 'static,
{
    pub fn new(
        init: (TState, Vec<TEffect>),
        transition_fn: T,
        render_fn: R,
        run_effect_fn: E,
        is_done_fn: X,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        Self {
            init,
            transition_fn: Arc::new(transition_fn),
            render_fn: Arc::new(render_fn),
            run_effect_fn: Arc::new(run_effect_fn),
            is_done_fn: Arc::new(is_done_fn),
            event_sender,
            event_receiver,
            _event: PhantomData,
        }
    }

    /// Handle for posting events from outside the machine.
    #[cfg(test)]
    pub fn sender(&self) -> Sender<TEvent> {
        self.event_sender.clone()
    }

    /// Runs until the state reports it is done and returns that final state.
    pub fn run(self) -> Result<TState, Box<dyn std::error::Error + Send + Sync>> {
        let StateMachine {
            init,
            transition_fn,
            render_fn,
            run_effect_fn,
            is_done_fn,
            event_sender,
            event_receiver,
            ..
        } = self;

        let (mut state, effects) = init;
        render_fn(&state);
        spawn_effects(&run_effect_fn, &event_sender, effects);

        while !is_done_fn(&state) {
            let event = event_receiver.recv()?;
            let (new_state, effects) = transition_fn(state, event);
            state = new_state;
            render_fn(&state);
            spawn_effects(&run_effect_fn, &event_sender, effects);
        }

        Ok(state)
    }
}

fn spawn_effects<TEvent, TEffect, E>(
    run_effect_fn: &Arc<E>,
    event_sender: &Sender<TEvent>,
    effects: Vec<TEffect>,
) where
    TEvent: Send + 'static,
    TEffect: Send + 'static,
    E: Fn(TEffect, Sender<TEvent>) + Send + Sync + 'static,
{
    for effect in effects {
        let effect_sender = event_sender.clone();
        let run_effect_fn = Arc::clone(run_effect_fn);
        std::thread::spawn(move || {
            run_effect_fn(effect, effect_sender);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug)]
    enum Event {
        Added(u32),
    }

    #[test]
    fn folds_effect_results_until_done() {
        let rendered = Arc::new(Mutex::new(Vec::new()));
        let rendered_clone = Arc::clone(&rendered);

        let machine = StateMachine::new(
            (0u32, vec![1u32]),
            |state: u32, event: Event| match event {
                Event::Added(n) => (state + n, if state + n < 6 { vec![n + 1] } else { vec![] }),
            },
            move |state: &u32| rendered_clone.lock().unwrap().push(*state),
            |effect: u32, sender: Sender<Event>| {
                let _ = sender.send(Event::Added(effect));
            },
            |state: &u32| *state >= 6,
        );

        let final_state = machine.run().unwrap();

        assert_eq!(final_state, 6);
        assert_eq!(*rendered.lock().unwrap(), vec![0, 1, 3, 6]);
    }

    #[test]
    fn external_events_reach_the_transition() {
        let machine = StateMachine::new(
            (0u32, vec![]),
            |state: u32, event: Event| match event {
                Event::Added(n) => (state + n, vec![]),
            },
            |_: &u32| {},
            |_: (), _: Sender<Event>| {},
            |state: &u32| *state > 0,
        );

        machine.sender().send(Event::Added(4)).unwrap();

        assert_eq!(machine.run().unwrap(), 4);
    }
}
