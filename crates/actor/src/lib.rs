//! A lightweight actor framework.
//!
//! An actor owns a piece of state and processes messages sent to it one
//! at a time, so the state is only ever touched from a single logical
//! thread even when the runtime has many workers.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod error;
mod handle;
mod mailbox;
mod scheduler;

pub use error::ActorDeadError;
pub use handle::Actor;
pub use mailbox::Message;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[derive(Default)]
    struct Counter {
        value: u32,
    }

    #[derive(Debug)]
    struct Add(u32);

    impl Message<Counter> for Add {
        fn handle(self, state: &mut Counter, _handle: &Actor<Counter>) {
            state.value += self.0;
        }
    }

    #[derive(Debug)]
    struct AddTwiceLater(u32);

    impl Message<Counter> for AddTwiceLater {
        fn handle(self, state: &mut Counter, handle: &Actor<Counter>) {
            state.value += self.0;
            handle.send(Add(self.0)).unwrap();
        }
    }

    #[tokio::test]
    async fn test_send_message() {
        let actor = Actor::spawn(Counter::default(), "counter");
        actor.send(Add(40)).unwrap();
        actor.send(Add(2)).unwrap();

        let value = actor.ask(|state| state.value).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_send_from_handler() {
        let actor = Actor::spawn(Counter::default(), "counter");
        actor.send(AddTwiceLater(5)).unwrap();

        // The follow-up message is queued behind the first query.
        let _ = actor.ask(|_| ()).await.unwrap();
        let value = actor.ask(|state| state.value).await.unwrap();
        assert_eq!(value, 10);
    }

    #[tokio::test]
    async fn test_stop() {
        let actor = Actor::spawn(Counter::default(), "counter");
        actor.stop();

        let result = timeout(Duration::from_millis(500), async {
            while actor.is_alive() {
                tokio::task::yield_now().await;
            }
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(actor.send(Add(1)), Err(ActorDeadError));
        assert_eq!(actor.ask(|state| state.value).await, Err(ActorDeadError));
    }
}
