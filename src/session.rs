//! # Pilot Session
//!
//! Glue between touch events and their two side effects: the indicator
//! frame and the command message. Every state-changing event produces
//! exactly one of each.

use tokio::task::JoinHandle;
use tracing::trace;

use crate::cockpit::Cockpit;
use crate::input::TouchEvent;
use crate::pad::PadId;
use crate::render::IndicatorRenderer;
use crate::transport::dispatcher::Dispatcher;
use crate::transport::protocol::Message;

/// Live control session.
///
/// Commands are sent whether or not the heartbeat is running.
pub struct Session<R: IndicatorRenderer> {
    cockpit: Cockpit,
    renderer: R,
    dispatcher: Dispatcher,
}

impl<R: IndicatorRenderer> Session<R> {
    /// Creates the session and draws both pads at rest.
    pub fn new(cockpit: Cockpit, renderer: R, dispatcher: Dispatcher) -> Self {
        let mut session = Self {
            cockpit,
            renderer,
            dispatcher,
        };
        for id in PadId::ALL {
            let indicator = session.cockpit.resting_indicator(id);
            let bounds = *session.cockpit.pad(id).bounds();
            session.renderer.draw(id, &bounds, &indicator);
        }
        session
    }

    #[must_use]
    pub fn cockpit(&self) -> &Cockpit {
        &self.cockpit
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Applies one event, redraws the pad and sends its axes.
    ///
    /// # Returns
    ///
    /// The delivery task of the command, or `None` if the event changed
    /// nothing.
    pub fn handle_event(&mut self, event: &TouchEvent) -> Option<JoinHandle<()>> {
        let Some(update) = self.cockpit.handle(event) else {
            trace!("Ignored {:?}", event);
            return None;
        };

        let bounds = *self.cockpit.pad(update.pad).bounds();
        self.renderer.draw(update.pad, &bounds, &update.indicator);
        Some(self.dispatcher.dispatch(Message::command(update.command)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::mapper::CommandMapper;
    use crate::control::state::AxisUpdate;
    use crate::pad::{Indicator, Offset, Rect};
    use crate::render::mocks::RecordingRenderer;
    use crate::transport::sink::mocks::RecordingSink;
    use std::sync::Arc;

    fn session(sink: &RecordingSink) -> Session<RecordingRenderer> {
        let cockpit = Cockpit::new(
            Rect::new(0.0, 0.0, 300.0, 300.0),
            Rect::new(500.0, 0.0, 300.0, 300.0),
            CommandMapper::default(),
        );
        Session::new(
            cockpit,
            RecordingRenderer::default(),
            Dispatcher::new(Arc::new(sink.clone())),
        )
    }

    // ==== Startup Tests ====

    #[tokio::test]
    async fn test_new_draws_resting_indicators() {
        let sink = RecordingSink::new();
        let session = session(&sink);

        assert_eq!(session.renderer().frames.len(), 2);
        // Throttle starts at 1000, so the left indicator rests at the bottom
        assert_eq!(
            session.renderer().last(PadId::Left),
            Some(Indicator::at(Offset::new(150.0, 300.0)))
        );
        assert_eq!(
            session.renderer().last(PadId::Right),
            Some(Indicator::at(Offset::new(150.0, 150.0)))
        );
        assert!(sink.messages().is_empty());
    }

    // ==== Event Tests ====

    #[tokio::test]
    async fn test_start_sends_nothing() {
        let sink = RecordingSink::new();
        let mut session = session(&sink);

        assert!(session.handle_event(&TouchEvent::Start { pad: PadId::Left }).is_none());
        assert_eq!(session.renderer().frames.len(), 2);
        assert!(sink.messages().is_empty());
    }

    #[tokio::test]
    async fn test_move_draws_and_sends() {
        let sink = RecordingSink::new();
        let mut session = session(&sink);

        session.handle_event(&TouchEvent::Start { pad: PadId::Right });
        let handle = session
            .handle_event(&TouchEvent::Move { pad: PadId::Right, x: 650.0, y: 75.0 })
            .unwrap();
        handle.await.unwrap();

        assert_eq!(
            session.renderer().last(PadId::Right),
            Some(Indicator::at(Offset::new(150.0, 75.0)))
        );
        assert_eq!(
            sink.messages(),
            vec![Message::command(AxisUpdate::PitchRoll { pitch: 1750, roll: 1500 })]
        );
    }

    #[tokio::test]
    async fn test_move_without_press_is_ignored() {
        let sink = RecordingSink::new();
        let mut session = session(&sink);

        let handle = session.handle_event(&TouchEvent::Move { pad: PadId::Left, x: 10.0, y: 10.0 });
        assert!(handle.is_none());
        assert!(sink.messages().is_empty());
    }

    #[tokio::test]
    async fn test_full_left_gesture() {
        let sink = RecordingSink::new();
        let mut session = session(&sink);

        session.handle_event(&TouchEvent::Start { pad: PadId::Left });
        session
            .handle_event(&TouchEvent::Move { pad: PadId::Left, x: 300.0, y: 0.0 })
            .unwrap()
            .await
            .unwrap();
        session
            .handle_event(&TouchEvent::End { pad: PadId::Left })
            .unwrap()
            .await
            .unwrap();

        assert_eq!(
            sink.messages(),
            vec![
                Message::command(AxisUpdate::ThrottleYaw { throttle: 2000, yaw: 2000 }),
                Message::command(AxisUpdate::ThrottleYaw { throttle: 1500, yaw: 1500 }),
            ]
        );
        // Capped throttle of 1500 rests the indicator at mid height
        assert_eq!(
            session.renderer().last(PadId::Left),
            Some(Indicator::at(Offset::new(150.0, 150.0)))
        );
        assert!(!session.cockpit().pad(PadId::Left).is_pressed());
    }
}
