//! Bounded dragging of a single element inside a container.
//!
//! A drag is an explicit [`DragSession`] value with pure transitions:
//!
//! ```text
//! start(origin) ──► update(translation, container, element)* ──► end() ──► committed
//! ```
//!
//! Updates only move the live position used for visual feedback. The owning
//! [`BoundedDragController`] exposes the committed position, which changes
//! exactly once per gesture, on end (or cancel).

use serde::{Deserialize, Serialize};

use crate::event::{TouchEvent, TouchPhase, TouchPoint};
use crate::geometry::{Offset, Position, Size};
use crate::{BrewError, BrewResult};

/// Visual lift applied while an element is held.
pub const DEFAULT_LIFT_SCALE: f32 = 1.02;

/// Ephemeral state of one drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    /// Element position when the gesture began.
    pub origin: Position,
    /// Pointer translation since the gesture began.
    pub live_offset: Offset,
    /// Transient scale for the lift effect. Never committed.
    pub live_scale: f32,
    /// Last clamped candidate position.
    pub last_position: Position,
}

impl DragSession {
    /// Begin a gesture at the element's current position.
    #[must_use]
    pub fn start(origin: Position, lift_scale: f32) -> Self {
        Self {
            origin,
            live_offset: Offset::ZERO,
            live_scale: lift_scale,
            last_position: origin,
        }
    }

    /// Apply a cumulative translation and clamp into the container.
    ///
    /// Non-finite translations are dropped and the previous live position is
    /// returned unchanged.
    pub fn update(&mut self, translation: Offset, container: Size, element: Size) -> Position {
        if !translation.is_finite() {
            tracing::warn!("Ignoring non-finite drag translation: {:?}", translation);
            return self.last_position;
        }
        self.live_offset = translation;
        self.last_position = self
            .origin
            .offset_by(translation)
            .clamp_within(container, element);
        self.last_position
    }

    /// Pull the live position back inside a container that changed
    /// mid-gesture.
    pub fn reclamp(&mut self, container: Size, element: Size) {
        self.last_position = self.last_position.clamp_within(container, element);
    }

    /// Finish the gesture, yielding the position to commit.
    #[must_use]
    pub fn end(self) -> Position {
        self.last_position
    }
}

/// What a touch event did to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// A new session began.
    Started,
    /// The live position moved.
    Moved(Position),
    /// The gesture finished and this position was committed.
    Committed(Position),
    /// The event did not apply (no session, foreign touch, or busy).
    Ignored,
}

/// Tracks one draggable element: its committed position and at most one
/// live drag session.
#[derive(Debug, Clone)]
pub struct BoundedDragController {
    committed: Position,
    session: Option<DragSession>,
    lift_scale: f32,
    anchor: Option<TouchPoint>,
}

impl BoundedDragController {
    /// Create a controller with an initial committed position.
    #[must_use]
    pub fn new(initial: Position) -> Self {
        Self {
            committed: initial,
            session: None,
            lift_scale: DEFAULT_LIFT_SCALE,
            anchor: None,
        }
    }

    /// Override the lift scale used during drags.
    #[must_use]
    pub fn with_lift_scale(mut self, lift_scale: f32) -> Self {
        self.lift_scale = lift_scale;
        self
    }

    /// The committed position.
    #[must_use]
    pub const fn committed(&self) -> Position {
        self.committed
    }

    /// The active session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Position to draw right now: live while dragging, committed otherwise.
    #[must_use]
    pub fn live_position(&self) -> Position {
        self.session
            .as_ref()
            .map_or(self.committed, |s| s.last_position)
    }

    /// Scale to draw right now (1.0 when idle).
    #[must_use]
    pub fn visual_scale(&self) -> f32 {
        self.session.as_ref().map_or(1.0, |s| s.live_scale)
    }

    /// Start a gesture from the committed position.
    ///
    /// # Errors
    ///
    /// Returns [`BrewError::DragInProgress`] if a gesture is already active.
    pub fn start(&mut self) -> BrewResult<&DragSession> {
        if self.session.is_some() {
            return Err(BrewError::DragInProgress);
        }
        tracing::debug!("Drag start at ({}, {})", self.committed.x, self.committed.y);
        let session = self
            .session
            .insert(DragSession::start(self.committed, self.lift_scale));
        Ok(&*session)
    }

    /// Feed a cumulative translation.
    ///
    /// # Errors
    ///
    /// Returns [`BrewError::NoActiveDrag`] without a started gesture.
    pub fn update(
        &mut self,
        translation: Offset,
        container: Size,
        element: Size,
    ) -> BrewResult<Position> {
        let session = self.session.as_mut().ok_or(BrewError::NoActiveDrag)?;
        Ok(session.update(translation, container, element))
    }

    /// End the gesture and commit its last clamped position.
    ///
    /// # Errors
    ///
    /// Returns [`BrewError::NoActiveDrag`] without a started gesture.
    pub fn end(&mut self) -> BrewResult<Position> {
        let session = self.session.take().ok_or(BrewError::NoActiveDrag)?;
        self.anchor = None;
        self.committed = session.end();
        tracing::debug!("Drag committed at ({}, {})", self.committed.x, self.committed.y);
        Ok(self.committed)
    }

    /// Replace the committed position, clamped into the container.
    pub fn set_committed(&mut self, position: Position, container: Size, element: Size) -> Position {
        self.committed = if position.is_finite() {
            position.clamp_within(container, element)
        } else {
            tracing::warn!("Ignoring non-finite position: {:?}", position);
            self.committed.clamp_within(container, element)
        };
        self.committed
    }

    /// Re-clamp the committed position (and the live one, mid-gesture)
    /// after the container changed.
    ///
    /// Returns `true` if the committed position moved.
    pub fn reclamp(&mut self, container: Size, element: Size) -> bool {
        if let Some(session) = self.session.as_mut() {
            session.reclamp(container, element);
        }
        let clamped = self.committed.clamp_within(container, element);
        let moved = clamped != self.committed;
        if moved {
            tracing::debug!(
                "Re-clamped ({}, {}) -> ({}, {})",
                self.committed.x,
                self.committed.y,
                clamped.x,
                clamped.y
            );
            self.committed = clamped;
        }
        moved
    }

    /// Drive the controller from raw touch events.
    ///
    /// The finger that started the gesture owns it; other fingers are
    /// ignored, including when they lift. A release with no touches left (a
    /// system cancel) still ends the gesture. A cancelled touch commits like
    /// a normal release.
    pub fn handle_touch(&mut self, event: &TouchEvent, container: Size, element: Size) -> DragOutcome {
        match event.phase {
            TouchPhase::Start => {
                let Some(primary) = event.primary_touch() else {
                    return DragOutcome::Ignored;
                };
                if self.start().is_err() {
                    return DragOutcome::Ignored;
                }
                self.anchor = Some(*primary);
                DragOutcome::Started
            }
            TouchPhase::Move => {
                let Some(translation) = self.anchored_translation(event) else {
                    return DragOutcome::Ignored;
                };
                self.update(translation, container, element)
                    .map_or(DragOutcome::Ignored, DragOutcome::Moved)
            }
            TouchPhase::End | TouchPhase::Cancel => {
                if let Some(translation) = self.anchored_translation(event) {
                    let _ = self.update(translation, container, element);
                } else if !self.releases_gesture(event) {
                    return DragOutcome::Ignored;
                }
                self.end()
                    .map_or(DragOutcome::Ignored, DragOutcome::Committed)
            }
        }
    }

    /// A release without the anchor finger only ends the gesture when no
    /// fingers remain or the gesture was started without a touch.
    fn releases_gesture(&self, event: &TouchEvent) -> bool {
        self.anchor.is_none() || event.touches.is_empty()
    }

    fn anchored_translation(&self, event: &TouchEvent) -> Option<Offset> {
        let anchor = self.anchor?;
        event.touch(anchor.id).map(|t| t.translation_from(&anchor))
    }
}

impl Default for BoundedDragController {
    fn default() -> Self {
        Self::new(Position::ORIGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Size = Size::new(300.0, 300.0);
    const CARD: Size = Size::new(200.0, 150.0);

    #[test]
    fn test_update_does_not_commit() {
        let mut drag = BoundedDragController::new(Position::new(10.0, 10.0));
        drag.start().expect("start");
        let live = drag
            .update(Offset::new(40.0, 20.0), CONTAINER, CARD)
            .expect("update");

        assert_eq!(live, Position::new(50.0, 30.0));
        assert_eq!(drag.committed(), Position::new(10.0, 10.0));
        assert_eq!(drag.live_position(), live);

        let committed = drag.end().expect("end");
        assert_eq!(committed, live);
        assert_eq!(drag.committed(), live);
    }

    #[test]
    fn test_lift_scale_is_transient() {
        let mut drag = BoundedDragController::default();
        assert_eq!(drag.visual_scale(), 1.0);
        drag.start().expect("start");
        assert_eq!(drag.visual_scale(), DEFAULT_LIFT_SCALE);
        drag.end().expect("end");
        assert_eq!(drag.visual_scale(), 1.0);
    }

    #[test]
    fn test_second_start_rejected() {
        let mut drag = BoundedDragController::default();
        drag.start().expect("start");
        assert!(matches!(drag.start(), Err(BrewError::DragInProgress)));
    }

    #[test]
    fn test_update_without_start() {
        let mut drag = BoundedDragController::default();
        assert!(matches!(
            drag.update(Offset::new(1.0, 1.0), CONTAINER, CARD),
            Err(BrewError::NoActiveDrag)
        ));
        assert!(matches!(drag.end(), Err(BrewError::NoActiveDrag)));
    }

    #[test]
    fn test_overshoot_clamps_to_far_corner() {
        let mut drag = BoundedDragController::new(Position::new(50.0, 50.0));
        drag.start().expect("start");
        drag.update(Offset::new(1_000.0, 1_000.0), CONTAINER, CARD)
            .expect("update");
        assert_eq!(drag.end().expect("end"), Position::new(100.0, 150.0));
    }

    #[test]
    fn test_nan_translation_keeps_last_position() {
        let mut drag = BoundedDragController::new(Position::new(20.0, 20.0));
        drag.start().expect("start");
        drag.update(Offset::new(5.0, 5.0), CONTAINER, CARD)
            .expect("update");
        let p = drag
            .update(Offset::new(f32::NAN, 3.0), CONTAINER, CARD)
            .expect("update");
        assert_eq!(p, Position::new(25.0, 25.0));
    }

    #[test]
    fn test_touch_sequence_commits_on_cancel() {
        let mut drag = BoundedDragController::new(Position::new(8.0, 80.0));

        let start = TouchEvent::single(TouchPhase::Start, 100.0, 100.0, 0);
        assert_eq!(drag.handle_touch(&start, CONTAINER, CARD), DragOutcome::Started);

        let moved = TouchEvent::single(TouchPhase::Move, 130.0, 90.0, 16);
        assert_eq!(
            drag.handle_touch(&moved, CONTAINER, CARD),
            DragOutcome::Moved(Position::new(38.0, 70.0))
        );

        let cancel = TouchEvent::new(TouchPhase::Cancel, vec![], 32);
        assert_eq!(
            drag.handle_touch(&cancel, CONTAINER, CARD),
            DragOutcome::Committed(Position::new(38.0, 70.0))
        );
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_foreign_finger_ignored() {
        let mut drag = BoundedDragController::default();
        let start = TouchEvent::single(TouchPhase::Start, 0.0, 0.0, 0);
        drag.handle_touch(&start, CONTAINER, CARD);

        let other = TouchEvent::new(TouchPhase::Move, vec![TouchPoint::new(7, 50.0, 50.0)], 10);
        assert_eq!(drag.handle_touch(&other, CONTAINER, CARD), DragOutcome::Ignored);
        assert_eq!(drag.live_position(), Position::ORIGIN);
    }

    #[test]
    fn test_lifting_second_finger_keeps_drag() {
        let mut drag = BoundedDragController::new(Position::new(10.0, 10.0));
        let start = TouchEvent::single(TouchPhase::Start, 0.0, 0.0, 0);
        drag.handle_touch(&start, CONTAINER, CARD);
        let moved = TouchEvent::single(TouchPhase::Move, 20.0, 20.0, 8);
        drag.handle_touch(&moved, CONTAINER, CARD);

        let lifted = TouchEvent::new(TouchPhase::End, vec![TouchPoint::new(4, 90.0, 90.0)], 12);
        assert_eq!(drag.handle_touch(&lifted, CONTAINER, CARD), DragOutcome::Ignored);
        assert!(drag.is_dragging());
        assert_eq!(drag.committed(), Position::new(10.0, 10.0));

        let released = TouchEvent::single(TouchPhase::End, 30.0, 25.0, 20);
        assert_eq!(
            drag.handle_touch(&released, CONTAINER, CARD),
            DragOutcome::Committed(Position::new(40.0, 35.0))
        );
    }

    #[test]
    fn test_shrink_mid_drag_clamps_live_position() {
        let mut drag = BoundedDragController::new(Position::new(50.0, 50.0));
        drag.start().expect("start");
        drag.update(Offset::new(1000.0, 1000.0), CONTAINER, CARD)
            .expect("update");
        assert_eq!(drag.live_position(), Position::new(100.0, 150.0));

        let smaller = Size::new(268.0, 268.0);
        drag.reclamp(smaller, CARD);
        assert_eq!(drag.live_position(), Position::new(68.0, 118.0));
        let committed = drag.end().expect("end");
        assert_eq!(committed, Position::new(68.0, 118.0));
    }
}
