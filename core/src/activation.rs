use crate::*;

/// Receives the one-time effect of a special cell.
///
/// The session calls [`activate`](Self::activate) at most once per special cell,
/// and only after the activation cost has been deducted from the shared score. The
/// returned effect is handed back to the caller untouched; the session never reads
/// it.
pub trait ActivationGateway {
    type Effect;

    fn activate(&mut self, kind: SpecialKind, question_id: Option<QuestionId>) -> Self::Effect;
}

/// Gateway for hosts that do not attach any effect to special cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoEffect;

impl ActivationGateway for NoEffect {
    type Effect = ();

    fn activate(&mut self, kind: SpecialKind, question_id: Option<QuestionId>) {
        log::debug!("No effect attached to {:?} cell ({:?})", kind, question_id);
    }
}

impl<G: ActivationGateway + ?Sized> ActivationGateway for Box<G> {
    type Effect = G::Effect;

    fn activate(&mut self, kind: SpecialKind, question_id: Option<QuestionId>) -> Self::Effect {
        (**self).activate(kind, question_id)
    }
}
