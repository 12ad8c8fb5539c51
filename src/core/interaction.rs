use crate::types::ModelKind;

/// Pointer input delivered serially by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEvent {
    Enter,
    Leave,
    Click,
}

/// Interaction state of one viewer. `Clicked` is a sub-state of hovering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovered,
    Clicked { was_hovered_before: bool },
}

impl InteractionState {
    /// True while the pointer is over the model (hovered or clicked)
    pub fn is_engaged(&self) -> bool {
        !matches!(self, InteractionState::Idle)
    }
}

/// Side effect requested by a transition, applied by the owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    EmphasisOn,
    EmphasisOff,
    ShowLabel,
    HideLabel,
    RegenerateParticles,
    ClearParticles,
    Notify(ModelKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: InteractionState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(state: InteractionState) -> Self {
        Self {
            next: state,
            effects: Vec::new(),
        }
    }
}

const ENTER_EFFECTS: [Effect; 3] = [
    Effect::EmphasisOn,
    Effect::ShowLabel,
    Effect::RegenerateParticles,
];

const LEAVE_EFFECTS: [Effect; 3] = [
    Effect::EmphasisOff,
    Effect::HideLabel,
    Effect::ClearParticles,
];

/// Next state and effects for `event` arriving in `state`
///
/// Effects fire on the transition only. Events with no transition from the
/// current state (a second enter, a leave while idle) yield no effects.
pub fn transition(state: InteractionState, event: PointerEvent, kind: ModelKind) -> Transition {
    use InteractionState::*;

    match (state, event) {
        (Idle, PointerEvent::Enter) => Transition {
            next: Hovered,
            effects: ENTER_EFFECTS.to_vec(),
        },
        // A tap without a preceding hover (touch input) engages and clicks at once
        (Idle, PointerEvent::Click) => Transition {
            next: Clicked {
                was_hovered_before: false,
            },
            effects: ENTER_EFFECTS
                .iter()
                .copied()
                .chain(std::iter::once(Effect::Notify(kind)))
                .collect(),
        },
        (Hovered, PointerEvent::Click) => Transition {
            next: Clicked {
                was_hovered_before: true,
            },
            effects: vec![Effect::Notify(kind)],
        },
        (Clicked { .. }, PointerEvent::Click) => Transition::stay(Hovered),
        (Hovered | Clicked { .. }, PointerEvent::Leave) => Transition {
            next: Idle,
            effects: LEAVE_EFFECTS.to_vec(),
        },
        (Idle, PointerEvent::Leave) | (Hovered | Clicked { .. }, PointerEvent::Enter) => {
            Transition::stay(state)
        }
    }
}

/// Owns the current state and folds events through [`transition`]
#[derive(Debug, Clone, Copy)]
pub struct InteractionMachine {
    state: InteractionState,
    kind: ModelKind,
}

impl InteractionMachine {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            state: InteractionState::Idle,
            kind,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Applies one event, returning the effects the owner must carry out
    pub fn handle(&mut self, event: PointerEvent) -> Vec<Effect> {
        let Transition { next, effects } = transition(self.state, event, self.kind);
        if next != self.state {
            log::debug!("{} bike: {:?} --{:?}--> {:?}", self.kind, self.state, event, next);
        }
        self.state = next;
        effects
    }
}
