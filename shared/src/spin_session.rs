use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    Spinning,
}

/// State of a single spin attempt, from trigger to animation completion.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinSession {
    pub id: u64,
    pub in_progress: bool,
    pub target_reward: Option<u32>,
    pub computed_angle: f64,
}

impl SpinSession {
    fn new(id: u64) -> Self {
        Self {
            id,
            in_progress: true,
            target_reward: None,
            computed_angle: 0.0,
        }
    }
}

/// Handed out by the gate when a spin starts; answers for older tickets are
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinTicket(u64);

impl SpinTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    AlreadySpinning,
    NotPermitted,
}

impl std::fmt::Display for GateRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadySpinning => write!(f, "A spin is already in progress"),
            Self::NotPermitted => write!(f, "Spinning is not available right now"),
        }
    }
}

/// `Idle -> Spinning -> Idle`. At most one session exists at a time.
#[derive(Debug, Default, Clone)]
pub struct SpinGate {
    next_id: u64,
    session: Option<SpinSession>,
}

impl SpinGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SpinPhase {
        if self.is_spinning() {
            SpinPhase::Spinning
        } else {
            SpinPhase::Idle
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.session.as_ref().map_or(false, |s| s.in_progress)
    }

    pub fn session(&self) -> Option<&SpinSession> {
        self.session.as_ref()
    }

    pub fn current_ticket(&self) -> Option<SpinTicket> {
        self.session.as_ref().map(|s| SpinTicket(s.id))
    }

    pub fn is_current(&self, ticket: SpinTicket) -> bool {
        self.session.as_ref().map_or(false, |s| s.id == ticket.0)
    }

    /// Both conditions are evaluated now, never from a cached render.
    pub fn begin(&mut self, permitted: bool) -> Result<SpinTicket, GateRejection> {
        if self.is_spinning() {
            return Err(GateRejection::AlreadySpinning);
        }
        if !permitted {
            return Err(GateRejection::NotPermitted);
        }

        self.next_id += 1;
        self.session = Some(SpinSession::new(self.next_id));
        Ok(SpinTicket(self.next_id))
    }

    pub fn session_mut(&mut self, ticket: SpinTicket) -> Option<&mut SpinSession> {
        self.session.as_mut().filter(|s| s.id == ticket.0)
    }

    /// Ends the session for `ticket` and hands it back. Unconditional for the
    /// current ticket, whatever the outcome was.
    pub fn finish(&mut self, ticket: SpinTicket) -> Option<SpinSession> {
        if !self.is_current(ticket) {
            return None;
        }
        self.session.take().map(|mut session| {
            session.in_progress = false;
            session
        })
    }

    /// Drops whatever session is open without reporting its outcome.
    pub fn discard(&mut self) -> Option<SpinSession> {
        self.session.take().map(|mut session| {
            session.in_progress = false;
            session
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_requires_permission() {
        let mut gate = SpinGate::new();
        assert_eq!(gate.begin(false), Err(GateRejection::NotPermitted));
        assert_eq!(gate.phase(), SpinPhase::Idle);
        assert!(gate.session().is_none());
    }

    #[test]
    fn test_second_begin_is_a_noop() {
        let mut gate = SpinGate::new();
        let ticket = gate.begin(true).unwrap();
        let before = gate.session().cloned();

        assert_eq!(gate.begin(true), Err(GateRejection::AlreadySpinning));
        assert_eq!(gate.session().cloned(), before);
        assert!(gate.is_current(ticket));
    }

    #[test]
    fn test_spinning_wins_over_permission_check() {
        let mut gate = SpinGate::new();
        gate.begin(true).unwrap();
        assert_eq!(gate.begin(false), Err(GateRejection::AlreadySpinning));
    }

    #[test]
    fn test_finish_returns_to_idle() {
        let mut gate = SpinGate::new();
        let ticket = gate.begin(true).unwrap();
        gate.session_mut(ticket).unwrap().target_reward = Some(300);

        let ended = gate.finish(ticket).unwrap();
        assert!(!ended.in_progress);
        assert_eq!(ended.target_reward, Some(300));
        assert_eq!(gate.phase(), SpinPhase::Idle);
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut gate = SpinGate::new();
        let old = gate.begin(true).unwrap();
        gate.discard();
        let fresh = gate.begin(true).unwrap();

        assert_ne!(old, fresh);
        assert!(gate.session_mut(old).is_none());
        assert!(gate.finish(old).is_none());
        assert!(gate.is_spinning());
    }

    #[test]
    fn test_discard_never_sets_target() {
        let mut gate = SpinGate::new();
        gate.begin(true).unwrap();
        let dropped = gate.discard().unwrap();
        assert!(!dropped.in_progress);
        assert_eq!(dropped.target_reward, None);
        assert_eq!(gate.phase(), SpinPhase::Idle);
    }
}
