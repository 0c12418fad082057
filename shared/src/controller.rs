use std::cell::RefCell;

use rand::Rng;

use crate::animation::{AnimationFrame, SpinAnimation};
use crate::authority::SpinAuthority;
use crate::error::WheelError;
use crate::reward_wheel::{map_outcome_to_angle, RewardTier, TierTable};
use crate::spin_session::{GateRejection, SpinGate, SpinPhase, SpinSession, SpinTicket};

/// Wheel state owned by the page: the gate, the live animation, the visual
/// rotation and whatever result is on display.
#[derive(Debug, Clone)]
pub struct WheelController {
    tiers: TierTable,
    gate: SpinGate,
    animation: Option<SpinAnimation>,
    rotation: f64,
    displayed_reward: Option<u32>,
    last_error: Option<WheelError>,
    // bumped by every dismiss so an attempt in flight can tell it was abandoned
    dismissals: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpinOutcome {
    Started { angle: f64 },
    Rejected(GateRejection),
    Aborted(WheelError),
}

impl WheelController {
    pub fn new(tiers: TierTable) -> Self {
        Self {
            tiers,
            gate: SpinGate::new(),
            animation: None,
            rotation: 0.0,
            displayed_reward: None,
            last_error: None,
            dismissals: 0,
        }
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn phase(&self) -> SpinPhase {
        self.gate.phase()
    }

    pub fn is_spinning(&self) -> bool {
        self.gate.is_spinning()
    }

    pub fn session(&self) -> Option<&SpinSession> {
        self.gate.session()
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn displayed_reward(&self) -> Option<u32> {
        self.displayed_reward
    }

    pub fn displayed_tier(&self) -> Option<&RewardTier> {
        self.displayed_reward.and_then(|points| self.tiers.find(points))
    }

    pub fn last_error(&self) -> Option<&WheelError> {
        self.last_error.as_ref()
    }

    pub fn begin_spin(&mut self, permitted: bool) -> Result<SpinTicket, GateRejection> {
        let ticket = self.gate.begin(permitted)?;

        // Every spin starts from zero so targets never pile up.
        self.rotation = 0.0;
        self.animation = None;
        self.displayed_reward = None;
        self.last_error = None;

        log::debug!("wheel spin {} started", ticket.id());
        Ok(ticket)
    }

    /// Applies the authority's answer to the session behind `ticket`.
    pub fn resolve_spin<R: Rng + ?Sized>(
        &mut self,
        ticket: SpinTicket,
        outcome: Result<Option<u32>, WheelError>,
        rng: &mut R,
        now_ms: f64,
    ) -> Result<f64, WheelError> {
        let already_resolved = match self.gate.session_mut(ticket) {
            Some(session) => session.target_reward.is_some(),
            None => {
                log::debug!("dropping outcome for discarded spin {}", ticket.id());
                return Err(WheelError::SessionDiscarded);
            }
        };
        if already_resolved {
            return Err(WheelError::SessionDiscarded);
        }

        let reward = match outcome {
            Ok(Some(reward)) => reward,
            Ok(None) => return self.abort(ticket, WheelError::request_failed("no outcome granted")),
            Err(err) => return self.abort(ticket, err),
        };

        let angle = match map_outcome_to_angle(reward, &self.tiers, rng) {
            Ok(angle) => angle,
            Err(err) => {
                log::warn!(
                    "reward {} is missing from the local tier table, client and server catalogs have drifted",
                    reward
                );
                return self.abort(ticket, err);
            }
        };

        if let Some(session) = self.gate.session_mut(ticket) {
            session.target_reward = Some(reward);
            session.computed_angle = angle;
        }
        self.animation = Some(SpinAnimation::new(now_ms, angle));

        log::debug!("wheel spin {} targets {} at {:.2} degrees", ticket.id(), reward, angle);
        Ok(angle)
    }

    /// Advances the animation. The finished frame ends the session and puts
    /// its reward on display.
    pub fn tick(&mut self, now_ms: f64) -> Option<AnimationFrame> {
        let frame = self.animation?.sample(now_ms);
        self.rotation = frame.rotation;

        if frame.finished {
            self.animation = None;
            if let Some(ticket) = self.gate.current_ticket() {
                if let Some(session) = self.gate.finish(ticket) {
                    self.displayed_reward = session.target_reward;
                }
            }
        }
        Some(frame)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// View closed: stop, forget the session, show nothing.
    pub fn dismiss(&mut self) {
        if let Some(session) = self.gate.discard() {
            log::debug!("wheel spin {} abandoned", session.id);
        }
        self.animation = None;
        self.rotation = 0.0;
        self.displayed_reward = None;
        self.last_error = None;
        self.dismissals += 1;
    }

    fn abort(&mut self, ticket: SpinTicket, err: WheelError) -> Result<f64, WheelError> {
        self.gate.finish(ticket);
        self.animation = None;
        self.last_error = Some(err.clone());
        Err(err)
    }
}

/// Runs one spin attempt against `authority`. The controller is only
/// borrowed between awaits so a second tap can see the spinning state.
pub async fn spin_once<A, R, C>(
    controller: &RefCell<WheelController>,
    authority: &A,
    rng: &mut R,
    now_ms: C,
) -> SpinOutcome
where
    A: SpinAuthority,
    R: Rng + ?Sized,
    C: Fn() -> f64,
{
    let dismissals = {
        let wheel = controller.borrow();
        if wheel.is_spinning() {
            return SpinOutcome::Rejected(GateRejection::AlreadySpinning);
        }
        wheel.dismissals
    };

    let status = match authority.spin_status().await {
        Ok(status) => status,
        Err(err) => return SpinOutcome::Aborted(err),
    };

    // The view went away while eligibility was being checked.
    if controller.borrow().dismissals != dismissals {
        log::debug!("wheel dismissed before the spin began, not requesting an outcome");
        return SpinOutcome::Aborted(WheelError::SessionDiscarded);
    }

    let ticket = match controller.borrow_mut().begin_spin(status.can_spin()) {
        Ok(ticket) => ticket,
        Err(rejection) => return SpinOutcome::Rejected(rejection),
    };

    let outcome = authority.request_spin_outcome().await;

    match controller.borrow_mut().resolve_spin(ticket, outcome, rng, now_ms()) {
        Ok(angle) => SpinOutcome::Started { angle },
        Err(err) => SpinOutcome::Aborted(err),
    }
}
