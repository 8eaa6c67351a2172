// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use crewcall::{Acceptance, CoreError, Engine, InvitationDetails, RegisteredBooking, Withdrawal};
use crewcall_audit::{Actor, AuditEvent, Cause};
use crewcall_domain::{
    AssignmentId, Booking, BookingDraft, BookingId, DomainError, EarningsQuote, WorkerId,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Default validity window for invitation links: 72 hours.
pub const DEFAULT_LINK_TTL_SECONDS: i64 = 72 * 60 * 60;

/// Actor roles for authorization.
///
/// Roles determine what actions an authenticated actor may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: marketplace operators with structural authority.
    ///
    /// Admins may perform:
    /// - admission of externally created bookings
    /// - issuing invitation links to workers
    /// - withdrawing assignments as a corrective action
    Admin,
    /// Worker role: a worker acting on their own invitations.
    ///
    /// Workers may view invitation details and redeem invitations
    /// addressed to them. They may not act on behalf of other workers.
    Worker,
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    ///
    /// This is used when recording audit events to attribute actions
    /// to the authenticated caller.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        let actor_type: String = match self.role {
            Role::Admin => String::from("admin"),
            Role::Worker => String::from("worker"),
        };
        Actor::new(self.id.clone(), actor_type)
    }
}

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// Stub authentication function.
///
/// This is a minimal placeholder. It does NOT implement real
/// authentication - in a real deployment this would validate
/// credentials or integrate with an identity provider.
///
/// # Arguments
///
/// * `actor_id` - The identifier of the actor to authenticate
/// * `role` - The role to assign to the actor
///
/// # Errors
///
/// Returns an error if authentication fails.
pub fn authenticate_stub(actor_id: String, role: Role) -> Result<AuthenticatedActor, AuthError> {
    if actor_id.is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    Ok(AuthenticatedActor::new(actor_id, role))
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor is authorized to admit a booking.
    ///
    /// Only Admin actors may admit bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_create_booking(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "create_booking")
    }

    /// Checks if an actor is authorized to issue invitation links.
    ///
    /// Only Admin actors may issue links.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_issue_links(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "issue_links")
    }

    /// Checks if an actor is authorized to withdraw an assignment.
    ///
    /// Only Admin actors may withdraw assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_withdraw(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "withdraw")
    }

    /// Checks if an actor may redeem on behalf of the given worker.
    ///
    /// Workers may redeem only as themselves. Admins may redeem on a
    /// worker's behalf, for support flows.
    ///
    /// # Errors
    ///
    /// Returns an error if a Worker actor names a different worker.
    pub fn authorize_redeem(actor: &AuthenticatedActor, worker_id: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Worker => {
                if actor.id == worker_id {
                    Ok(())
                } else {
                    Err(AuthError::Unauthorized {
                        action: String::from("redeem"),
                        required_role: String::from("Admin"),
                    })
                }
            }
        }
    }

    fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Worker => Err(AuthError::Unauthorized {
                action: String::from(action),
                required_role: String::from("Admin"),
            }),
        }
    }
}

/// API request to admit an externally created booking.
///
/// This DTO is distinct from domain types and represents the API contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// The requested service type (e.g. "catering", "security").
    pub service_type: String,
    /// Where the work happens.
    pub location: String,
    /// How many workers the booking requires.
    pub workers_needed: u32,
    /// Duration in days, when known.
    #[serde(default)]
    pub number_of_days: Option<u32>,
    /// Business-negotiated total price, when present.
    #[serde(default)]
    pub negotiated_price: Option<f64>,
    /// Admin-entered total payment pool, when present.
    #[serde(default)]
    pub payment_amount: Option<f64>,
    /// Admin-entered per-worker total, when present.
    #[serde(default)]
    pub amount_per_worker: Option<f64>,
}

/// API response for a successful booking admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    /// The assigned booking identifier.
    pub booking_id: String,
    /// The booking's lifecycle status.
    pub status: String,
    /// How many workers the booking requires.
    pub workers_needed: u32,
    /// A success message.
    pub message: String,
}

/// A booking summary as shown to invited workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    /// The booking identifier.
    pub booking_id: String,
    /// The requested service type.
    pub service_type: String,
    /// Where the work happens.
    pub location: String,
    /// How many workers the booking requires.
    pub workers_needed: u32,
    /// Duration in days, when known.
    pub number_of_days: Option<u32>,
    /// The booking's lifecycle status.
    pub status: String,
}

impl BookingSummary {
    fn from_booking(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id.value().to_string(),
            service_type: booking.service_type.clone(),
            location: booking.location.clone(),
            workers_needed: booking.workers_needed,
            number_of_days: booking.number_of_days,
            status: booking.status.as_str().to_string(),
        }
    }
}

/// An earnings quote as displayed to a worker.
///
/// Amounts are rounded to whole currency units at this boundary only.
/// The engine computes and stores quotes unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteView {
    /// The rounded per-day amount.
    pub daily_amount: i64,
    /// The rounded engagement total.
    pub total_amount: i64,
    /// The number of days the total spans.
    pub days: u32,
    /// Which pricing rule produced the quote.
    pub source: String,
}

impl QuoteView {
    fn from_quote(quote: &EarningsQuote) -> Self {
        Self {
            daily_amount: quote.rounded_daily(),
            total_amount: quote.rounded_total(),
            days: quote.days,
            source: quote.source.as_str().to_string(),
        }
    }
}

/// API request to issue invitation links for a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLinksRequest {
    /// Workers to invite with worker-bound links.
    #[serde(default)]
    pub worker_ids: Vec<String>,
    /// How many open (first-come) links to mint in addition.
    #[serde(default)]
    pub open_links: u32,
    /// Validity window in seconds; defaults to 72 hours.
    #[serde(default)]
    pub ttl_seconds: Option<i64>,
}

/// A single issued invitation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedLink {
    /// The invited worker, or `None` for an open link.
    pub worker_id: Option<String>,
    /// The pending assignment backing the link.
    pub assignment_id: String,
    /// The opaque token value embedded in the link.
    pub token: String,
    /// When the link stops being redeemable.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// A worker skipped during link issuance, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedWorker {
    /// The skipped worker.
    pub worker_id: String,
    /// Why the worker was skipped.
    pub reason: String,
}

/// API response for a link issuance run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLinksResponse {
    /// The booking the links belong to.
    pub booking_id: String,
    /// Every link minted by this run.
    pub links: Vec<IssuedLink>,
    /// How many notifications were handed to the delivery sink.
    pub notified: u32,
    /// Workers that were skipped, with reasons.
    pub skipped: Vec<SkippedWorker>,
    /// A summary message.
    pub message: String,
}

/// API response for a worker viewing an invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationDetailsResponse {
    /// The booking being offered.
    pub booking: BookingSummary,
    /// The invited worker, or `None` for an open link.
    pub worker_id: Option<String>,
    /// The assignment backing the invitation.
    pub assignment_id: String,
    /// When the invitation stops being redeemable.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    /// The earnings quote, when the booking carries pricing.
    pub quote: Option<QuoteView>,
}

/// API request to redeem an invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemRequest {
    /// The worker accepting the invitation.
    pub worker_id: String,
}

/// API response for a successful redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemResponse {
    /// The accepted assignment.
    pub assignment_id: String,
    /// The booking the assignment belongs to.
    pub booking_id: String,
    /// The booking status after the acceptance.
    pub booking_status: String,
    /// True when this redemption replayed an acceptance that had
    /// already happened.
    pub already_accepted: bool,
    /// The earnings quote for the accepting worker.
    pub quote: Option<QuoteView>,
    /// A success message.
    pub message: String,
}

/// API response for a successful withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawResponse {
    /// The cancelled assignment.
    pub assignment_id: String,
    /// The assignment status after the withdrawal.
    pub assignment_status: String,
    /// The booking status after the withdrawal.
    pub booking_status: String,
    /// A success message.
    pub message: String,
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The caller may not use this invitation.
    Forbidden {
        /// Why the request was refused.
        reason: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The requested resource does not exist.
    ResourceNotFound {
        /// The kind of resource (e.g. "booking", "invitation").
        resource: String,
        /// A human-readable description.
        message: String,
    },
    /// The invitation's validity window has elapsed.
    InvitationExpired {
        /// When the invitation expired.
        expired_at: OffsetDateTime,
    },
    /// The invitation was already used by a successful acceptance.
    InvitationAlreadyUsed,
    /// Every slot on the booking has been taken.
    SlotUnavailable {
        /// The booking that filled up.
        booking_id: String,
    },
    /// The booking is briefly contended; the caller should retry.
    Busy {
        /// The contended booking.
        booking_id: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// An internal fault. Details are logged, never surfaced.
    Internal {
        /// A generic message safe to return to callers.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::Forbidden { reason } => write!(f, "Forbidden: {reason}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound { resource, message } => {
                write!(f, "{resource} not found: {message}")
            }
            Self::InvitationExpired { expired_at } => {
                write!(f, "Invitation expired at {expired_at}")
            }
            Self::InvitationAlreadyUsed => write!(f, "Invitation has already been used"),
            Self::SlotUnavailable { booking_id } => {
                write!(f, "All slots for booking '{booking_id}' have been taken")
            }
            Self::Busy { booking_id } => {
                write!(f, "Booking '{booking_id}' is busy, retry shortly")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidBookingId(msg) => ApiError::InvalidInput {
            field: String::from("booking_id"),
            message: msg,
        },
        DomainError::InvalidWorkerId(msg) => ApiError::InvalidInput {
            field: String::from("worker_id"),
            message: msg,
        },
        DomainError::InvalidServiceType(msg) => ApiError::InvalidInput {
            field: String::from("service_type"),
            message: msg,
        },
        DomainError::InvalidLocation(msg) => ApiError::InvalidInput {
            field: String::from("location"),
            message: msg,
        },
        DomainError::InvalidWorkersNeeded { count } => ApiError::InvalidInput {
            field: String::from("workers_needed"),
            message: format!("{count} is not a valid worker count"),
        },
        DomainError::InvalidNumberOfDays { days } => ApiError::InvalidInput {
            field: String::from("number_of_days"),
            message: format!("{days} is not a valid day count"),
        },
        DomainError::InvalidPricingField { field, amount } => ApiError::InvalidInput {
            field: String::from(field),
            message: format!("{amount} is not a valid amount"),
        },
        DomainError::InvalidTokenTtl { seconds } => ApiError::InvalidInput {
            field: String::from("ttl_seconds"),
            message: format!("{seconds} is not a valid validity window"),
        },
        DomainError::InvalidBookingStatus { status } => ApiError::InvalidInput {
            field: String::from("booking_status"),
            message: format!("unrecognized status '{status}'"),
        },
        DomainError::InvalidAssignmentStatus { status } => ApiError::InvalidInput {
            field: String::from("assignment_status"),
            message: format!("unrecognized status '{status}'"),
        },
        DomainError::InvalidStatusTransition { from, to, reason } => {
            ApiError::DomainRuleViolation {
                rule: String::from("status_lifecycle"),
                message: format!("cannot move from '{from}' to '{to}': {reason}"),
            }
        }
    }
}

/// Translates a core error into an API error.
///
/// An `InvariantViolation` is a fatal internal-consistency fault: it
/// is logged in full here and surfaced to callers only as a generic
/// internal error.
fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::BookingNotFound(booking_id) => ApiError::ResourceNotFound {
            resource: String::from("Booking"),
            message: format!("booking '{booking_id}' does not exist"),
        },
        CoreError::InvalidBookingState {
            booking_id,
            status,
            reason,
        } => ApiError::DomainRuleViolation {
            rule: String::from("booking_lifecycle"),
            message: format!("booking '{booking_id}' is '{status}': {reason}"),
        },
        CoreError::AlreadyAccepted {
            booking_id,
            assignment_id,
        } => ApiError::DomainRuleViolation {
            rule: String::from("single_acceptance"),
            message: format!(
                "worker already holds accepted assignment '{assignment_id}' on booking '{booking_id}'"
            ),
        },
        CoreError::AssignmentNotFound(assignment_id) => ApiError::ResourceNotFound {
            resource: String::from("Assignment"),
            message: format!("assignment '{assignment_id}' does not exist"),
        },
        CoreError::TokenNotFound => ApiError::ResourceNotFound {
            resource: String::from("Invitation"),
            message: String::from("no invitation matches this link"),
        },
        CoreError::TokenExpired { expired_at } => ApiError::InvitationExpired { expired_at },
        CoreError::TokenAlreadyUsed => ApiError::InvitationAlreadyUsed,
        CoreError::Forbidden { reason } => ApiError::Forbidden { reason },
        CoreError::CapacityExceeded { booking_id } => ApiError::SlotUnavailable {
            booking_id: booking_id.value().to_string(),
        },
        CoreError::AssignmentNotPending {
            assignment_id,
            status,
        } => ApiError::DomainRuleViolation {
            rule: String::from("assignment_resolved"),
            message: format!("assignment '{assignment_id}' is already '{status}'"),
        },
        CoreError::Busy { booking_id } => ApiError::Busy {
            booking_id: booking_id.value().to_string(),
        },
        CoreError::InvariantViolation {
            booking_id,
            accepted,
            needed,
        } => {
            tracing::error!(
                booking_id = %booking_id,
                accepted,
                needed,
                "capacity ledger over-allocated"
            );
            ApiError::Internal {
                message: String::from("internal consistency fault"),
            }
        }
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(message) => {
            tracing::error!(%message, "engine internal error");
            ApiError::Internal {
                message: String::from("internal error"),
            }
        }
    }
}

/// A notification handed to the delivery sink for each issued link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationNotice {
    /// The worker to notify, or `None` for an open link.
    pub recipient: Option<String>,
    /// The booking the link belongs to.
    pub booking_id: String,
    /// The opaque token value embedded in the link.
    pub token: String,
    /// The path a worker follows to view the invitation.
    pub details_path: String,
    /// When the link stops being redeemable.
    pub expires_at: OffsetDateTime,
}

/// A notification delivery failure.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The sink could not deliver the notice.
    #[error("delivery to '{recipient}' failed: {message}")]
    DeliveryFailed {
        /// The intended recipient.
        recipient: String,
        /// What went wrong.
        message: String,
    },
}

/// Delivery channel for invitation notices.
///
/// Issuance never fails because delivery failed: a failed delivery is
/// logged and reported in the response, the minted link stays valid.
pub trait NotificationSink: Send + Sync {
    /// Delivers one invitation notice.
    ///
    /// # Errors
    ///
    /// Returns an error when the notice could not be handed off.
    fn deliver(&self, notice: &InvitationNotice) -> Result<(), NotifyError>;
}

fn record_audit(event: &AuditEvent) {
    tracing::info!(
        target: "audit",
        actor = %event.actor.id,
        actor_type = %event.actor.actor_type,
        cause = %event.cause.id,
        action = %event.action.name,
        booking = %event.booking_id,
        before = %event.before.data,
        after = %event.after.data,
        "audit event"
    );
}

/// Admits an externally created booking via the API boundary.
///
/// This function:
/// - Verifies the actor is authorized (Admin role required)
/// - Translates the API request into a booking draft
/// - Asks the engine to admit the booking
/// - Translates any errors to API errors
///
/// # Arguments
///
/// * `engine` - The acceptance engine
/// * `request` - The API request to admit a booking
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The current time
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - Any field validation fails
pub fn create_booking(
    engine: &Engine,
    request: CreateBookingRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<CreateBookingResponse, ApiError> {
    AuthorizationService::authorize_create_booking(authenticated_actor)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let draft: BookingDraft = BookingDraft {
        service_type: request.service_type,
        location: request.location,
        workers_needed: request.workers_needed,
        number_of_days: request.number_of_days,
        negotiated_price: request.negotiated_price,
        payment_amount: request.payment_amount,
        amount_per_worker: request.amount_per_worker,
    };

    let registered: RegisteredBooking = engine
        .register_booking(draft, actor, cause, now)
        .map_err(translate_core_error)?;
    record_audit(&registered.audit_event);

    Ok(CreateBookingResponse {
        booking_id: registered.booking.id.value().to_string(),
        status: registered.booking.status.as_str().to_string(),
        workers_needed: registered.booking.workers_needed,
        message: format!(
            "Booking '{}' admitted, awaiting {} workers",
            registered.booking.id, registered.booking.workers_needed
        ),
    })
}

/// Issues invitation links for a booking and fans them out.
///
/// One worker-bound link is minted per requested worker, plus any
/// requested open links. Each minted link is handed to the delivery
/// sink. Workers who already hold an accepted assignment are skipped
/// rather than failing the run.
///
/// # Arguments
///
/// * `engine` - The acceptance engine
/// * `sink` - The notification delivery channel
/// * `booking_id` - The booking to issue links for
/// * `request` - The workers to invite and link options
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The current time
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The booking does not exist or refuses invitations
/// - The validity window is invalid
#[allow(clippy::too_many_lines)]
pub fn issue_links(
    engine: &Engine,
    sink: &dyn NotificationSink,
    booking_id: &str,
    request: IssueLinksRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<IssueLinksResponse, ApiError> {
    AuthorizationService::authorize_issue_links(authenticated_actor)?;

    let booking_id: BookingId = BookingId::new(booking_id);
    let IssueLinksRequest {
        worker_ids,
        open_links,
        ttl_seconds,
    } = request;
    let ttl_seconds: i64 = ttl_seconds.unwrap_or(DEFAULT_LINK_TTL_SECONDS);

    let mut links: Vec<IssuedLink> = Vec::new();
    let mut skipped: Vec<SkippedWorker> = Vec::new();
    let mut notified: u32 = 0;

    for raw_worker in &worker_ids {
        let worker: WorkerId = WorkerId::new(raw_worker);
        let issued = engine.issue(
            &booking_id,
            Some(worker.clone()),
            ttl_seconds,
            authenticated_actor.to_audit_actor(),
            cause.clone(),
            now,
        );
        match issued {
            Ok(invitation) => {
                record_audit(&invitation.audit_event);
                let notice: InvitationNotice = InvitationNotice {
                    recipient: Some(worker.value().to_string()),
                    booking_id: booking_id.value().to_string(),
                    token: invitation.token.value.clone(),
                    details_path: format!("/invitations/{}", invitation.token.value),
                    expires_at: invitation.token.expires_at,
                };
                match sink.deliver(&notice) {
                    Ok(()) => notified += 1,
                    Err(err) => {
                        tracing::warn!(worker = %worker, error = %err, "notice delivery failed");
                        skipped.push(SkippedWorker {
                            worker_id: worker.value().to_string(),
                            reason: String::from("delivery failed, link remains valid"),
                        });
                    }
                }
                links.push(IssuedLink {
                    worker_id: Some(worker.value().to_string()),
                    assignment_id: invitation.assignment.id.value().to_string(),
                    token: invitation.token.value,
                    expires_at: invitation.token.expires_at,
                });
            }
            Err(CoreError::AlreadyAccepted { assignment_id, .. }) => {
                skipped.push(SkippedWorker {
                    worker_id: worker.value().to_string(),
                    reason: format!("already accepted as '{assignment_id}'"),
                });
            }
            Err(err) => return Err(translate_core_error(err)),
        }
    }

    for _ in 0..open_links {
        let invitation = engine
            .issue(
                &booking_id,
                None,
                ttl_seconds,
                authenticated_actor.to_audit_actor(),
                cause.clone(),
                now,
            )
            .map_err(translate_core_error)?;
        record_audit(&invitation.audit_event);
        links.push(IssuedLink {
            worker_id: None,
            assignment_id: invitation.assignment.id.value().to_string(),
            token: invitation.token.value,
            expires_at: invitation.token.expires_at,
        });
    }

    let message: String = format!(
        "Issued {} links for booking '{}' ({} notified, {} skipped)",
        links.len(),
        booking_id,
        notified,
        skipped.len()
    );
    Ok(IssueLinksResponse {
        booking_id: booking_id.value().to_string(),
        links,
        notified,
        skipped,
        message,
    })
}

/// Returns the invitation view behind a link.
///
/// This is a read-only operation. The link itself is the capability:
/// no actor authentication is required, and viewing never consumes
/// the token.
///
/// # Arguments
///
/// * `engine` - The acceptance engine
/// * `token` - The opaque token value from the link
/// * `now` - The current time
///
/// # Errors
///
/// Returns an error if the link is unknown, expired, or already used.
pub fn invitation_details(
    engine: &Engine,
    token: &str,
    now: OffsetDateTime,
) -> Result<InvitationDetailsResponse, ApiError> {
    let details: InvitationDetails = engine
        .invitation_details(token, now)
        .map_err(translate_core_error)?;

    Ok(InvitationDetailsResponse {
        booking: BookingSummary::from_booking(&details.booking),
        worker_id: details.worker_id.map(|w| w.value().to_string()),
        assignment_id: details.assignment_id.value().to_string(),
        expires_at: details.expires_at,
        quote: details.quote.as_ref().map(QuoteView::from_quote),
    })
}

/// Redeems an invitation link on behalf of a worker.
///
/// Redeeming an invitation the worker already accepted is reported as
/// a success with `already_accepted` set, not as an error.
///
/// # Arguments
///
/// * `engine` - The acceptance engine
/// * `token` - The opaque token value from the link
/// * `request` - The redeeming worker
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The current time
///
/// # Errors
///
/// Returns an error if:
/// - A Worker actor names a different worker
/// - The link is unknown, expired, used, or bound to someone else
/// - The booking filled before this acceptance
pub fn redeem(
    engine: &Engine,
    token: &str,
    request: &RedeemRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<RedeemResponse, ApiError> {
    if request.worker_id.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("worker_id"),
            message: String::from("worker id cannot be empty"),
        });
    }
    AuthorizationService::authorize_redeem(authenticated_actor, &request.worker_id)?;

    let worker: WorkerId = WorkerId::new(&request.worker_id);
    let acceptance: Acceptance = engine
        .redeem(
            token,
            &worker,
            authenticated_actor.to_audit_actor(),
            cause,
            now,
        )
        .map_err(translate_core_error)?;
    if let Some(event) = &acceptance.audit_event {
        record_audit(event);
    }

    let message: String = if acceptance.already_accepted {
        String::from("Assignment was already accepted")
    } else {
        format!("Assignment '{}' accepted", acceptance.assignment.id)
    };
    Ok(RedeemResponse {
        assignment_id: acceptance.assignment.id.value().to_string(),
        booking_id: acceptance.assignment.booking_id.value().to_string(),
        booking_status: acceptance.booking_status.as_str().to_string(),
        already_accepted: acceptance.already_accepted,
        quote: acceptance.quote.as_ref().map(QuoteView::from_quote),
        message,
    })
}

/// Withdraws an assignment via the API boundary.
///
/// This is a corrective action: a pending withdrawal retires the
/// invitation, an accepted withdrawal frees the slot.
///
/// # Arguments
///
/// * `engine` - The acceptance engine
/// * `assignment_id` - The assignment to withdraw
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The current time
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The assignment does not exist or is already resolved
pub fn withdraw(
    engine: &Engine,
    assignment_id: &str,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<WithdrawResponse, ApiError> {
    AuthorizationService::authorize_withdraw(authenticated_actor)?;

    let assignment_id: AssignmentId = AssignmentId::new(assignment_id);
    let withdrawal: Withdrawal = engine
        .withdraw(
            &assignment_id,
            authenticated_actor.to_audit_actor(),
            cause,
            now,
        )
        .map_err(translate_core_error)?;
    record_audit(&withdrawal.audit_event);

    Ok(WithdrawResponse {
        assignment_id: withdrawal.assignment.id.value().to_string(),
        assignment_status: withdrawal.assignment.status.as_str().to_string(),
        booking_status: withdrawal.booking_status.as_str().to_string(),
        message: format!("Assignment '{}' withdrawn", withdrawal.assignment.id),
    })
}
