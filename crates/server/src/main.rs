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
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use crewcall::Engine;
use crewcall_api::{
    ApiError, AuthenticatedActor, CreateBookingRequest, CreateBookingResponse,
    DEFAULT_LINK_TTL_SECONDS, InvitationDetailsResponse, InvitationNotice, IssueLinksRequest,
    IssueLinksResponse, NotificationSink, NotifyError, RedeemRequest, RedeemResponse, Role,
    WithdrawResponse, authenticate_stub, create_booking, invitation_details, issue_links, redeem,
    withdraw,
};
use crewcall_audit::Cause;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;

/// CrewCall Server - HTTP server for the booking acceptance engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Default validity window for invitation links, in seconds
    #[arg(long, default_value_t = DEFAULT_LINK_TTL_SECONDS)]
    default_ttl_seconds: i64,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The acceptance engine holding all bookings.
    engine: Arc<Engine>,
    /// The delivery channel for invitation notices.
    sink: Arc<dyn NotificationSink>,
    /// The validity window applied when a request does not name one.
    default_ttl_seconds: i64,
}

/// Notification sink that logs each notice instead of delivering it.
///
/// Real deployments plug an SMS or email gateway in here.
struct LoggingSink;

impl NotificationSink for LoggingSink {
    fn deliver(&self, notice: &InvitationNotice) -> Result<(), NotifyError> {
        info!(
            recipient = notice.recipient.as_deref().unwrap_or("open"),
            booking = %notice.booking_id,
            path = %notice.details_path,
            "Invitation notice"
        );
        Ok(())
    }
}

/// API request for admitting a booking.
///
/// This includes authentication information in addition to the booking data.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateBookingApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The requested service type.
    service_type: String,
    /// Where the work happens.
    location: String,
    /// How many workers the booking requires.
    workers_needed: u32,
    /// Duration in days, when known.
    number_of_days: Option<u32>,
    /// Business-negotiated total price, when present.
    negotiated_price: Option<f64>,
    /// Admin-entered total payment pool, when present.
    payment_amount: Option<f64>,
    /// Admin-entered per-worker total, when present.
    amount_per_worker: Option<f64>,
}

/// API request for issuing invitation links.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct IssueLinksApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// Workers to invite with worker-bound links.
    #[serde(default)]
    worker_ids: Vec<String>,
    /// How many open links to mint in addition.
    #[serde(default)]
    open_links: u32,
    /// Validity window in seconds; server default when omitted.
    #[serde(default)]
    ttl_seconds: Option<i64>,
}

/// API request for redeeming an invitation link.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RedeemApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The worker accepting the invitation.
    worker_id: String,
}

/// API request for withdrawing an assignment.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct WithdrawApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvitationExpired { .. } => StatusCode::GONE,
            ApiError::InvitationAlreadyUsed | ApiError::SlotUnavailable { .. } => {
                StatusCode::CONFLICT
            }
            ApiError::Busy { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Parses a role string into a Role enum.
fn parse_role(role_str: &str) -> Result<Role, HttpError> {
    match role_str.to_lowercase().as_str() {
        "admin" => Ok(Role::Admin),
        "worker" => Ok(Role::Worker),
        _ => Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid role: '{role_str}'. Must be 'admin' or 'worker'"),
        }),
    }
}

/// Authenticates the actor named in a request body.
fn authenticate(actor_id: &str, actor_role: &str) -> Result<AuthenticatedActor, HttpError> {
    let role: Role = parse_role(actor_role)?;
    authenticate_stub(String::from(actor_id), role).map_err(|e| HttpError {
        status: StatusCode::UNAUTHORIZED,
        message: e.to_string(),
    })
}

/// Handler for POST `/bookings` endpoint.
///
/// Admits an externally created booking.
async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateBookingApiRequest>,
) -> Result<Json<CreateBookingResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        service_type = %req.service_type,
        workers_needed = req.workers_needed,
        "Handling create_booking request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let request: CreateBookingRequest = CreateBookingRequest {
        service_type: req.service_type,
        location: req.location,
        workers_needed: req.workers_needed,
        number_of_days: req.number_of_days,
        negotiated_price: req.negotiated_price,
        payment_amount: req.payment_amount,
        amount_per_worker: req.amount_per_worker,
    };
    let response: CreateBookingResponse = create_booking(
        &app_state.engine,
        request,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;

    info!(booking_id = %response.booking_id, "Successfully admitted booking");
    Ok(Json(response))
}

/// Handler for POST `/bookings/{booking_id}/invitations` endpoint.
///
/// Issues invitation links for the booking and fans them out.
async fn handle_issue_links(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<String>,
    Json(req): Json<IssueLinksApiRequest>,
) -> Result<Json<IssueLinksResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        booking_id = %booking_id,
        workers = req.worker_ids.len(),
        open_links = req.open_links,
        "Handling issue_links request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let request: IssueLinksRequest = IssueLinksRequest {
        worker_ids: req.worker_ids,
        open_links: req.open_links,
        ttl_seconds: Some(req.ttl_seconds.unwrap_or(app_state.default_ttl_seconds)),
    };
    let response: IssueLinksResponse = issue_links(
        &app_state.engine,
        app_state.sink.as_ref(),
        &booking_id,
        request,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;

    info!(
        booking_id = %response.booking_id,
        links = response.links.len(),
        notified = response.notified,
        "Successfully issued invitation links"
    );
    Ok(Json(response))
}

/// Handler for GET `/invitations/{token}` endpoint.
///
/// Returns the invitation view behind a link. The link itself is the
/// capability; no actor authentication is required.
async fn handle_invitation_details(
    AxumState(app_state): AxumState<AppState>,
    Path(token): Path<String>,
) -> Result<Json<InvitationDetailsResponse>, HttpError> {
    info!("Handling invitation_details request");

    let response: InvitationDetailsResponse =
        invitation_details(&app_state.engine, &token, OffsetDateTime::now_utc())?;
    Ok(Json(response))
}

/// Handler for POST `/invitations/{token}/redeem` endpoint.
///
/// Redeems an invitation link on behalf of a worker.
async fn handle_redeem(
    AxumState(app_state): AxumState<AppState>,
    Path(token): Path<String>,
    Json(req): Json<RedeemApiRequest>,
) -> Result<Json<RedeemResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        worker_id = %req.worker_id,
        "Handling redeem request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let request: RedeemRequest = RedeemRequest {
        worker_id: req.worker_id,
    };
    let response: RedeemResponse = redeem(
        &app_state.engine,
        &token,
        &request,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;

    info!(
        assignment_id = %response.assignment_id,
        booking_status = %response.booking_status,
        already_accepted = response.already_accepted,
        "Successfully redeemed invitation"
    );
    Ok(Json(response))
}

/// Handler for DELETE `/assignments/{assignment_id}` endpoint.
///
/// Withdraws an assignment as a corrective action.
async fn handle_withdraw(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<String>,
    Json(req): Json<WithdrawApiRequest>,
) -> Result<Json<WithdrawResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        assignment_id = %assignment_id,
        "Handling withdraw request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let response: WithdrawResponse = withdraw(
        &app_state.engine,
        &assignment_id,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;

    info!(
        assignment_id = %response.assignment_id,
        booking_status = %response.booking_status,
        "Successfully withdrew assignment"
    );
    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/bookings", post(handle_create_booking))
        .route("/bookings/{booking_id}/invitations", post(handle_issue_links))
        .route("/invitations/{token}", get(handle_invitation_details))
        .route("/invitations/{token}/redeem", post(handle_redeem))
        .route("/assignments/{assignment_id}", delete(handle_withdraw))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing CrewCall Server");

    let app_state: AppState = AppState {
        engine: Arc::new(Engine::new()),
        sink: Arc::new(LoggingSink),
        default_ttl_seconds: args.default_ttl_seconds,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;

    /// Helper to create test app state with a fresh engine.
    fn create_test_app_state() -> AppState {
        AppState {
            engine: Arc::new(Engine::new()),
            sink: Arc::new(LoggingSink),
            default_ttl_seconds: DEFAULT_LINK_TTL_SECONDS,
        }
    }

    fn create_test_booking_request(role: &str, workers_needed: u32) -> CreateBookingApiRequest {
        CreateBookingApiRequest {
            actor_id: String::from("admin-1"),
            actor_role: String::from(role),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Test booking admission"),
            service_type: String::from("catering"),
            location: String::from("Oslo"),
            workers_needed,
            number_of_days: Some(3),
            negotiated_price: None,
            payment_amount: Some(18000.0),
            amount_per_worker: None,
        }
    }

    fn issue_links_request(worker_ids: Vec<String>) -> IssueLinksApiRequest {
        IssueLinksApiRequest {
            actor_id: String::from("admin-1"),
            actor_role: String::from("admin"),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Test link issuance"),
            worker_ids,
            open_links: 0,
            ttl_seconds: None,
        }
    }

    fn redeem_request(worker_id: &str) -> RedeemApiRequest {
        RedeemApiRequest {
            actor_id: String::from(worker_id),
            actor_role: String::from("worker"),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Test redemption"),
            worker_id: String::from(worker_id),
        }
    }

    fn post_json<T: Serialize>(uri: &str, body: &T) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn admit_booking(app: &Router, workers_needed: u32) -> String {
        let response = app
            .clone()
            .oneshot(post_json(
                "/bookings",
                &create_test_booking_request("admin", workers_needed),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: CreateBookingResponse = read_json(response).await;
        body.booking_id
    }

    async fn issue_for(app: &Router, booking_id: &str, worker: &str) -> IssueLinksResponse {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/bookings/{booking_id}/invitations"),
                &issue_links_request(vec![String::from(worker)]),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        read_json(response).await
    }

    #[tokio::test]
    async fn test_create_booking_as_admin_succeeds() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(post_json(
                "/bookings",
                &create_test_booking_request("admin", 3),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: CreateBookingResponse = read_json(response).await;
        assert_eq!(body.status, "pending");
        assert_eq!(body.workers_needed, 3);
        assert!(body.booking_id.starts_with("bkg-"));
    }

    #[tokio::test]
    async fn test_create_booking_as_worker_is_forbidden() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(post_json(
                "/bookings",
                &create_test_booking_request("worker", 3),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_booking_with_invalid_role_is_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(post_json(
                "/bookings",
                &create_test_booking_request("superuser", 3),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_booking_with_zero_workers_is_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(post_json(
                "/bookings",
                &create_test_booking_request("admin", 0),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_issue_links_for_unknown_booking_is_not_found() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(post_json(
                "/bookings/bkg-missing/invitations",
                &issue_links_request(vec![String::from("w-1")]),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invitation_details_for_unknown_token_is_not_found() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/invitations/tok_missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invitation_flow_end_to_end() {
        let app: Router = build_router(create_test_app_state());
        let booking_id: String = admit_booking(&app, 3).await;

        // Issue a link to w-1.
        let issued: IssueLinksResponse = issue_for(&app, &booking_id, "w-1").await;
        assert_eq!(issued.links.len(), 1);
        assert_eq!(issued.notified, 1);
        let token: String = issued.links[0].token.clone();

        // View the invitation.
        let details_response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/invitations/{token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(details_response.status(), HttpStatusCode::OK);
        let details: InvitationDetailsResponse = read_json(details_response).await;
        assert_eq!(details.booking.booking_id, booking_id);
        assert_eq!(details.quote.as_ref().unwrap().total_amount, 6000);
        assert_eq!(details.quote.as_ref().unwrap().daily_amount, 2000);

        // Redeem it.
        let redeem_response = app
            .oneshot(post_json(
                &format!("/invitations/{token}/redeem"),
                &redeem_request("w-1"),
            ))
            .await
            .unwrap();
        assert_eq!(redeem_response.status(), HttpStatusCode::OK);
        let accepted: RedeemResponse = read_json(redeem_response).await;
        assert_eq!(accepted.booking_id, booking_id);
        assert!(!accepted.already_accepted);
        assert_eq!(accepted.booking_status, "assigned");
    }

    #[tokio::test]
    async fn test_redeem_replay_is_ok_and_flagged() {
        let app: Router = build_router(create_test_app_state());
        let booking_id: String = admit_booking(&app, 1).await;
        let issued: IssueLinksResponse = issue_for(&app, &booking_id, "w-1").await;
        let token: String = issued.links[0].token.clone();

        let first = app
            .clone()
            .oneshot(post_json(
                &format!("/invitations/{token}/redeem"),
                &redeem_request("w-1"),
            ))
            .await
            .unwrap();
        assert_eq!(first.status(), HttpStatusCode::OK);

        let second = app
            .oneshot(post_json(
                &format!("/invitations/{token}/redeem"),
                &redeem_request("w-1"),
            ))
            .await
            .unwrap();
        assert_eq!(second.status(), HttpStatusCode::OK);
        let replay: RedeemResponse = read_json(second).await;
        assert!(replay.already_accepted);
    }

    #[tokio::test]
    async fn test_losing_worker_gets_conflict() {
        let app: Router = build_router(create_test_app_state());
        let booking_id: String = admit_booking(&app, 1).await;
        let for_w1: IssueLinksResponse = issue_for(&app, &booking_id, "w-1").await;
        let for_w2: IssueLinksResponse = issue_for(&app, &booking_id, "w-2").await;

        let winner = app
            .clone()
            .oneshot(post_json(
                &format!("/invitations/{}/redeem", for_w1.links[0].token),
                &redeem_request("w-1"),
            ))
            .await
            .unwrap();
        assert_eq!(winner.status(), HttpStatusCode::OK);
        let accepted: RedeemResponse = read_json(winner).await;
        assert_eq!(accepted.booking_status, "assigned");

        let loser = app
            .oneshot(post_json(
                &format!("/invitations/{}/redeem", for_w2.links[0].token),
                &redeem_request("w-2"),
            ))
            .await
            .unwrap();
        assert_eq!(loser.status(), HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_worker_cannot_redeem_for_someone_else() {
        let app: Router = build_router(create_test_app_state());
        let booking_id: String = admit_booking(&app, 1).await;
        let issued: IssueLinksResponse = issue_for(&app, &booking_id, "w-1").await;

        // Authenticated as w-2 but naming w-1.
        let mut request: RedeemApiRequest = redeem_request("w-1");
        request.actor_id = String::from("w-2");

        let response = app
            .oneshot(post_json(
                &format!("/invitations/{}/redeem", issued.links[0].token),
                &request,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_withdraw_then_reissue() {
        let app: Router = build_router(create_test_app_state());
        let booking_id: String = admit_booking(&app, 1).await;
        let issued: IssueLinksResponse = issue_for(&app, &booking_id, "w-1").await;

        let redeemed = app
            .clone()
            .oneshot(post_json(
                &format!("/invitations/{}/redeem", issued.links[0].token),
                &redeem_request("w-1"),
            ))
            .await
            .unwrap();
        let accepted: RedeemResponse = read_json(redeemed).await;

        let withdraw_body: WithdrawApiRequest = WithdrawApiRequest {
            actor_id: String::from("admin-1"),
            actor_role: String::from("admin"),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Worker called in sick"),
        };
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/assignments/{}", accepted.assignment_id))
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&withdraw_body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let withdrawal: WithdrawResponse = read_json(response).await;
        assert_eq!(withdrawal.assignment_status, "cancelled");

        // The freed slot accepts a fresh invitation.
        let reissued: IssueLinksResponse = issue_for(&app, &booking_id, "w-2").await;
        assert_eq!(reissued.links.len(), 1);
    }

    #[tokio::test]
    async fn test_withdraw_unknown_assignment_is_not_found() {
        let app: Router = build_router(create_test_app_state());

        let withdraw_body: WithdrawApiRequest = WithdrawApiRequest {
            actor_id: String::from("admin-1"),
            actor_role: String::from("admin"),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Cleanup"),
        };
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/assignments/asg-missing")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&withdraw_body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }
}
