//! API Handlers
//!
//! HTTP request handlers for the protected report endpoints and the
//! operational admin surface. Identity and role arrive from the upstream
//! auth proxy via `x-user-id` / `x-user-role`; this service trusts them.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::cache::CacheService;
use crate::config::Config;
use crate::error::{GuardError, Result};
use crate::limiter::{identify, role_multiplier, IpRateLimiter, RateDecision, RateLimiter, RateProfile};
use crate::models::{HealthResponse, InvalidateResponse, LoginRequest, ResetResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// The cache service and both limiters are constructed once at startup and
/// injected here; handlers never touch ambient globals.
#[derive(Clone)]
pub struct AppState {
    /// Dual-mode response cache
    pub cache: Arc<CacheService>,
    /// Per-client sliding-window limiter
    pub limiter: Arc<RateLimiter>,
    /// Per-IP limiter for unauthenticated endpoints
    pub ip_limiter: Arc<IpRateLimiter>,
}

impl AppState {
    /// Creates a new AppState from already-built components.
    pub fn new(cache: CacheService, limiter: RateLimiter, ip_limiter: IpRateLimiter) -> Self {
        Self {
            cache: Arc::new(cache),
            limiter: Arc::new(limiter),
            ip_limiter: Arc::new(ip_limiter),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CacheService::from_config(config),
            RateLimiter::new(),
            IpRateLimiter::new(config.ip_requests_per_minute),
        )
    }
}

// == Report Kinds ==
/// Protected report endpoints, each tied to a cache namespace and a limit
/// profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    FinancialSummary,
    MemberRoster,
    PaymentExport,
    ExpenseForensic,
}

impl ReportKind {
    /// Resolves a URL slug to a report kind.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "financial-summary" => Some(ReportKind::FinancialSummary),
            "member-roster" => Some(ReportKind::MemberRoster),
            "payment-export" => Some(ReportKind::PaymentExport),
            "expense-forensic" => Some(ReportKind::ExpenseForensic),
            _ => None,
        }
    }

    /// Cache namespace, also the unit of bulk invalidation.
    pub fn namespace(&self) -> &'static str {
        match self {
            ReportKind::FinancialSummary => "financial",
            ReportKind::MemberRoster => "members",
            ReportKind::PaymentExport => "payments",
            ReportKind::ExpenseForensic => "expenses",
        }
    }

    /// Rate limit profile this endpoint counts against.
    pub fn profile(&self) -> RateProfile {
        match self {
            ReportKind::FinancialSummary => RateProfile::FinancialSummary,
            ReportKind::MemberRoster => RateProfile::ReportGeneration,
            ReportKind::PaymentExport => RateProfile::ReportExport,
            ReportKind::ExpenseForensic => RateProfile::Forensic,
        }
    }
}

// == Header Helpers ==

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Source address as reported by the front proxy (first hop wins).
fn client_ip(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// == Report Handler ==
/// Handler for GET /reports/:kind
///
/// The protection path: identify the client, check the kind's quota with the
/// caller's role multiplier, then serve from cache or compute and store.
pub async fn report_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response> {
    let kind = ReportKind::from_slug(&kind).ok_or(GuardError::UnknownReport(kind))?;

    let client_id = identify(header_str(&headers, "x-user-id"), client_ip(&headers));
    let multiplier = role_multiplier(header_str(&headers, "x-user-role").unwrap_or(""));

    let decision = state
        .limiter
        .check_and_record(&client_id, kind.profile(), multiplier)
        .await;
    let (limit, remaining) = match decision {
        RateDecision::Allowed { limit, remaining, .. } => (limit, remaining),
        RateDecision::LimitExceeded { limit, reset_at } => {
            return Err(GuardError::RateLimited { limit, reset_at });
        }
        RateDecision::Blacklisted { until } => {
            return Err(GuardError::Blacklisted { until });
        }
    };

    let params: HashMap<String, Value> = params
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    let cache_key = state.cache.key(kind.namespace(), &params);
    let ttl = state.cache.default_ttl();

    let payload = state
        .cache
        .cacheable(&cache_key, Some(ttl), || async {
            Ok(run_report_query(kind, &params))
        })
        .await?;

    let mut response = Json(payload).into_response();
    let response_headers = response.headers_mut();
    response_headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
    response_headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    if let Ok(value) = HeaderValue::from_str(&format!("private, max-age={}", ttl)) {
        response_headers.insert("cache-control", value);
    }
    response_headers.insert("x-cache-ttl", HeaderValue::from(ttl));
    Ok(response)
}

/// Runs the underlying report query.
///
/// The real queries live in the reporting service behind this layer; this
/// stand-in produces a payload shaped like theirs so the protection path is
/// exercised end to end.
fn run_report_query(kind: ReportKind, params: &HashMap<String, Value>) -> Value {
    json!({
        "report": kind.namespace(),
        "params": params,
        "generated_at": chrono::Utc::now().to_rfc3339(),
    })
}

// == Login Handler ==
/// Handler for POST /auth/login
///
/// Unauthenticated endpoint guarded by the per-IP limiter. Credential
/// verification belongs to the upstream auth service; this handler only
/// enforces the quota and validates the request shape.
pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let ip = client_ip(&headers).unwrap_or("unknown");

    let decision = state.ip_limiter.check(ip).await;
    if !decision.allowed {
        return Err(GuardError::RateLimited {
            limit: decision.limit,
            reset_at: decision.reset_at,
        });
    }

    if let Some(error_msg) = req.validate() {
        return Err(GuardError::InvalidRequest(error_msg));
    }

    Ok(Json(json!({ "status": "accepted" })))
}

// == Admin Handlers ==

/// Handler for GET /admin/stats
///
/// Returns combined cache and rate limiter statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        cache: state.cache.stats().await,
        rate_limiter: state.limiter.stats().await,
    })
}

/// Handler for POST /admin/cache/invalidate/:report_type
///
/// Clears all cached responses for a logical report type. Unknown types
/// clear the application-wide namespace.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(report_type): Path<String>,
) -> Json<InvalidateResponse> {
    let cleared = state.cache.invalidate_report(&report_type).await;
    Json(InvalidateResponse::new(report_type, cleared))
}

/// Handler for POST /admin/limits/reset/:client_id
///
/// Administrative override: lifts quota windows and any blacklist entry.
pub async fn reset_handler(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Json<ResetResponse> {
    let windows_removed = state.limiter.reset(&client_id).await;
    Json(ResetResponse::new(client_id, windows_removed))
}

/// Handler for GET /health
///
/// Returns health status of the service.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState::from_config(&Config::default())
    }

    fn user_headers(user_id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_str(user_id).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_report_handler_sets_rate_limit_headers() {
        let state = test_state();

        let response = report_handler(
            State(state),
            Path("financial-summary".to_string()),
            Query(BTreeMap::new()),
            user_headers("u1"),
        )
        .await
        .unwrap();

        assert_eq!(response.headers().get("x-ratelimit-limit").unwrap(), "30");
        assert_eq!(response.headers().get("x-ratelimit-remaining").unwrap(), "29");
        assert_eq!(
            response.headers().get("cache-control").unwrap(),
            "private, max-age=300"
        );
        assert_eq!(response.headers().get("x-cache-ttl").unwrap(), "300");
    }

    #[tokio::test]
    async fn test_report_handler_unknown_kind() {
        let state = test_state();

        let result = report_handler(
            State(state),
            Path("nonsense".to_string()),
            Query(BTreeMap::new()),
            user_headers("u1"),
        )
        .await;

        assert!(matches!(result, Err(GuardError::UnknownReport(_))));
    }

    #[tokio::test]
    async fn test_report_handler_denies_past_quota() {
        let state = test_state();

        // Forensic profile allows 5 per hour
        for _ in 0..5 {
            let result = report_handler(
                State(state.clone()),
                Path("expense-forensic".to_string()),
                Query(BTreeMap::new()),
                user_headers("u1"),
            )
            .await;
            assert!(result.is_ok());
        }

        let sixth = report_handler(
            State(state),
            Path("expense-forensic".to_string()),
            Query(BTreeMap::new()),
            user_headers("u1"),
        )
        .await;
        assert!(matches!(sixth, Err(GuardError::RateLimited { limit: 5, .. })));
    }

    #[tokio::test]
    async fn test_report_handler_role_multiplier() {
        let state = test_state();
        let mut headers = user_headers("u1");
        headers.insert("x-user-role", HeaderValue::from_static("super_admin"));

        let response = report_handler(
            State(state),
            Path("expense-forensic".to_string()),
            Query(BTreeMap::new()),
            headers,
        )
        .await
        .unwrap();

        // 5 base requests * 5 for super_admin
        assert_eq!(response.headers().get("x-ratelimit-limit").unwrap(), "25");
    }

    #[tokio::test]
    async fn test_report_handler_caches_result() {
        let state = test_state();

        for _ in 0..2 {
            report_handler(
                State(state.clone()),
                Path("member-roster".to_string()),
                Query(BTreeMap::new()),
                user_headers("u1"),
            )
            .await
            .unwrap();
        }

        let stats = state.cache.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_login_handler_enforces_ip_quota() {
        let state = AppState::new(
            CacheService::from_config(&Config::default()),
            RateLimiter::new(),
            IpRateLimiter::new(2),
        );
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.1.1.1"));

        let req = LoginRequest {
            username: "amal".to_string(),
            password: "secret".to_string(),
        };

        for _ in 0..2 {
            let result = login_handler(
                State(state.clone()),
                headers.clone(),
                Json(req.clone()),
            )
            .await;
            assert!(result.is_ok());
        }

        let third = login_handler(State(state), headers, Json(req)).await;
        assert!(matches!(third, Err(GuardError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn test_login_handler_validates_body() {
        let state = test_state();
        let req = LoginRequest {
            username: "".to_string(),
            password: "secret".to_string(),
        };

        let result = login_handler(State(state), HeaderMap::new(), Json(req)).await;
        assert!(matches!(result, Err(GuardError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.cache.hits, 0);
        assert_eq!(response.rate_limiter.active_clients, 0);
    }

    #[tokio::test]
    async fn test_invalidate_handler() {
        let state = test_state();

        state
            .cache
            .set("fundadmin:financial:x", &json!(1), None)
            .await;
        state
            .cache
            .set("fundadmin:members:y", &json!(2), None)
            .await;

        let response =
            invalidate_handler(State(state.clone()), Path("financial".to_string())).await;

        assert_eq!(response.cleared, 1);
        assert_eq!(state.cache.stats().await.entries, 1);
    }

    #[tokio::test]
    async fn test_reset_handler_unblocks_client() {
        let state = test_state();

        // Drive the client into the blacklist (forensic: 5 * 3 = 15)
        for _ in 0..16 {
            let _ = report_handler(
                State(state.clone()),
                Path("expense-forensic".to_string()),
                Query(BTreeMap::new()),
                user_headers("abuser"),
            )
            .await;
        }
        let blocked = report_handler(
            State(state.clone()),
            Path("expense-forensic".to_string()),
            Query(BTreeMap::new()),
            user_headers("abuser"),
        )
        .await;
        assert!(matches!(blocked, Err(GuardError::Blacklisted { .. })));

        reset_handler(State(state.clone()), Path("user_abuser".to_string())).await;

        let after = report_handler(
            State(state),
            Path("expense-forensic".to_string()),
            Query(BTreeMap::new()),
            user_headers("abuser"),
        )
        .await;
        assert!(after.is_ok());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_report_kind_mapping() {
        assert_eq!(
            ReportKind::from_slug("financial-summary"),
            Some(ReportKind::FinancialSummary)
        );
        assert_eq!(ReportKind::from_slug("bogus"), None);
        assert_eq!(ReportKind::PaymentExport.profile(), RateProfile::ReportExport);
        assert_eq!(ReportKind::MemberRoster.namespace(), "members");
    }

    #[test]
    fn test_client_ip_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers), Some("203.0.113.9"));
    }
}
