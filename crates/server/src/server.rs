use axum::{
    Router,
    extract::{DefaultBodyLimit, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

use std::sync::Arc;

use crate::{ServerError, approvals, auth, configs, ledger, notify, ocr, transactions, uploads};
use api_types::user::TokenClaims;
use engine::{Engine, User};
use integrations::Integrations;

/// Bearer tokens are valid for one day.
const TOKEN_TTL_HOURS: i64 = 24;

/// Ten images of five MiB each, plus multipart overhead.
const BODY_LIMIT_BYTES: usize = 56 * 1024 * 1024;

/// Shared secrets for the HTTP layer.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HS256 secret for issued and accepted bearer tokens. The origin
    /// SSO signs its tokens with the same value.
    pub jwt_secret: String,
    /// Key expected from origin systems and scheduled callers.
    pub api_key: String,
}

pub(crate) struct AuthState {
    encoding: EncodingKey,
    decoding: DecodingKey,
    pub(crate) api_key: String,
}

impl AuthState {
    fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            api_key: config.api_key.clone(),
        }
    }

    pub(crate) fn issue_token(&self, user: &User) -> Result<String, ServerError> {
        let expires_at = Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS);
        let claims = TokenClaims {
            sub: user.id,
            email: user.email.clone(),
            first_name: Some(user.first_name.clone()),
            last_name: Some(user.last_name.clone()),
            avatar: user.avatar.clone(),
            role: Some(user.role.as_str().to_string()),
            exp: expires_at.timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| ServerError::Internal(format!("token signing failed: {err}")))
    }

    pub(crate) fn decode_claims(&self, token: &str) -> Result<TokenClaims, ServerError> {
        jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ServerError::Unauthorized("invalid or expired token".to_string()))
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub integrations: Arc<Integrations>,
    pub(crate) auth: Arc<AuthState>,
}

impl ServerState {
    pub fn new(engine: Engine, integrations: Integrations, auth: &AuthConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            integrations: Arc::new(integrations),
            auth: Arc::new(AuthState::new(auth)),
        }
    }
}

pub(crate) fn bearer_token(
    header: &Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<&str, ServerError> {
    match header {
        Some(TypedHeader(authorization)) => Ok(authorization.token()),
        None => Err(ServerError::Unauthorized("missing bearer token".to_string())),
    }
}

/// Resolves the bearer token to a stored account and hands it to the
/// handlers as an `Extension<User>`.
async fn authenticate(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = bearer_token(&auth_header)?;
    let claims = state.auth.decode_claims(token)?;
    let user = state
        .engine
        .find_user(claims.sub)
        .await
        .map_err(|_| ServerError::Unauthorized("unknown user".to_string()))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    // POST /approve-lists stays open for origin systems; it checks the
    // api key from its body instead of a bearer token.
    let guarded = Router::new()
        .route("/approve-lists", get(approvals::list))
        .route(
            "/approve-lists/{id}",
            get(approvals::detail)
                .put(approvals::update)
                .delete(approvals::remove),
        )
        .route("/approve-lists/user/{user_id}", get(approvals::list_for_user))
        .route("/status-approves", post(approvals::status_new))
        .route("/config-types", get(configs::list_types).post(configs::type_new))
        .route("/configs", get(configs::list).post(configs::create))
        .route(
            "/configs/{id}",
            get(configs::detail).put(configs::update).delete(configs::remove),
        )
        .route("/transactions", get(transactions::list).post(transactions::create))
        .route(
            "/transactions/{id}",
            get(transactions::detail)
                .put(transactions::update)
                .delete(transactions::remove),
        )
        .route("/transactions/{id}/approve", post(transactions::approve))
        .route("/net-amount", get(ledger::get).put(ledger::set))
        .route("/net-amount/history", get(ledger::history))
        .route("/uploads/single", post(uploads::single))
        .route("/uploads/multiple", post(uploads::multiple))
        .route("/ocr/receipt", post(ocr::receipt))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/otp/verify", post(auth::verify_otp))
        .route("/auth/login", post(auth::login))
        .route("/auth/sso", post(auth::sso))
        .route("/auth/verify", post(auth::verify))
        .route("/approve-lists", post(approvals::create))
        .route("/notify/pending-approvals", post(notify::pending_approvals))
        .route("/notify/daily-summary", post(notify::daily_summary))
        .merge(guarded)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

pub async fn run(engine: Engine, integrations: Integrations, auth: AuthConfig) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, integrations, auth, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    integrations: Integrations,
    auth: AuthConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(engine, integrations, &auth);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    integrations: Integrations,
    auth: AuthConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, integrations, auth, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
