use api_types::token::{
    DispenseResponse, ExchangeResponse, TokenDispense, TokenExchange, TokenStatus, TokenUpdate,
};

use crate::{client::ApiClient, session::SessionStore};

/// One server-side step of the mint sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintStep {
    Dispense,
    Exchange,
    Status,
    Name,
    Image,
}

impl MintStep {
    pub fn label(self) -> &'static str {
        match self {
            Self::Dispense => "dispense",
            Self::Exchange => "exchange",
            Self::Status => "status check",
            Self::Name => "name update",
            Self::Image => "image upload",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MintOutcome {
    /// All steps done; the redemption code can be handed to the recipient.
    Minted { code: String },
    /// The sequence stopped at `step`. Earlier steps' server-side effects
    /// stay in place: the API defines no compensation, so the policy is
    /// abort-and-report.
    Aborted { step: MintStep, reason: String },
}

impl MintOutcome {
    pub fn summary(&self) -> String {
        match self {
            Self::Minted { code } => format!("Minted. Redemption code: {code}"),
            Self::Aborted { step, reason } => {
                format!("Mint stopped at {}: {}", step.label(), reason)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct MintRequest {
    pub series_id: i64,
    pub name: String,
    pub owner: String,
    pub image: Vec<u8>,
    pub content_type: String,
}

/// Runs the five-step mint sequence, one awaited call per step:
/// dispense a token, exchange it to the owner, check its status, attach the
/// name, upload the image. The first failing step aborts the rest.
pub async fn run(
    client: &ApiClient,
    session: &mut SessionStore,
    request: MintRequest,
) -> MintOutcome {
    let reply = client
        .put(
            session,
            "/v2/tokens/dispense/",
            &TokenDispense::for_series(request.series_id),
        )
        .await;
    if !reply.ok() {
        return abort(MintStep::Dispense, reply.notice.message);
    }
    let Some(code) = serde_json::from_value::<DispenseResponse>(reply.body)
        .ok()
        .and_then(|res| res.code)
    else {
        return abort(MintStep::Dispense, "reply carried no redemption code");
    };

    let exchange = TokenExchange {
        code: code.clone(),
        owner: request.owner.clone(),
    };
    let reply = client.post(session, "/v2/tokens/exchange/", &exchange).await;
    if !reply.ok() {
        return abort(MintStep::Exchange, reply.notice.message);
    }
    let Some(id) = serde_json::from_value::<ExchangeResponse>(reply.body)
        .ok()
        .and_then(|res| res.id)
    else {
        return abort(MintStep::Exchange, "reply carried no token id");
    };

    let token_path = format!("/v2/tokens/{id}/");

    let reply = client.get(session, &token_path).await;
    if !reply.ok() {
        return abort(MintStep::Status, reply.notice.message);
    }
    let status = serde_json::from_value::<TokenStatus>(reply.body)
        .ok()
        .and_then(|res| res.status);
    // The API reports this failure inside a 200 response.
    if status.as_deref() == Some("error") {
        return abort(MintStep::Status, "token entered an error state");
    }

    let update = TokenUpdate {
        name: request.name.clone(),
    };
    let reply = client.put(session, &token_path, &update).await;
    if !reply.ok() {
        return abort(MintStep::Name, reply.notice.message);
    }

    let reply = client
        .upload(session, &token_path, request.image, &request.content_type)
        .await;
    if !reply.ok() {
        return abort(MintStep::Image, reply.notice.message);
    }

    tracing::info!("minted token {id} with code {code}");
    MintOutcome::Minted { code }
}

fn abort(step: MintStep, reason: impl Into<String>) -> MintOutcome {
    let reason = reason.into();
    tracing::warn!("mint aborted at {}: {reason}", step.label());
    MintOutcome::Aborted { step, reason }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        http::HeaderMap,
        routing::{get, post, put},
    };
    use serde_json::json;

    use super::*;

    type CallLog = Arc<Mutex<Vec<String>>>;

    fn record(log: &CallLog, entry: impl Into<String>) {
        log.lock().unwrap().push(entry.into());
    }

    /// Mock minting API covering all five steps. `token_status` is what the
    /// status check returns.
    fn mint_router(log: CallLog, token_status: &'static str) -> Router {
        let dispense_log = log.clone();
        let exchange_log = log.clone();
        let status_log = log.clone();
        let update_log = log;

        Router::new()
            .route(
                "/v2/tokens/dispense/",
                put(move |Json(body): Json<serde_json::Value>| {
                    let log = dispense_log.clone();
                    async move {
                        record(&log, format!("dispense series={}", body["series"]));
                        Json(json!({"code": "RDM-42"}))
                    }
                }),
            )
            .route(
                "/v2/tokens/exchange/",
                post(move |Json(body): Json<serde_json::Value>| {
                    let log = exchange_log.clone();
                    async move {
                        record(
                            &log,
                            format!("exchange code={} owner={}", body["code"], body["owner"]),
                        );
                        Json(json!({"id": 12}))
                    }
                }),
            )
            .route(
                "/v2/tokens/12/",
                get(move || {
                    let log = status_log.clone();
                    async move {
                        record(&log, "status");
                        Json(json!({"status": token_status}))
                    }
                })
                .put(move |headers: HeaderMap, body: axum::body::Bytes| {
                    let log = update_log.clone();
                    async move {
                        let json_body = headers
                            .get("content-type")
                            .and_then(|value| value.to_str().ok())
                            .is_some_and(|value| value.starts_with("application/json"));
                        if json_body {
                            record(&log, "name");
                        } else {
                            record(&log, format!("image bytes={}", body.len()));
                        }
                        Json(json!({}))
                    }
                }),
            )
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn session_in(dir: &tempfile::TempDir) -> SessionStore {
        let path = dir.path().join("state.json").to_string_lossy().into_owned();
        SessionStore::load(&path)
    }

    fn request() -> MintRequest {
        MintRequest {
            series_id: 9,
            name: "First print".to_string(),
            owner: "tz1owner".to_string(),
            image: vec![7; 16],
            content_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn happy_path_runs_all_steps_in_order() {
        let log: CallLog = Arc::default();
        let base = serve(mint_router(log.clone(), "minted")).await;
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        let client = ApiClient::new(&base).unwrap();

        let outcome = run(&client, &mut session, request()).await;

        assert_eq!(outcome, MintOutcome::Minted {
            code: "RDM-42".to_string()
        });
        let calls = log.lock().unwrap().clone();
        assert_eq!(calls, vec![
            "dispense series=9",
            "exchange code=\"RDM-42\" owner=\"tz1owner\"",
            "status",
            "name",
            "image bytes=16",
        ]);
        assert!(!session.busy());
    }

    #[tokio::test]
    async fn error_status_aborts_before_name_and_image() {
        let log: CallLog = Arc::default();
        let base = serve(mint_router(log.clone(), "error")).await;
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        let client = ApiClient::new(&base).unwrap();

        let outcome = run(&client, &mut session, request()).await;

        match outcome {
            MintOutcome::Aborted { step, .. } => assert_eq!(step, MintStep::Status),
            other => panic!("expected abort, got {other:?}"),
        }
        let calls = log.lock().unwrap().clone();
        assert_eq!(calls.len(), 3, "no calls after the failing step: {calls:?}");
        assert!(!session.busy());
    }

    #[tokio::test]
    async fn dispense_without_code_aborts_immediately() {
        let log: CallLog = Arc::default();
        let hits = log.clone();
        let router = Router::new().route(
            "/v2/tokens/dispense/",
            put(move || {
                let log = hits.clone();
                async move {
                    record(&log, "dispense");
                    Json(json!({}))
                }
            }),
        );
        let base = serve(router).await;
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        let client = ApiClient::new(&base).unwrap();

        let outcome = run(&client, &mut session, request()).await;

        match outcome {
            MintOutcome::Aborted { step, reason } => {
                assert_eq!(step, MintStep::Dispense);
                assert!(reason.contains("redemption code"));
            }
            other => panic!("expected abort, got {other:?}"),
        }
        assert_eq!(log.lock().unwrap().len(), 1);
    }
}
