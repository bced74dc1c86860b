//! Shared harness: the full router over in-memory adapters.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use fitness_hub::adapters::auth::JwtSessionManager;
use fitness_hub::adapters::http::{build_router, AppPorts, AppSettings};
use fitness_hub::adapters::memory::{
    InMemoryActivityLog, InMemoryCatalog, InMemoryFavoriteRepository,
    InMemoryPaymentMethodRepository, InMemoryPaymentRepository, InMemoryProfileRepository,
    InMemorySubscriptionRepository, InMemoryWorkoutSessionRepository, RecordingNotifier,
};
use fitness_hub::application::handlers::bot::BotSettings;
use fitness_hub::application::handlers::users::InitDataPolicy;
use fitness_hub::domain::billing::BillingPolicy;
use fitness_hub::ports::{
    ChargeOutcome, ChargeRequest, Invoice, InvoiceRequest, PaymentError, PaymentGateway,
};

pub const CLICK_SECRET: &str = "test-click-secret";
pub const WEBHOOK_SECRET: &str = "hook-secret";
pub const ADMIN_ID: i64 = 900;

/// Gateway double: invoices always succeed, charges always approve.
#[derive(Default)]
pub struct FakeGateway {
    pub invoices: Mutex<Vec<InvoiceRequest>>,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_invoice(&self, request: InvoiceRequest) -> Result<Invoice, PaymentError> {
        let payment_id = request.payment_id;
        self.invoices.lock().unwrap().push(request);
        Ok(Invoice {
            invoice_id: Some(format!("inv-{}", payment_id)),
            payment_url: format!("https://pay.example/{}", payment_id),
        })
    }

    async fn charge_card(&self, request: ChargeRequest) -> Result<ChargeOutcome, PaymentError> {
        Ok(ChargeOutcome {
            approved: true,
            click_trans_id: Some(format!("auto-{}", request.payment_id)),
            error_code: 0,
            error_note: "Success".to_string(),
            raw: serde_json::json!({}),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub ports: AppPorts,
    pub notifier: Arc<RecordingNotifier>,
    pub activity: Arc<InMemoryActivityLog>,
    pub gateway: Arc<FakeGateway>,
}

impl TestApp {
    pub fn new() -> Self {
        let catalog = Arc::new(InMemoryCatalog::sample());
        let notifier = Arc::new(RecordingNotifier::new());
        let activity = Arc::new(InMemoryActivityLog::new());
        let gateway = Arc::new(FakeGateway::default());
        let sessions = Arc::new(JwtSessionManager::new(
            b"integration-test-secret-of-32-bytes!",
            "fitness-hub",
            Duration::from_secs(3600),
        ));

        let ports = AppPorts {
            profiles: Arc::new(InMemoryProfileRepository::new()),
            favorites: Arc::new(InMemoryFavoriteRepository::new(catalog.clone())),
            catalog,
            workouts: Arc::new(InMemoryWorkoutSessionRepository::new()),
            subscriptions: Arc::new(InMemorySubscriptionRepository::new()),
            payments: Arc::new(InMemoryPaymentRepository::new()),
            payment_methods: Arc::new(InMemoryPaymentMethodRepository::new()),
            activity: activity.clone(),
            notifier: notifier.clone(),
            gateway: gateway.clone(),
            session_issuer: sessions.clone(),
            session_validator: sessions,
        };

        let settings = AppSettings {
            policy: BillingPolicy::default(),
            click_secret: SecretString::new(CLICK_SECRET.to_string()),
            card_type: "UZCARD".to_string(),
            init_data: InitDataPolicy::permissive(),
            bot: BotSettings {
                webapp_url: "https://fit.example".to_string(),
                admin_telegram_id: Some(ADMIN_ID),
            },
            webhook_secret: Some(SecretString::new(WEBHOOK_SECRET.to_string())),
        };

        Self {
            router: build_router(&ports, &settings),
            ports,
            notifier,
            activity,
            gateway,
        }
    }

    /// Sends a JSON request and returns the status and parsed body
    /// (`Value::Null` for empty bodies).
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Posts an urlencoded form.
    pub async fn form(&self, uri: &str, fields: &[(&str, &str)]) -> (StatusCode, Value) {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Signs in a Telegram account and returns its session token.
    pub async fn sign_in(&self, telegram_id: i64) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/users/auth",
                None,
                Some(serde_json::json!({
                    "telegram_id": telegram_id,
                    "first_name": "Aziz",
                    "username": "aziz"
                })),
            )
            .await;
        assert!(status.is_success(), "sign-in failed: {} {}", status, body);
        body["token"].as_str().unwrap().to_string()
    }
}
