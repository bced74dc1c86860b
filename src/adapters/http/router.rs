//! Application router.
//!
//! ```text
//! /api/*           JSON API, bearer sessions (auth_middleware)
//! /click/*         Click prepare/complete, MD5 sign
//! /bot/webhook     Telegram updates, secret token header
//! /health          liveness, outside the timeout layer
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, middleware, Router};
use secrecy::SecretString;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::adapters::scheduler::BillingScheduler;
use crate::application::handlers::billing::{
    CancelSubscriptionHandler, CompleteClickPaymentHandler, CreatePaymentHandler,
    DeactivateExpiredHandler, GetSubscriptionHandler, PaymentHistoryHandler,
    PrepareClickPaymentHandler, ProcessAutoRenewalsHandler, RemoveCardHandler, SaveCardHandler,
    SendExpiryRemindersHandler, SetAutoRenewHandler,
};
use crate::application::handlers::bot::{BotCommandHandler, BotSettings};
use crate::application::handlers::catalog::{
    GetEditionPlanHandler, GetExerciseDetailHandler, GetProgramHandler, ListExercisesHandler,
    ListMuscleGroupsHandler, ListProgramsHandler,
};
use crate::application::handlers::favorites::{
    CreateCollectionHandler, DeleteCollectionHandler, ListCollectionsHandler,
    ListFavoritesHandler, MoveFavoriteHandler, RemoveFavoriteHandler, ToggleFavoriteHandler,
};
use crate::application::handlers::users::{
    ChangeLanguageHandler, CompleteOnboardingHandler, GetProfileHandler, InitDataPolicy,
    SaveOnboardingStepHandler, SubmitQuestionnaireHandler, TelegramAuthHandler,
    UpdateProfileHandler,
};
use crate::application::handlers::workouts::{
    AbandonWorkoutHandler, CompleteWorkoutHandler, GetTrainerStatsHandler,
    GetWorkoutHistoryHandler, StartWorkoutHandler,
};
use crate::config::{AppConfig, ServerConfig};
use crate::domain::billing::BillingPolicy;
use crate::ports::{
    ActivityLog, CatalogReader, FavoriteRepository, Notifier, PaymentGateway,
    PaymentMethodRepository, PaymentRepository, ProfileRepository, SessionIssuer,
    SessionValidator, SubscriptionRepository, WorkoutSessionRepository,
};

use super::billing::{billing_routes, BillingHandlers};
use super::bot::{bot_routes, BotWebhookState};
use super::catalog::{catalog_routes, CatalogHandlers};
use super::click::{click_routes, ClickHandlers};
use super::favorites::{favorite_routes, FavoriteHandlers};
use super::health::health_routes;
use super::middleware::auth_middleware;
use super::users::{user_routes, UserHandlers};
use super::workouts::{workout_routes, WorkoutHandlers};

/// Adapter instances behind every port the application uses.
#[derive(Clone)]
pub struct AppPorts {
    pub profiles: Arc<dyn ProfileRepository>,
    pub catalog: Arc<dyn CatalogReader>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub workouts: Arc<dyn WorkoutSessionRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub payment_methods: Arc<dyn PaymentMethodRepository>,
    pub activity: Arc<dyn ActivityLog>,
    pub notifier: Arc<dyn Notifier>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub session_issuer: Arc<dyn SessionIssuer>,
    pub session_validator: Arc<dyn SessionValidator>,
}

/// Settings the handlers need from configuration.
#[derive(Clone)]
pub struct AppSettings {
    pub policy: BillingPolicy,
    pub click_secret: SecretString,
    pub card_type: String,
    pub init_data: InitDataPolicy,
    pub bot: BotSettings,
    pub webhook_secret: Option<SecretString>,
}

impl AppSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            policy: config.subscription.policy(),
            click_secret: config.click.secret_key.clone(),
            card_type: config.click.card_type.clone(),
            init_data: InitDataPolicy {
                bot_token: config.telegram.bot_token.clone(),
                max_age_secs: config.telegram.init_data_max_age_secs,
                require_init_data: config.telegram.require_init_data,
            },
            bot: BotSettings {
                webapp_url: config.telegram.webapp_base().to_string(),
                admin_telegram_id: config.telegram.admin_id,
            },
            webhook_secret: config.telegram.webhook_secret.clone(),
        }
    }
}

impl AppPorts {
    fn user_handlers(&self, settings: &AppSettings) -> UserHandlers {
        UserHandlers {
            auth: Arc::new(TelegramAuthHandler::new(
                self.profiles.clone(),
                self.session_issuer.clone(),
                settings.init_data.clone(),
            )),
            save_step: Arc::new(SaveOnboardingStepHandler::new(
                self.profiles.clone(),
                self.activity.clone(),
            )),
            complete_onboarding: Arc::new(CompleteOnboardingHandler::new(
                self.profiles.clone(),
                self.activity.clone(),
            )),
            submit_questionnaire: Arc::new(SubmitQuestionnaireHandler::new(
                self.profiles.clone(),
                self.activity.clone(),
            )),
            get_profile: Arc::new(GetProfileHandler::new(self.profiles.clone())),
            update_profile: Arc::new(UpdateProfileHandler::new(self.profiles.clone())),
            change_language: Arc::new(ChangeLanguageHandler::new(self.profiles.clone())),
        }
    }

    fn catalog_handlers(&self) -> CatalogHandlers {
        CatalogHandlers {
            muscle_groups: Arc::new(ListMuscleGroupsHandler::new(self.catalog.clone())),
            exercises: Arc::new(ListExercisesHandler::new(
                self.catalog.clone(),
                self.favorites.clone(),
            )),
            exercise_detail: Arc::new(GetExerciseDetailHandler::new(
                self.catalog.clone(),
                self.favorites.clone(),
                self.activity.clone(),
            )),
            programs: Arc::new(ListProgramsHandler::new(self.catalog.clone())),
            program: Arc::new(GetProgramHandler::new(
                self.catalog.clone(),
                self.activity.clone(),
            )),
            edition_plan: Arc::new(GetEditionPlanHandler::new(self.catalog.clone())),
        }
    }

    fn favorite_handlers(&self) -> FavoriteHandlers {
        FavoriteHandlers {
            toggle: Arc::new(ToggleFavoriteHandler::new(
                self.catalog.clone(),
                self.favorites.clone(),
                self.activity.clone(),
            )),
            list: Arc::new(ListFavoritesHandler::new(self.favorites.clone())),
            remove: Arc::new(RemoveFavoriteHandler::new(self.favorites.clone())),
            create_collection: Arc::new(CreateCollectionHandler::new(self.favorites.clone())),
            list_collections: Arc::new(ListCollectionsHandler::new(self.favorites.clone())),
            delete_collection: Arc::new(DeleteCollectionHandler::new(self.favorites.clone())),
            move_favorite: Arc::new(MoveFavoriteHandler::new(self.favorites.clone())),
        }
    }

    fn workout_handlers(&self) -> WorkoutHandlers {
        WorkoutHandlers {
            start: Arc::new(StartWorkoutHandler::new(
                self.catalog.clone(),
                self.workouts.clone(),
                self.activity.clone(),
            )),
            complete: Arc::new(CompleteWorkoutHandler::new(
                self.workouts.clone(),
                self.activity.clone(),
            )),
            abandon: Arc::new(AbandonWorkoutHandler::new(self.workouts.clone())),
            stats: Arc::new(GetTrainerStatsHandler::new(self.workouts.clone())),
            history: Arc::new(GetWorkoutHistoryHandler::new(self.workouts.clone())),
        }
    }

    fn billing_handlers(&self, settings: &AppSettings) -> BillingHandlers {
        BillingHandlers {
            create_payment: Arc::new(CreatePaymentHandler::new(
                self.payments.clone(),
                self.gateway.clone(),
                self.activity.clone(),
                settings.policy.clone(),
            )),
            subscription: Arc::new(GetSubscriptionHandler::new(
                self.subscriptions.clone(),
                self.payment_methods.clone(),
                self.activity.clone(),
                settings.policy.clone(),
            )),
            cancel: Arc::new(CancelSubscriptionHandler::new(self.subscriptions.clone())),
            auto_renew: Arc::new(SetAutoRenewHandler::new(
                self.subscriptions.clone(),
                self.payment_methods.clone(),
            )),
            history: Arc::new(PaymentHistoryHandler::new(self.payments.clone())),
            save_card: Arc::new(SaveCardHandler::new(
                self.payment_methods.clone(),
                self.subscriptions.clone(),
            )),
            remove_card: Arc::new(RemoveCardHandler::new(
                self.payment_methods.clone(),
                self.subscriptions.clone(),
            )),
            default_card_type: settings.card_type.clone(),
        }
    }

    fn click_handlers(&self, settings: &AppSettings) -> ClickHandlers {
        ClickHandlers {
            prepare: Arc::new(PrepareClickPaymentHandler::new(
                self.payments.clone(),
                settings.click_secret.clone(),
            )),
            complete: Arc::new(CompleteClickPaymentHandler::new(
                self.payments.clone(),
                self.subscriptions.clone(),
                self.profiles.clone(),
                self.activity.clone(),
                self.notifier.clone(),
                settings.click_secret.clone(),
                settings.policy.clone(),
            )),
        }
    }

    fn bot_state(&self, settings: &AppSettings) -> BotWebhookState {
        BotWebhookState {
            handler: Arc::new(BotCommandHandler::new(
                self.profiles.clone(),
                self.activity.clone(),
                self.notifier.clone(),
                settings.bot.clone(),
            )),
            secret: settings.webhook_secret.clone(),
        }
    }

    /// Renewal, reminder and expiry jobs over the same ports as the API.
    pub fn billing_scheduler(&self, policy: &BillingPolicy, interval: Duration) -> BillingScheduler {
        BillingScheduler::new(
            Arc::new(ProcessAutoRenewalsHandler::new(
                self.subscriptions.clone(),
                self.payment_methods.clone(),
                self.payments.clone(),
                self.profiles.clone(),
                self.notifier.clone(),
                self.gateway.clone(),
                policy.clone(),
            )),
            Arc::new(SendExpiryRemindersHandler::new(
                self.subscriptions.clone(),
                self.profiles.clone(),
                self.notifier.clone(),
                policy.clone(),
            )),
            Arc::new(DeactivateExpiredHandler::new(
                self.subscriptions.clone(),
                self.profiles.clone(),
                self.notifier.clone(),
                policy.clone(),
            )),
            interval,
        )
    }
}

/// All routes without the outer HTTP layers.
pub fn build_router(ports: &AppPorts, settings: &AppSettings) -> Router {
    let api = Router::new()
        .merge(user_routes(ports.user_handlers(settings)))
        .merge(catalog_routes(ports.catalog_handlers()))
        .merge(favorite_routes(ports.favorite_handlers()))
        .merge(workout_routes(ports.workout_handlers()))
        .merge(billing_routes(ports.billing_handlers(settings)))
        .layer(middleware::from_fn_with_state(
            ports.session_validator.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api", api)
        .merge(click_routes(ports.click_handlers(settings)))
        .merge(bot_routes(ports.bot_state(settings)))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Wraps the routes with request ids, tracing, CORS and the request timeout.
/// `/health` stays outside the timeout.
pub fn with_http_layers(router: Router, server: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors_layer(server))
        .layer(TimeoutLayer::new(server.request_timeout()));

    router.layer(middleware).merge(health_routes())
}
