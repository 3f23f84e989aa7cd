//! SaaS API server binary.

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use axum::extract::Request;
use axum::ServiceExt;

use saas_api::adapters::auth::{BcryptPasswordHasher, JwtSessionValidator, JwtTokenService};
use saas_api::adapters::email::ResendEmailSender;
use saas_api::adapters::http::{build_router, AppInfo, AppState};
use saas_api::adapters::memory::{
    InMemoryPlanRepository, InMemorySubscriptionRepository, InMemoryUserRepository,
};
use saas_api::adapters::postgres::{
    self, PostgresPlanRepository, PostgresSubscriptionRepository, PostgresUserRepository,
};
use saas_api::adapters::stripe::StripePaymentAdapter;
use saas_api::config::{AppConfig, DatabaseConfig};
use saas_api::ports::{PlanRepository, SubscriptionRepository, TokenService, UserRepository};
use saas_api::telemetry;

type Repositories = (
    Arc<dyn UserRepository>,
    Arc<dyn PlanRepository>,
    Arc<dyn SubscriptionRepository>,
);

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Telemetry may not be up yet when config loading fails.
            eprintln!("saas-api: {}", e);
            tracing::error!(error = %e, "server exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init(&config.server);

    let (users, plans, subscriptions) = repositories(&config.database).await?;

    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_config(&config.auth));
    let state = AppState {
        info: AppInfo {
            name: config.server.app_name.clone(),
            version: config.server.app_version.clone(),
        },
        sessions: Arc::new(JwtSessionValidator::new(tokens.clone(), users.clone())),
        users,
        plans,
        subscriptions,
        hasher: Arc::new(BcryptPasswordHasher::new(config.auth.bcrypt_cost)),
        tokens,
        email: Arc::new(ResendEmailSender::from_config(
            &config.email,
            &config.server.app_name,
        )?),
        payments: Arc::new(StripePaymentAdapter::from_config(&config.payment)?),
    };

    let app = build_router(state, &config.server);
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        environment = config.server.environment.as_str(),
        version = %config.server.app_version,
        "listening"
    );
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
    Ok(())
}

async fn repositories(config: &DatabaseConfig) -> Result<Repositories, Box<dyn Error>> {
    if config.is_in_memory() {
        tracing::warn!("using in-memory storage; data is lost on exit");
        return Ok((
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPlanRepository::new()),
            Arc::new(InMemorySubscriptionRepository::new()),
        ));
    }

    let pool = postgres::connect(config).await?;
    if config.run_migrations {
        postgres::run_migrations(&pool).await?;
        tracing::info!("database migrations applied");
    }
    Ok((
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresPlanRepository::new(pool.clone())),
        Arc::new(PostgresSubscriptionRepository::new(pool)),
    ))
}
