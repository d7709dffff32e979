use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, Mailer, OtpService, SeaOrmAccountService, SeaOrmOtpService,
    SeaOrmTwoFactorService, SummaryService, TwoFactorEngine, TwoFactorService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub mailer: Arc<Mailer>,

    pub account_service: Arc<dyn AccountService>,

    pub otp_service: Arc<dyn OtpService>,

    pub two_factor_service: Arc<dyn TwoFactorService>,

    pub summary_service: Arc<SummaryService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires every service against an already connected store. Tests use
    /// this with an in-memory database.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let mailer = Arc::new(Mailer::new(config.email.clone()));
        let engine = TwoFactorEngine::new(config.two_factor.issuer.clone());

        let account_service: Arc<dyn AccountService> = Arc::new(SeaOrmAccountService::new(
            store.clone(),
            mailer.clone(),
            config.security.clone(),
        ));

        let otp_service: Arc<dyn OtpService> = Arc::new(SeaOrmOtpService::new(
            store.clone(),
            mailer.clone(),
            config.security.clone(),
            config.otp.clone(),
        ));

        let two_factor_service: Arc<dyn TwoFactorService> = Arc::new(SeaOrmTwoFactorService::new(
            store.clone(),
            mailer.clone(),
            engine,
        ));

        let summary_service = Arc::new(SummaryService::new(store.clone(), mailer.clone()));

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            mailer,
            account_service,
            otp_service,
            two_factor_service,
            summary_service,
        }
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
