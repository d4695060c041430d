//! Builders for HTTP and WebSocket state from configured adapters.
//!
//! Each outbound port gets its hosted adapter when the matching credentials
//! are configured and its fixture otherwise, so a bare checkout still serves
//! every endpoint.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::warn;
use url::Url;

use eatopia::domain::ports::{
    ConfirmationMailer, ContactRepository, ExperienceRepository, FixtureConfirmationMailer,
    FixtureIdentityProvider, FixtureTextGenerator, IdentityProvider, ImageSearch, TextGenerator,
};
use eatopia::domain::{
    ContactService, ExperienceService, IdentityAuthService, ImageSearchService,
    RecommendationService,
};
use eatopia::inbound::http::state::{HttpState, HttpStatePorts};
use eatopia::inbound::sign_outs::SignOutNotifier;
use eatopia::inbound::ws::state::{AllowedOrigins, WsState};
use eatopia::outbound::emailjs::{DEFAULT_EMAILJS_URL, EmailJsAccount, EmailJsMailer};
use eatopia::outbound::feed::BroadcastExperienceFeed;
use eatopia::outbound::gemini::{
    DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL, GeminiSetupError, GeminiTextGenerator,
};
use eatopia::outbound::identity_toolkit::{DEFAULT_IDENTITY_TOOLKIT_URL, IdentityToolkitProvider};
use eatopia::outbound::memory::{InMemoryContactRepository, InMemoryExperienceRepository};
use eatopia::outbound::persistence::{DieselContactRepository, DieselExperienceRepository};
use eatopia::outbound::pixabay::{DEFAULT_PIXABAY_URL, PixabayImageSearch};
use eatopia::outbound::unsplash::{DEFAULT_UNSPLASH_URL, UnsplashImageSearch};
use eatopia::settings::{AppSettings, SettingsError};

use super::ServerConfig;

/// Failure to assemble the adapters behind the application state.
#[derive(Debug, thiserror::Error)]
pub(super) enum StateBuildError {
    #[error("invalid adapter endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Gemini(#[from] GeminiSetupError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Shared state handed to every Actix worker.
pub(super) struct AppStates {
    pub(super) http: web::Data<HttpState>,
    pub(super) ws: web::Data<WsState>,
}

/// Repositories backing experiences and contact messages.
struct Storage {
    experiences: Arc<dyn ExperienceRepository>,
    contact: Arc<dyn ContactRepository>,
}

/// Use `make_storage` when a pool is available, otherwise in-memory storage.
fn build_storage<Pool>(pool: &Option<Pool>, make_storage: impl FnOnce(&Pool) -> Storage) -> Storage {
    match pool {
        Some(pool) => make_storage(pool),
        None => {
            warn!("no database configured; experiences are kept in memory");
            Storage {
                experiences: Arc::new(InMemoryExperienceRepository::default()),
                contact: Arc::new(InMemoryContactRepository::default()),
            }
        }
    }
}

fn build_identity_provider(
    settings: &AppSettings,
    timeout: Duration,
) -> Result<Arc<dyn IdentityProvider>, StateBuildError> {
    match AppSettings::key(settings.identity_api_key.as_deref()) {
        Some(api_key) => Ok(Arc::new(IdentityToolkitProvider::new(
            Url::parse(DEFAULT_IDENTITY_TOOLKIT_URL)?,
            api_key,
            timeout,
        )?)),
        None => {
            warn!("no identity API key configured; using the fixture account");
            Ok(Arc::new(FixtureIdentityProvider))
        }
    }
}

fn build_mailer(
    settings: &AppSettings,
    timeout: Duration,
) -> Result<Arc<dyn ConfirmationMailer>, StateBuildError> {
    match settings.emailjs_keys() {
        Some(keys) => Ok(Arc::new(EmailJsMailer::new(
            Url::parse(DEFAULT_EMAILJS_URL)?,
            EmailJsAccount {
                service_id: keys.service_id.to_owned(),
                template_id: keys.template_id.to_owned(),
                public_key: keys.public_key.to_owned(),
            },
            timeout,
        )?)),
        None => {
            warn!("EmailJS not configured; confirmation emails are only logged");
            Ok(Arc::new(FixtureConfirmationMailer))
        }
    }
}

/// Unsplash first, then Pixabay. Unconfigured providers report themselves
/// as such and are skipped at search time.
fn build_image_providers(
    settings: &AppSettings,
    timeout: Duration,
) -> Result<Vec<Arc<dyn ImageSearch>>, StateBuildError> {
    let unsplash = UnsplashImageSearch::new(
        Url::parse(DEFAULT_UNSPLASH_URL)?,
        AppSettings::key(settings.unsplash_access_key.as_deref()),
        timeout,
    )?;
    let pixabay = PixabayImageSearch::new(
        Url::parse(DEFAULT_PIXABAY_URL)?,
        AppSettings::key(settings.pixabay_api_key.as_deref()),
        timeout,
    )?;
    Ok(vec![Arc::new(unsplash), Arc::new(pixabay)])
}

fn build_text_generator(
    settings: &AppSettings,
    timeout: Duration,
) -> Result<Arc<dyn TextGenerator>, StateBuildError> {
    match AppSettings::key(settings.gemini_api_key.as_deref()) {
        Some(api_key) => {
            let model = AppSettings::key(settings.gemini_model.as_deref())
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_owned());
            Ok(Arc::new(GeminiTextGenerator::new(
                &Url::parse(DEFAULT_GEMINI_URL)?,
                &model,
                api_key,
                timeout,
            )?))
        }
        None => {
            warn!("no Gemini API key configured; recommendations are disabled");
            Ok(Arc::new(FixtureTextGenerator))
        }
    }
}

fn build_states_with_storage(
    settings: &AppSettings,
    storage: Storage,
    clock: Arc<dyn Clock>,
) -> Result<AppStates, StateBuildError> {
    let timeout = settings.http_timeout();
    let Storage {
        experiences: repository,
        contact: contact_repository,
    } = storage;
    let feed = Arc::new(BroadcastExperienceFeed::new(repository.clone()));
    let experiences = Arc::new(ExperienceService::new(
        repository,
        feed.clone(),
        clock.clone(),
    ));
    let sign_outs = SignOutNotifier::default();

    let http = HttpState::new(
        HttpStatePorts {
            auth: Arc::new(IdentityAuthService::new(build_identity_provider(
                settings, timeout,
            )?)),
            experiences: experiences.clone(),
            experiences_query: experiences.clone(),
            contact: Arc::new(ContactService::new(
                contact_repository,
                build_mailer(settings, timeout)?,
            )),
            images: Arc::new(ImageSearchService::new(build_image_providers(
                settings, timeout,
            )?)),
            recommendations: Arc::new(RecommendationService::new(build_text_generator(
                settings, timeout,
            )?)),
        },
        clock,
    )
    .with_sign_outs(sign_outs.clone());
    let origins = AllowedOrigins::new(settings.allowed_origins()?, settings.allow_localhost);
    let ws = WsState::new(experiences, feed, origins, sign_outs);

    Ok(AppStates {
        http: web::Data::new(http),
        ws: web::Data::new(ws),
    })
}

/// Build the shared HTTP and WebSocket state from configured adapters.
pub(super) fn build_states(config: &ServerConfig) -> Result<AppStates, StateBuildError> {
    let storage = build_storage(&config.db_pool, |pool| Storage {
        experiences: Arc::new(DieselExperienceRepository::new(pool.clone())),
        contact: Arc::new(DieselContactRepository::new(pool.clone())),
    });
    build_states_with_storage(&config.settings, storage, Arc::new(DefaultClock))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eatopia::domain::ports::{
        CreateExperienceRequest, ExperienceCommand, ExperienceQuery, FixtureContactRepository,
        TextGeneratorError,
    };
    use eatopia::domain::{ExperienceDetails, ExperienceDetailsDraft, LoginCredentials, UserId};
    use rstest::{fixture, rstest};

    #[fixture]
    fn settings() -> AppSettings {
        AppSettings {
            bind_addr: None,
            database_url: None,
            db_max_connections: None,
            identity_api_key: None,
            emailjs_service_id: None,
            emailjs_template_id: None,
            emailjs_public_key: None,
            unsplash_access_key: None,
            pixabay_api_key: None,
            gemini_api_key: None,
            gemini_model: None,
            http_timeout_secs: None,
            allowed_origins: None,
            allow_localhost: false,
        }
    }

    fn fixture_storage() -> Storage {
        Storage {
            experiences: Arc::new(InMemoryExperienceRepository::default()),
            contact: Arc::new(FixtureContactRepository),
        }
    }

    #[rstest]
    fn db_pool_absent_selects_in_memory_storage() {
        let mut made = false;

        let _storage = build_storage::<()>(&None, |_| {
            made = true;
            fixture_storage()
        });

        assert!(!made);
    }

    #[rstest]
    fn db_pool_present_uses_the_pool_backed_storage() {
        let mut made = false;

        let _storage = build_storage(&Some(()), |_| {
            made = true;
            fixture_storage()
        });

        assert!(made);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_identity_key_accepts_the_fixture_account(settings: AppSettings) {
        let provider =
            build_identity_provider(&settings, settings.http_timeout()).expect("provider");
        let credentials = LoginCredentials::try_from_parts(
            FixtureIdentityProvider::EMAIL,
            FixtureIdentityProvider::PASSWORD,
        )
        .expect("credentials shape");

        let user = provider.sign_in(&credentials).await.expect("fixture sign-in");

        assert_eq!(user.id().as_ref(), FixtureIdentityProvider::USER_ID);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_gemini_key_reports_not_configured(settings: AppSettings) {
        let generator = build_text_generator(&settings, settings.http_timeout()).expect("generator");

        let result = generator.generate("Suggest dinner").await;

        assert!(matches!(result, Err(TextGeneratorError::NotConfigured)));
    }

    #[rstest]
    fn configured_gemini_key_builds_the_hosted_adapter(mut settings: AppSettings) {
        settings.gemini_api_key = Some("key".into());
        settings.gemini_model = Some("gemini-1.5-flash".into());

        assert!(build_text_generator(&settings, settings.http_timeout()).is_ok());
    }

    #[rstest]
    fn invalid_origins_fail_the_build(mut settings: AppSettings) {
        settings.allowed_origins = Some("not a url".into());

        let result = build_states_with_storage(
            &settings,
            fixture_storage(),
            Arc::new(DefaultClock),
        );

        assert!(matches!(result, Err(StateBuildError::Settings(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn socket_state_sees_experiences_created_over_http(settings: AppSettings) {
        let states = build_states_with_storage(&settings, fixture_storage(), Arc::new(DefaultClock))
            .expect("states");
        let user = UserId::new("fixture-diner").expect("user id");
        let details = ExperienceDetails::new(ExperienceDetailsDraft {
            name: "Anniversary".into(),
            restaurant: "Trattoria".into(),
            location: "Boston".into(),
            date: Some(chrono::Utc::now()),
            ..ExperienceDetailsDraft::default()
        })
        .expect("details");

        states
            .http
            .experiences
            .create(CreateExperienceRequest {
                user_id: user.clone(),
                details,
            })
            .await
            .expect("create");
        let streamed = states.ws.query.list(&user).await.expect("list");

        assert_eq!(streamed.len(), 1);
    }
}
