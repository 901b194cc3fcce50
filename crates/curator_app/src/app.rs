use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use curator_core::{
    update, AsyncViewState, EnrichOutcome, Enrichable, FailureKind, FeedState, FeedStatus,
    FetchError, Msg, Profile, SecondaryResourceEnricher,
};
use curator_engine::{EngineEvent, MemberUpdate, ReqwestCurationApi};
use curator_logging::{curator_debug, curator_info, curator_warn};

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::{persistence, render};

const POLL_INTERVAL: Duration = Duration::from_millis(75);

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?
        .with_overrides(cli.api_url.clone(), cli.api_key.clone());
    let session_path = cli
        .session
        .clone()
        .unwrap_or_else(|| config.session_file.clone());

    match cli.command {
        Command::Profile { username, pages } => {
            run_profile(&config, &session_path, &username, pages)
        }
        Command::Me { refresh } => run_me(&config, &session_path, refresh),
        Command::Curation { id } => run_curation(&config, id),
        Command::UpdateProfile {
            username,
            email,
            introduce,
            password,
            profile_image,
        } => {
            let edits = ProfileEdits {
                username,
                email,
                introduce,
                password,
                profile_image,
            };
            run_update_profile(&config, &session_path, edits)
        }
        Command::DeleteAccount { yes } => run_delete_account(&config, &session_path, yes),
        Command::Logout => {
            if persistence::clear_session(&session_path)
                .with_context(|| format!("Failed to remove {}", session_path.display()))?
            {
                println!("Signed out.");
            } else {
                println!("No session to clear.");
            }
            Ok(())
        }
        Command::Playlists { id, recommend, liked } => run_playlists(&config, id, recommend, liked),
    }
}

fn run_profile(
    config: &AppConfig,
    session_path: &Path,
    username: &str,
    pages: u32,
) -> anyhow::Result<()> {
    let session = persistence::load_session(session_path);
    let runner =
        EffectRunner::new(config.api_settings()).context("Failed to start the fetch engine")?;
    let deadline = config.settle_timeout();

    let state = FeedState::new(config.page_size.max(1), session);
    let state = step(&runner, state, Msg::Mounted {
        author: username.to_string(),
    });
    let mut state = settle(&runner, state, deadline);

    let mut loaded = 1;
    while loaded < pages {
        let view = state.view();
        if !view.has_more || view.load_more_error.is_some() || view.feed != FeedStatus::Loaded {
            break;
        }
        state = step(&runner, state, Msg::LoadMoreRequested);
        state = settle(&runner, state, deadline);
        loaded += 1;
    }

    let view = state.view();
    print!("{}", render::render_feed(&view));
    let (_state, _effects) = update(state, Msg::Unmounted);

    if let FeedStatus::Error(message) = view.feed {
        bail!("Could not load curations for {username}: {message}");
    }
    Ok(())
}

/// Applies one message and hands its effects to the engine.
fn step(runner: &EffectRunner, state: FeedState, msg: Msg) -> FeedState {
    let (mut state, effects) = update(state, msg);
    if state.consume_dirty() {
        let view = state.view();
        curator_debug!(
            "View changed: feed={:?} rows={} previews_in_flight={}",
            view.feed,
            view.curations.len(),
            view.previews_in_flight
        );
    }
    runner.enqueue(effects);
    state
}

/// Pumps engine completions into the controller until nothing is outstanding.
fn settle(runner: &EffectRunner, mut state: FeedState, timeout: Duration) -> FeedState {
    let started = Instant::now();
    while !state.is_settled() {
        if started.elapsed() >= timeout {
            curator_warn!("Gave up waiting for outstanding fetches after {:?}", timeout);
            break;
        }
        let msg = runner.recv(POLL_INTERVAL).unwrap_or(Msg::Tick);
        state = step(runner, state, msg);
    }
    state
}

fn run_me(config: &AppConfig, session_path: &Path, refresh: bool) -> anyhow::Result<()> {
    let mut session = persistence::load_session(session_path);
    if !refresh {
        if let Some(member) = session.member() {
            curator_info!("Using cached session for {}", member.username);
            print!("{}", render::render_profile(member));
            return Ok(());
        }
    }
    if config.api_key.is_none() {
        bail!("No session cached; set CURATOR_API_KEY or api_key in the config to sign in");
    }

    let runner =
        EffectRunner::new(config.api_settings()).context("Failed to start the fetch engine")?;
    let mut member: AsyncViewState<Profile> = AsyncViewState::new();
    let generation = member.begin();
    runner.fetch_current_member(generation);

    let started = Instant::now();
    while member.is_loading() {
        if started.elapsed() >= config.settle_timeout() {
            member.reject("timed out waiting for the backend");
            break;
        }
        if let Some(EngineEvent::ProfileFetched { generation, result }) =
            runner.recv_event(POLL_INTERVAL)
        {
            if let Err(err) = &result {
                if is_unauthorized(err) {
                    curator_info!("Backend rejected the api key; clearing session");
                    session.clear();
                    persistence::clear_session(session_path)?;
                }
            }
            member.resolve(generation, result);
        }
    }

    if let Some(error) = member.error() {
        bail!("Could not sign in: {error}");
    }
    if let Some(profile) = member.loaded() {
        session.init(profile.clone());
        persistence::save_session(session_path, &session)
            .with_context(|| format!("Failed to save session to {}", session_path.display()))?;
        print!("{}", render::render_profile(profile));
    }
    Ok(())
}

fn is_unauthorized(err: &FetchError) -> bool {
    match &err.kind {
        FailureKind::HttpStatus(status) => *status == 401,
        FailureKind::Application { code } => code.starts_with("401"),
        _ => false,
    }
}

fn current_thread_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build runtime")
}

/// Runs preview fetches for `items` until every pair has completed or failed.
fn enrich<T: Enrichable>(
    config: &AppConfig,
    items: &[T],
) -> anyhow::Result<SecondaryResourceEnricher> {
    let mut enricher = SecondaryResourceEnricher::new();
    let requests = enricher.reconcile(items);
    if requests.is_empty() {
        return Ok(enricher);
    }
    let runner =
        EffectRunner::new(config.api_settings()).context("Failed to start the fetch engine")?;
    runner.fetch_previews(requests);

    let started = Instant::now();
    while !enricher.is_idle() {
        if started.elapsed() >= config.settle_timeout() {
            curator_warn!(
                "Gave up on {} link previews after {:?}",
                enricher.in_flight_count(),
                config.settle_timeout()
            );
            break;
        }
        if let Some(EngineEvent::PreviewFetched { request, result }) =
            runner.recv_event(POLL_INTERVAL)
        {
            if let EnrichOutcome::Failed(err) = enricher.complete(&request, result) {
                curator_warn!("Preview of {} failed: {}", request.url, err);
            }
        }
    }
    Ok(enricher)
}

fn run_curation(config: &AppConfig, id: i64) -> anyhow::Result<()> {
    let api = ReqwestCurationApi::new(config.api_settings())?;
    let curation = current_thread_runtime()?
        .block_on(api.fetch_curation(id))
        .with_context(|| format!("Could not load curation {id}"))?;
    let enricher = enrich(config, std::slice::from_ref(&curation))?;
    print!("{}", render::render_curation(&curation, &enricher));
    Ok(())
}

fn run_playlists(
    config: &AppConfig,
    id: Option<i64>,
    recommend: bool,
    liked: bool,
) -> anyhow::Result<()> {
    let api = ReqwestCurationApi::new(config.api_settings())?;
    let runtime = current_thread_runtime()?;

    let text = match (id, recommend, liked) {
        (Some(id), true, _) => {
            let playlists = runtime.block_on(api.recommendations(id))?;
            render::render_playlists("Recommended", &playlists)
        }
        (Some(id), false, _) => {
            let playlist = runtime.block_on(api.playlist(id))?;
            let enricher = enrich(config, std::slice::from_ref(&playlist))?;
            render::render_playlist(&playlist, &enricher)
        }
        (None, _, true) => {
            let playlists = runtime.block_on(api.liked_playlists())?;
            render::render_playlists("Liked playlists", &playlists)
        }
        (None, _, false) => render::render_playlists("Playlists", &runtime.block_on(api.playlists())?),
    };
    print!("{text}");
    Ok(())
}

struct ProfileEdits {
    username: Option<String>,
    email: Option<String>,
    introduce: Option<String>,
    password: Option<String>,
    profile_image: Option<String>,
}

impl ProfileEdits {
    /// Fills unset fields from the cached member.
    fn into_update(self, member: &Profile) -> anyhow::Result<MemberUpdate> {
        let Some(member_id) = member.id else {
            bail!("Cached session has no member id; run `curator me --refresh` first");
        };
        Ok(MemberUpdate {
            member_id,
            username: self.username.unwrap_or_else(|| member.username.clone()),
            password: self.password,
            email: self
                .email
                .or_else(|| member.email.clone())
                .unwrap_or_default(),
            profile_image: self.profile_image.or_else(|| member.profile_image_url.clone()),
            introduce: self
                .introduce
                .or_else(|| member.introduction.clone())
                .unwrap_or_default(),
        })
    }
}

fn run_update_profile(
    config: &AppConfig,
    session_path: &Path,
    edits: ProfileEdits,
) -> anyhow::Result<()> {
    let mut session = persistence::load_session(session_path);
    let Some(member) = session.member().cloned() else {
        bail!("Not signed in; run `curator me` first");
    };
    let update = edits.into_update(&member)?;

    let api = ReqwestCurationApi::new(config.api_settings())?;
    current_thread_runtime()?
        .block_on(api.update_member(&update))
        .context("Profile update failed")?;

    session.init(Profile {
        username: update.username,
        email: Some(update.email),
        profile_image_url: update.profile_image,
        introduction: Some(update.introduce),
        ..member
    });
    persistence::save_session(session_path, &session)
        .with_context(|| format!("Failed to save session to {}", session_path.display()))?;
    if let Some(member) = session.member() {
        print!("{}", render::render_profile(member));
    }
    Ok(())
}

fn run_delete_account(config: &AppConfig, session_path: &Path, yes: bool) -> anyhow::Result<()> {
    if !yes {
        bail!("Refusing to delete the account without --yes");
    }
    let api = ReqwestCurationApi::new(config.api_settings())?;
    current_thread_runtime()?
        .block_on(api.delete_account())
        .context("Account deletion failed")?;
    persistence::clear_session(session_path)?;
    curator_info!("Account deleted; session cleared");
    println!("Account deleted.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edits() -> ProfileEdits {
        ProfileEdits {
            username: None,
            email: None,
            introduce: Some("new intro".to_string()),
            password: None,
            profile_image: None,
        }
    }

    #[test]
    fn profile_edits_keep_cached_values_for_unset_fields() {
        let member = Profile {
            id: Some(5),
            email: Some("kim@example.com".to_string()),
            introduction: Some("old intro".to_string()),
            ..Profile::new("kim")
        };

        let update = edits().into_update(&member).unwrap();
        assert_eq!(update.member_id, 5);
        assert_eq!(update.username, "kim");
        assert_eq!(update.email, "kim@example.com");
        assert_eq!(update.introduce, "new intro");
        assert_eq!(update.password, None);
    }

    #[test]
    fn profile_edits_need_a_member_id() {
        assert!(edits().into_update(&Profile::new("kim")).is_err());
    }

    #[test]
    fn unauthorized_covers_status_and_code() {
        assert!(is_unauthorized(&FetchError::new(
            FailureKind::HttpStatus(401),
            "invalid api key"
        )));
        assert!(is_unauthorized(&FetchError::new(
            FailureKind::Application {
                code: "401-2".to_string()
            },
            "expired"
        )));
        assert!(!is_unauthorized(&FetchError::transport("offline")));
        assert!(!is_unauthorized(&FetchError::new(
            FailureKind::HttpStatus(404),
            "missing"
        )));
    }
}
