//! Application state management for Lightbox.
//!
//! The `App` struct owns every long-lived object: configuration, the session
//! context, the API client, the navigator, form state for the login and
//! register views, gallery data, and the background refresh channel. Session
//! transitions (login, logout, expiry) all route through here so their side
//! effects stay bundled.

use std::collections::HashSet;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{SessionContext, SharedSession, TokenStore};
use crate::config::Config;
use crate::models::{Credentials, ImageRecord, RegisterRequest, Tag};
use crate::router::{guard, Navigator, Route};
use crate::slideshow::SlideshowStore;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A refresh produces a handful of messages; 16 leaves headroom.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for username input.
/// The backend caps usernames at 50 characters.
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for email input, matching the backend column
pub const MAX_EMAIL_LENGTH: usize = 100;

/// Number of rows to scroll on page up/down in the gallery
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Status message shown while the gallery refresh runs
const REFRESHING_MESSAGE: &str = "Refreshing gallery...";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Submit,
}

/// Register form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterFocus {
    Username,
    Email,
    Password,
    Submit,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from the background gallery refresh task
enum RefreshResult {
    /// Image list fetched successfully
    Images(Vec<ImageRecord>),
    /// Tag list fetched successfully
    Tags(Vec<Tag>),
    /// A request came back 401: the stored token is dead
    SessionExpired,
    /// A fetch failed for a non-auth reason
    Error(String),
    /// All fetches finished
    RefreshComplete,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: SharedSession,
    pub api: ApiClient,
    pub nav: Navigator,
    pub slideshow: SlideshowStore,

    // UI state
    pub state: AppState,
    pub status_message: Option<String>,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Register form state
    pub register_username: String,
    pub register_email: String,
    pub register_password: String,
    pub register_focus: RegisterFocus,
    pub register_error: Option<String>,

    // Gallery state
    pub images: Vec<ImageRecord>,
    pub tags: Vec<Tag>,
    pub gallery_selection: usize,
    pub selected: HashSet<i64>,
    pub tag_filter: Option<i64>,
    pub refreshing: bool,

    // Home slideshow position
    pub slideshow_index: usize,

    // Background task channel
    refresh_rx: mpsc::Receiver<RefreshResult>,
    refresh_tx: mpsc::Sender<RefreshResult>,
}

impl App {
    /// Create a new application instance, restoring any stored session
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let store = TokenStore::new(Config::data_dir()?);
        let session: SharedSession = std::sync::Arc::new(SessionContext::initialize(store));
        let api = ApiClient::new(config.api_base_url()?, std::sync::Arc::clone(&session))?;

        // The startup navigation runs through the guard like any other
        let nav = Navigator::new(guard(Route::Home, session.is_authenticated()));

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_username = std::env::var("LIGHTBOX_USERNAME")
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();
        let login_password = std::env::var("LIGHTBOX_PASSWORD").unwrap_or_default();

        Ok(Self {
            config,
            session,
            api,
            nav,
            slideshow: SlideshowStore::new(),

            state: AppState::Normal,
            status_message: None,

            login_username,
            login_password,
            login_focus: LoginFocus::Username,
            login_error: None,

            register_username: String::new(),
            register_email: String::new(),
            register_password: String::new(),
            register_focus: RegisterFocus::Username,
            register_error: None,

            images: Vec::new(),
            tags: Vec::new(),
            gallery_selection: 0,
            selected: HashSet::new(),
            tag_filter: None,
            refreshing: false,

            slideshow_index: 0,

            refresh_rx: rx,
            refresh_tx: tx,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Navigate to a route; the guard may redirect to the login view
    pub fn navigate(&mut self, target: Route) {
        let reached = self.nav.navigate(target, self.session.is_authenticated());
        if reached == Route::Login && target != Route::Login {
            self.status_message = Some("Please log in to view the gallery".to_string());
            self.reset_login_focus();
        }
    }

    fn reset_login_focus(&mut self) {
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let username = self.login_username.trim().to_string();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            anyhow::bail!("Username and password required");
        }

        self.login_error = None;
        let credentials = Credentials {
            username: username.clone(),
            password,
        };

        match self.session.login(&self.api, &credentials).await {
            Ok(()) => {
                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                self.login_password.clear();
                self.navigate(Route::Home);
                self.refresh_gallery();
                Ok(())
            }
            Err(e) => {
                // The session already ran the logout transition
                error!(error = %e, "Login failed");
                self.login_error = Some(Self::login_error_message(&e));
                self.navigate(Route::Login);
                Err(e)
            }
        }
    }

    /// Log out: clear the session, drop session-scoped data, go to login.
    /// Safe to call when already anonymous.
    pub fn logout(&mut self) {
        self.session.clear();
        self.slideshow.clear();
        self.images.clear();
        self.tags.clear();
        self.selected.clear();
        self.tag_filter = None;
        self.gallery_selection = 0;
        self.slideshow_index = 0;
        self.navigate(Route::Login);
        info!("Logged out");
    }

    /// Attempt registration with the fields from the register form
    pub async fn attempt_register(&mut self) -> Result<()> {
        let request = RegisterRequest {
            username: self.register_username.trim().to_string(),
            password: self.register_password.clone(),
            email: self.register_email.trim().to_string(),
        };

        if let Err(msg) = request.validate() {
            self.register_error = Some(msg.to_string());
            anyhow::bail!(msg);
        }

        self.register_error = None;
        match self.api.register(&request).await {
            Ok(()) => {
                info!(username = %request.username, "Account registered");
                self.login_username = request.username;
                self.login_password.clear();
                self.register_password.clear();
                self.navigate(Route::Login);
                self.reset_login_focus();
                self.status_message = Some("Account created. Please sign in.".to_string());
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                self.register_error = Some(Self::register_error_message(&e));
                Err(e)
            }
        }
    }

    /// Interactive login for the `--login` CLI path
    pub async fn login_interactive(&mut self) -> Result<()> {
        use std::io::{self, Write};

        println!("\n=== Lightbox Login ===\n");

        let username = match self.config.last_username {
            Some(ref last_user) => {
                print!("Username [{}]: ", last_user);
                io::stdout().flush()?;

                let mut input = String::new();
                io::stdin().read_line(&mut input)?;
                let input = input.trim();

                if input.is_empty() {
                    last_user.clone()
                } else {
                    input.to_string()
                }
            }
            None => {
                print!("Username: ");
                io::stdout().flush()?;

                let mut input = String::new();
                io::stdin().read_line(&mut input)?;
                input.trim().to_string()
            }
        };

        let password = rpassword::prompt_password("Password: ")?;

        println!("\nAuthenticating...");
        self.session
            .login(
                &self.api,
                &Credentials {
                    username: username.clone(),
                    password,
                },
            )
            .await?;

        self.config.last_username = Some(username);
        self.config.save()?;

        println!("Login successful!\n");
        Ok(())
    }

    /// Map a login failure to a user-facing message
    fn login_error_message(e: &anyhow::Error) -> String {
        match e.downcast_ref::<ApiError>() {
            Some(ApiError::Unauthorized) | Some(ApiError::Rejected { .. }) => {
                "Invalid username or password".to_string()
            }
            Some(ApiError::NetworkError(inner)) if inner.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            Some(ApiError::NetworkError(_)) => {
                "Unable to connect to server. Check your connection.".to_string()
            }
            Some(ApiError::ServerError(_)) => "Server error. Please try again later.".to_string(),
            _ => format!("Login failed: {}", e),
        }
    }

    /// Map a registration failure to a user-facing message
    fn register_error_message(e: &anyhow::Error) -> String {
        match e.downcast_ref::<ApiError>() {
            Some(ApiError::Conflict(_)) => "Username or email is already registered".to_string(),
            Some(ApiError::NetworkError(_)) => {
                "Unable to connect to server. Check your connection.".to_string()
            }
            Some(ApiError::Rejected { body, .. }) if !body.is_empty() => {
                format!("Registration rejected: {}", body)
            }
            _ => format!("Registration failed: {}", e),
        }
    }

    // =========================================================================
    // Background Gallery Refresh
    // =========================================================================

    /// Spawn a background task fetching images and tags
    pub fn refresh_gallery(&mut self) {
        if !self.session.is_authenticated() {
            warn!("Refresh requested while anonymous, ignoring");
            return;
        }
        if self.refreshing {
            return;
        }

        self.refreshing = true;
        self.status_message = Some(REFRESHING_MESSAGE.to_string());

        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            let (images_res, tags_res) = tokio::join!(api.fetch_images(), api.fetch_tags());
            Self::forward_result(&tx, images_res, RefreshResult::Images).await;
            Self::forward_result(&tx, tags_res, RefreshResult::Tags).await;
            Self::send_result(&tx, RefreshResult::RefreshComplete).await;
        });
    }

    /// Helper to send refresh results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send refresh result - channel closed");
        }
    }

    /// Wrap a fetch result for the channel; a 401 becomes `SessionExpired`
    async fn forward_result<T>(
        tx: &mpsc::Sender<RefreshResult>,
        result: Result<T>,
        wrapper: impl FnOnce(T) -> RefreshResult,
    ) {
        match result {
            Ok(data) => Self::send_result(tx, wrapper(data)).await,
            Err(e) => {
                if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)) {
                    Self::send_result(tx, RefreshResult::SessionExpired).await;
                } else {
                    error!(error = %e, "Gallery fetch failed");
                    Self::send_result(tx, RefreshResult::Error(e.to_string())).await;
                }
            }
        }
    }

    /// Drain and process completed background task results
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.refresh_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_refresh_result(result);
        }
    }

    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Images(data) => {
                self.images = data;
                let visible = self.filtered_images().len();
                self.gallery_selection = self.gallery_selection.min(visible.saturating_sub(1));
            }
            RefreshResult::Tags(data) => {
                // Drop a filter whose tag disappeared
                if let Some(tag_id) = self.tag_filter {
                    if !data.iter().any(|t| t.id == tag_id) {
                        self.tag_filter = None;
                    }
                }
                self.tags = data;
            }
            RefreshResult::SessionExpired => {
                warn!("Session expired, forcing logout");
                self.logout();
                self.status_message = Some("Session expired. Please log in again.".to_string());
            }
            RefreshResult::Error(msg) => {
                self.status_message = Some(format!("Error: {}", msg));
            }
            RefreshResult::RefreshComplete => {
                self.refreshing = false;
                // Preserve errors, only clear the progress message
                if self.status_message.as_deref() == Some(REFRESHING_MESSAGE) {
                    self.status_message = None;
                }
            }
        }
    }

    // =========================================================================
    // Gallery
    // =========================================================================

    /// Images visible under the current tag filter
    pub fn filtered_images(&self) -> Vec<&ImageRecord> {
        match self.tag_filter {
            Some(tag_id) => self.images.iter().filter(|i| i.has_tag(tag_id)).collect(),
            None => self.images.iter().collect(),
        }
    }

    /// Cycle the tag filter: no filter, then each tag in order, then back
    pub fn cycle_tag_filter(&mut self) {
        self.tag_filter = match self.tag_filter {
            None => self.tags.first().map(|t| t.id),
            Some(current) => match self.tags.iter().position(|t| t.id == current) {
                Some(pos) if pos + 1 < self.tags.len() => Some(self.tags[pos + 1].id),
                _ => None,
            },
        };
        self.gallery_selection = 0;
    }

    pub fn tag_filter_name(&self) -> Option<&str> {
        let tag_id = self.tag_filter?;
        self.tags
            .iter()
            .find(|t| t.id == tag_id)
            .map(|t| t.name.as_str())
    }

    /// Toggle slideshow selection for the highlighted image
    pub fn toggle_selected(&mut self) {
        let id = self
            .filtered_images()
            .get(self.gallery_selection)
            .map(|i| i.id);
        if let Some(id) = id {
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
        }
    }

    /// Hand the current selection to the home slideshow and go there.
    /// With nothing selected the slideshow reverts to the full gallery.
    pub fn start_slideshow(&mut self) {
        if self.selected.is_empty() {
            self.slideshow.clear();
            self.status_message = Some("Slideshow showing the full gallery".to_string());
        } else {
            let images: Vec<ImageRecord> = self
                .images
                .iter()
                .filter(|i| self.selected.contains(&i.id))
                .cloned()
                .collect();
            self.status_message = Some(format!("Slideshow showing {} selected", images.len()));
            self.slideshow.set_images(images);
        }
        self.slideshow_index = 0;
        self.navigate(Route::Home);
    }

    /// Images the home slideshow draws from
    pub fn slideshow_images(&self) -> &[ImageRecord] {
        self.slideshow.images().unwrap_or(&self.images)
    }

    pub fn advance_slideshow(&mut self) {
        let len = self.slideshow_images().len();
        if len > 0 {
            self.slideshow_index = (self.slideshow_index + 1) % len;
        }
    }

    pub fn rewind_slideshow(&mut self) {
        let len = self.slideshow_images().len();
        if len > 0 {
            self.slideshow_index = (self.slideshow_index + len - 1) % len;
        }
    }
}
