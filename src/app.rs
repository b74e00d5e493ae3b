//! Application shell: owns the API client and global store, mounts the page
//! for a route, and renders the full document around it.

use std::sync::Arc;

use maud::Markup;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::components::BaseLayout;
use crate::config::Config;
use crate::error::ClientError;
use crate::pages::{
    info, CreatePostPage, EditPostPage, HomePage, ProfilePage, RegisterPage, SearchOverlay,
    ViewPostPage,
};
use crate::router::Route;
use crate::storage::{FileStorage, KeyValueStore};
use crate::store::{AppState, AppStore};

#[derive(Debug, Clone)]
pub struct App {
    config: Config,
    api: ApiClient,
    store: AppStore,
}

impl App {
    /// Build the app with the session file at `config.storage_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is invalid or the session cannot be read.
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let storage = Arc::new(FileStorage::new(config.storage_path.clone()));
        Self::with_storage(config, storage)
    }

    /// Build the app over any key-value store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is invalid or the session cannot be read.
    pub fn with_storage(config: Config, storage: Arc<dyn KeyValueStore>) -> Result<Self, ClientError> {
        let api = ApiClient::new(&config.api_base_url)?;
        let store = AppStore::restore(storage)?;
        info!(
            api = %api.base_url(),
            logged_in = store.state().logged_in,
            "Client ready"
        );
        Ok(Self { config, api, store })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn store(&self) -> &AppStore {
        &self.store
    }

    /// Mount the page for `route`. Pages start their initial requests here.
    #[must_use]
    pub fn open(&self, route: &Route) -> Page {
        debug!(route = %route, "Opening page");
        let api = self.api.clone();
        let store = self.store.clone();
        match route {
            Route::Home if store.state().logged_in => Page::Feed(HomePage::open(api, store)),
            Route::Home => Page::Register(RegisterPage::new(api, store, self.config.validation_delay)),
            Route::ViewPost { id } => Page::ViewPost(ViewPostPage::open(id.clone(), api, store)),
            Route::EditPost { id } => Page::EditPost(EditPostPage::open(id.clone(), api, store)),
            Route::CreatePost => Page::CreatePost(CreatePostPage::new(api, store)),
            Route::Profile { username, tab } => {
                Page::Profile(ProfilePage::open(username.clone(), *tab, api, store))
            }
            Route::About => Page::About,
            Route::Terms => Page::Terms,
            Route::NotFound => Page::NotFound,
        }
    }

    /// Open the live search overlay.
    #[must_use]
    pub fn open_search(&self) -> SearchOverlay {
        SearchOverlay::open(self.api.clone(), self.store.clone(), self.config.search_delay)
    }

    /// Wrap `page` in the site layout for the current global state.
    #[must_use]
    pub fn render_document(&self, page: &Page, overlay: Option<Markup>) -> Markup {
        let app = self.store.state();
        BaseLayout::new(page.title(), &app)
            .wide(page.is_wide())
            .flash_duration(self.config.flash_duration)
            .with_overlay(overlay)
            .render(page.render(&app))
    }

    /// Resolve `path`, load the page, and render the finished document.
    pub async fn render_path(&self, path: &str) -> Markup {
        let route = Route::resolve(path);
        let mut page = self.open(&route);
        page.settle().await;
        self.render_document(&page, None)
    }
}

/// A mounted page controller.
#[derive(Debug)]
pub enum Page {
    Register(RegisterPage),
    Feed(HomePage),
    ViewPost(ViewPostPage),
    EditPost(EditPostPage),
    CreatePost(CreatePostPage),
    Profile(ProfilePage),
    About,
    Terms,
    NotFound,
}

impl Page {
    /// Whether the page is still waiting on its initial requests.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        match self {
            Self::Feed(page) => page.is_loading(),
            Self::ViewPost(page) => page.is_loading(),
            Self::EditPost(page) => page.is_loading(),
            Self::Profile(page) => page.is_loading(),
            Self::Register(_) | Self::CreatePost(_) | Self::About | Self::Terms | Self::NotFound => {
                false
            }
        }
    }

    /// Apply the next completion for the mounted page.
    ///
    /// Returns `false` for pages that never receive completions.
    pub async fn next(&mut self) -> bool {
        match self {
            Self::Register(page) => page.next().await,
            Self::Feed(page) => page.next().await,
            Self::ViewPost(page) => page.next().await,
            Self::EditPost(page) => page.next().await,
            Self::CreatePost(page) => page.next().await,
            Self::Profile(page) => page.next().await,
            Self::About | Self::Terms | Self::NotFound => false,
        }
    }

    /// Process completions until the initial load is done.
    pub async fn settle(&mut self) {
        while self.is_loading() {
            if !self.next().await {
                break;
            }
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Register(_) => RegisterPage::TITLE,
            Self::Feed(_) => HomePage::TITLE,
            Self::ViewPost(page) => page.title(),
            Self::EditPost(page) => page.title(),
            Self::CreatePost(_) => CreatePostPage::TITLE,
            Self::Profile(_) => ProfilePage::TITLE,
            Self::About => info::ABOUT_TITLE,
            Self::Terms => info::TERMS_TITLE,
            Self::NotFound => info::NOT_FOUND_TITLE,
        }
    }

    #[must_use]
    pub const fn is_wide(&self) -> bool {
        matches!(self, Self::Register(_))
    }

    #[must_use]
    pub fn render(&self, app: &AppState) -> Markup {
        match self {
            Self::Register(page) => page.render(),
            Self::Feed(page) => page.render(app),
            Self::ViewPost(page) => page.render(app),
            Self::EditPost(page) => page.render(),
            Self::CreatePost(page) => page.render(),
            Self::Profile(page) => page.render(app),
            Self::About => info::render_about(),
            Self::Terms => info::render_terms(),
            Self::NotFound => info::render_not_found(),
        }
    }
}
