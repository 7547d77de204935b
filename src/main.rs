use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use iced::alignment::Vertical;
use iced::widget::{button, column, container, horizontal_space, row, text, text_input};
use iced::{Element, Length, Task, Theme};
use tracing::{error, info};

use wallpaper_gallery::config::GalleryConfig;
use wallpaper_gallery::download;
use wallpaper_gallery::error::GalleryResult;
use wallpaper_gallery::logging;
use wallpaper_gallery::provider::AssetProvider;
use wallpaper_gallery::state::cache::ListingCache;
use wallpaper_gallery::state::controller::{GalleryController, GalleryState};
use wallpaper_gallery::state::data::AssetDescriptor;

mod ui;

use ui::GalleryView;

/// Main application state
struct Gallery {
    /// Owns the listing, search query and page position
    controller: GalleryController<GalleryView>,
    /// Shared HTTP client for remote images and downloads
    client: reqwest::Client,
    download_dir: PathBuf,
    /// Header label naming the source
    source: String,
    /// Text in the search box (applied on submit)
    search_input: String,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User pressed Refresh
    Refresh,
    /// Background listing fetch finished
    ListingFetched(GalleryResult<Vec<AssetDescriptor>>),
    SearchInputChanged(String),
    /// Enter in the search box, or the Search button
    SearchSubmitted,
    NextPage,
    PreviousPage,
    GoToPage(usize),
    /// Remote image bytes arrived (url, bytes or error)
    ImageLoaded(String, Result<Vec<u8>, String>),
    /// User asked to save an image
    Save(AssetDescriptor),
    Saved(GalleryResult<PathBuf>),
}

impl Gallery {
    /// Create a new instance of the application and start the first fetch
    fn new(
        config: GalleryConfig,
        provider: Arc<dyn AssetProvider>,
        client: reqwest::Client,
    ) -> (Self, Task<Message>) {
        let source = provider.describe();
        let controller = GalleryController::new(
            provider,
            ListingCache::new(config.cache_ttl()),
            config.effective_page_size(),
            GalleryView::new(),
        );

        let mut gallery = Gallery {
            controller,
            client,
            download_dir: config.download_dir(),
            source,
            search_input: String::new(),
            status: "Loading...".to_string(),
        };

        let task = gallery.start_refresh();
        (gallery, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Refresh => self.start_refresh(),
            Message::ListingFetched(fetched) => {
                match self.controller.finish_refresh(fetched, Utc::now()) {
                    Ok(()) => {
                        if let Some(listing) = self.controller.listing().cloned() {
                            self.controller.renderer_mut().retain_images(&listing);
                        }
                        let count = self.controller.active_listing().len();
                        self.status = format!("{} wallpapers.", count);
                    }
                    Err(err) => {
                        self.status = format!("Error loading images: {}", err);
                    }
                }
                self.fetch_visible_images()
            }
            Message::SearchInputChanged(value) => {
                self.search_input = value;
                Task::none()
            }
            Message::SearchSubmitted => {
                self.controller.submit_search(self.search_input.clone());
                self.status = match self.controller.state() {
                    GalleryState::Browsing => {
                        format!("{} wallpapers.", self.controller.active_listing().len())
                    }
                    GalleryState::Filtered => format!(
                        "{} wallpapers match \"{}\".",
                        self.controller.active_listing().len(),
                        self.controller.query(),
                    ),
                };
                self.after_user_action()
            }
            Message::NextPage => {
                self.controller.next_page();
                self.after_user_action()
            }
            Message::PreviousPage => {
                self.controller.prev_page();
                self.after_user_action()
            }
            Message::GoToPage(page) => {
                self.controller.go_to_page(page);
                self.after_user_action()
            }
            Message::ImageLoaded(url, result) => {
                self.controller.renderer_mut().image_loaded(&url, result);
                Task::none()
            }
            Message::Save(asset) => {
                let client = self.client.clone();
                let dest = self.download_dir.clone();
                self.status = format!("Saving {}...", asset.name);
                Task::perform(
                    async move { download::save_asset(&client, &asset, &dest).await },
                    Message::Saved,
                )
            }
            Message::Saved(result) => {
                self.status = match result {
                    Ok(path) => format!("Saved to {}", path.display()),
                    Err(err) => {
                        error!("{}", err);
                        err.to_string()
                    }
                };
                Task::none()
            }
        }
    }

    /// Kick off a listing fetch unless the cache is fresh or one is already running
    fn start_refresh(&mut self) -> Task<Message> {
        match self.controller.begin_refresh(Utc::now()) {
            Some(provider) => {
                self.status = "Loading...".to_string();
                Task::perform(
                    async move { provider.list_images().await },
                    Message::ListingFetched,
                )
            }
            None => Task::none(),
        }
    }

    /// Navigation and search never refetch, unless the cache has expired meanwhile
    fn after_user_action(&mut self) -> Task<Message> {
        let refresh = if self.controller.needs_refresh(Utc::now()) {
            info!("Listing cache expired, refreshing in the background");
            self.start_refresh()
        } else {
            Task::none()
        };
        Task::batch([self.fetch_visible_images(), refresh])
    }

    /// Download any remote images the current page is waiting for
    fn fetch_visible_images(&mut self) -> Task<Message> {
        let pending = self.controller.renderer_mut().take_pending();
        Task::batch(pending.into_iter().map(|url| {
            let client = self.client.clone();
            let request_url = url.clone();
            Task::perform(
                async move { download::fetch_bytes(&client, &request_url).await },
                move |result| Message::ImageLoaded(url.clone(), result),
            )
        }))
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let search = text_input("Search wallpapers...", &self.search_input)
            .on_input(Message::SearchInputChanged)
            .on_submit(Message::SearchSubmitted)
            .padding(10)
            .width(Length::Fixed(320.0));

        let refresh = if self.controller.is_loading() {
            button("Refresh")
        } else {
            button("Refresh").on_press(Message::Refresh)
        };

        let header = row![
            column![text("Wallpaper Gallery").size(32), text(&self.source).size(12)].spacing(4),
            horizontal_space(),
            search,
            button("Search").on_press(Message::SearchSubmitted).padding(10),
            refresh.padding(10),
        ]
        .spacing(12)
        .align_y(Vertical::Center);

        let content = column![
            header,
            self.controller.renderer().view(),
            text(&self.status).size(14),
        ]
        .spacing(20)
        .padding(24);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    let _log_guard = logging::init_logging();

    let config = match GalleryConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {}", err);
            std::process::exit(2);
        }
    };

    let provider = match config.build_provider() {
        Ok(provider) => provider,
        Err(err) => {
            error!("Could not set up the asset provider: {}", err);
            std::process::exit(2);
        }
    };

    let client = match config.http_client() {
        Ok(client) => client,
        Err(err) => {
            error!("Could not set up the HTTP client: {}", err);
            std::process::exit(2);
        }
    };

    info!(
        "Starting gallery: {} ({} per page, cache {}s)",
        provider.describe(),
        config.effective_page_size(),
        config.cache_ttl_secs
    );

    iced::application("Wallpaper Gallery", Gallery::update, Gallery::view)
        .theme(Gallery::theme)
        .centered()
        .run_with(move || Gallery::new(config, provider, client))
}
