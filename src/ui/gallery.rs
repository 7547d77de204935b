/// Gallery grid and pagination controls
///
/// `GalleryView` is the controller's `Renderer`: it records what should be
/// on screen, and `view` turns that into iced widgets. Remote images are
/// fetched by the application; this struct only tracks which URLs it is
/// waiting for.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use iced::alignment::Vertical;
use iced::widget::{button, column, container, image, row, scrollable, text, Row};
use iced::{ContentFit, Element, Length};
use iced_aw::Wrap;
use tracing::{debug, warn};

use wallpaper_gallery::error::GalleryError;
use wallpaper_gallery::state::controller::Renderer;
use wallpaper_gallery::state::data::{AssetDescriptor, PaginationView};

use crate::Message;

const TILE_WIDTH: f32 = 240.0;
const TILE_HEIGHT: f32 = 150.0;

/// Image content of one tile
#[derive(Debug, Clone)]
pub enum TileImage {
    Ready(image::Handle),
    Loading,
    /// Missing file or failed download; drawn as a placeholder
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct Tile {
    pub asset: AssetDescriptor,
    pub image: TileImage,
}

/// What the gallery area currently shows
#[derive(Debug, Clone)]
pub enum Screen {
    Loading,
    Tiles(Vec<Tile>),
    Empty,
    Error(String),
}

#[derive(Debug)]
pub struct GalleryView {
    screen: Screen,
    pagination: Option<PaginationView>,
    /// Downloaded remote images by URL; None marks a failed download
    remote_images: HashMap<String, Option<image::Handle>>,
    /// Remote URLs shown on screen but not yet requested
    pending: Vec<String>,
    /// Remote URLs handed out by `take_pending` and not yet answered
    in_flight: HashSet<String>,
}

impl Default for GalleryView {
    fn default() -> Self {
        Self {
            screen: Screen::Loading,
            pagination: None,
            remote_images: HashMap::new(),
            pending: Vec::new(),
            in_flight: HashSet::new(),
        }
    }
}

impl GalleryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn pagination(&self) -> Option<PaginationView> {
        self.pagination
    }

    /// Remote URLs the application should start downloading
    pub fn take_pending(&mut self) -> Vec<String> {
        let pending = std::mem::take(&mut self.pending);
        self.in_flight.extend(pending.iter().cloned());
        pending
    }

    /// Drop downloaded images, and forget downloads, for URLs no longer in `listing`
    pub fn retain_images(&mut self, listing: &[AssetDescriptor]) {
        let current: HashSet<&str> = listing.iter().map(|a| a.retrieval_url.as_str()).collect();
        let before = self.remote_images.len();

        self.remote_images.retain(|url, _| current.contains(url.as_str()));
        self.in_flight.retain(|url| current.contains(url.as_str()));
        self.pending.retain(|url| current.contains(url.as_str()));

        let dropped = before - self.remote_images.len();
        if dropped > 0 {
            debug!("Dropped {} cached images no longer listed", dropped);
        }
    }

    /// Record a finished remote download and update any tile showing it
    pub fn image_loaded(&mut self, url: &str, result: Result<Vec<u8>, String>) {
        if !self.in_flight.remove(url) {
            debug!("Ignoring image for unlisted url {}", url);
            return;
        }

        let handle = match result {
            Ok(bytes) => Some(image::Handle::from_bytes(bytes)),
            Err(err) => {
                warn!("Failed to load image: {}", err);
                None
            }
        };

        if let Screen::Tiles(tiles) = &mut self.screen {
            for tile in tiles.iter_mut().filter(|t| t.asset.retrieval_url == url) {
                tile.image = match &handle {
                    Some(handle) => TileImage::Ready(handle.clone()),
                    None => TileImage::Unavailable,
                };
            }
        }

        self.remote_images.insert(url.to_string(), handle);
    }

    fn tile_for(&mut self, asset: &AssetDescriptor) -> Tile {
        let image = if asset.is_remote() {
            match self.remote_images.get(&asset.retrieval_url) {
                Some(Some(handle)) => TileImage::Ready(handle.clone()),
                Some(None) => TileImage::Unavailable,
                None => {
                    if !self.in_flight.contains(&asset.retrieval_url)
                        && !self.pending.contains(&asset.retrieval_url)
                    {
                        self.pending.push(asset.retrieval_url.clone());
                    }
                    TileImage::Loading
                }
            }
        } else if Path::new(&asset.retrieval_url).is_file() {
            TileImage::Ready(image::Handle::from_path(&asset.retrieval_url))
        } else {
            warn!("Failed to load image: {}", asset.name);
            TileImage::Unavailable
        };

        Tile {
            asset: asset.clone(),
            image,
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let body: Element<Message> = match &self.screen {
            Screen::Loading => text("Loading wallpapers...").size(18).into(),
            Screen::Empty => text("No wallpapers found.").size(18).into(),
            Screen::Error(message) => column![
                text("Could not load wallpapers.").size(20),
                text(message).size(14),
                text("Press Refresh to try again.").size(14),
            ]
            .spacing(6)
            .into(),
            Screen::Tiles(tiles) => {
                let elements: Vec<Element<Message>> = tiles.iter().map(tile_view).collect();
                scrollable(Wrap::with_elements(elements))
                    .height(Length::Fill)
                    .into()
            }
        };

        column![container(body).height(Length::Fill), self.pagination_view()]
            .spacing(16)
            .into()
    }

    /// Page links, with Previous/Next hidden at the ends and nothing at all for a single page
    fn pagination_view(&self) -> Element<'_, Message> {
        let Some(view) = self.pagination.filter(|view| view.total_pages > 1) else {
            return Row::new().into();
        };

        let mut links: Vec<Element<Message>> = Vec::with_capacity(view.total_pages + 2);

        if view.has_previous {
            links.push(button("Previous").on_press(Message::PreviousPage).into());
        }

        for page in 1..=view.total_pages {
            let link = button(text(page.to_string())).on_press(Message::GoToPage(page));
            let link = if page == view.current_page {
                link.style(button::primary)
            } else {
                link.style(button::secondary)
            };
            links.push(link.into());
        }

        if view.has_next {
            links.push(button("Next").on_press(Message::NextPage).into());
        }

        container(Wrap::with_elements(links))
            .center_x(Length::Fill)
            .into()
    }
}

impl Renderer for GalleryView {
    fn display_slice(&mut self, items: &[AssetDescriptor]) {
        let tiles = items.iter().map(|asset| self.tile_for(asset)).collect();
        self.screen = Screen::Tiles(tiles);
    }

    fn update_pagination(&mut self, view: PaginationView) {
        self.pagination = Some(view);
    }

    fn show_empty_state(&mut self) {
        self.screen = Screen::Empty;
    }

    fn show_error_state(&mut self, error: &GalleryError) {
        self.screen = Screen::Error(error.to_string());
        self.pagination = None;
    }
}

fn tile_view(tile: &Tile) -> Element<'_, Message> {
    let picture: Element<Message> = match &tile.image {
        TileImage::Ready(handle) => image(handle.clone())
            .width(Length::Fixed(TILE_WIDTH))
            .height(Length::Fixed(TILE_HEIGHT))
            .content_fit(ContentFit::Cover)
            .into(),
        TileImage::Loading => placeholder("Loading..."),
        TileImage::Unavailable => placeholder("Image unavailable"),
    };

    let caption = row![
        text(&tile.asset.name).size(12).width(Length::Fill),
        button(text("Save").size(12))
            .on_press(Message::Save(tile.asset.clone()))
            .padding(4),
    ]
    .spacing(6)
    .align_y(Vertical::Center);

    container(column![picture, caption].spacing(6).width(Length::Fixed(TILE_WIDTH)))
        .padding(8)
        .into()
}

fn placeholder(label: &str) -> Element<'_, Message> {
    container(text(label).size(14))
        .center_x(Length::Fixed(TILE_WIDTH))
        .center_y(Length::Fixed(TILE_HEIGHT))
        .style(container::rounded_box)
        .into()
}
