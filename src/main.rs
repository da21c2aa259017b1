use iced::widget::{column, container, row, stack, text, text_input};
use iced::{event, keyboard, window, Alignment, Element, Event, Length, Size, Subscription, Task, Theme};

use graph_gallery::api::ApiClient;
use graph_gallery::config::Config;
use graph_gallery::error::ApiError;
use graph_gallery::state::catalog::ImageCatalog;
use graph_gallery::state::data::{ImageRecord, RawMetadata};
use graph_gallery::state::modal::{ModalController, ModalEvent, ModalRequest};
use graph_gallery::state::selection::{SelectionController, Ticket};
use graph_gallery::state::thumbnails::{GridLayout, ThumbnailLoader, ThumbnailRequest, Viewport};

mod ui;

/// Main application state
///
/// One controller per concern; `update` is the only place that mutates them.
struct Gallery {
    /// Client for the image listing service
    api: ApiClient,
    /// Listing and search query
    catalog: ImageCatalog,
    /// Thumbnail sources of the current render
    thumbnails: ThumbnailLoader,
    /// Selected image and the details panel
    selection: SelectionController,
    /// Full-size overlay
    modal: ModalController,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Image listing arrived (or failed)
    ImagesLoaded(Result<Vec<ImageRecord>, ApiError>),
    /// Search box text changed
    SearchChanged(String),
    /// Gallery scrolled or its bounds changed
    GalleryScrolled(Viewport),
    WindowResized(Size),
    ThumbnailLoaded(ThumbnailRequest, Result<Vec<u8>, ApiError>),
    /// User clicked a thumbnail
    Select(String),
    /// User clicked a thumbnail's expand button
    Expand(String),
    MetadataLoaded(Ticket, Result<RawMetadata, ApiError>),
    PreviewLoaded(Ticket, Result<Vec<u8>, ApiError>),
    /// User clicked the preview in the details panel
    PreviewClicked,
    /// Close button, backdrop, image click or Escape
    Modal(ModalEvent),
    FullImageLoaded(ModalRequest, Result<Vec<u8>, ApiError>),
}

impl Gallery {
    /// Create a new instance of the application and request the listing
    fn new(config: Config) -> (Self, Task<Message>) {
        let api = ApiClient::new(config.server_url.clone());
        let layout = GridLayout::new(config.thumbnail_size as f32, ui::GRID_SPACING);
        let thumbnails = ThumbnailLoader::new(
            layout,
            ui::gallery_viewport(ui::WINDOW_SIZE),
            config.lazy_thumbnails,
        );

        let gallery = Gallery {
            api: api.clone(),
            catalog: ImageCatalog::new(),
            thumbnails,
            selection: SelectionController::new(),
            modal: ModalController::new(),
        };

        (gallery, Task::perform(api.list_images(), Message::ImagesLoaded))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ImagesLoaded(result) => {
                self.catalog.load(result);
                self.render_gallery()
            }
            Message::SearchChanged(query) => {
                self.catalog.set_query(query);
                self.render_gallery()
            }
            Message::GalleryScrolled(viewport) => {
                let requests = self.thumbnails.observe(viewport);
                self.fetch_thumbnails(requests)
            }
            Message::WindowResized(size) => {
                let viewport = ui::gallery_viewport(size);
                let requests = self.thumbnails.resize(viewport.width, viewport.height);
                self.fetch_thumbnails(requests)
            }
            Message::ThumbnailLoaded(request, result) => {
                if !self.thumbnails.finish(&request, result) {
                    tracing::trace!(filename = %request.filename, "thumbnail for a previous render");
                }
                Task::none()
            }
            Message::Select(filename) => self.select(&filename),
            Message::Expand(filename) => self.expand(&filename),
            Message::MetadataLoaded(ticket, result) => {
                self.selection.metadata_loaded(&ticket, result);
                Task::none()
            }
            Message::PreviewLoaded(ticket, result) => {
                self.selection.preview_loaded(&ticket, result);
                Task::none()
            }
            Message::PreviewClicked => match self.selection.selected() {
                Some(filename) => {
                    let filename = filename.to_string();
                    self.expand(&filename)
                }
                None => Task::none(),
            },
            Message::Modal(event) => {
                self.modal.handle(event);
                Task::none()
            }
            Message::FullImageLoaded(request, result) => {
                self.modal.image_loaded(&request, result);
                Task::none()
            }
        }
    }

    /// Rebuild the thumbnail grid from the filtered catalog
    fn render_gallery(&mut self) -> Task<Message> {
        let filenames = self.catalog.visible().filenames();
        let requests = self.thumbnails.reset(filenames);
        self.fetch_thumbnails(requests)
    }

    fn fetch_thumbnails(&self, requests: Vec<ThumbnailRequest>) -> Task<Message> {
        Task::batch(requests.into_iter().map(|request| {
            let fetch = self.api.clone().thumbnail(request.filename.clone());
            Task::perform(fetch, move |result| Message::ThumbnailLoaded(request.clone(), result))
        }))
    }

    /// Select an image and fetch its metadata and preview
    fn select(&mut self, filename: &str) -> Task<Message> {
        let ticket = self.selection.select(filename);

        let metadata = {
            let ticket = ticket.clone();
            Task::perform(self.api.clone().metadata(filename.to_string()), move |result| {
                Message::MetadataLoaded(ticket.clone(), result)
            })
        };
        let preview = Task::perform(self.api.clone().image(filename.to_string()), move |result| {
            Message::PreviewLoaded(ticket.clone(), result)
        });

        Task::batch([metadata, preview])
    }

    /// Open the full-size overlay; the image becomes the selection too
    fn expand(&mut self, filename: &str) -> Task<Message> {
        let selected = self.select(filename);
        let request = self.modal.open(filename);
        let full_image = Task::perform(self.api.clone().image(filename.to_string()), move |result| {
            Message::FullImageLoaded(request.clone(), result)
        });

        Task::batch([selected, full_image])
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = row![
            text("Graph Gallery").size(24),
            text_input("Search images...", self.catalog.query())
                .on_input(Message::SearchChanged)
                .width(Length::Fixed(320.0)),
            text(self.catalog.status_line()).size(14),
        ]
        .spacing(20)
        .padding(12)
        .height(ui::HEADER_HEIGHT)
        .align_y(Alignment::Center);

        let body = row![
            ui::gallery::view(&self.catalog, &self.thumbnails, &self.selection),
            ui::details::view(&self.selection, &self.catalog),
        ]
        .height(Length::Fill);

        let base = container(column![header, body])
            .width(Length::Fill)
            .height(Length::Fill);

        match ui::modal::view(&self.modal) {
            Some(overlay) => stack![base, overlay].into(),
            None => base.into(),
        }
    }

    /// Escape closes the overlay; resizes re-estimate the gallery viewport
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(keyboard::key::Named::Escape),
                ..
            }) => Some(Message::Modal(ModalEvent::EscapePressed)),
            Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Initialize logging; `RUST_LOG` overrides the default filter
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,graph_gallery=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

fn main() -> iced::Result {
    init_logging();

    let config = Config::load();
    tracing::info!(server = %config.server_url, "starting graph gallery");

    iced::application("Graph Gallery", Gallery::update, Gallery::view)
        .subscription(Gallery::subscription)
        .theme(Gallery::theme)
        .window_size(ui::WINDOW_SIZE)
        .centered()
        .run_with(move || Gallery::new(config))
}
