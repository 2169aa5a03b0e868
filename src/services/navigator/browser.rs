use crate::services::backend::{DirEntry, ImageBackend};
use crate::services::navigator::breadcrumbs::{breadcrumbs_for, Breadcrumb};
use crate::services::navigator::types::{
    Activation, DirectoryListing, ListingOutcome, ListingRequest, NavTicket, NavigatorError,
    PickerConfig, PickerMode, PickerSelection, PickerView,
};
use crate::services::stamp::next_stamp;

/// Stateful browser over the backend's directory tree.
///
/// Navigation is split in two: `begin_*` issues a [`NavTicket`], the caller
/// runs [`fetch_listing`] without holding the navigator, and
/// [`apply_listing`](Self::apply_listing) takes the answer. A result is
/// applied only if no newer request (or close) happened since, so a slow
/// listing for a directory the user already left can never replace the
/// current view.
#[derive(Debug, Clone)]
pub struct DirectoryNavigator {
    config: PickerConfig,
    is_open: bool,
    listing: Option<DirectoryListing>,
    /// Ordered, duplicate-free.
    selection: Vec<String>,
    error: Option<String>,
    loading: bool,
    generation: u64,
}

impl DirectoryNavigator {
    pub fn new(config: PickerConfig) -> Self {
        Self {
            config,
            is_open: false,
            listing: None,
            selection: Vec::new(),
            error: None,
            loading: false,
            generation: 0,
        }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn listing(&self) -> Option<&DirectoryListing> {
        self.listing.as_ref()
    }

    pub fn current_path(&self) -> Option<&str> {
        self.listing.as_ref().map(|l| l.current_path.as_str())
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Dismissable banner text for the last failed listing.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.current_path().map(breadcrumbs_for).unwrap_or_default()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Open afresh. The listing will be `hint` (usually the last
    /// destination) when readable, otherwise the home directory.
    pub fn begin_open(&mut self, hint: Option<&str>) -> NavTicket {
        self.reset();
        self.is_open = true;
        let hint = hint.filter(|h| !h.is_empty()).map(str::to_string);
        self.issue(ListingRequest::Start(hint))
    }

    pub fn begin_navigate(&mut self, path: impl Into<String>) -> NavTicket {
        self.issue(ListingRequest::Path(path.into()))
    }

    /// `None` while nothing is listed yet.
    pub fn begin_navigate_up(&mut self) -> Option<NavTicket> {
        let current = self.current_path()?.to_string();
        Some(self.issue(ListingRequest::Parent(current)))
    }

    fn issue(&mut self, request: ListingRequest) -> NavTicket {
        self.generation = next_stamp();
        self.loading = true;
        NavTicket {
            generation: self.generation,
            request,
        }
    }

    /// Apply a fetched listing. Stale tickets are ignored. A failure keeps
    /// the previous listing visible and raises the error banner.
    /// Returns whether the outcome was applied.
    pub fn apply_listing(&mut self, ticket: &NavTicket, outcome: ListingOutcome) -> bool {
        if !self.is_open || ticket.generation != self.generation {
            log::debug!("Ignoring stale listing for {:?}", ticket.request);
            return false;
        }
        self.loading = false;

        match outcome {
            ListingOutcome::Listed(listing) => {
                self.selection.clear();
                if self.config.mode == PickerMode::Folder {
                    self.selection.push(listing.current_path.clone());
                }
                self.listing = Some(listing);
                self.error = None;
            }
            ListingOutcome::Unchanged => {}
            ListingOutcome::Failed(e) => {
                log::warn!("Directory listing failed: {e}");
                self.error = Some(e.to_string());
            }
        }
        true
    }

    pub fn is_selectable(&self, entry: &DirEntry) -> bool {
        self.config.accepts_file(entry)
    }

    /// Click on an entry. Directories always ask to be entered; in files
    /// mode accepted files are selected (single) or toggled (multiple).
    pub fn toggle_select(&mut self, entry: &DirEntry) -> Activation {
        if entry.is_directory {
            return Activation::Navigate(entry.path.clone());
        }
        if !self.is_selectable(entry) {
            return Activation::Ignored;
        }

        if self.config.multiple {
            if let Some(pos) = self.selection.iter().position(|p| *p == entry.path) {
                self.selection.remove(pos);
            } else {
                self.selection.push(entry.path.clone());
            }
        } else {
            self.selection = vec![entry.path.clone()];
        }
        Activation::Selected
    }

    pub fn can_confirm(&self) -> bool {
        self.is_open && !self.selection.is_empty()
    }

    /// Yield the selection and close. In folder mode this is the current
    /// directory.
    pub fn confirm(&mut self) -> Result<PickerSelection, NavigatorError> {
        if !self.is_open {
            return Err(NavigatorError::NotOpen);
        }
        let selection = match self.config.mode {
            PickerMode::Folder => self
                .selection
                .first()
                .cloned()
                .map(PickerSelection::Folder),
            PickerMode::Files if self.selection.is_empty() => None,
            PickerMode::Files => Some(PickerSelection::Files(self.selection.clone())),
        }
        .ok_or(NavigatorError::NothingSelected)?;

        self.reset();
        Ok(selection)
    }

    pub fn view(&self) -> PickerView {
        PickerView {
            config: self.config.clone(),
            listing: self.listing.clone(),
            breadcrumbs: self.breadcrumbs(),
            selection: self.selection.clone(),
            error: self.error.clone(),
            loading: self.loading,
            can_confirm: self.can_confirm(),
        }
    }

    /// Close and discard all in-progress state. Escape and backdrop clicks
    /// end up here too. Results still in flight are ignored on arrival.
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.is_open = false;
        self.listing = None;
        self.selection.clear();
        self.error = None;
        self.loading = false;
        self.generation = next_stamp();
    }
}

/// Run a listing request against the backend. Touches no navigator state.
///
/// An unreadable start hint falls back to home without being reported; a
/// parent lookup failing at a root is [`ListingOutcome::Unchanged`].
pub async fn fetch_listing<B: ImageBackend>(
    backend: &B,
    request: &ListingRequest,
) -> ListingOutcome {
    match request {
        ListingRequest::Path(path) => list(backend, path.clone()).await,
        ListingRequest::Parent(path) => match backend.get_parent_directory(path).await {
            Ok(parent) => list(backend, parent).await,
            Err(e) => {
                log::debug!("Navigate up ignored: {e}");
                ListingOutcome::Unchanged
            }
        },
        ListingRequest::Start(hint) => {
            if let Some(hint) = hint {
                match backend.list_directory(hint).await {
                    Ok(entries) => {
                        return ListingOutcome::Listed(DirectoryListing {
                            current_path: hint.clone(),
                            entries,
                        })
                    }
                    Err(e) => log::debug!("Start hint {hint} unusable, falling back to home: {e}"),
                }
            }
            match backend.get_home_directory().await {
                Ok(home) => list(backend, home).await,
                Err(e) => {
                    log::warn!("Could not resolve home directory: {e}");
                    ListingOutcome::Failed(e)
                }
            }
        }
    }
}

async fn list<B: ImageBackend>(backend: &B, path: String) -> ListingOutcome {
    match backend.list_directory(&path).await {
        Ok(entries) => ListingOutcome::Listed(DirectoryListing {
            current_path: path,
            entries,
        }),
        Err(e) => ListingOutcome::Failed(e),
    }
}

#[cfg(test)]
#[path = "tests/browser_tests.rs"]
mod tests;
