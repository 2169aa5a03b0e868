//! Reusable directory browser used both to pick images and to pick the
//! destination folder. One component, parameterised by [`PickerConfig`].

pub mod breadcrumbs;
pub mod browser;
pub mod types;

pub use breadcrumbs::{breadcrumbs_for, Breadcrumb};
pub use browser::{fetch_listing, DirectoryNavigator};
pub use types::{
    Activation, DirectoryListing, ListingOutcome, ListingRequest, NavTicket, NavigatorError,
    PickerConfig, PickerMode, PickerSelection, PickerView, IMAGE_EXTENSIONS,
};
