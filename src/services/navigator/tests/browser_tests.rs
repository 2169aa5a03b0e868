use super::*;
use crate::test_utils::MockBackend;

fn backend() -> MockBackend {
    MockBackend::new()
        .with_dir("/home/user", &["Pictures/", "notes.txt", "cat.PNG"])
        .with_dir("/home/user/Pictures", &["trip/", "a.jpg", "b.webp", "c.txt"])
        .with_dir("/home", &["user/"])
        .with_dir("/", &["home/"])
        .with_dir("/out", &["old.png"])
}

fn file(path: &str) -> DirEntry {
    DirEntry {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        is_directory: false,
    }
}

fn dir(path: &str) -> DirEntry {
    DirEntry {
        is_directory: true,
        ..file(path)
    }
}

async fn settle(nav: &mut DirectoryNavigator, backend: &MockBackend, ticket: NavTicket) -> bool {
    let outcome = fetch_listing(backend, &ticket.request).await;
    nav.apply_listing(&ticket, outcome)
}

async fn open(nav: &mut DirectoryNavigator, backend: &MockBackend, hint: Option<&str>) {
    let ticket = nav.begin_open(hint);
    assert!(settle(nav, backend, ticket).await);
}

async fn navigate(nav: &mut DirectoryNavigator, backend: &MockBackend, path: &str) {
    let ticket = nav.begin_navigate(path);
    settle(nav, backend, ticket).await;
}

async fn navigate_up(nav: &mut DirectoryNavigator, backend: &MockBackend) {
    let ticket = nav.begin_navigate_up().unwrap();
    settle(nav, backend, ticket).await;
}

#[tokio::test]
async fn test_open_uses_hint_when_listable() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());

    open(&mut nav, &backend, Some("/out")).await;

    assert!(nav.is_open());
    assert_eq!(nav.current_path(), Some("/out"));
    assert_eq!(nav.selection(), ["/out".to_string()]);
    assert!(nav.error().is_none());
    assert!(!nav.is_loading());
}

#[tokio::test]
async fn test_open_falls_back_to_home_silently() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());

    open(&mut nav, &backend, Some("/gone")).await;

    assert_eq!(nav.current_path(), Some("/home/user"));
    assert!(nav.error().is_none(), "a stale hint is not an error");
}

#[tokio::test]
async fn test_open_without_hint_starts_at_home() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::images(true));

    open(&mut nav, &backend, None).await;

    assert_eq!(nav.current_path(), Some("/home/user"));
    assert!(nav.selection().is_empty());
    assert_eq!(nav.listing().unwrap().entries.len(), 3);
}

#[tokio::test]
async fn test_failed_navigation_keeps_listing_and_shows_banner() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());
    open(&mut nav, &backend, None).await;

    navigate(&mut nav, &backend, "/root").await;

    assert_eq!(nav.current_path(), Some("/home/user"));
    let banner = nav.error().unwrap().to_string();
    assert!(banner.contains("/root"), "banner was {banner}");

    nav.dismiss_error();
    assert!(nav.error().is_none());

    navigate(&mut nav, &backend, "/home/user/Pictures").await;
    assert_eq!(nav.current_path(), Some("/home/user/Pictures"));
}

#[tokio::test]
async fn test_stale_listing_is_discarded() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());
    open(&mut nav, &backend, None).await;

    let slow = nav.begin_navigate("/home/user/Pictures");
    let fast = nav.begin_navigate("/out");
    assert!(nav.is_loading());
    assert!(settle(&mut nav, &backend, fast).await);
    assert!(!nav.is_loading());

    assert!(!settle(&mut nav, &backend, slow).await);
    assert_eq!(nav.current_path(), Some("/out"));
}

#[tokio::test]
async fn test_listing_for_a_previous_opening_is_discarded() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());
    open(&mut nav, &backend, Some("/out")).await;
    let old = nav.begin_navigate("/home/user/Pictures");

    nav.cancel();
    open(&mut nav, &backend, Some("/out")).await;

    assert!(!settle(&mut nav, &backend, old).await);
    assert_eq!(nav.current_path(), Some("/out"));
}

#[tokio::test]
async fn test_listing_after_cancel_is_discarded() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());
    open(&mut nav, &backend, None).await;

    let ticket = nav.begin_navigate("/out");
    nav.cancel();

    assert!(!settle(&mut nav, &backend, ticket).await);
    assert!(!nav.is_open());
    assert!(nav.listing().is_none());
}

#[tokio::test]
async fn test_navigate_up_and_root_noop() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());
    open(&mut nav, &backend, Some("/home/user/Pictures")).await;

    navigate_up(&mut nav, &backend).await;
    assert_eq!(nav.current_path(), Some("/home/user"));
    navigate_up(&mut nav, &backend).await;
    navigate_up(&mut nav, &backend).await;
    assert_eq!(nav.current_path(), Some("/"));

    let ticket = nav.begin_navigate_up().unwrap();
    assert_eq!(
        fetch_listing(&backend, &ticket.request).await,
        ListingOutcome::Unchanged
    );
    navigate_up(&mut nav, &backend).await;
    assert_eq!(nav.current_path(), Some("/"));
    assert!(nav.error().is_none());
    assert!(!nav.is_loading());
}

#[test]
fn test_navigate_up_needs_a_listing() {
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());
    assert!(nav.begin_navigate_up().is_none());
}

#[tokio::test]
async fn test_home_failure_raises_banner() {
    let mut backend = backend();
    backend.home = "/nowhere".to_string();
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());

    open(&mut nav, &backend, Some("/gone")).await;

    assert!(nav.current_path().is_none());
    assert!(nav.error().unwrap().contains("/nowhere"));
    assert!(!nav.can_confirm());
}

#[tokio::test]
async fn test_folder_mode_files_are_inert() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());
    open(&mut nav, &backend, Some("/home/user/Pictures")).await;

    let activation = nav.toggle_select(&file("/home/user/Pictures/a.jpg"));

    assert_eq!(activation, Activation::Ignored);
    assert_eq!(nav.selection(), ["/home/user/Pictures".to_string()]);
}

#[tokio::test]
async fn test_directory_click_navigates() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());
    open(&mut nav, &backend, None).await;

    let activation = nav.toggle_select(&dir("/home/user/Pictures"));
    assert_eq!(
        activation,
        Activation::Navigate("/home/user/Pictures".to_string())
    );
    navigate(&mut nav, &backend, "/home/user/Pictures").await;

    assert_eq!(nav.current_path(), Some("/home/user/Pictures"));
    assert_eq!(nav.selection(), ["/home/user/Pictures".to_string()]);
}

#[tokio::test]
async fn test_files_mode_filters_and_toggles() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::images(true));
    open(&mut nav, &backend, Some("/home/user/Pictures")).await;

    assert_eq!(
        nav.toggle_select(&file("/home/user/Pictures/c.txt")),
        Activation::Ignored
    );
    assert!(!nav.can_confirm());

    nav.toggle_select(&file("/home/user/Pictures/b.webp"));
    nav.toggle_select(&file("/home/user/Pictures/a.jpg"));
    nav.toggle_select(&file("/home/user/Pictures/b.webp"));
    nav.toggle_select(&file("/home/user/Pictures/b.webp"));

    assert_eq!(
        nav.selection(),
        [
            "/home/user/Pictures/a.jpg".to_string(),
            "/home/user/Pictures/b.webp".to_string()
        ]
    );
}

#[tokio::test]
async fn test_extension_filter_is_case_insensitive() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::images(false));
    open(&mut nav, &backend, None).await;

    assert!(nav.is_selectable(&file("/home/user/cat.PNG")));
    assert!(!nav.is_selectable(&file("/home/user/notes.txt")));
    assert!(!nav.is_selectable(&dir("/home/user/Pictures")));
}

#[tokio::test]
async fn test_single_select_replaces() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::images(false));
    open(&mut nav, &backend, Some("/home/user/Pictures")).await;

    nav.toggle_select(&file("/home/user/Pictures/a.jpg"));
    nav.toggle_select(&file("/home/user/Pictures/b.webp"));

    assert_eq!(nav.selection(), ["/home/user/Pictures/b.webp".to_string()]);
}

#[tokio::test]
async fn test_navigation_clears_file_selection() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::images(true));
    open(&mut nav, &backend, Some("/home/user/Pictures")).await;
    nav.toggle_select(&file("/home/user/Pictures/a.jpg"));

    navigate_up(&mut nav, &backend).await;

    assert!(nav.selection().is_empty());
}

#[tokio::test]
async fn test_confirm_yields_and_closes() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::images(true));
    open(&mut nav, &backend, Some("/home/user/Pictures")).await;

    assert_eq!(nav.confirm().unwrap_err(), NavigatorError::NothingSelected);
    assert!(nav.is_open());

    nav.toggle_select(&file("/home/user/Pictures/a.jpg"));
    let selection = nav.confirm().unwrap();

    assert_eq!(
        selection,
        PickerSelection::Files(vec!["/home/user/Pictures/a.jpg".to_string()])
    );
    assert!(!nav.is_open());
    assert!(nav.selection().is_empty());
    assert_eq!(nav.confirm().unwrap_err(), NavigatorError::NotOpen);
}

#[tokio::test]
async fn test_folder_confirm_yields_current_directory() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());
    open(&mut nav, &backend, None).await;
    navigate(&mut nav, &backend, "/out").await;

    assert_eq!(
        nav.confirm().unwrap(),
        PickerSelection::Folder("/out".to_string())
    );
}

#[tokio::test]
async fn test_cancel_discards_state() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::images(true));
    open(&mut nav, &backend, Some("/home/user/Pictures")).await;
    nav.toggle_select(&file("/home/user/Pictures/a.jpg"));

    nav.cancel();

    assert!(!nav.is_open());
    assert!(nav.selection().is_empty());
    assert!(nav.current_path().is_none());
    assert!(nav.breadcrumbs().is_empty());
}

#[tokio::test]
async fn test_breadcrumbs_follow_current_path() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());
    open(&mut nav, &backend, Some("/home/user/Pictures")).await;

    let paths: Vec<String> = nav.breadcrumbs().into_iter().map(|b| b.path).collect();
    assert_eq!(paths.last().map(String::as_str), Some("/home/user/Pictures"));
}

#[tokio::test]
async fn test_view_reflects_state() {
    let backend = backend();
    let mut nav = DirectoryNavigator::new(PickerConfig::folder());
    open(&mut nav, &backend, Some("/out")).await;

    let view = nav.view();

    assert!(view.can_confirm);
    assert_eq!(view.selection, vec!["/out".to_string()]);
    assert_eq!(view.listing.unwrap().entries.len(), 1);
    assert_eq!(view.breadcrumbs.len(), 2);
    let json = serde_json::to_value(nav.view()).unwrap();
    assert_eq!(json["config"]["mode"], "folder");
    assert_eq!(json["listing"]["currentPath"], "/out");
}
