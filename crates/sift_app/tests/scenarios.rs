//! End-to-end dropdown scenarios driven through the host's input routing

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use sift_app::prelude::*;
use sift_core::events::KeyCode;

const SLOT: ElementBounds = ElementBounds {
    x: 0.0,
    y: 0.0,
    width: 300.0,
    height: 40.0,
};

fn numbered(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("option {i}")).collect()
}

fn dropdown_of(host: &Host, key: &str) -> DropdownSnapshot {
    host.find::<Dropdown>(key)
        .and_then(Dropdown::snapshot)
        .expect("mounted dropdown")
}

#[test]
fn test_single_select_disables_other_options() {
    let mut host = Host::new();
    let fruit = cn::dropdown(["Apple", "Banana", "Cherry"])
        .key("fruit")
        .build()
        .unwrap();
    host.mount(fruit, SLOT);

    host.click_element("fruit/trigger").unwrap();
    host.click_element("fruit/option/0").unwrap();
    host.click_element("fruit/option/1").unwrap();

    let snap = dropdown_of(&host, "fruit");
    assert_eq!(snap.selection, vec!["Apple".to_string()]);
    assert!(snap.options[1].disabled);
    assert!(snap.options[2].disabled);
    assert!(!snap.options[0].disabled);

    // Deselecting re-enables everything
    host.click_element("fruit/option/0").unwrap();
    let snap = dropdown_of(&host, "fruit");
    assert!(snap.selection.is_empty());
    assert!(snap.options.iter().all(|row| !row.disabled));
}

#[test]
fn test_load_more_through_clicks() {
    let mut host = Host::new();
    let dd = cn::dropdown(numbered(250)).multiple(true).key("dd").build().unwrap();
    host.mount(dd, SLOT);

    host.click_element("dd/trigger").unwrap();
    assert_eq!(dropdown_of(&host, "dd").options.len(), 100);

    host.click_element("dd/load-more").unwrap();
    assert_eq!(dropdown_of(&host, "dd").options.len(), 200);

    host.click_element("dd/load-more").unwrap();
    let snap = dropdown_of(&host, "dd");
    assert_eq!(snap.options.len(), 250);
    assert_eq!(snap.materialized, 250);
    assert!(!snap.load_more);
    assert!(host.tree().node_by_key("dd/load-more").is_none());

    // No duplicates after the window is exhausted
    assert_eq!(host.find::<Dropdown>("dd").unwrap().load_next(), 0);
    let snap = dropdown_of(&host, "dd");
    assert_eq!(snap.options.len(), 250);
    assert_eq!(snap.options[249].label, "option 249");
}

#[test]
fn test_typed_search_is_debounced() {
    let mut host = Host::new();
    let dd = cn::dropdown(numbered(250)).searchable(true).key("dd").build().unwrap();
    host.mount(dd, SLOT);

    host.click_element("dd/trigger").unwrap();
    host.click_element("dd/search").unwrap();
    assert_eq!(host.router().focused(), Some("dd/search"));

    host.text_input("option 12");
    let snap = dropdown_of(&host, "dd");
    assert_eq!(snap.search_text, "option 12");
    assert_eq!(snap.applied_query, "");
    assert_eq!(snap.options.len(), 100);
    assert_eq!(host.pending_timers(), 1);

    host.advance_by(Duration::from_millis(49));
    assert_eq!(dropdown_of(&host, "dd").applied_query, "");

    host.advance_by(Duration::from_millis(1));
    let snap = dropdown_of(&host, "dd");
    assert_eq!(snap.applied_query, "option 12");
    assert_eq!(snap.options.len(), 11);
    assert!(!snap.load_more);
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn test_search_without_matches() {
    let mut host = Host::new();
    let dd = cn::dropdown(numbered(20)).searchable(true).key("dd").build().unwrap();
    host.mount(dd, SLOT);

    host.click_element("dd/trigger").unwrap();
    host.click_element("dd/search").unwrap();
    host.text_input("xyz-no-match");
    host.advance_by(Duration::from_millis(50));

    let snap = dropdown_of(&host, "dd");
    assert!(snap.options.is_empty());
    assert!(snap.no_results);
    assert!(host.tree().node_by_key("dd/no-results").is_some());
    assert!(describe(&snap).contains("No results found"));
}

#[test]
fn test_backspace_and_escape_in_search() {
    let mut host = Host::new();
    let dd = cn::dropdown(numbered(20)).searchable(true).key("dd").build().unwrap();
    host.mount(dd, SLOT);

    host.click_element("dd/trigger").unwrap();
    host.click_element("dd/search").unwrap();
    host.text_input("opx");
    assert!(host.key_down(KeyCode::Backspace));
    assert_eq!(dropdown_of(&host, "dd").search_text, "op");

    assert!(host.key_down(KeyCode::Escape));
    assert!(!dropdown_of(&host, "dd").open);
}

#[test]
fn test_click_outside_closes() {
    let mut host = Host::new();
    let dd = cn::dropdown(numbered(5)).key("dd").build().unwrap();
    host.mount(dd, SLOT);

    host.click_element("dd/trigger").unwrap();
    assert!(dropdown_of(&host, "dd").open);

    // Presses inside the panel keep it open
    let panel = host.tree().bounds_of("dd/panel").unwrap();
    host.click(panel.x + 1.0, panel.bottom() - 1.0);
    let snap = dropdown_of(&host, "dd");
    assert!(snap.open);
    assert_eq!(snap.selection, vec!["option 4".to_string()]);

    host.click(700.0, 700.0);
    assert!(!dropdown_of(&host, "dd").open);
    assert!(host.tree().node_by_key("dd/panel").is_none());
}

#[test]
fn test_opening_one_closes_another() {
    let mut host = Host::new();
    let left = cn::dropdown(numbered(5)).key("left").build().unwrap();
    let right = cn::dropdown(numbered(5)).key("right").build().unwrap();
    host.mount(left, SLOT);
    host.mount(right, ElementBounds::new(400.0, 0.0, 300.0, 40.0));

    host.click_element("left/trigger").unwrap();
    host.click_element("right/trigger").unwrap();

    assert!(!dropdown_of(&host, "left").open);
    assert!(dropdown_of(&host, "right").open);
}

#[test]
fn test_chip_remove_keeps_panel_state() {
    let mut host = Host::new();
    let dd = cn::dropdown(["Kiwi", "Mango", "Pear"])
        .multiple(true)
        .key("dd")
        .build()
        .unwrap();
    host.mount(dd, SLOT);

    host.click_element("dd/trigger").unwrap();
    host.click_element("dd/option/0").unwrap();
    host.click_element("dd/option/2").unwrap();
    assert_eq!(dropdown_of(&host, "dd").chips, vec!["Kiwi", "Pear"]);

    host.click_element("dd/chip/0/remove").unwrap();
    let snap = dropdown_of(&host, "dd");
    assert_eq!(snap.selection, vec!["Pear".to_string()]);
    assert!(snap.open);
}

#[test]
fn test_summary_chip_toggles_panel() {
    let mut host = Host::new();
    let dd = cn::dropdown(["Strawberry 🍓", "Banana 🍌", "Apple 🍎", "Kiwi 🥝"])
        .multiple(true)
        .key("dd")
        .build()
        .unwrap();
    host.mount(dd, SLOT);

    host.click_element("dd/trigger").unwrap();
    for row in 0..3 {
        host.click_element(&format!("dd/option/{row}")).unwrap();
    }

    // 260px for chips: Strawberry and Banana fit, Apple does not, and the
    // summary after Banana does not either, so Banana is evicted
    let snap = dropdown_of(&host, "dd");
    assert_eq!(snap.chips, vec!["Strawberry 🍓"]);
    assert_eq!(snap.summary.as_deref(), Some("+2 more"));

    host.click_element("dd/summary").unwrap();
    assert!(!dropdown_of(&host, "dd").open);

    host.click_element("dd/summary").unwrap();
    assert!(dropdown_of(&host, "dd").open);
}

#[test]
fn test_clear_icon_on_hover() {
    let mut host = Host::new();
    let dd = cn::dropdown(["Kiwi", "Mango"]).multiple(true).key("dd").build().unwrap();
    host.mount(dd, SLOT);

    host.find::<Dropdown>("dd").unwrap().toggle_option("Mango");
    host.mouse_move(700.0, 700.0);
    assert_eq!(dropdown_of(&host, "dd").corner, CornerIcon::Chevron);

    host.mouse_move(290.0, 20.0);
    assert_eq!(dropdown_of(&host, "dd").corner, CornerIcon::Clear);
    assert!(host.tree().node_by_key("dd/clear").is_some());

    host.click_element("dd/clear").unwrap();
    let snap = dropdown_of(&host, "dd");
    assert!(snap.selection.is_empty());
    assert!(!snap.open);
    assert_eq!(snap.corner, CornerIcon::Chevron);
}

#[test]
fn test_on_change_sees_every_change() {
    let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::default();
    let sink = Arc::clone(&seen);

    let mut host = Host::new();
    let dd = cn::dropdown(["Kiwi", "Mango"])
        .multiple(true)
        .key("dd")
        .on_change(move |picked| sink.lock().unwrap().push(picked.to_vec()))
        .build()
        .unwrap();
    host.mount(dd, SLOT);

    host.click_element("dd/trigger").unwrap();
    host.click_element("dd/option/1").unwrap();
    host.click_element("dd/option/0").unwrap();
    host.click_element("dd/option/1").unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            vec![],
            vec!["Mango".to_string()],
            vec!["Mango".to_string(), "Kiwi".to_string()],
            vec!["Kiwi".to_string()],
        ]
    );
}

#[test]
fn test_unmount_releases_listener_and_timer() {
    let mut host = Host::with_clock(Instant::now());
    let dd = cn::dropdown(numbered(20)).searchable(true).key("dd").build().unwrap();
    let id = host.mount(dd, SLOT);

    host.click_element("dd/trigger").unwrap();
    host.click_element("dd/search").unwrap();
    host.text_input("op");
    assert_eq!(host.pending_timers(), 1);
    assert_eq!(host.router().document_listener_count(), 1);

    host.unmount(id).unwrap();
    assert_eq!(host.pending_timers(), 0);
    assert_eq!(host.router().document_listener_count(), 0);
    assert!(host.tree().is_empty());

    // Nothing fires later
    assert_eq!(host.advance_by(Duration::from_secs(1)), 0);
}

#[test]
fn test_script_replay_from_toml() {
    let config = AppConfig::from_toml(
        r#"
        [[script]]
        action = "click"
        target = "users/trigger"

        [[script]]
        action = "click"
        target = "users/search"

        [[script]]
        action = "type"
        text = "happyEggplant13"

        [[script]]
        action = "wait"
        ms = 50

        [[script]]
        action = "click"
        target = "users/option/0"
        "#,
    )
    .unwrap();

    let mut host = Host::new();
    mount_showcase(&mut host, &config.dropdown).unwrap();
    run_script(&mut host, &config.script).unwrap();

    let snap = dropdown_of(&host, "users");
    assert_eq!(snap.applied_query, "happyEggplant13");
    assert_eq!(snap.selection, vec!["happyEggplant13".to_string()]);
    assert!(snap.open);
}
