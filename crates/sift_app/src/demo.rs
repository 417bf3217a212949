//! Demo option sets and the dropdown showcase

use std::fmt::Write as _;

use sift_cn::prelude::*;
use sift_cn::components::dropdown::view::{LOAD_MORE_LABEL, NO_RESULTS_LABEL, SEARCH_PLACEHOLDER};

use crate::config::DropdownLayoutConfig;
use crate::error::Result;
use crate::host::{Host, WidgetId};

pub const FRUITS: [&str; 15] = [
    "Strawberry 🍓",
    "Banana 🍌",
    "Apple 🍎",
    "Orange 🍊",
    "Grapes 🍇",
    "Cherry 🍒",
    "Pineapple 🍍",
    "Watermelon 🍉",
    "Kiwi 🥝",
    "Mango 🥭",
    "Peach 🍑",
    "Blueberry 🫐",
    "Raspberry 🍇",
    "Lemon 🍋",
    "Pear 🍐",
];

pub const VEGETABLES: [&str; 15] = [
    "Eggplant 🍆",
    "Carrot 🥕",
    "Broccoli 🥦",
    "Cucumber 🥒",
    "Tomato 🍅",
    "Bell Pepper 🫑",
    "Zucchini 🥒",
    "Onion 🧅",
    "Potato 🥔",
    "Spinach 🍃",
    "Lettuce 🥬",
    "Cabbage 🥬",
    "Cauliflower 🥦",
    "Radish 🍅",
    "Green Bean 🥦",
];

/// Username prefixes, paired with vegetables by index
pub const ADJECTIVES: [&str; 15] = [
    "happy",
    "funny",
    "bright",
    "sunny",
    "clever",
    "creative",
    "brilliant",
    "energetic",
    "lively",
    "cheerful",
    "charming",
    "exciting",
    "joyful",
    "radiant",
    "enthusiastic",
];

/// Number of generated usernames in the showcase
pub const USERNAME_COUNT: usize = 5000;

pub fn fruits() -> Vec<String> {
    FRUITS.iter().map(|s| s.to_string()).collect()
}

pub fn vegetables() -> Vec<String> {
    VEGETABLES.iter().map(|s| s.to_string()).collect()
}

/// `count` usernames like `happyEggplant13`
///
/// The prefix repeats every 15 names; the suffix is a permutation of
/// 0..1001 within each prefix, so names are unique up to 15015.
pub fn usernames(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let adjective = ADJECTIVES[i % ADJECTIVES.len()];
            let vegetable = VEGETABLES[i % VEGETABLES.len()];
            let last = vegetable.split(' ').next().unwrap_or(vegetable);
            let suffix = (i * 7919 + 13) % 1001;
            format!("{adjective}{last}{suffix}")
        })
        .collect()
}

/// A titled showcase entry
pub struct ShowcaseItem {
    pub title: &'static str,
    pub key: String,
    pub id: WidgetId,
}

/// Build the five showcase dropdowns
pub fn showcase(config: &DropdownLayoutConfig) -> Result<Vec<(&'static str, Dropdown)>> {
    let debounce = config.search_debounce();
    let batch = config.batch_size;
    let users = usernames(USERNAME_COUNT);

    let mut produce = fruits();
    produce.extend(vegetables());

    Ok(vec![
        (
            "Select One Fruit 🍉",
            cn::dropdown(fruits())
                .key("fruit")
                .placeholder("Select One Fruit")
                .batch_size(batch)
                .build()?,
        ),
        (
            "Select Many Vegetables 🥦",
            cn::dropdown(vegetables())
                .key("vegetables")
                .multiple(true)
                .placeholder("Select Multiple")
                .batch_size(batch)
                .build()?,
        ),
        (
            "Select Many Fruits & Vegetables 🍉 🥦",
            cn::dropdown(produce)
                .key("produce")
                .multiple(true)
                .placeholder("Select Multiple")
                .batch_size(batch)
                .build()?,
        ),
        (
            "Select One Username from 5,000",
            cn::dropdown(users.clone())
                .key("user")
                .searchable(true)
                .placeholder("Select One")
                .batch_size(batch)
                .search_debounce(debounce)
                .build()?,
        ),
        (
            "Select Many Usernames from 5,000",
            cn::dropdown(users)
                .key("users")
                .multiple(true)
                .searchable(true)
                .placeholder("Select Multiple")
                .batch_size(batch)
                .search_debounce(debounce)
                .on_change(|selection| tracing::info!(?selection, "selected items"))
                .build()?,
        ),
    ])
}

/// Mount the showcase into `host`, one slot per dropdown
pub fn mount_showcase(host: &mut Host, config: &DropdownLayoutConfig) -> Result<Vec<ShowcaseItem>> {
    let items = showcase(config)?;
    let mut mounted = Vec::with_capacity(items.len());

    for (index, (title, dropdown)) in items.into_iter().enumerate() {
        let key = dropdown.key().to_string();
        let id = host.mount(dropdown, config.slot(index));
        mounted.push(ShowcaseItem { title, key, id });
    }

    tracing::info!(count = mounted.len(), "showcase mounted");
    Ok(mounted)
}

/// Plain-text rendering of a dropdown
pub fn describe(snapshot: &DropdownSnapshot) -> String {
    let mut out = String::new();

    let mut trigger: Vec<String> = snapshot.chips.iter().map(|c| format!("[{c} ×]")).collect();
    if let Some(summary) = &snapshot.summary {
        trigger.push(format!("[{summary}]"));
    }
    if trigger.is_empty() {
        trigger.push(snapshot.placeholder.clone().unwrap_or_default());
    }
    let corner = match snapshot.corner {
        CornerIcon::Clear => "×",
        CornerIcon::Chevron => if snapshot.open { "▴" } else { "▾" },
    };
    let _ = writeln!(out, "{} {}", trigger.join(" "), corner);

    if !snapshot.open {
        return out;
    }

    if snapshot.searchable {
        let text = if snapshot.search_text.is_empty() {
            SEARCH_PLACEHOLDER
        } else {
            snapshot.search_text.as_str()
        };
        let _ = writeln!(out, "  🔍 {text}");
    }
    if snapshot.no_results {
        let _ = writeln!(out, "  {NO_RESULTS_LABEL}");
    }
    for row in &snapshot.options {
        let mark = match (row.selected, row.disabled) {
            (true, _) => "[x]",
            (false, true) => "[-]",
            (false, false) => "[ ]",
        };
        let _ = writeln!(out, "  {mark} {}", row.label);
    }
    if snapshot.load_more {
        let _ = writeln!(
            out,
            "  {LOAD_MORE_LABEL} ({}/{})",
            snapshot.materialized, snapshot.total
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_usernames_unique_and_deterministic() {
        let names = usernames(USERNAME_COUNT);
        assert_eq!(names.len(), USERNAME_COUNT);
        let unique: FxHashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), USERNAME_COUNT);
        assert_eq!(names, usernames(USERNAME_COUNT));

        assert_eq!(names[0], "happyEggplant13");
        assert!(names[5].starts_with("creativeBell"));
    }

    #[test]
    fn test_showcase_shapes() {
        let items = showcase(&DropdownLayoutConfig::default()).unwrap();
        let keys: Vec<&str> = items.iter().map(|(_, d)| d.key()).collect();
        assert_eq!(keys, vec!["fruit", "vegetables", "produce", "user", "users"]);

        let (_, produce) = &items[2];
        assert_eq!(produce.options().len(), 30);
        assert!(produce.is_multiple());

        let (_, users) = &items[4];
        assert_eq!(users.options().len(), USERNAME_COUNT);
        assert!(users.is_multiple() && users.is_searchable());
    }

    #[test]
    fn test_mount_showcase_stacks_slots() {
        let mut host = Host::new();
        let config = DropdownLayoutConfig::default();
        let items = mount_showcase(&mut host, &config).unwrap();
        assert_eq!(items.len(), 5);

        let first = host.tree().bounds_of("fruit").unwrap();
        let second = host.tree().bounds_of("vegetables").unwrap();
        assert_eq!(second.y - first.y, config.height + config.spacing);
        assert_eq!(host.router().document_listener_count(), 5);
    }

    #[test]
    fn test_describe_open_panel() {
        let mut host = Host::new();
        let config = DropdownLayoutConfig::default();
        mount_showcase(&mut host, &config).unwrap();
        host.click_element("fruit/trigger").unwrap();
        host.click_element("fruit/option/2").unwrap();

        let snapshot = host.find::<Dropdown>("fruit").unwrap().snapshot().unwrap();
        let text = describe(&snapshot);
        assert!(text.contains("[Apple 🍎 ×]"));
        assert!(text.contains("[x] Apple 🍎"));
        assert!(text.contains("[-] Banana 🍌"));
        assert!(!text.contains(LOAD_MORE_LABEL));
    }
}
