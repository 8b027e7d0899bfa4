//! 公开接口端到端测试
use chrono::{TimeZone, Utc};
use serde_json::json;

use rstabgenius::{
    analyze_with_settings, apply_decisions, build_action_plan, builtin_registry, classify, keys, merge_categories,
    Action, ActionAdvisor, CategoryAction, Confidence, CustomCategoryDescriptor, Decisions, RuleTables, Settings,
    SnapshotLoader, Tab, TabClassifier, TabSelection, UrlNormalizer, BUILTIN_TABLES,
};

const HOUR_MS: i64 = 3_600_000;

#[test]
fn test_end_to_end_scenario() {
    let tabs = SnapshotLoader::parse_snapshot(
        r#"[
            { "id": 1, "windowId": 1, "url": "https://github.com/org/repo/docs/guide", "title": "Guide - Documentation" },
            { "id": 2, "windowId": 1, "url": "https://amazon.com/cart", "title": "Cart" },
            { "id": 3, "windowId": 2, "url": "https://amazon.com/cart", "title": "Cart" }
        ]"#,
    )
    .unwrap();
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    let result = analyze_with_settings(&tabs, &Settings::default(), now);

    assert_eq!(result.stats.total, 3);
    assert_eq!(result.stats.duplicate_count, 1);
    assert_eq!(result.duplicates.len(), 1);
    assert_eq!(result.duplicates[0].tab_ids, vec![2, 3]);

    let docs = result.find_record(1).unwrap();
    assert_eq!(docs.category, keys::DOCUMENTATION);
    assert_eq!(docs.confidence, Confidence::High);
    assert!(docs.category_reason.starts_with("Path matches"));

    for id in [2, 3] {
        let cart = result.find_record(id).unwrap();
        assert_eq!(cart.category, keys::SHOPPING);
        assert_eq!(cart.action, Action::Keep);
        assert_eq!(cart.reason, "Shopping cart active");
        assert!(cart.is_duplicate);
        assert_eq!(cart.duplicate_count, 2);
    }

    // 输出信封字段
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["stats"]["duplicateCount"], 1);
    assert_eq!(value["stats"]["byAction"]["keep"], 3);
    assert_eq!(value["tabs"]["SHOPPING"][0]["isDuplicate"], true);
    assert_eq!(value["timestamp"], "2026-10-16T12:00:00.000Z");
    assert_eq!(value["allCategories"].as_array().unwrap().len(), 9);
}

#[test]
fn test_subdomain_rule_beats_path_pattern() {
    let mut tables = RuleTables::builtin();
    tables
        .path_patterns
        .insert(0, (keys::WORK.to_string(), vec!["/mail".to_string()]));
    let registry = builtin_registry();
    let classifier = TabClassifier::new(&tables, registry);

    let tab = Tab::new(1, 1, "https://mail.google.com/mail/u/0/#inbox", "Inbox");
    let result = classifier.classify(&tab);
    assert_eq!(result.category, keys::EMAIL);
    assert_eq!(result.confidence, Confidence::High);
}

#[test]
fn test_classification_deterministic_and_total() {
    let registry = builtin_registry();
    for (url, title) in [
        ("https://www.google.com/search?q=rust", "rust - Google Search"),
        ("not a url at all", ""),
        ("", ""),
        ("https://unknown.example/", "Nothing here"),
    ] {
        let tab = Tab::new(1, 1, url, title);
        let first = classify(&tab, registry);
        assert_eq!(first, classify(&tab, registry));
        assert!(registry.contains(&first.category));
    }
}

#[test]
fn test_normalization_properties() {
    let a = UrlNormalizer::normalize("https://x.com/a?b=2&a=1");
    assert_eq!(a, UrlNormalizer::normalize("https://x.com/a?a=1&b=2#frag"));
    assert_eq!(UrlNormalizer::normalize(&a), a);
}

#[test]
fn test_cart_override_and_search_staleness() {
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    let now_ms = now.timestamp_millis() as f64;
    let registry = builtin_registry();

    let settings = Settings::builder()
        .category_action(keys::SHOPPING, CategoryAction::Close)
        .build();
    let mut cart = Tab::new(1, 1, "https://shop.example/cart", "My Cart");
    cart.last_accessed = Some(now_ms - (48 * HOUR_MS) as f64);
    let classification = classify(&cart, registry);
    assert_eq!(classification.category, keys::SHOPPING);
    let suggestion = ActionAdvisor::suggest(&cart, &classification, &settings, now_ms);
    assert_eq!(suggestion.action, Action::Keep);

    let settings = Settings::default();
    let mut search = Tab::new(2, 1, "https://www.google.com/search?q=tabs", "tabs - Google Search");
    search.last_accessed = Some(now_ms - 0.5 * HOUR_MS as f64);
    let classification = classify(&search, registry);
    assert_eq!(classification.category, keys::SEARCH);
    let fresh = ActionAdvisor::suggest(&search, &classification, &settings, now_ms);
    assert_eq!(fresh.action, Action::Keep);

    search.last_accessed = Some(now_ms - 1.5 * HOUR_MS as f64);
    let stale = ActionAdvisor::suggest(&search, &classification, &settings, now_ms);
    assert_eq!(stale.action, Action::Close);
    assert_eq!(stale.priority, 3);
}

#[test]
fn test_registry_merge_properties() {
    let custom: Vec<CustomCategoryDescriptor> = serde_json::from_value(json!([
        { "id": "SOCIAL", "name": "Hijacked", "domains": ["example.org"] },
        { "id": "RECIPES", "name": "Recipes", "domains": ["allrecipes.com"], "keywords": ["Recipe"] }
    ]))
    .unwrap();
    let registry = merge_categories(&BUILTIN_TABLES.builtin_categories, &custom);

    assert_eq!(registry.get(keys::SOCIAL).unwrap().name, "Social Media");

    let by_domain = classify(&Tab::new(1, 1, "https://www.allrecipes.com/x", ""), &registry);
    assert_eq!(by_domain.category, "RECIPES");
    let by_keyword = classify(&Tab::new(2, 1, "https://cooking.example/", "Best recipe ever"), &registry);
    assert_eq!(by_keyword.category, "RECIPES");
    assert_eq!(by_keyword.confidence, Confidence::Medium);
}

#[test]
fn test_decisions_then_plan() {
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    let tabs = vec![
        Tab::new(1, 1, "https://reddit.com/r/rust", "r/rust"),
        Tab::new(2, 1, "https://facebook.com/", "Facebook"),
    ];
    let mut result = analyze_with_settings(&tabs, &Settings::default(), now);
    let decisions: Decisions = serde_json::from_value(json!({
        "SOCIAL": { "action": "close_most", "reason": "Distracting", "keep": [1] }
    }))
    .unwrap();
    apply_decisions(&mut result, &decisions);

    let plan = build_action_plan(&result, &TabSelection::All);
    let closes: Vec<i64> = plan.iter().filter(|a| a.action == Action::Close).map(|a| a.tab_id).collect();
    assert_eq!(closes, vec![2]);
    assert_eq!(result.stats.by_action.close, 1);
}
