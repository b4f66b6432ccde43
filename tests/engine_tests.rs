// Integration tests for the filtering and scoring engine

use agenda_chat::core::{present, Engine};
use agenda_chat::models::{Event, FilterIntent};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Fixture catalog: one concert in Cotonou, one festival in Ouidah, one
/// football match in Porto-Novo.
fn sample_events() -> Vec<Event> {
    vec![
        Event {
            title: "Concert de Jazz".to_string(),
            city: "Cotonou".to_string(),
            description: "Un super concert de jazz".to_string(),
            date_start: Some(date(2026, 1, 20)),
            date_end: Some(date(2026, 1, 20)),
            category: Some("musique".to_string()),
            is_free: false,
            price: 5000.0,
            ..Event::default()
        },
        Event {
            title: "Festival Vodoun".to_string(),
            city: "Ouidah".to_string(),
            description: "Festival culturel à Ouidah".to_string(),
            date_start: Some(date(2026, 1, 10)),
            date_end: Some(date(2026, 1, 12)),
            category: Some("culture".to_string()),
            is_free: true,
            price: 0.0,
            ..Event::default()
        },
        Event {
            title: "Match de Football".to_string(),
            city: "Porto-Novo".to_string(),
            description: "Match au stade de Porto-Novo".to_string(),
            date_start: Some(date(2026, 1, 25)),
            date_end: Some(date(2026, 1, 25)),
            category: Some("sport".to_string()),
            is_free: false,
            price: 2000.0,
            ..Event::default()
        },
    ]
}

fn intent_with_city(city: &str) -> FilterIntent {
    FilterIntent {
        city: Some(city.to_string()),
        ..FilterIntent::default()
    }
}

#[test]
fn test_filter_by_city() {
    let engine = Engine::with_default_weights();
    let result = engine.filter_events(&sample_events(), &intent_with_city("Cotonou"));

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].event.city, "Cotonou");
}

#[test]
fn test_filter_by_city_not_found() {
    let engine = Engine::with_default_weights();
    let result = engine.filter_events(&sample_events(), &intent_with_city("Paris"));
    assert!(result.is_empty());
}

#[test]
fn test_filter_by_date() {
    let engine = Engine::with_default_weights();
    let intent = FilterIntent {
        date_start: Some("2026-01-20".to_string()),
        date_end: Some("2026-01-20".to_string()),
        ..FilterIntent::default()
    };

    let result = engine.filter_events(&sample_events(), &intent);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].event.title, "Concert de Jazz");
}

#[test]
fn test_filter_by_date_range() {
    let engine = Engine::with_default_weights();
    let intent = FilterIntent {
        date_start: Some("2026-01-10".to_string()),
        date_end: Some("2026-01-25".to_string()),
        ..FilterIntent::default()
    };

    let result = engine.filter_events(&sample_events(), &intent);
    assert_eq!(result.len(), 3);
}

#[test]
fn test_date_window_excludes_non_overlapping() {
    let engine = Engine::with_default_weights();
    // The festival spans the 10th to the 12th; asking for the 20th must
    // exclude it.
    let intent = FilterIntent {
        date_start: Some("2026-01-20".to_string()),
        ..FilterIntent::default()
    };

    let result = engine.filter_events(&sample_events(), &intent);
    assert!(result.iter().all(|e| e.event.title != "Festival Vodoun"));
}

#[test]
fn test_filter_by_search_query() {
    let engine = Engine::with_default_weights();
    let intent = FilterIntent {
        search_query: Some("jazz".to_string()),
        ..FilterIntent::default()
    };

    let result = engine.filter_events(&sample_events(), &intent);
    assert_eq!(result.len(), 1);
    assert!(result[0].event.title.contains("Jazz"));
}

#[test]
fn test_title_match_outscores_description_match() {
    let engine = Engine::with_default_weights();
    let catalog = vec![
        Event {
            title: "Soirée découverte".to_string(),
            city: "Cotonou".to_string(),
            description: "Du jazz et des surprises".to_string(),
            ..Event::default()
        },
        Event {
            title: "Concert de Jazz".to_string(),
            city: "Cotonou".to_string(),
            description: "Une grande soirée".to_string(),
            ..Event::default()
        },
    ];
    let intent = FilterIntent {
        search_query: Some("jazz".to_string()),
        ..FilterIntent::default()
    };

    let result = engine.filter_events(&catalog, &intent);
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].event.title, "Concert de Jazz");
    assert!(result[0].relevance_score > result[1].relevance_score);
}

#[test]
fn test_filter_by_category_boosts_without_excluding() {
    let engine = Engine::with_default_weights();
    let intent = FilterIntent {
        category: Some("sport".to_string()),
        ..FilterIntent::default()
    };

    let result = engine.filter_events(&sample_events(), &intent);
    assert_eq!(result.len(), 3);
    assert_eq!(result[0].event.category.as_deref(), Some("sport"));
    assert!(result[0].relevance_score > result[result.len() - 1].relevance_score);
}

#[test]
fn test_filter_by_category_synonym() {
    let engine = Engine::with_default_weights();
    // "concert" must reach the event labelled "musique" via the synonym
    // table.
    let intent = FilterIntent {
        category: Some("concert".to_string()),
        ..FilterIntent::default()
    };

    let result = engine.filter_events(&sample_events(), &intent);
    assert_eq!(result[0].event.category.as_deref(), Some("musique"));
}

#[test]
fn test_filter_by_free() {
    let engine = Engine::with_default_weights();
    let intent = FilterIntent {
        is_free: Some(true),
        ..FilterIntent::default()
    };

    let result = engine.filter_events(&sample_events(), &intent);
    assert_eq!(result.len(), 3);
    assert!(result[0].event.is_free);
}

#[test]
fn test_filter_combined_city_and_date() {
    let engine = Engine::with_default_weights();
    let intent = FilterIntent {
        city: Some("Cotonou".to_string()),
        date_start: Some("2026-01-20".to_string()),
        date_end: Some("2026-01-20".to_string()),
        ..FilterIntent::default()
    };

    let result = engine.filter_events(&sample_events(), &intent);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].event.city, "Cotonou");
}

#[test]
fn test_filter_empty_intent_keeps_everything_in_order() {
    let engine = Engine::with_default_weights();
    let catalog = sample_events();

    let result = engine.filter_events(&catalog, &FilterIntent::default());

    assert_eq!(result.len(), 3);
    let titles: Vec<&str> = result.iter().map(|e| e.event.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Concert de Jazz", "Festival Vodoun", "Match de Football"]
    );
    // Without a query every event carries the same baseline score.
    assert!(result.iter().all(|e| e.relevance_score == result[0].relevance_score));
}

#[test]
fn test_scores_sorted_descending() {
    let engine = Engine::with_default_weights();
    let intent = FilterIntent {
        search_query: Some("concert festival match".to_string()),
        ..FilterIntent::default()
    };

    let result = engine.filter_events(&sample_events(), &intent);
    for pair in result.windows(2) {
        assert!(pair[0].relevance_score >= pair[1].relevance_score);
    }
}

#[test]
fn test_filter_does_not_mutate_catalog() {
    let engine = Engine::with_default_weights();
    let catalog = sample_events();
    let snapshot = catalog.clone();

    let first = engine.filter_events(&catalog, &intent_with_city("Cotonou"));
    let second = engine.filter_events(&catalog, &intent_with_city("Cotonou"));

    assert_eq!(catalog, snapshot);
    assert_eq!(first, second);
}

#[test]
fn test_empty_catalog_is_not_an_error() {
    let engine = Engine::with_default_weights();
    let result = engine.filter_events(&[], &intent_with_city("Cotonou"));
    assert!(result.is_empty());
}

#[test]
fn test_event_without_city_excluded_under_city_intent() {
    let engine = Engine::with_default_weights();
    let catalog = vec![Event {
        title: "Test".to_string(),
        ..Event::default()
    }];

    let result = engine.filter_events(&catalog, &intent_with_city("Cotonou"));
    assert!(result.is_empty());
}

#[test]
fn test_event_without_date_passes_without_date_intent() {
    let engine = Engine::with_default_weights();
    let catalog = vec![Event {
        title: "Test".to_string(),
        city: "Cotonou".to_string(),
        ..Event::default()
    }];

    let result = engine.filter_events(&catalog, &intent_with_city("Cotonou"));
    assert_eq!(result.len(), 1);
}

#[test]
fn test_event_without_date_excluded_under_date_intent() {
    let engine = Engine::with_default_weights();
    let catalog = vec![Event {
        title: "Test".to_string(),
        city: "Cotonou".to_string(),
        ..Event::default()
    }];

    let intent = FilterIntent {
        date_start: Some("2026-01-20".to_string()),
        ..FilterIntent::default()
    };
    assert!(engine.filter_events(&catalog, &intent).is_empty());
}

#[test]
fn test_invalid_date_format_degrades_gracefully() {
    let engine = Engine::with_default_weights();
    let intent = FilterIntent {
        date_start: Some("invalid-date".to_string()),
        ..FilterIntent::default()
    };

    // The malformed date is treated as absent: no date filtering applies.
    let result = engine.filter_events(&sample_events(), &intent);
    assert_eq!(result.len(), 3);
}

#[test]
fn test_fuzzy_city_match() {
    let engine = Engine::with_default_weights();
    let catalog = vec![Event {
        title: "Foire artisanale".to_string(),
        city: "Abomey-Calavi".to_string(),
        ..Event::default()
    }];

    let result = engine.filter_events(&catalog, &intent_with_city("Calavi"));
    assert_eq!(result.len(), 1);
}

#[test]
fn test_accented_city_matches_unaccented_catalog() {
    let engine = Engine::with_default_weights();
    let catalog = vec![Event {
        title: "Marché de nuit".to_string(),
        city: "Sèmè-Kpodji".to_string(),
        ..Event::default()
    }];

    let result = engine.filter_events(&catalog, &intent_with_city("seme-kpodji"));
    assert_eq!(result.len(), 1);
}

#[test]
fn test_present_pages_ranked_results() {
    let engine = Engine::with_default_weights();
    let catalog: Vec<Event> = (0..30)
        .map(|i| Event {
            title: format!("Événement {}", i),
            city: "Cotonou".to_string(),
            ..Event::default()
        })
        .collect();

    let ranked = engine.filter_events(&catalog, &FilterIntent::default());
    let page = present(ranked, 20);

    assert_eq!(page.events.len(), 20);
    assert_eq!(page.total, 30);
}
