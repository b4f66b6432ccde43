use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{Event, FilterIntent, ScoredEvent};

const DEFAULT_LINK: &str = "https://lagenda.bj";

/// English month names from chrono, translated for display.
const MONTHS_FULL: &[(&str, &str)] = &[
    ("January", "Janvier"),
    ("February", "Février"),
    ("March", "Mars"),
    ("April", "Avril"),
    ("May", "Mai"),
    ("June", "Juin"),
    ("July", "Juillet"),
    ("August", "Août"),
    ("September", "Septembre"),
    ("October", "Octobre"),
    ("November", "Novembre"),
    ("December", "Décembre"),
];

const MONTHS_ABBR: &[(&str, &str)] = &[
    ("Jan", "Jan"),
    ("Feb", "Fév"),
    ("Mar", "Mar"),
    ("Apr", "Avr"),
    ("May", "Mai"),
    ("Jun", "Jun"),
    ("Jul", "Jul"),
    ("Aug", "Aoû"),
    ("Sep", "Sep"),
    ("Oct", "Oct"),
    ("Nov", "Nov"),
    ("Dec", "Déc"),
];

const CATEGORY_EMOJIS: &[(&str, &str)] = &[
    ("musique", "🎵"),
    ("concert", "🎤"),
    ("festival", "🎪"),
    ("sport", "⚽"),
    ("football", "⚽"),
    ("basketball", "🏀"),
    ("culture", "🎭"),
    ("théâtre", "🎭"),
    ("danse", "💃"),
    ("cinéma", "🎬"),
    ("exposition", "🖼️"),
    ("art", "🎨"),
    ("conférence", "🎤"),
    ("formation", "📚"),
    ("business", "💼"),
    ("soirée", "🌙"),
    ("gastronomie", "🍽️"),
    ("famille", "👨‍👩‍👧‍👦"),
    ("enfants", "👶"),
    ("bien-être", "🧘"),
    ("religion", "🙏"),
    ("mode", "👗"),
];

fn translate_months(text: &str, table: &[(&str, &str)]) -> String {
    let mut out = text.to_string();
    for (eng, fr) in table {
        out = out.replace(eng, fr);
    }
    out
}

/// Strip HTML tags and common entities from feed descriptions.
pub fn clean_html(raw: &str) -> String {
    lazy_static! {
        static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
    }
    let text = TAG_RE.replace_all(raw, "");
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("\r\n", " ")
        .trim()
        .to_string()
}

/// Short French date line: single day, date range, or unconfirmed.
pub fn format_date_short(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    let start = match start {
        Some(d) => d,
        None => return "📅 Date à confirmer".to_string(),
    };

    match end {
        Some(end) if end != start => {
            let start_str = translate_months(&start.format("%d %b").to_string(), MONTHS_ABBR);
            let end_str = translate_months(&end.format("%d %b %Y").to_string(), MONTHS_ABBR);
            format!("📅 Du {} au {}", start_str, end_str)
        }
        _ => {
            let date_str = translate_months(&start.format("%d %B %Y").to_string(), MONTHS_FULL);
            format!("📅 {}", date_str)
        }
    }
}

/// Price line: free marker, formatted FCFA amount, or nothing.
pub fn format_price(event: &Event) -> String {
    if event.effectively_free() {
        return "🆓 Gratuit".to_string();
    }
    if event.price > 0.0 {
        return format!("💰 {} FCFA", group_thousands(event.price as i64));
    }
    String::new()
}

/// Group digits by thousands with spaces, French style.
fn group_thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Category label with a matching emoji, capitalized.
pub fn format_category(category: &str) -> String {
    if category.is_empty() {
        return String::new();
    }

    let cat_lower = category.to_lowercase();
    let mut emoji = "🏷️";
    for (key, em) in CATEGORY_EMOJIS {
        if cat_lower.contains(key) {
            emoji = em;
            break;
        }
    }

    let mut chars = category.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    format!("{} {}", emoji, capitalized)
}

/// Render ranked events as markdown display blocks.
pub fn format_events(events: &[ScoredEvent]) -> String {
    if events.is_empty() {
        return "📍 *Note :* Aucun événement trouvé pour ces critères.".to_string();
    }

    let blocks: Vec<String> = events.iter().map(|s| format_event_block(&s.event)).collect();
    blocks.join("\n\n---\n\n")
}

fn format_event_block(event: &Event) -> String {
    let title = if event.title.is_empty() {
        "ÉVÉNEMENT".to_string()
    } else {
        event.title.to_uppercase()
    };
    let city = if event.city.is_empty() {
        "Bénin"
    } else {
        event.city.as_str()
    };
    let link = event.link.as_deref().unwrap_or(DEFAULT_LINK);

    // Short description, capped for mobile display.
    let desc = clean_html(&event.description);
    let desc_short = if desc.chars().count() > 120 {
        let truncated: String = desc.chars().take(117).collect();
        format!("{}...", truncated)
    } else {
        desc
    };

    let mut block = format!("⭐ **[{}]({})**\n", title, link);

    let mut location_parts = vec![city.to_string()];
    if !event.venue_name.is_empty() && event.venue_name != event.city {
        location_parts.push(event.venue_name.clone());
    }
    block.push_str(&format!(
        "📍 {} | {}\n",
        location_parts.join(" - "),
        format_date_short(event.date_start, event.date_end)
    ));

    let mut meta_parts = Vec::new();
    if let Some(category) = &event.category {
        let formatted = format_category(category);
        if !formatted.is_empty() {
            meta_parts.push(formatted);
        }
    }
    let price = format_price(event);
    if !price.is_empty() {
        meta_parts.push(price);
    }
    if !meta_parts.is_empty() {
        block.push_str(&format!("{}\n", meta_parts.join(" | ")));
    }

    if let Some(image) = &event.image {
        block.push_str(&format!("![affiche]({})\n", image));
    }
    if !desc_short.is_empty() {
        block.push_str(&format!("📝 _{}_\n", desc_short));
    }
    block.push_str(&format!("🔗 [Plus d'infos]({})", link));

    block
}

/// Contextual "no results" note naming the active criteria.
pub fn no_results_note(filters: &FilterIntent) -> String {
    let mut context_parts = Vec::new();
    if let Some(city) = &filters.city {
        context_parts.push(format!("à **{}**", city));
    }
    if let Some(category) = &filters.category {
        context_parts.push(format!("dans la catégorie **{}**", category));
    }
    if let Some(query) = &filters.search_query {
        context_parts.push(format!("pour **{}**", query));
    }
    if filters.is_free == Some(true) {
        context_parts.push("**gratuits**".to_string());
    }

    let context = if context_parts.is_empty() {
        "correspondant à vos critères".to_string()
    } else {
        context_parts.join(" ")
    };

    format!(
        "📍 *Note :* Je n'ai trouvé aucun événement {}. Essayez d'élargir votre recherche !",
        context
    )
}

/// Transparency counter appended under the result blocks.
pub fn count_note(shown: usize, total: usize) -> String {
    format!("_({} affichés sur {} trouvés)_", shown, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(event: Event) -> ScoredEvent {
        ScoredEvent {
            event,
            relevance_score: 10,
        }
    }

    #[test]
    fn test_clean_html() {
        assert_eq!(clean_html("<p>Un <b>super</b> concert</p>"), "Un super concert");
        assert_eq!(clean_html("Gratuit&nbsp;&amp; ouvert\r\nà tous"), "Gratuit & ouvert à tous");
        assert_eq!(clean_html(""), "");
    }

    #[test]
    fn test_format_date_single_day() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 20);
        assert_eq!(format_date_short(date, date), "📅 20 Janvier 2026");
        assert_eq!(format_date_short(date, None), "📅 20 Janvier 2026");
    }

    #[test]
    fn test_format_date_range() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 10);
        let end = NaiveDate::from_ymd_opt(2026, 2, 12);
        assert_eq!(format_date_short(start, end), "📅 Du 10 Jan au 12 Fév 2026");
    }

    #[test]
    fn test_format_date_missing() {
        assert_eq!(format_date_short(None, None), "📅 Date à confirmer");
    }

    #[test]
    fn test_format_price() {
        let mut event = Event {
            price: 5000.0,
            ..Event::default()
        };
        assert_eq!(format_price(&event), "💰 5 000 FCFA");

        event.price = 1250000.0;
        assert_eq!(format_price(&event), "💰 1 250 000 FCFA");

        event.is_free = true;
        assert_eq!(format_price(&event), "🆓 Gratuit");

        let free = Event::default();
        assert_eq!(format_price(&free), "🆓 Gratuit");
    }

    #[test]
    fn test_format_category() {
        assert_eq!(format_category("musique"), "🎵 Musique");
        assert_eq!(format_category("sport"), "⚽ Sport");
        assert_eq!(format_category("inconnu"), "🏷️ Inconnu");
        assert_eq!(format_category(""), "");
    }

    #[test]
    fn test_format_events_empty() {
        assert_eq!(
            format_events(&[]),
            "📍 *Note :* Aucun événement trouvé pour ces critères."
        );
    }

    #[test]
    fn test_format_events_block_contents() {
        let event = Event {
            title: "Concert de Jazz".to_string(),
            city: "Cotonou".to_string(),
            venue_name: "Institut Français".to_string(),
            description: "<p>Un super concert</p>".to_string(),
            date_start: NaiveDate::from_ymd_opt(2026, 1, 20),
            category: Some("musique".to_string()),
            price: 5000.0,
            link: Some("https://lagenda.bj/jazz".to_string()),
            ..Event::default()
        };

        let rendered = format_events(&[scored(event)]);
        assert!(rendered.contains("⭐ **[CONCERT DE JAZZ](https://lagenda.bj/jazz)**"));
        assert!(rendered.contains("📍 Cotonou - Institut Français"));
        assert!(rendered.contains("📅 20 Janvier 2026"));
        assert!(rendered.contains("🎵 Musique"));
        assert!(rendered.contains("💰 5 000 FCFA"));
        assert!(rendered.contains("📝 _Un super concert_"));
        assert!(rendered.contains("🔗 [Plus d'infos](https://lagenda.bj/jazz)"));
    }

    #[test]
    fn test_format_events_defaults() {
        let rendered = format_events(&[scored(Event::default())]);
        assert!(rendered.contains("ÉVÉNEMENT"));
        assert!(rendered.contains("Bénin"));
        assert!(rendered.contains(DEFAULT_LINK));
        assert!(rendered.contains("📅 Date à confirmer"));
    }

    #[test]
    fn test_long_description_truncated() {
        let event = Event {
            description: "x".repeat(200),
            ..Event::default()
        };
        let rendered = format_events(&[scored(event)]);
        assert!(rendered.contains(&format!("📝 _{}..._", "x".repeat(117))));
    }

    #[test]
    fn test_no_results_note_with_criteria() {
        let filters = FilterIntent {
            city: Some("Cotonou".to_string()),
            search_query: Some("jazz".to_string()),
            is_free: Some(true),
            ..FilterIntent::default()
        };
        let note = no_results_note(&filters);
        assert!(note.contains("à **Cotonou**"));
        assert!(note.contains("pour **jazz**"));
        assert!(note.contains("**gratuits**"));
    }

    #[test]
    fn test_no_results_note_without_criteria() {
        let note = no_results_note(&FilterIntent::default());
        assert!(note.contains("correspondant à vos critères"));
    }

    #[test]
    fn test_count_note() {
        assert_eq!(count_note(5, 12), "_(5 affichés sur 12 trouvés)_");
    }
}
