//! Telegram message formatting.

use crate::port::outbound::notifier::{CandidateEvent, Event, UnavailableEvent};

/// Render an event as an HTML-formatted Telegram message.
#[must_use]
pub fn format_event_message(event: &Event) -> String {
    match event {
        Event::CandidateAvailable(e) => format_available(e),
        Event::CandidateUnavailable(e) => format_unavailable(e),
        Event::CycleFailed { error } => {
            format!("⚠️ <b>Check cycle failed</b>\n{}", escape(error))
        }
    }
}

fn format_available(event: &CandidateEvent) -> String {
    let mut lines = vec![format!(
        "☕ <b>{}</b> is in stock at <b>{}</b>",
        escape(&event.name),
        escape(&event.roastery)
    )];

    if event.organic {
        lines.push("🌱 organic".to_string());
    }

    if event.size_prices.is_empty() {
        lines.push(format!("Price: {}", event.price));
    } else {
        for (size, price) in &event.size_prices {
            lines.push(format!("{size}: {price}"));
        }
    }

    match event.score {
        Some(score) => {
            lines.push(format!("Score: {score} ({})", escape(&event.reasons.join(", "))));
        }
        None => lines.push(format!("Matched favorite: {}", escape(&event.matched_label))),
    }

    lines.push(escape(&event.url));
    lines.join("\n")
}

fn format_unavailable(event: &UnavailableEvent) -> String {
    format!(
        "💤 <b>{}</b> at <b>{}</b> is out of stock (was {})",
        escape(&event.name),
        escape(&event.roastery),
        event.last_price
    )
}

/// Escape the three characters Telegram HTML parse mode reserves.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn available_message_lists_sizes_and_match() {
        let event = Event::CandidateAvailable(CandidateEvent {
            name: "Ethiopia Guji".to_string(),
            roastery: "Roastery Co".to_string(),
            url: "https://shop.example/guji".to_string(),
            price: dec!(12.5),
            matched_label: "guji".to_string(),
            score: None,
            reasons: vec![],
            sizes: vec!["250g".to_string(), "1kg".to_string()],
            size_prices: vec![("250g".to_string(), dec!(12.5)), ("1kg".to_string(), dec!(40))],
            organic: true,
        });

        let message = format_event_message(&event);
        assert!(message.contains("Ethiopia Guji"));
        assert!(message.contains("250g: 12.5"));
        assert!(message.contains("1kg: 40"));
        assert!(message.contains("Matched favorite: guji"));
        assert!(message.contains("🌱"));
    }

    #[test]
    fn html_reserved_characters_are_escaped() {
        let event = Event::CycleFailed {
            error: "fetch <timeout> & retry".to_string(),
        };
        let message = format_event_message(&event);
        assert!(message.contains("&lt;timeout&gt; &amp; retry"));
    }
}
