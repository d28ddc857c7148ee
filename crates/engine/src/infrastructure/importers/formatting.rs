//! Inline formatting tags (`{@tag content|display}`) in 5etools text.

use std::sync::OnceLock;

// Matches innermost tags only: content may not contain braces.
static FIVETOOLS_TAG_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();

fn tag_regex() -> &'static regex_lite::Regex {
    FIVETOOLS_TAG_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"\{@(\w+)(?:\s+([^{}]*))?\}")
            .expect("FIVETOOLS_TAG_REGEX pattern is invalid")
    })
}

/// Replace formatting tags with the text they display.
///
/// ```ignore
/// assert_eq!(clean_formatting("{@atk mw} {@hit 5} to hit"), "Melee Weapon Attack: +5 to hit");
/// ```
pub fn clean_formatting(text: &str) -> String {
    let re = tag_regex();
    let mut result = text.to_string();
    // Nested tags resolve from the inside out.
    while re.is_match(&result) {
        result = re
            .replace_all(&result, |caps: &regex_lite::Captures<'_>| {
                let tag = caps.get(1).map_or("", |m| m.as_str());
                let content = caps.get(2).map_or("", |m| m.as_str());
                render_tag(tag, content)
            })
            .into_owned();
    }
    result
}

fn render_tag(tag: &str, content: &str) -> String {
    match tag {
        "atk" | "atkr" => attack_label(content),
        "hit" => {
            let bonus = content.trim();
            if bonus.starts_with('-') || bonus.starts_with('+') {
                bonus.to_string()
            } else {
                format!("+{}", bonus)
            }
        }
        "h" => "Hit: ".to_string(),
        "m" => "Miss: ".to_string(),
        "dc" => format!("DC {}", content.trim()),
        "recharge" => match content.trim() {
            "" => "(Recharge 6)".to_string(),
            n => format!("(Recharge {}-6)", n),
        },
        _ => display_text(content),
    }
}

/// `name|source|display`: the display segment if present, else the name.
fn display_text(content: &str) -> String {
    let mut parts = content.split('|');
    let name = parts.next().unwrap_or_default();
    match parts.nth(1) {
        Some(display) if !display.is_empty() => display.to_string(),
        _ => name.to_string(),
    }
}

/// `mw`, `rs`, `mw,rw`, ... to the stat-block attack label.
fn attack_label(content: &str) -> String {
    let mut ranges: Vec<&str> = Vec::new();
    let mut kind = "";
    for code in content.split(',').map(str::trim) {
        let mut chars = code.chars();
        let range = match chars.next() {
            Some('m') => "Melee",
            Some('r') => "Ranged",
            _ => continue,
        };
        if !ranges.contains(&range) {
            ranges.push(range);
        }
        if kind.is_empty() {
            kind = match chars.next() {
                Some('s') => "Spell",
                _ => "Weapon",
            };
        }
    }
    if ranges.is_empty() {
        return String::new();
    }
    format!("{} {} Attack:", ranges.join(" or "), kind)
}
