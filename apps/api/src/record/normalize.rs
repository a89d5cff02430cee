//! Canonicalizers applied to extracted values before they enter the record.
//!
//! Both functions are total: unparseable input comes back unchanged (phone)
//! or title-cased (location). They never guess international formats.

/// Formats a US phone number as `(AAA) BBB-CCCC`.
///
/// 10 digits are formatted directly; 11 digits with a leading `1` drop the
/// country code first. Anything else is returned as given.
pub fn normalize_phone(input: &str) -> String {
    let digits: Vec<u8> = input
        .bytes()
        .filter(|b| b.is_ascii_digit())
        .collect();

    let local: &[u8] = match digits.len() {
        10 => &digits,
        11 if digits[0] == b'1' => &digits[1..],
        _ => return input.to_string(),
    };

    let s = std::str::from_utf8(local).unwrap_or_default();
    format!("({}) {}-{}", &s[..3], &s[3..6], &s[6..])
}

/// Full state names (lowercase) to USPS codes. Multi-word names are matched
/// longest-suffix-first so "west virginia" never resolves as "virginia".
const STATE_NAMES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("district of columbia", "DC"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("guam", "GU"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("puerto rico", "PR"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virgin islands", "VI"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

fn state_code_for_name(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_lowercase();
    STATE_NAMES
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, code)| *code)
}

fn is_state_code(s: &str) -> bool {
    let upper = s.trim().to_uppercase();
    STATE_NAMES.iter().any(|(_, code)| *code == upper)
}

/// Canonicalizes a location string as `City, ST`.
///
/// Accepted shapes, in precedence order: `"City, ST"`, `"City, State Name"`,
/// `"city st"`, `"city state name"`. Falls back to a title-cased copy of the
/// trimmed input when nothing matches.
pub fn normalize_city_state(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if let Some((city, state)) = trimmed.split_once(',') {
        let city = city.trim();
        let state = state.trim();
        if state.len() == 2 && is_state_code(state) {
            return format!("{}, {}", title_case(city), state.to_uppercase());
        }
        if let Some(code) = state_code_for_name(state) {
            return format!("{}, {}", title_case(city), code);
        }
        return title_case(trimmed);
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.len() >= 2 {
        let last = words[words.len() - 1];
        if last.len() == 2 && is_state_code(last) {
            let city = words[..words.len() - 1].join(" ");
            return format!("{}, {}", title_case(&city), last.to_uppercase());
        }
        // Longest suffix first: try the most words a state name can span
        // before shorter suffixes, so "west virginia" wins over "virginia".
        let max_suffix = (words.len() - 1).min(3);
        for take in (1..=max_suffix).rev() {
            let suffix = words[words.len() - take..].join(" ");
            if let Some(code) = state_code_for_name(&suffix) {
                let city = words[..words.len() - take].join(" ");
                return format!("{}, {}", title_case(&city), code);
            }
        }
    }

    title_case(trimmed)
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
