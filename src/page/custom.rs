//! Parser for the Transkribus `custom` attribute.
//!
//! The attribute is a sequence of `name {key:value; key:value;}` groups, e.g.
//! `readingOrder {index:0;} place {offset:15; length:9; wikiData:Q727;}`.
//! Values may contain `\uXXXX` escapes for characters that would otherwise
//! break the syntax (spaces, semicolons, braces).

use super::model::CustomTag;

/// Tag names that are read as entity tags unless configured otherwise.
pub const DEFAULT_ENTITY_TAGS: &[&str] = &[
    "date",
    "person",
    "place",
    "organization",
    "atm_food",
    "atm_home",
];

/// One `name {…}` group from a custom attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomEntry {
    pub name: String,
    pub fields: Vec<(String, String)>,
}

impl CustomEntry {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Split a custom attribute into its groups.
///
/// Returns a message describing the first syntax problem found.
pub fn parse_custom_attr(raw: &str) -> Result<Vec<CustomEntry>, String> {
    let mut entries = Vec::new();
    let mut rest = raw;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        let open = rest
            .find('{')
            .ok_or_else(|| format!("custom group '{}' has no '{{' body", rest.trim()))?;
        let name = rest[..open].trim();
        if name.is_empty() {
            return Err(format!("custom group at '{}' has no name", truncate(rest)));
        }

        let body_start = open + 1;
        let close = rest[body_start..]
            .find('}')
            .map(|idx| body_start + idx)
            .ok_or_else(|| format!("custom group '{name}' is missing a closing '}}'"))?;

        let fields = rest[body_start..close]
            .split(';')
            .filter_map(|field| field.split_once(':'))
            .map(|(key, value)| (key.trim().to_string(), decode_escapes(value.trim())))
            .filter(|(key, _)| !key.is_empty())
            .collect();

        entries.push(CustomEntry {
            name: name.to_string(),
            fields,
        });
        rest = &rest[close + 1..];
    }

    Ok(entries)
}

/// Entity tags among `entries` whose name is in `kinds`.
///
/// Groups without a numeric `offset` and `length` cannot be placed in the
/// line text and are skipped.
pub fn entity_tags(entries: &[CustomEntry], kinds: &[String]) -> Vec<CustomTag> {
    entries
        .iter()
        .filter(|entry| kinds.iter().any(|kind| kind == &entry.name))
        .filter_map(|entry| {
            let offset = entry.get("offset").and_then(|v| v.parse::<usize>().ok());
            let length = entry.get("length").and_then(|v| v.parse::<usize>().ok());
            let (Some(offset), Some(length)) = (offset, length) else {
                log::warn!(
                    "skipping '{}' tag without a valid offset/length",
                    entry.name
                );
                return None;
            };

            Some(CustomTag {
                kind: entry.name.clone(),
                offset,
                length,
                wikidata: non_empty(entry.get("wikiData")),
                date: non_empty(entry.get("yyyy-mm-dd")),
                continued: entry.get("continued") == Some("true"),
            })
        })
        .collect()
}

/// The `structure {type:…}` value, if present.
pub fn structure_type(entries: &[CustomEntry]) -> Option<String> {
    entries
        .iter()
        .find(|entry| entry.name == "structure")
        .and_then(|entry| non_empty(entry.get("type")))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(ToOwned::to_owned)
}

/// Decode `\uXXXX` escapes. A high surrogate followed by an escaped low
/// surrogate becomes one character; malformed or unpaired escapes stay as
/// written.
fn decode_escapes(raw: &str) -> String {
    if !raw.contains("\\u") {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find("\\u") {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 2..];
        match decode_unit(after) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &after[consumed..];
            }
            None => {
                out.push_str("\\u");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// One escaped character after `\u`, with the number of bytes it spans.
fn decode_unit(after: &str) -> Option<(char, usize)> {
    let unit = hex_unit(after)?;
    if !(0xD800..0xDC00).contains(&unit) {
        return char::from_u32(unit).map(|ch| (ch, 4));
    }

    let low = after[4..]
        .strip_prefix("\\u")
        .and_then(hex_unit)
        .filter(|low| (0xDC00..0xE000).contains(low))?;
    char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)).map(|ch| (ch, 10))
}

fn hex_unit(raw: &str) -> Option<u32> {
    raw.get(..4)
        .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
}

fn truncate(raw: &str) -> String {
    raw.chars().take(24).collect()
}
