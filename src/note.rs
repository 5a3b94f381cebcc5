//! Note Tag Parsing
//!
//! Items and maps carry a free-text note field. Settings are embedded in it
//! as `key=value` or `<key=value>` tags, matched case-insensitively.

use crate::error::NoteTagError;

/// Number of values a `rateparam=` tag must provide
pub const PARAM_COUNT: usize = 8;

/// Find every position where `key=` starts in the note (ASCII case-insensitive)
fn tag_values<'a>(note: &'a str, key: &str) -> impl Iterator<Item = &'a str> {
    let lowered = note.to_ascii_lowercase();
    let needle = format!("{}=", key.to_ascii_lowercase());
    let starts: Vec<usize> = lowered
        .match_indices(&needle)
        .map(|(idx, _)| idx + needle.len())
        .collect();
    starts.into_iter().map(move |start| &note[start..])
}

/// Read an integer tag such as `rate=30`.
///
/// The first occurrence followed by at least one digit wins; the value is the
/// leading run of digits.
pub fn int_tag(note: &str, key: &str) -> Option<i32> {
    tag_values(note, key).find_map(|rest| {
        let digits: &str = rest
            .find(|c: char| !c.is_ascii_digit())
            .map_or(rest, |end| &rest[..end]);
        if digits.is_empty() {
            None
        } else {
            // Saturate absurdly long digit runs instead of failing
            let value = digits.parse::<i64>().unwrap_or(i64::MAX);
            Some(value.min(i64::from(i32::MAX)) as i32)
        }
    })
}

/// Read a `rateparam=` style list tag running to the end of its line.
///
/// Returns `Ok(None)` when the tag is absent.
pub fn param_list_tag(note: &str, key: &str) -> Result<Option<[i32; PARAM_COUNT]>, NoteTagError> {
    let Some(rest) = tag_values(note, key).next() else {
        return Ok(None);
    };
    let line = rest.lines().next().unwrap_or("").trim();

    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() != PARAM_COUNT {
        return Err(NoteTagError::ParamCount {
            found: parts.len(),
            raw: line.to_string(),
        });
    }

    let mut values = [0; PARAM_COUNT];
    for (slot, part) in values.iter_mut().zip(&parts) {
        let Ok(value) = part.parse() else {
            return Err(NoteTagError::ParamValue {
                value: part.to_string(),
            });
        };
        *slot = value;
    }
    Ok(Some(values))
}

/// Read a bracketed string tag such as `<cm=Forest>`
pub fn bracket_tag(note: &str, key: &str) -> Option<String> {
    let lowered = note.to_ascii_lowercase();
    let opener = format!("<{}=", key.to_ascii_lowercase());
    let start = lowered.find(&opener)? + opener.len();
    let len = note[start..].find('>')?;
    let value = note[start..start + len].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_tag() {
        assert_eq!(int_tag("rate=30", "rate"), Some(30));
        assert_eq!(int_tag("Some text\nRATE=7 more", "rate"), Some(7));
        assert_eq!(int_tag("ratelvl=12", "rate"), None);
        assert_eq!(int_tag("ratelvl=12", "ratelvl"), Some(12));
        assert_eq!(int_tag("", "rate"), None);
    }

    #[test]
    fn test_int_tag_skips_empty_values() {
        // First occurrence has no digits, second one does
        assert_eq!(int_tag("rate=x rate=15", "rate"), Some(15));
        assert_eq!(int_tag("rate=-5", "rate"), None);
    }

    #[test]
    fn test_param_list_tag() {
        let note = "A sword\nrateparam=5000, 300,20,50,60,40,21,25\nrate=5";
        assert_eq!(
            param_list_tag(note, "rateparam").unwrap(),
            Some([5000, 300, 20, 50, 60, 40, 21, 25])
        );
        assert_eq!(param_list_tag("rate=5", "rateparam").unwrap(), None);
    }

    #[test]
    fn test_param_list_tag_rejects_malformed() {
        let err = param_list_tag("rateparam=1,2,3", "rateparam").unwrap_err();
        assert!(matches!(err, NoteTagError::ParamCount { found: 3, .. }));

        let err = param_list_tag("rateparam=1,2,3,4,5,6,7,x", "rateparam").unwrap_err();
        let expected = NoteTagError::ParamValue {
            value: "x".to_string(),
        };
        assert_eq!(err, expected);
    }

    #[test]
    fn test_bracket_tag() {
        assert_eq!(bracket_tag("<cm=Forest>", "cm"), Some("Forest".to_string()));
        let cave = bracket_tag("intro\n<CM= cave_01 >", "cm");
        assert_eq!(cave, Some("cave_01".to_string()));
        assert_eq!(bracket_tag("<cm=>", "cm"), None);
        assert_eq!(bracket_tag("<cm=unterminated", "cm"), None);
        assert_eq!(bracket_tag("nothing", "cm"), None);
    }
}
