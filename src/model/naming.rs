//! Default key-name derivation for resources.

/// Key name for a resource of a synthesized instance: the resource name with
/// the instance id appended, camel-cased (`"Model Number"`, 2 → `"modelNumber2"`).
pub fn instance_key_name(resource_name: &str, instance_id: u16) -> String {
    camel_case(&format!("{}{}", resource_name, instance_id))
}

/// Convert free text into a camelCase identifier.
///
/// Words break on non-alphanumeric characters, lower→upper transitions,
/// the end of an acronym (`XMLHttp` → `XML`, `Http`) and letter/digit
/// boundaries.
pub fn camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, word) in split_words(input).iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_alphabetic() && c.is_numeric())
                || (prev.is_numeric() && c.is_alphabetic())
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(char::is_lowercase));
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("Manufacturer"), "manufacturer");
        assert_eq!(camel_case("Model Number"), "modelNumber");
        assert_eq!(camel_case("UTC Offset"), "utcOffset");
        assert_eq!(camel_case("XMLHttp request"), "xmlHttpRequest");
        assert_eq!(camel_case("Available Power Sources"), "availablePowerSources");
        assert_eq!(camel_case("  --Reboot__ "), "reboot");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn test_instance_key_name() {
        assert_eq!(instance_key_name("x", 2), "x2");
        assert_eq!(instance_key_name("Manufacturer", 1), "manufacturer1");
        assert_eq!(instance_key_name("Model Number", 12), "modelNumber12");
    }
}
