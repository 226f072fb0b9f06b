//! Translation between address-bar query strings and list [`Parameters`].
//!
//! Every function here is total: malformed input degrades to the list's
//! defaults instead of failing, so any URL a user types or bookmarks renders.
use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::domain::query::{PAGE, PAGE_SIZE, ParamValue, Parameters, QueryConfig};

/// Bytes left unescaped in keys and values. Commas are escaped so a literal
/// comma in the URL always separates values.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Splits a raw query string into undecoded `(key, value)` pairs.
fn raw_pairs(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (!key.is_empty()).then_some((key, value))
        })
}

fn decode(component: &str) -> String {
    let spaced = component.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

fn encode(component: &str) -> String {
    utf8_percent_encode(component, QUERY_COMPONENT).to_string()
}

/// Decodes a raw value, treating literal commas as value separators.
fn decode_values(raw_value: &str) -> Vec<String> {
    if !raw_value.contains(',') {
        return vec![decode(raw_value)];
    }
    raw_value
        .split(',')
        .filter(|piece| !piece.is_empty())
        .map(decode)
        .collect()
}

/// Lower bound for integer fields; page numbers and sizes start at 1.
fn integer_floor(field: &str) -> i64 {
    if field == PAGE || field == PAGE_SIZE {
        1
    } else {
        i64::MIN
    }
}

fn coerce_integer(field: &str, values: &[String]) -> Option<i64> {
    let floor = integer_floor(field);
    values
        .iter()
        .filter_map(|value| value.trim().parse::<i64>().ok())
        .find(|value| *value >= floor)
}

/// Collects this list's decoded values per field, in URL order.
fn own_values(config: &QueryConfig, query: &str) -> BTreeMap<String, Vec<String>> {
    let mut collected: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (raw_key, raw_value) in raw_pairs(query) {
        let key = decode(raw_key);
        let Some(field) = config.strip_namespace(&key) else {
            continue;
        };
        collected
            .entry(field.to_string())
            .or_default()
            .extend(decode_values(raw_value));
    }
    collected
}

/// Parses the parameters of the list described by `config` out of `query`.
///
/// Keys outside the list's namespace are ignored. Fields missing from the
/// URL take their configured defaults; an integer field whose value does not
/// parse keeps its default. Repeated keys and comma-separated values become
/// lists.
pub fn parse_query_string(config: &QueryConfig, query: &str) -> Parameters {
    let mut params = config.defaults();

    for (field, values) in own_values(config, query) {
        if config.is_integer_field(&field) {
            match coerce_integer(&field, &values) {
                Some(number) => params.set(field, number),
                None => log::debug!("Ignoring malformed value for {field}: {values:?}"),
            }
            continue;
        }
        if let Some(value) = ParamValue::from_values(values) {
            params.set(field, value);
        }
    }

    params
}

fn push_pairs(pairs: &mut Vec<String>, key: &str, value: &ParamValue) {
    let key = encode(key);
    pairs.extend(
        value
            .to_query_values()
            .iter()
            .map(|v| format!("{key}={}", encode(v))),
    );
}

/// Encodes every parameter, defaults included, in key order.
///
/// This is the form handed to a backend API; it carries no namespace.
pub fn encode_query_string(params: &Parameters) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params.iter() {
        push_pairs(&mut pairs, key, value);
    }
    pairs.join("&")
}

/// Encodes the parameters that differ from the list's defaults.
///
/// Declared parameters come first in declaration order, followed by the rest
/// in key order, so encoding the same parameters always yields the same
/// string. Parameters equal to their defaults encode to an empty string.
pub fn encode_non_default_query_string(config: &QueryConfig, params: &Parameters) -> String {
    let declared = config.default_params().iter().map(|(key, _)| key.as_str());
    let undeclared = params
        .keys()
        .filter(|key| config.default_value(key).is_none());

    let mut pairs = Vec::new();
    for key in declared.chain(undeclared) {
        let Some(value) = params.get(key).and_then(|value| canonical_value(config, key, value))
        else {
            continue;
        };
        if config
            .default_value(key)
            .is_some_and(|default| default.same_encoding(&value))
        {
            continue;
        }
        push_pairs(&mut pairs, &config.namespaced_key(key), &value);
    }
    pairs.join("&")
}

/// The value as parsing would read it back. Integer fields keep their first
/// usable number; without one the field is left out and reads as its default.
fn canonical_value(config: &QueryConfig, key: &str, value: &ParamValue) -> Option<ParamValue> {
    if !config.is_integer_field(key) {
        return Some(value.clone());
    }
    let coerced = coerce_integer(key, &value.to_query_values());
    if coerced.is_none() {
        log::debug!("Dropping non-integer value for {key}: {value}");
    }
    coerced.map(ParamValue::Integer)
}

/// Re-encodes a raw component, keeping literal commas as value separators.
fn reencode(raw: &str) -> String {
    raw.split(',')
        .map(|piece| encode(&decode(piece)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Rewrites `query` so this list's part reflects `params`.
///
/// Keys owned by other lists sharing the URL are kept after the list's own
/// keys, re-encoded so the result is always a valid ASCII query string.
pub fn update_query_string(config: &QueryConfig, query: &str, params: &Parameters) -> String {
    let own = encode_non_default_query_string(config, params);
    let foreign = raw_pairs(query)
        .filter(|(raw_key, _)| config.strip_namespace(&decode(raw_key)).is_none())
        .map(|(key, value)| {
            if value.is_empty() {
                encode(&decode(key))
            } else {
                format!("{}={}", encode(&decode(key)), reencode(value))
            }
        });

    std::iter::once(own)
        .filter(|own| !own.is_empty())
        .chain(foreign)
        .collect::<Vec<_>>()
        .join("&")
}

/// Merges `patch` into `old`, returning a new parameter set.
///
/// When the patch changes anything but the page (a filter, the ordering or
/// the page size) without naming a page itself, the page resets to 1 since
/// the old offset no longer points at the same rows.
pub fn replace_params(old: &Parameters, patch: &Parameters) -> Parameters {
    let resets_page = !patch.contains_key(PAGE)
        && patch
            .iter()
            .any(|(key, value)| old.get(key).is_none_or(|current| !current.same_encoding(value)));

    let mut next = old.clone();
    for (key, value) in patch.iter() {
        next.set(key, value.clone());
    }
    if resets_page {
        next.set(PAGE, 1_i64);
    }
    next
}

/// Adds the values of `patch` to the values already present in `old`.
///
/// Integer values replace; text values accumulate without duplicates.
pub fn merge_params(old: &Parameters, patch: &Parameters) -> Parameters {
    let mut next = old.clone();
    for (key, value) in patch.iter() {
        let merged = match (old.get(key), value) {
            (Some(ParamValue::Integer(_)), _) | (_, ParamValue::Integer(_)) | (None, _) => {
                value.clone()
            }
            (Some(existing), _) => {
                let mut values = existing.to_query_values();
                for added in value.to_query_values() {
                    if !values.contains(&added) {
                        values.push(added);
                    }
                }
                match ParamValue::from_values(values) {
                    Some(merged) => merged,
                    None => continue,
                }
            }
        };
        next.set(key, merged);
    }
    next
}

/// Removes the given values from `old`.
///
/// A field left without values falls back to its default, or disappears
/// when it has none.
pub fn remove_params(config: &QueryConfig, old: &Parameters, to_remove: &Parameters) -> Parameters {
    let mut next = old.clone();
    for (key, removed) in to_remove.iter() {
        let Some(existing) = old.get(key) else {
            continue;
        };
        let removed = removed.to_query_values();
        let remaining: Vec<String> = existing
            .to_query_values()
            .into_iter()
            .filter(|value| !removed.contains(value))
            .collect();

        match ParamValue::from_values(remaining) {
            Some(value) if !existing.same_encoding(&value) => next.set(key, value),
            Some(_) => {}
            None => match config.default_value(key) {
                Some(default) => next.set(key, default.clone()),
                None => {
                    next.remove(key);
                }
            },
        }
    }
    next
}

/// Drops every search filter, keeping the declared parameters except the page.
pub fn remove_all_filters(config: &QueryConfig, old: &Parameters) -> Parameters {
    let mut next = config.defaults();
    for (key, _) in config.default_params() {
        if key == PAGE {
            continue;
        }
        if let Some(value) = old.get(key) {
            next.set(key.clone(), value.clone());
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::ORDER_BY;

    fn config() -> QueryConfig {
        QueryConfig::standard(None, 5, "name").expect("valid config")
    }

    fn template_config() -> QueryConfig {
        QueryConfig::standard(Some("template"), 20, "name").expect("valid config")
    }

    #[test]
    fn parses_typed_values() {
        let params = parse_query_string(&config(), "page=2&page_size=20&order_by=-name");
        assert_eq!(
            params,
            Parameters::new()
                .with(PAGE, 2_i64)
                .with(PAGE_SIZE, 20_i64)
                .with(ORDER_BY, "-name")
        );
    }

    #[test]
    fn empty_query_yields_defaults() {
        assert_eq!(parse_query_string(&config(), ""), config().defaults());
        assert_eq!(parse_query_string(&config(), "?"), config().defaults());
    }

    #[test]
    fn malformed_integers_fall_back_to_defaults() {
        let params = parse_query_string(&config(), "page=abc&page_size=0");
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), Some(5));

        let params = parse_query_string(&config(), "page=-3&page_size=");
        assert_eq!(params, config().defaults());
    }

    #[test]
    fn repeated_and_comma_separated_values_become_lists() {
        let params = parse_query_string(&config(), "status=failed&status=error&type=a,b");
        assert_eq!(params.get("status"), Some(&ParamValue::from(vec!["failed", "error"])));
        assert_eq!(params.get("type"), Some(&ParamValue::from(vec!["a", "b"])));
    }

    #[test]
    fn decodes_escapes_and_plus_signs() {
        let params = parse_query_string(&config(), "name__icontains=demo+job%2C%20v2&x");
        assert_eq!(params.get("name__icontains"), Some(&ParamValue::from("demo job, v2")));
        assert_eq!(params.get("x"), Some(&ParamValue::from("")));
    }

    #[test]
    fn namespaced_lists_do_not_see_each_other() {
        let query = "template.page=3&inventory.page=7&page=9&template.name__icontains=web";
        let inventory = QueryConfig::standard(Some("inventory"), 5, "name").unwrap();

        let templates = parse_query_string(&template_config(), query);
        let inventories = parse_query_string(&inventory, query);
        let bare = parse_query_string(&config(), query);

        assert_eq!(templates.page(), 3);
        assert_eq!(templates.get("name__icontains"), Some(&ParamValue::from("web")));
        assert_eq!(inventories.page(), 7);
        assert_eq!(inventories.filters().count(), 0);
        assert_eq!(bare.page(), 9);
        assert_eq!(bare.filters().count(), 0);
    }

    #[test]
    fn encodes_only_non_defaults() {
        assert_eq!(encode_non_default_query_string(&config(), &config().defaults()), "");

        let params = config().defaults().with(PAGE_SIZE, 10_i64).with(ORDER_BY, "-name");
        assert_eq!(
            encode_non_default_query_string(&config(), &params),
            "page_size=10&order_by=-name"
        );
    }

    #[test]
    fn zero_and_empty_values_are_present() {
        let config = QueryConfig::try_new(
            None,
            vec![("limit", ParamValue::Integer(3)), ("q", ParamValue::from("all"))],
            &["limit"],
        )
        .unwrap();
        let params = config.defaults().with("limit", 0_i64).with("q", "");

        let encoded = encode_non_default_query_string(&config, &params);
        assert_eq!(encoded, "limit=0&q=");
        assert_eq!(parse_query_string(&config, &encoded), params);
    }

    #[test]
    fn encodes_namespaced_keys_and_escapes_values() {
        let params = template_config()
            .defaults()
            .with(PAGE, 2_i64)
            .with("name__icontains", "a,b & c")
            .with("type", vec!["job_template", "workflow_job_template"]);

        let encoded = encode_non_default_query_string(&template_config(), &params);
        assert_eq!(
            encoded,
            "template.page=2&template.name__icontains=a%2Cb%20%26%20c\
             &template.type=job_template&template.type=workflow_job_template"
        );
        assert_eq!(parse_query_string(&template_config(), &encoded), params);
        assert_eq!(
            encode_non_default_query_string(&template_config(), &params),
            encoded
        );
    }

    #[test]
    fn encode_query_string_includes_defaults() {
        assert_eq!(
            encode_query_string(&config().defaults()),
            "order_by=name&page=1&page_size=5"
        );
    }

    #[test]
    fn update_keeps_other_lists_keys() {
        let params = template_config().defaults().with(PAGE, 4_i64);
        let updated = update_query_string(
            &template_config(),
            "?template.page=2&job.page=3&page_size=50",
            &params,
        );
        assert_eq!(updated, "template.page=4&job.page=3&page_size=50");

        let reset = update_query_string(
            &template_config(),
            "template.page=2",
            &template_config().defaults(),
        );
        assert_eq!(reset, "");
    }

    #[test]
    fn update_reencodes_other_lists_keys() {
        let updated = update_query_string(
            &template_config(),
            "name=café&status=a,b%2Cc&flag&tag=x+y",
            &template_config().defaults().with(PAGE, 2_i64),
        );
        assert_eq!(
            updated,
            "template.page=2&name=caf%C3%A9&status=a,b%2Cc&flag&tag=x%20y"
        );
        assert!(updated.is_ascii());
        assert_eq!(
            parse_query_string(&config(), &updated).get("status"),
            Some(&ParamValue::from(vec!["a", "b,c"]))
        );
    }

    #[test]
    fn values_encode_as_they_parse_back() {
        let cases = [
            config().defaults().with("status", vec!["failed"]),
            config().defaults().with("id", 5_i64),
            config().defaults().with(PAGE, "3"),
        ];
        for params in cases {
            let encoded = encode_non_default_query_string(&config(), &params);
            assert_eq!(parse_query_string(&config(), &encoded), params, "{encoded}");
        }

        let mixed = config().defaults().with(PAGE_SIZE, vec!["oops", "7"]);
        assert_eq!(encode_non_default_query_string(&config(), &mixed), "page_size=7");

        let junk = config().defaults().with(PAGE, "abc").with(PAGE_SIZE, 0_i64);
        assert_eq!(encode_non_default_query_string(&config(), &junk), "");
    }

    #[test]
    fn replace_resets_page_on_filter_change() {
        let old = Parameters::new()
            .with(PAGE, 3_i64)
            .with(PAGE_SIZE, 10_i64)
            .with("q", "a");

        let searched = replace_params(&old, &Parameters::new().with("q", "b"));
        assert_eq!(searched.page(), 1);
        assert_eq!(searched.get("q"), Some(&ParamValue::from("b")));
        assert_eq!(old.page(), 3);

        let paged = replace_params(&old, &Parameters::new().with(PAGE, 5_i64));
        assert_eq!(paged.page(), 5);
        assert_eq!(paged.get("q"), old.get("q"));
        assert_eq!(paged.page_size(), Some(10));
    }

    #[test]
    fn replace_resets_page_on_page_size_change_only_when_it_changes() {
        let old = Parameters::new().with(PAGE, 3_i64).with(PAGE_SIZE, 10_i64);

        assert_eq!(replace_params(&old, &Parameters::new().with(PAGE_SIZE, 20_i64)).page(), 1);
        assert_eq!(replace_params(&old, &Parameters::new().with(PAGE_SIZE, 10_i64)).page(), 3);

        let explicit = replace_params(
            &old,
            &Parameters::new().with(PAGE_SIZE, 20_i64).with(PAGE, 2_i64),
        );
        assert_eq!(explicit.page(), 2);
    }

    #[test]
    fn merge_accumulates_search_terms() {
        let old = Parameters::new().with("name__icontains", "web");
        let merged = merge_params(&old, &Parameters::new().with("name__icontains", "db"));
        assert_eq!(merged.get("name__icontains"), Some(&ParamValue::from(vec!["web", "db"])));

        let again = merge_params(&merged, &Parameters::new().with("name__icontains", "web"));
        assert_eq!(again, merged);
    }

    #[test]
    fn remove_falls_back_to_default_or_drops_key() {
        let old = config()
            .defaults()
            .with(ORDER_BY, "-modified")
            .with("status", vec!["failed", "error"])
            .with("name__icontains", "web");

        let removed = remove_params(
            &config(),
            &old,
            &Parameters::new()
                .with(ORDER_BY, "-modified")
                .with("status", "failed")
                .with("name__icontains", "web"),
        );

        assert_eq!(removed.order_by(), Some("name"));
        assert_eq!(removed.get("status"), Some(&ParamValue::from("error")));
        assert!(!removed.contains_key("name__icontains"));
    }

    #[test]
    fn remove_all_filters_keeps_size_and_order() {
        let old = config()
            .defaults()
            .with(PAGE, 4_i64)
            .with(PAGE_SIZE, 50_i64)
            .with(ORDER_BY, "-name")
            .with("status", "failed");

        let cleared = remove_all_filters(&config(), &old);
        assert_eq!(
            cleared,
            config().defaults().with(PAGE_SIZE, 50_i64).with(ORDER_BY, "-name")
        );
    }
}
